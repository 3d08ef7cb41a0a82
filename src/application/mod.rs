// Application layer - Use cases over the immutable index
pub mod geometry_service;
pub mod monitoring_source;
pub mod query_service;
