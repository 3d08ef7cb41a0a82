// Domain layer - Core models and rules, no I/O
pub mod geometry;
pub mod monitoring;
