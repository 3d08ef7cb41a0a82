// Application state for HTTP handlers
use crate::application::geometry_service::GeometryService;
use crate::application::query_service::QueryService;

pub struct AppState {
    pub query_service: QueryService,
    pub geometry_service: GeometryService,
}
