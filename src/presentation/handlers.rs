// HTTP request handlers
use crate::domain::monitoring::{DateSelector, QueryError};
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;

/// Maps each query failure kind to a transport status. The date
/// selector is the only input that can be malformed rather than
/// merely absent, so it alone maps to 400.
impl IntoResponse for QueryError {
    fn into_response(self) -> Response {
        let status = match self {
            QueryError::InvalidDate(_) => StatusCode::BAD_REQUEST,
            QueryError::DateNotFound(_)
            | QueryError::StationNotFound(_)
            | QueryError::TimestampNotFound(_) => StatusCode::NOT_FOUND,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// The river geometry as `[[[lat, lon], ...], ...]` for polyline rendering
pub async fn river_geometry(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let geometry = state.geometry_service.geometry().await;
    Json((*geometry).clone())
}

pub async fn list_all(State(state): State<Arc<AppState>>) -> Result<Response, QueryError> {
    let view = state.query_service.list_all(&DateSelector::Current).await?;
    Ok(Json(view).into_response())
}

pub async fn list_all_for_date(
    Path(date): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, QueryError> {
    let selector = DateSelector::parse(Some(&date))?;
    let view = state.query_service.list_all(&selector).await?;
    Ok(Json(view).into_response())
}

pub async fn get_station(
    Path(id): Path<u32>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, QueryError> {
    let view = state
        .query_service
        .get_station(id, &DateSelector::Current)
        .await?;
    Ok(Json(view).into_response())
}

pub async fn get_station_for_date(
    Path((id, date)): Path<(u32, String)>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, QueryError> {
    let selector = DateSelector::parse(Some(&date))?;
    let view = state.query_service.get_station(id, &selector).await?;
    Ok(Json(view).into_response())
}

pub async fn latest_reading(
    Path(id): Path<u32>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, QueryError> {
    let view = state
        .query_service
        .latest_reading(id, &DateSelector::Current)
        .await?;
    Ok(Json(view).into_response())
}

pub async fn latest_reading_for_date(
    Path((id, date)): Path<(u32, String)>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, QueryError> {
    let selector = DateSelector::parse(Some(&date))?;
    let view = state.query_service.latest_reading(id, &selector).await?;
    Ok(Json(view).into_response())
}

pub async fn get_reading(
    Path((id, time)): Path<(u32, String)>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, QueryError> {
    let view = state
        .query_service
        .get_reading(id, &time, &DateSelector::Current)
        .await?;
    Ok(Json(view).into_response())
}

pub async fn get_reading_for_date(
    Path((id, time, date)): Path<(u32, String, String)>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, QueryError> {
    let selector = DateSelector::parse(Some(&date))?;
    let view = state.query_service.get_reading(id, &time, &selector).await?;
    Ok(Json(view).into_response())
}

/// Operator-triggered reload: rebuilds geometry and index from their
/// sources and swaps both in. Queries running during the swap keep
/// the dataset they started with.
pub async fn reload(State(state): State<Arc<AppState>>) -> Response {
    let segments = match state.geometry_service.reload().await {
        Ok(segments) => segments,
        Err(e) => {
            tracing::error!("geometry reload failed: {:#}", e);
            return reload_failure(&e);
        }
    };
    match state.query_service.reload().await {
        Ok(stations) => Json(json!({
            "status": "reloaded",
            "stations": stations,
            "segments": segments,
        }))
        .into_response(),
        Err(e) => {
            tracing::error!("monitoring reload failed: {:#}", e);
            reload_failure(&e)
        }
    }
}

fn reload_failure(e: &anyhow::Error) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": e.to_string() })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_invalid_date_maps_to_bad_request() {
        let response = QueryError::InvalidDate("2025-02-30".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_kinds_map_to_404() {
        let date = NaiveDate::from_ymd_opt(2099, 1, 1).unwrap();
        for err in [
            QueryError::DateNotFound(date),
            QueryError::StationNotFound(2),
            QueryError::TimestampNotFound("09:00".to_string()),
        ] {
            assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
        }
    }
}
