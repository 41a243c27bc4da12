//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

use crate::domain::CostModel;
use crate::planner::QueryError;
use crate::present::{Path, RouteOutcome};

use super::dto::*;
use super::state::AppState;

const DEFAULT_SEARCH_LIMIT: usize = 10;
const MAX_SEARCH_LIMIT: usize = 50;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/status", get(status))
        .route("/api/stations", get(list_stations))
        .route("/api/stations/search", get(search_stations))
        .route("/api/path", get(find_path))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Whether a graph is loaded, and what it holds.
async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    match state.router.store().current().await {
        Ok(snapshot) => Json(StatusResponse::from_snapshot(&snapshot)),
        Err(QueryError::LoadFailed(reason)) => Json(StatusResponse::not_ready(Some(reason))),
        Err(_) => Json(StatusResponse::not_ready(None)),
    }
}

/// All station names, sorted.
async fn list_stations(State(state): State<AppState>) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(state.router.station_names().await?))
}

/// Search stations by name.
async fn search_stations(
    State(state): State<AppState>,
    Query(req): Query<StationSearchRequest>,
) -> Result<Json<StationSearchResponse>, AppError> {
    let limit = req
        .limit
        .unwrap_or(DEFAULT_SEARCH_LIMIT)
        .min(MAX_SEARCH_LIMIT);
    let snapshot = state.router.store().current().await?;
    let graph = &snapshot.graph;

    let stations = graph
        .search(&req.q, limit)
        .into_iter()
        .map(|station| StationDto::from_station(graph, station))
        .collect();

    Ok(Json(StationSearchResponse { stations }))
}

/// Find a path between two named stations.
async fn find_path(
    State(state): State<AppState>,
    Query(req): Query<PathRequest>,
) -> Result<Json<Path>, AppError> {
    let model = match req.model.as_deref() {
        Some(model) => model.parse::<CostModel>().map_err(|e| AppError::BadRequest {
            message: e.to_string(),
        })?,
        None => CostModel::default(),
    };

    let outcome = state.router.route(&req.from, &req.to, model).await;
    debug!(from = %req.from, to = %req.to, %model, outcome = %outcome.message(), "Path query");

    match outcome {
        RouteOutcome::Found(path) | RouteOutcome::SameStation(path) => Ok(Json(path)),
        other => Err(AppError::from(other)),
    }
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest {
        message: String,
    },
    NotFound {
        message: String,
        suggestions: Vec<String>,
    },
    Unavailable {
        message: String,
    },
    Internal {
        message: String,
    },
}

impl From<RouteOutcome> for AppError {
    fn from(outcome: RouteOutcome) -> Self {
        let message = outcome.message();
        match outcome {
            RouteOutcome::UnknownStation { suggestions, .. } => AppError::NotFound {
                message,
                suggestions,
            },
            RouteOutcome::NotReady => AppError::Unavailable { message },
            RouteOutcome::LoadFailed { .. } => AppError::Internal { message },
            RouteOutcome::NoRoute { .. }
            | RouteOutcome::Found(_)
            | RouteOutcome::SameStation(_) => AppError::NotFound {
                message,
                suggestions: Vec::new(),
            },
        }
    }
}

impl From<QueryError> for AppError {
    fn from(e: QueryError) -> Self {
        AppError::from(RouteOutcome::from_error(None, e))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, error, suggestions) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message, Vec::new()),
            AppError::NotFound {
                message,
                suggestions,
            } => (StatusCode::NOT_FOUND, message, suggestions),
            AppError::Unavailable { message } => {
                (StatusCode::SERVICE_UNAVAILABLE, message, Vec::new())
            }
            AppError::Internal { message } => {
                (StatusCode::INTERNAL_SERVER_ERROR, message, Vec::new())
            }
        };

        warn!(%status, %error, "Request failed");

        let body = Json(ErrorResponse { error, suggestions });
        (status, body).into_response()
    }
}
