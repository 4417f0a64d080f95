//! Accounting period closing routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser};
use super::app_error_response;
use centra_core::billing::BillingPeriod;
use centra_shared::AppError;
use centra_db::repositories::period::{PeriodError, PeriodRepository};

/// Creates the period routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/periods/{year}/{month}/status", get(period_status))
        .route("/periods/{year}/{month}/close", post(close_period))
        .route("/periods/{year}/{month}/close", delete(reopen_period))
}

/// Query parameters selecting the center a period operation applies to.
#[derive(Debug, Deserialize)]
pub struct CenterQuery {
    /// Target center; required for platform administrators, optional for
    /// center-scoped callers (defaults to their own center).
    pub center_id: Option<Uuid>,
}

/// Resolves the target center for a period operation, enforcing scope.
fn resolve_center(auth: &AuthUser, query: &CenterQuery) -> Result<Uuid, axum::response::Response> {
    let Some(center_id) = query.center_id.or_else(|| auth.center_id()) else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "center_required",
                "message": "center_id query parameter is required"
            })),
        )
            .into_response());
    };

    if !auth.scope().permits(center_id) {
        return Err((
            StatusCode::FORBIDDEN,
            Json(json!({
                "error": "forbidden",
                "message": "Period belongs to another center"
            })),
        )
            .into_response());
    }

    Ok(center_id)
}

fn parse_period(year: i32, month: u32) -> Result<BillingPeriod, axum::response::Response> {
    BillingPeriod::new(year, month).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_period",
                "message": e.to_string()
            })),
        )
            .into_response()
    })
}

/// GET `/periods/{year}/{month}/status` - Whether the period is closed.
async fn period_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((year, month)): Path<(i32, u32)>,
    Query(query): Query<CenterQuery>,
) -> impl IntoResponse {
    let period = match parse_period(year, month) {
        Ok(p) => p,
        Err(response) => return response,
    };
    let center_id = match resolve_center(&auth, &query) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let repo = PeriodRepository::new((*state.db).clone());

    match repo.is_closed(center_id, period).await {
        Ok(closed) => (
            StatusCode::OK,
            Json(json!({
                "center_id": center_id,
                "year": period.year(),
                "month": period.month(),
                "closed": closed
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, center_id = %center_id, "Failed to check period status");
            internal_error_response()
        }
    }
}

/// POST `/periods/{year}/{month}/close` - Lock the period against mutations.
async fn close_period(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((year, month)): Path<(i32, u32)>,
    Query(query): Query<CenterQuery>,
) -> impl IntoResponse {
    let period = match parse_period(year, month) {
        Ok(p) => p,
        Err(response) => return response,
    };
    let center_id = match resolve_center(&auth, &query) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let repo = PeriodRepository::new((*state.db).clone());

    match repo.close_period(center_id, period, auth.user_id()).await {
        Ok(marker) => {
            info!(
                center_id = %center_id,
                period = %period,
                closed_by = %marker.closed_by,
                "Accounting period closed"
            );
            (
                StatusCode::CREATED,
                Json(json!({
                    "center_id": center_id,
                    "year": period.year(),
                    "month": period.month(),
                    "closed_by": marker.closed_by,
                    "closed_at": marker.closed_at
                })),
            )
                .into_response()
        }
        Err(PeriodError::AlreadyClosed { period }) => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "already_closed",
                "message": format!("Period {period} is already closed")
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, center_id = %center_id, "Failed to close period");
            internal_error_response()
        }
    }
}

/// DELETE `/periods/{year}/{month}/close` - Remove the closing marker.
async fn reopen_period(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((year, month)): Path<(i32, u32)>,
    Query(query): Query<CenterQuery>,
) -> impl IntoResponse {
    let period = match parse_period(year, month) {
        Ok(p) => p,
        Err(response) => return response,
    };
    let center_id = match resolve_center(&auth, &query) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let repo = PeriodRepository::new((*state.db).clone());

    match repo.reopen_period(center_id, period).await {
        Ok(()) => {
            info!(center_id = %center_id, period = %period, "Accounting period reopened");
            (
                StatusCode::OK,
                Json(json!({ "message": "Period reopened" })),
            )
                .into_response()
        }
        Err(PeriodError::NotClosed { period }) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_closed",
                "message": format!("Period {period} is not closed")
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, center_id = %center_id, "Failed to reopen period");
            internal_error_response()
        }
    }
}

fn internal_error_response() -> axum::response::Response {
    app_error_response(&AppError::Internal("An error occurred".to_string()))
}
