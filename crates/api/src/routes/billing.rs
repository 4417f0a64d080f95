//! Billing preview routes.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser};
use super::app_error_response;
use centra_core::billing::BillingPeriod;
use centra_shared::AppError;
use centra_db::repositories::discount::{DiscountError, DiscountRepository};

/// Creates the billing routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new().route("/billing/preview", get(preview_payable))
}

/// Query parameters for a payable preview.
#[derive(Debug, Deserialize)]
pub struct PreviewQuery {
    /// Student being billed.
    pub student_id: Uuid,
    /// Billing group.
    pub group_id: Uuid,
    /// Billed month (1..=12).
    pub month: u32,
    /// Billed year.
    pub year: i32,
}

/// Response for a payable preview.
#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    /// Course base price for the period.
    pub original_amount: Decimal,
    /// Discount applied, capped at the original amount.
    pub discount_amount: Decimal,
    /// Net amount owed.
    pub payable_amount: Decimal,
}

/// GET `/billing/preview` - Compute the net payable for a (student, group, period).
///
/// Pure read; records nothing.
async fn preview_payable(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<PreviewQuery>,
) -> impl IntoResponse {
    let period = match BillingPeriod::new(query.year, query.month) {
        Ok(p) => p,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "invalid_period",
                    "message": e.to_string()
                })),
            )
                .into_response();
        }
    };

    let repo = DiscountRepository::new((*state.db).clone());

    match repo
        .preview_payable(query.student_id, query.group_id, period)
        .await
    {
        Ok(preview) => (
            StatusCode::OK,
            Json(json!(PreviewResponse {
                original_amount: preview.original,
                discount_amount: preview.discount,
                payable_amount: preview.payable,
            })),
        )
            .into_response(),
        Err(e) => {
            error!(
                error = %e,
                student_id = %query.student_id,
                group_id = %query.group_id,
                "Failed to compute payable preview"
            );
            match e {
                DiscountError::GroupNotFound(_) => (
                    StatusCode::NOT_FOUND,
                    Json(json!({
                        "error": "group_not_found",
                        "message": "Group not found"
                    })),
                )
                    .into_response(),
                DiscountError::CourseNotFound(_) => (
                    StatusCode::NOT_FOUND,
                    Json(json!({
                        "error": "course_not_found",
                        "message": "Course not found"
                    })),
                )
                    .into_response(),
                _ => app_error_response(&AppError::Internal("An error occurred".to_string())),
            }
        }
    }
}
