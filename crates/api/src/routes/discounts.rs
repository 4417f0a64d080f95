//! Discount ledger routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, patch, post},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser};
use super::app_error_response;
use centra_shared::AppError;
use centra_db::{
    entities::discounts,
    repositories::discount::{AssignOutcome, DiscountError, DiscountRepository},
};

/// Creates the discount routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/discounts", post(assign_discount))
        .route("/discounts/{discount_id}", patch(update_discount))
        .route("/discounts/{discount_id}", delete(remove_discount))
}

/// Request body for assigning a discount.
#[derive(Debug, Deserialize)]
pub struct AssignDiscountRequest {
    /// Student receiving the discount.
    pub student_id: Uuid,
    /// Group the discount applies to.
    pub group_id: Uuid,
    /// Monthly discount amount.
    pub amount: Decimal,
}

/// Request body for partially updating a discount.
#[derive(Debug, Deserialize)]
pub struct UpdateDiscountRequest {
    /// New amount; omitted leaves the current value unchanged.
    pub amount: Option<Decimal>,
}

/// Response for a discount record.
#[derive(Debug, Serialize)]
pub struct DiscountResponse {
    /// Discount ID.
    pub id: Uuid,
    /// Student ID.
    pub student_id: Uuid,
    /// Group ID.
    pub group_id: Uuid,
    /// Monthly discount amount.
    pub amount: Decimal,
}

impl From<discounts::Model> for DiscountResponse {
    fn from(m: discounts::Model) -> Self {
        Self {
            id: m.id,
            student_id: m.student_id,
            group_id: m.group_id,
            amount: m.amount,
        }
    }
}

/// POST `/discounts` - Assign a discount to a (student, group) pair.
///
/// Returns 201 when a new record is created, 200 when the active record for
/// the pair is updated in place.
async fn assign_discount(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(payload): Json<AssignDiscountRequest>,
) -> impl IntoResponse {
    let repo = DiscountRepository::new((*state.db).clone());

    match repo
        .assign_discount(payload.student_id, payload.group_id, payload.amount)
        .await
    {
        Ok(outcome) => {
            let (status, message) = match &outcome {
                AssignOutcome::Created(_) => (StatusCode::CREATED, "Discount assigned"),
                AssignOutcome::Updated(_) => (StatusCode::OK, "Existing discount updated"),
            };
            let record = outcome.record().clone();

            info!(
                discount_id = %record.id,
                student_id = %record.student_id,
                group_id = %record.group_id,
                "Discount assigned"
            );

            (
                status,
                Json(json!({
                    "message": message,
                    "discount": DiscountResponse::from(record)
                })),
            )
                .into_response()
        }
        Err(e) => discount_error_response(&e, payload.student_id, payload.group_id),
    }
}

/// PATCH `/discounts/{discount_id}` - Partially update an active discount.
async fn update_discount(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(discount_id): Path<Uuid>,
    Json(payload): Json<UpdateDiscountRequest>,
) -> impl IntoResponse {
    let repo = DiscountRepository::new((*state.db).clone());

    match repo.update_discount(discount_id, payload.amount).await {
        Ok(record) => {
            info!(discount_id = %record.id, "Discount updated");
            (StatusCode::OK, Json(json!(DiscountResponse::from(record)))).into_response()
        }
        Err(e) => {
            error!(error = %e, discount_id = %discount_id, "Failed to update discount");
            match e {
                DiscountError::NotFound(_) => (
                    StatusCode::NOT_FOUND,
                    Json(json!({
                        "error": "discount_not_found",
                        "message": "Discount not found"
                    })),
                )
                    .into_response(),
                DiscountError::Billing(e) => (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": "invalid_amount",
                        "message": e.to_string()
                    })),
                )
                    .into_response(),
                _ => internal_error_response(),
            }
        }
    }
}

/// DELETE `/discounts/{discount_id}` - Soft-remove a discount.
async fn remove_discount(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(discount_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = DiscountRepository::new((*state.db).clone());

    match repo.remove_discount(discount_id).await {
        Ok(()) => {
            info!(discount_id = %discount_id, "Discount removed");
            (
                StatusCode::OK,
                Json(json!({ "message": "Discount removed" })),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, discount_id = %discount_id, "Failed to remove discount");
            match e {
                DiscountError::NotFound(_) => (
                    StatusCode::NOT_FOUND,
                    Json(json!({
                        "error": "discount_not_found",
                        "message": "Discount not found"
                    })),
                )
                    .into_response(),
                _ => internal_error_response(),
            }
        }
    }
}

fn discount_error_response(
    e: &DiscountError,
    student_id: Uuid,
    group_id: Uuid,
) -> axum::response::Response {
    error!(
        error = %e,
        student_id = %student_id,
        group_id = %group_id,
        "Failed to assign discount"
    );
    match e {
        DiscountError::EnrollmentNotFound { .. } => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "enrollment_not_found",
                "message": "Student is not enrolled in this group"
            })),
        )
            .into_response(),
        DiscountError::Billing(e) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_amount",
                "message": e.to_string()
            })),
        )
            .into_response(),
        _ => internal_error_response(),
    }
}

fn internal_error_response() -> axum::response::Response {
    app_error_response(&AppError::Internal("An error occurred".to_string()))
}
