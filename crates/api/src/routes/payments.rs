//! Payment and refund routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser};
use super::app_error_response;
use centra_core::billing::{BillingError, BillingPeriod};
use centra_shared::AppError;
use centra_db::{
    entities::{
        payments,
        sea_orm_active_enums::{PaymentMethod, PaymentStatus},
    },
    repositories::{
        payment::{CreatePaymentInput, PaymentError, PaymentRepository},
        refund::{RefundError, RefundInput, RefundRepository},
    },
};

/// Creates the payment routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/payments", post(create_payment))
        .route("/payments/{payment_id}", get(get_payment))
        .route("/payments/{payment_id}/refund", post(refund_payment))
}

fn default_months_count() -> u32 {
    1
}

/// Request body for creating a payment.
#[derive(Debug, Deserialize)]
pub struct CreatePaymentRequest {
    /// Student being charged.
    pub student_id: Uuid,
    /// Billing group.
    pub group_id: Uuid,
    /// First billed month (1..=12).
    pub month: u32,
    /// First billed year.
    pub year: i32,
    /// Number of consecutive periods to bill; defaults to 1.
    #[serde(default = "default_months_count")]
    pub months_count: u32,
    /// Explicit charge amount; only valid for single-month payments.
    pub amount: Option<Decimal>,
    /// Payment method: "cash", "card", "bank_transfer", or "other".
    pub method: String,
    /// External transaction reference, if any.
    pub transaction_ref: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
    /// Recorded status: "pending", "paid", or "failed". Defaults to "paid".
    pub status: Option<String>,
}

/// Request body for refunding a payment.
#[derive(Debug, Deserialize)]
pub struct RefundRequest {
    /// Refund amount; must not exceed the payment's paid amount.
    pub amount: Decimal,
    /// Optional reason stored on the reversing entry.
    pub reason: Option<String>,
}

/// Response for a payment record.
#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    /// Payment ID.
    pub id: Uuid,
    /// Student ID.
    pub student_id: Uuid,
    /// Group ID.
    pub group_id: Uuid,
    /// Allocated receipt identifier.
    pub receipt_number: String,
    /// Course base price snapshot.
    pub original_amount: Decimal,
    /// Discount snapshot.
    pub discount_amount: Decimal,
    /// Amount actually charged.
    pub amount: Decimal,
    /// Payment method.
    pub method: String,
    /// Recorded status.
    pub status: String,
    /// Billed month.
    pub billing_month: i32,
    /// Billed year.
    pub billing_year: i32,
}

impl From<payments::Model> for PaymentResponse {
    fn from(m: payments::Model) -> Self {
        Self {
            id: m.id,
            student_id: m.student_id,
            group_id: m.group_id,
            receipt_number: m.receipt_number,
            original_amount: m.original_amount,
            discount_amount: m.discount_amount,
            amount: m.amount,
            method: method_to_string(&m.method),
            status: status_to_string(&m.status),
            billing_month: m.billing_month,
            billing_year: m.billing_year,
        }
    }
}

/// POST `/payments` - Record a single-month or multi-month batch payment.
///
/// Returns the last created record; batches create one record per period
/// atomically.
async fn create_payment(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreatePaymentRequest>,
) -> impl IntoResponse {
    let Some(method) = string_to_method(&payload.method) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_method",
                "message": "Method must be one of: cash, card, bank_transfer, other"
            })),
        )
            .into_response();
    };

    let status = match payload.status.as_deref() {
        None => PaymentStatus::Paid,
        Some(s) => match string_to_status(s) {
            Some(status) => status,
            None => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": "invalid_status",
                        "message": "Status must be one of: pending, paid, failed"
                    })),
                )
                    .into_response();
            }
        },
    };

    let repo = PaymentRepository::new((*state.db).clone());
    let input = CreatePaymentInput {
        student_id: payload.student_id,
        group_id: payload.group_id,
        month: payload.month,
        year: payload.year,
        months_count: payload.months_count,
        amount: payload.amount,
        method,
        transaction_ref: payload.transaction_ref,
        description: payload.description,
        status,
        created_by: auth.user_id(),
    };

    match repo.create_payment(input, &auth.scope()).await {
        Ok(record) => {
            info!(
                payment_id = %record.id,
                receipt_number = %record.receipt_number,
                student_id = %record.student_id,
                group_id = %record.group_id,
                months_count = payload.months_count,
                "Payment recorded"
            );
            (
                StatusCode::CREATED,
                Json(json!(PaymentResponse::from(record))),
            )
                .into_response()
        }
        Err(e) => {
            error!(
                error = %e,
                student_id = %payload.student_id,
                group_id = %payload.group_id,
                "Failed to record payment"
            );
            payment_error_response(&e)
        }
    }
}

/// GET `/payments/{payment_id}` - Fetch a payment record.
async fn get_payment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(payment_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = PaymentRepository::new((*state.db).clone());

    match repo.find_by_id(payment_id).await {
        Ok(record) => {
            // Records without a center snapshot are visible to any caller
            if let Some(center_id) = record.center_id {
                if !auth.scope().permits(center_id) {
                    return forbidden_response();
                }
            }
            (StatusCode::OK, Json(json!(PaymentResponse::from(record)))).into_response()
        }
        Err(PaymentError::NotFound(_)) => payment_not_found_response(),
        Err(e) => {
            error!(error = %e, payment_id = %payment_id, "Failed to fetch payment");
            internal_error_response()
        }
    }
}

/// POST `/payments/{payment_id}/refund` - Record a bounded reversing entry.
///
/// The refund is booked against the current calendar period, not the
/// payment's original billing period.
async fn refund_payment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(payment_id): Path<Uuid>,
    Json(payload): Json<RefundRequest>,
) -> impl IntoResponse {
    let repo = RefundRepository::new((*state.db).clone());
    let current = BillingPeriod::from_date(Utc::now().date_naive());

    let input = RefundInput {
        payment_id,
        amount: payload.amount,
        reason: payload.reason,
        requested_by: auth.user_id(),
    };

    match repo.refund(input, &auth.scope(), current).await {
        Ok(entry) => {
            info!(
                refund_id = %entry.id,
                payment_id = %payment_id,
                amount = %entry.amount,
                "Refund recorded"
            );
            (
                StatusCode::CREATED,
                Json(json!({
                    "id": entry.id,
                    "payment_id": payment_id,
                    "amount": entry.amount,
                    "description": entry.description,
                    "expense_month": entry.expense_month,
                    "expense_year": entry.expense_year
                })),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, payment_id = %payment_id, "Failed to record refund");
            refund_error_response(&e)
        }
    }
}

fn refund_error_response(e: &RefundError) -> axum::response::Response {
    match e {
        RefundError::PaymentNotFound(_) => payment_not_found_response(),
        RefundError::PeriodClosed { period } => period_closed_response(*period),
        // A payment that resolves to no center is bad input, not a fault
        RefundError::CenterUnresolved(_) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "center_unresolved",
                "message": "Cannot resolve a center for this payment"
            })),
        )
            .into_response(),
        RefundError::Billing(BillingError::CenterMismatch(_)) => forbidden_response(),
        RefundError::Billing(e) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_refund",
                "message": e.to_string()
            })),
        )
            .into_response(),
        RefundError::Database(_) => internal_error_response(),
    }
}

fn payment_error_response(e: &PaymentError) -> axum::response::Response {
    match e {
        PaymentError::EnrollmentNotFound { .. } => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "enrollment_not_found",
                "message": "Student is not enrolled in this group"
            })),
        )
            .into_response(),
        PaymentError::GroupNotFound(_)
        | PaymentError::CourseNotFound(_)
        | PaymentError::CenterNotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "billing_target_not_found",
                "message": "Group, course, or center not found"
            })),
        )
            .into_response(),
        PaymentError::PeriodClosed { period } => period_closed_response(*period),
        PaymentError::Billing(BillingError::CenterMismatch(_)) => forbidden_response(),
        PaymentError::Billing(e) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_payment",
                "message": e.to_string()
            })),
        )
            .into_response(),
        _ => internal_error_response(),
    }
}

fn period_closed_response(period: BillingPeriod) -> axum::response::Response {
    app_error_response(&AppError::PeriodClosed(period.to_string()))
}

fn forbidden_response() -> axum::response::Response {
    app_error_response(&AppError::Forbidden(
        "Payment belongs to another center".to_string(),
    ))
}

fn payment_not_found_response() -> axum::response::Response {
    app_error_response(&AppError::NotFound("Payment not found".to_string()))
}

fn internal_error_response() -> axum::response::Response {
    app_error_response(&AppError::Internal("An error occurred".to_string()))
}

fn method_to_string(method: &PaymentMethod) -> String {
    match method {
        PaymentMethod::Cash => "cash".to_string(),
        PaymentMethod::Card => "card".to_string(),
        PaymentMethod::BankTransfer => "bank_transfer".to_string(),
        PaymentMethod::Other => "other".to_string(),
    }
}

fn string_to_method(s: &str) -> Option<PaymentMethod> {
    match s.to_lowercase().as_str() {
        "cash" => Some(PaymentMethod::Cash),
        "card" => Some(PaymentMethod::Card),
        "bank_transfer" => Some(PaymentMethod::BankTransfer),
        "other" => Some(PaymentMethod::Other),
        _ => None,
    }
}

fn status_to_string(status: &PaymentStatus) -> String {
    match status {
        PaymentStatus::Pending => "pending".to_string(),
        PaymentStatus::Paid => "paid".to_string(),
        PaymentStatus::Failed => "failed".to_string(),
    }
}

fn string_to_status(s: &str) -> Option<PaymentStatus> {
    match s.to_lowercase().as_str() {
        "pending" => Some(PaymentStatus::Pending),
        "paid" => Some(PaymentStatus::Paid),
        "failed" => Some(PaymentStatus::Failed),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_parsing_round_trip() {
        for name in ["cash", "card", "bank_transfer", "other"] {
            let method = string_to_method(name).unwrap();
            assert_eq!(method_to_string(&method), name);
        }
        assert!(string_to_method("crypto").is_none());
    }

    #[test]
    fn test_status_parsing_round_trip() {
        for name in ["pending", "paid", "failed"] {
            let status = string_to_status(name).unwrap();
            assert_eq!(status_to_string(&status), name);
        }
        assert!(string_to_status("refunded").is_none());
    }

    #[test]
    fn test_refund_center_unresolved_is_bad_request() {
        let response = refund_error_response(&RefundError::CenterUnresolved(Uuid::new_v4()));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_refund_error_statuses() {
        let period = BillingPeriod::new(2026, 3).unwrap();

        let cases = [
            (
                refund_error_response(&RefundError::PaymentNotFound(Uuid::new_v4())),
                StatusCode::NOT_FOUND,
            ),
            (
                refund_error_response(&RefundError::PeriodClosed { period }),
                StatusCode::BAD_REQUEST,
            ),
            (
                refund_error_response(&RefundError::Billing(BillingError::CenterMismatch(
                    Uuid::new_v4(),
                ))),
                StatusCode::FORBIDDEN,
            ),
        ];

        for (response, expected) in cases {
            assert_eq!(response.status(), expected);
        }
    }

    #[test]
    fn test_payment_error_statuses() {
        let period = BillingPeriod::new(2026, 3).unwrap();

        let cases = [
            (
                payment_error_response(&PaymentError::GroupNotFound(Uuid::new_v4())),
                StatusCode::NOT_FOUND,
            ),
            (
                payment_error_response(&PaymentError::PeriodClosed { period }),
                StatusCode::BAD_REQUEST,
            ),
            (
                payment_error_response(&PaymentError::Billing(BillingError::CenterMismatch(
                    Uuid::new_v4(),
                ))),
                StatusCode::FORBIDDEN,
            ),
            (
                payment_error_response(&PaymentError::Billing(
                    BillingError::ExplicitAmountWithBatch,
                )),
                StatusCode::BAD_REQUEST,
            ),
        ];

        for (response, expected) in cases {
            assert_eq!(response.status(), expected);
        }
    }
}
