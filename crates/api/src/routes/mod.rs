//! API route definitions.

use axum::{
    Json, Router,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{AppState, middleware::auth::auth_middleware};
use centra_shared::AppError;

pub mod billing;
pub mod discounts;
pub mod health;
pub mod payments;
pub mod periods;

/// Creates the API router with protected routes that need state for middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Everything except the health check requires authentication
    let protected_routes = Router::new()
        .merge(billing::routes())
        .merge(discounts::routes())
        .merge(payments::routes())
        .merge(periods::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new().merge(health::routes()).merge(protected_routes)
}

/// Serializes an application error into the standard error body, using its
/// transport status and error code.
pub(crate) fn app_error_response(err: &AppError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    (
        status,
        Json(json!({
            "error": err.error_code(),
            "message": err.to_string()
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_response_uses_taxonomy_status() {
        let cases = [
            (AppError::NotFound("payment".into()), StatusCode::NOT_FOUND),
            (
                AppError::PeriodClosed("2026-03".into()),
                StatusCode::BAD_REQUEST,
            ),
            (AppError::Forbidden("center".into()), StatusCode::FORBIDDEN),
            (
                AppError::Internal("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(app_error_response(&err).status(), expected);
        }
    }
}
