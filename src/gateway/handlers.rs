//! HTTP handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use utoipa::ToSchema;

use super::state::AppState;
use super::types::{ApiResponse, WithdrawData, WithdrawRequest, error_codes};
use crate::withdraw::WithdrawError;

/// Health check response data
#[derive(serde::Serialize, ToSchema)]
pub struct HealthResponse {
    /// Server timestamp in milliseconds
    #[schema(example = 1703494800000_u64)]
    pub timestamp_ms: u64,
}

/// Health check endpoint
///
/// Verifies database connectivity without exposing internal details.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service healthy", body = HealthResponse, content_type = "application/json"),
        (status = 503, description = "Service unavailable")
    ),
    tag = "System"
)]
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<ApiResponse<HealthResponse>>) {
    if state.db.health_check().await.is_err() {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiResponse {
                code: error_codes::SERVICE_UNAVAILABLE,
                msg: "unavailable".to_string(),
                data: None,
            }),
        );
    }

    let timestamp_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);

    (
        StatusCode::OK,
        Json(ApiResponse::success(HealthResponse { timestamp_ms })),
    )
}

/// Create a withdrawal for an account
///
/// Immediate withdrawals are debited before the response is produced;
/// scheduled withdrawals are persisted pending and picked up by the
/// dispatcher at their due time. A terminal `error=true` record is a
/// business outcome carried in a success envelope, not an HTTP error.
///
/// POST /account/{account_id}/balance/withdraw
#[utoipa::path(
    post,
    path = "/account/{account_id}/balance/withdraw",
    request_body = WithdrawRequest,
    params(
        ("account_id" = String, Path, description = "Account to debit")
    ),
    responses(
        (status = 200, description = "Withdrawal created", body = WithdrawData, content_type = "application/json"),
        (status = 400, description = "Invalid input, unknown account, or insufficient funds"),
        (status = 500, description = "Unexpected storage failure")
    ),
    tag = "Withdraw"
)]
pub async fn create_withdraw(
    State(state): State<Arc<AppState>>,
    Path(account_id): Path<String>,
    Json(req): Json<WithdrawRequest>,
) -> Result<Json<ApiResponse<WithdrawData>>, (StatusCode, Json<ApiResponse<()>>)> {
    let new_withdrawal = req.validate().map_err(|msg| {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<()>::error(
                error_codes::INVALID_PARAMETER,
                msg,
            )),
        )
    })?;

    match state.service.create(&account_id, new_withdrawal).await {
        Ok(withdraw) => Ok(Json(ApiResponse::success(WithdrawData::from(withdraw)))),
        Err(e) => {
            let (status, code) = match e {
                WithdrawError::AccountNotFound => {
                    (StatusCode::BAD_REQUEST, error_codes::ACCOUNT_NOT_FOUND)
                }
                WithdrawError::InsufficientFunds => {
                    (StatusCode::BAD_REQUEST, error_codes::INSUFFICIENT_BALANCE)
                }
                WithdrawError::Database(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    error_codes::INTERNAL_ERROR,
                ),
            };
            Err((status, Json(ApiResponse::<()>::error(code, e.to_string()))))
        }
    }
}
