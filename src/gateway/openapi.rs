//! OpenAPI / Swagger UI Documentation
//!
//! - Swagger UI: `http://localhost:9501/docs`
//! - OpenAPI JSON: `http://localhost:9501/api-docs/openapi.json`

use utoipa::OpenApi;

use crate::gateway::handlers::HealthResponse;
use crate::gateway::types::{PixDto, WithdrawData, WithdrawRequest};

/// Main API Documentation struct
#[derive(OpenApi)]
#[openapi(
    info(
        title = "PIX Withdraw API",
        version = "1.0.0",
        description = "Account withdrawal engine: immediate and scheduled withdrawals with exactly-once debits.",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:9501", description = "Development"),
    ),
    paths(
        crate::gateway::handlers::health_check,
        crate::gateway::handlers::create_withdraw,
    ),
    components(schemas(HealthResponse, WithdrawRequest, PixDto, WithdrawData)),
    tags(
        (name = "System", description = "Health and diagnostics"),
        (name = "Withdraw", description = "Withdrawal creation")
    )
)]
pub struct ApiDoc;
