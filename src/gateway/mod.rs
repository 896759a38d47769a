//! HTTP gateway

pub mod handlers;
pub mod openapi;
pub mod state;
pub mod types;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::db::Database;
use crate::withdraw::WithdrawService;
use state::AppState;

/// Start the HTTP gateway server
pub async fn run_server(
    host: &str,
    port: u16,
    db: Arc<Database>,
    service: Arc<WithdrawService>,
) -> std::io::Result<()> {
    let state = Arc::new(AppState::new(db, service));

    let app = Router::new()
        .route("/health", get(handlers::health_check))
        .route(
            "/account/{account_id}/balance/withdraw",
            post(handlers::create_withdraw),
        )
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()))
        .with_state(state);

    let listener = TcpListener::bind(format!("{}:{}", host, port)).await?;
    tracing::info!("Gateway listening on {}:{}", host, port);

    axum::serve(listener, app).await
}
