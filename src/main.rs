//! pix_withdraw - Account Withdrawal Engine
//!
//! Entry point. Architecture:
//!
//! ```text
//! ┌──────────┐    ┌──────────────┐    ┌────────────┐
//! │ Gateway  │───▶│  Withdraw    │───▶│ PostgreSQL │
//! │ (axum)   │    │  Service     │    │ (row locks)│
//! └──────────┘    └──────────────┘    └────────────┘
//!                        ▲
//!                 ┌──────┴───────┐
//!                 │  Scheduled   │  claim one due withdrawal at a
//!                 │  Dispatcher  │  time under FOR UPDATE SKIP LOCKED
//!                 └──────────────┘
//! ```
//!
//! Modes:
//! - default: HTTP gateway plus the background dispatcher
//! - `--process-scheduled`: run a single dispatch pass, print the count,
//!   exit (suitable for cron-style invocation)

use std::sync::Arc;
use std::time::Duration;

use pix_withdraw::config::AppConfig;
use pix_withdraw::db::Database;
use pix_withdraw::gateway;
use pix_withdraw::logging;
use pix_withdraw::notify::EmailNotifier;
use pix_withdraw::withdraw::{ScheduledDispatcher, WithdrawService};

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

/// Get port override from command line (--port argument)
fn get_port_override() -> Option<u16> {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if args[i] == "--port" && i + 1 < args.len() {
            return args[i + 1].parse().ok();
        }
    }
    None
}

fn process_scheduled_mode() -> bool {
    std::env::args().any(|a| a == "--process-scheduled")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = get_env();
    let config = AppConfig::load(&env);
    let _log_guard = logging::init_logging(&config);

    tracing::info!(
        "Starting pix_withdraw in {} mode (build {})",
        env,
        env!("GIT_HASH")
    );

    let db = Arc::new(Database::connect(&config.postgres_url).await?);
    db.init_schema().await?;

    let notifier = Arc::new(EmailNotifier::new(db.clone(), config.mail.clone()));
    let service = Arc::new(WithdrawService::new(db.clone(), notifier));

    if process_scheduled_mode() {
        // One-shot trigger: drain the due backlog, report, exit.
        let processed = service.process_scheduled().await?;
        println!("Processed {} scheduled withdrawal(s)", processed);
        return Ok(());
    }

    if config.dispatcher.enabled {
        let dispatcher = ScheduledDispatcher::new(
            service.clone(),
            Duration::from_secs(config.dispatcher.interval_secs),
        );
        tokio::spawn(async move { dispatcher.run().await });
    } else {
        tracing::warn!("Scheduled dispatcher disabled by config");
    }

    let port = get_port_override().unwrap_or(config.gateway.port);
    println!("Gateway will listen on {}:{}", config.gateway.host, port);

    gateway::run_server(&config.gateway.host, port, db, service).await?;

    Ok(())
}
