//! Fairway JSON API Server

use std::process;

use salvo::{affix_state::inject, prelude::*, trailing_slash::remove_slash};
use tracing::{error, info};

use fairway_app::{context::AppContext, database};

use crate::{config::ServerConfig, observability::Observability, state::State};

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod cart;
mod checkout;
mod config;
mod donations;
mod errors;
mod extensions;
mod healthcheck;
mod observability;
mod orders;
mod router;
mod shutdown;
mod state;
#[cfg(test)]
mod test_helpers;
mod webhooks;

/// Fairway JSON API Server entry point
#[tokio::main]
pub async fn main() {
    // Load configuration from .env and CLI arguments
    let config = ServerConfig::load().unwrap_or_else(|e| {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized yet, must use eprintln for config errors"
        )]
        {
            eprintln!("Configuration error: {e}");
        }

        #[expect(clippy::exit, reason = "configuration errors are fatal at startup")]
        process::exit(1);
    });

    let observability = match Observability::init(&config) {
        Ok(observability) => observability,
        Err(init_error) => {
            #[expect(
                clippy::print_stderr,
                reason = "logging failed to initialize, must use eprintln"
            )]
            {
                eprintln!("failed to initialize observability: {init_error}");
            }

            #[expect(clippy::exit, reason = "observability errors are fatal at startup")]
            process::exit(1);
        }
    };

    if let Err(serve_error) = run(config).await {
        error!("{serve_error}");
        observability.shutdown();

        #[expect(clippy::exit, reason = "startup errors are fatal")]
        process::exit(1);
    }

    observability.shutdown();
}

async fn run(config: ServerConfig) -> Result<(), String> {
    let addr = config.socket_addr();
    let grace = config.server.shutdown_grace();

    let payments = config
        .payments
        .into_settings()
        .map_err(|source| format!("invalid payment settings: {source}"))?;

    let app = AppContext::from_database_url(&config.database.database_url, payments)
        .await
        .map_err(|init_error| format!("failed to initialize app context: {init_error}"))?;

    if config.database.migrate {
        let pool = database::connect(&config.database.database_url)
            .await
            .map_err(|source| format!("failed to connect for migrations: {source}"))?;

        database::migrate(&pool)
            .await
            .map_err(|source| format!("failed to apply migrations: {source}"))?;

        info!("database migrations applied");
    }

    info!("Starting server on {addr}");

    let listener = TcpListener::new(addr).bind().await;

    let router = Router::new()
        .hoop(CatchPanic::new())
        .hoop(observability::request_logging)
        .hoop(remove_slash())
        .push(Router::with_path("healthcheck").get(healthcheck::handler))
        .push(Router::with_path("metrics").get(observability::metrics_handler))
        .push(
            Router::new()
                .hoop(inject(State::shared(app)))
                .push(router::app_router()),
        );

    let server = Server::new(listener);

    let handle = server.handle();

    // Listen for shutdown signal
    tokio::spawn(async move {
        if let Err(error) = shutdown::listen(handle, grace).await {
            error!("failed to listen for shutdown signal: {error}");
        }
    });

    server.serve(router).await;

    Ok(())
}
