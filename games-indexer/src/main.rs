//! Games Indexer Main Entry Point
//!
//! Downloads the GOG.com games dataset and indexes it into Typesense.

use dotenv::dotenv;
use games_indexer::{Dependencies, IndexingError};
use std::env;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("games_indexer=info,games_indexer_repository=info"));

    let json = env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json"));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
            .init();
    }

    info!(
        service_name = "games-indexer",
        service_version = env!("CARGO_PKG_VERSION"),
        json = json,
        "Tracing initialized"
    );
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), IndexingError> {
    // Load environment variables from .env file
    dotenv().ok();

    init_tracing();

    info!("Starting games indexer");

    let deps = match Dependencies::new().await {
        Ok(deps) => {
            info!("Dependencies initialized successfully");
            deps
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize dependencies");
            return Err(e);
        }
    };

    match deps.orchestrator.run().await {
        Ok(summary) => {
            info!(
                rows = summary.rows_read,
                submitted = summary.load.submitted,
                failed = summary.load.failed,
                indexed = ?summary.indexed_documents,
                "Games indexer completed successfully"
            );
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Games indexer failed");
            Err(e.into())
        }
    }
}
