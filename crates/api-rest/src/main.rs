//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the PView REST host on its own.
//!
//! ## Intended use
//! Useful during development when exercising the view endpoints directly with the Swagger UI. The
//! workspace's main `pview-run` binary serves the same router after loading `.env`.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{router, AppState};
use pview_core::{
    constants::{MAX_HISTORY_ENV, NARROW_BREAKPOINT_ENV},
    view_config_from_env_values,
};

/// Log filter for the standalone server: `RUST_LOG` plus info-level output from the REST host and
/// the view core.
fn env_filter() -> anyhow::Result<tracing_subscriber::EnvFilter> {
    Ok(tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("api_rest=info".parse()?)
        .add_directive("pview_core=info".parse()?))
}

/// Main entry point for the PView REST API server
///
/// # Environment Variables
/// - `PVIEW_REST_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `PVIEW_MAX_HISTORY`: History cap per view (default: 32)
/// - `PVIEW_NARROW_BREAKPOINT`: Narrow viewport breakpoint in pixels (default: 768)
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the view configuration is invalid,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(env_filter()?)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("PVIEW_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    let cfg = view_config_from_env_values(
        std::env::var(MAX_HISTORY_ENV).ok(),
        std::env::var(NARROW_BREAKPOINT_ENV).ok(),
    )?;

    tracing::info!("-- Starting PView REST API on {}", addr);

    let app = router(AppState::new(cfg));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
