use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{AppState, router};
use pview_core::constants::{MAX_HISTORY_ENV, NARROW_BREAKPOINT_ENV};
use pview_core::view_config_from_env_values;

/// Main entry point for the PView application
///
/// Loads `.env`, resolves the view configuration once and serves the REST host for patient
/// detail panels.
///
/// # Environment Variables
/// - `PVIEW_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `PVIEW_MAX_HISTORY`: history cap per mounted view (default: 32)
/// - `PVIEW_NARROW_BREAKPOINT`: narrow viewport breakpoint in pixels (default: 768)
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If configuration, startup or the server fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pview=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("PVIEW_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let cfg = view_config_from_env_values(
        std::env::var(MAX_HISTORY_ENV).ok(),
        std::env::var(NARROW_BREAKPOINT_ENV).ok(),
    )?;

    tracing::info!("++ Starting PView REST on {}", rest_addr);
    tracing::info!(
        "++ View history cap {}, narrow breakpoint {}px",
        cfg.max_history(),
        cfg.narrow_breakpoint()
    );

    let app = router(AppState::new(cfg));
    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
