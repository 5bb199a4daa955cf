use std::error::Error;

use ai_llm_service::telemetry::{env_filter_with_level, fmt_layer};
use tracing::{Level, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load environment variables from .env file; a missing file is fine,
    // the process environment may already carry everything.
    let dotenv = dotenvy::dotenv();

    // Without RUST_LOG: warnings from dependencies, INFO from our own crates.
    let filter = env_filter_with_level(
        "warn",
        &["pr_review_backend", "api", "pr_reviewer", "git_providers", "ai_llm_service"],
        Level::INFO,
    );
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer())
        .try_init()?;

    match dotenv {
        Ok(path) => info!(path = %path.display(), ".env loaded"),
        Err(e) if e.not_found() => info!("no .env file; using process environment"),
        Err(e) => return Err(e.into()),
    }

    let state = api::AppState::from_env().inspect_err(|e| error!(error = %e, "startup failed"))?;
    api::start(state)
        .await
        .inspect_err(|e| error!(error = %e, "server failed"))?;

    Ok(())
}
