mod app;
mod config;
mod db;
mod error;
mod state;
mod users;

use tracing_subscriber::EnvFilter;

use crate::{config::AppConfig, state::AppState};

const DEFAULT_LOG_FILTER: &str = "eco_registry=debug,axum=info,tower_http=info";

/// `RUST_LOG` overrides the default filter; `LOG_FORMAT=json` switches to
/// one JSON object per line.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.with_target(false).json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;
    let app_state = AppState::init(config).await?;
    let bind_addr = app_state.config.bind_addr();

    app::serve(app::build_app(app_state), &bind_addr).await
}
