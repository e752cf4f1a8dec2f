//! User service entry point.

use std::process::ExitCode;

use api::config::Config;
use api::server;
use item_store::{InMemoryItemStore, PostgresItemStore};
use users::UserRecord;

#[tokio::main]
async fn main() -> ExitCode {
    // 1. Load configuration and initialize tracing
    let config = Config::from_env();
    server::init_tracing(config.as_ref().map_or("info", |c| c.log_level.as_str()));

    let config = match config {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(error = %err, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "user service failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    // 2. Install Prometheus metrics recorder
    let metrics_handle = server::install_metrics()?;

    // 3. Pick the item store and build the application
    let app = match &config.store_url {
        Some(url) => {
            let pool = server::connect_store(url).await?;
            let store = PostgresItemStore::<UserRecord>::new(pool, &config.user_table)?;
            store.ensure_table().await?;
            tracing::info!(table = %config.user_table, "using postgres user table");
            api::create_user_app(api::create_user_state(store), metrics_handle)
        }
        None => {
            tracing::warn!("STORE_URL not set, users are kept in memory");
            let store = InMemoryItemStore::<UserRecord>::new();
            api::create_user_app(api::create_user_state(store), metrics_handle)
        }
    };

    // 4. Serve until shutdown
    server::serve(&config.addr(), app).await?;
    Ok(())
}
