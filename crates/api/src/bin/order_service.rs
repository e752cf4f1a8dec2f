//! Order service entry point.

use std::process::ExitCode;

use api::client::UserServiceClient;
use api::config::Config;
use api::server;
use item_store::{InMemoryItemStore, PostgresItemStore};
use orders::OrderRecord;

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
            tracing::error!(error = %err, "order service failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    // 2. Install Prometheus metrics recorder
    let metrics_handle = server::install_metrics()?;

    // 3. Connect to the user service
    let users = UserServiceClient::new(&config.user_service_url, config.rpc_timeout)?;
    tracing::info!(
        url = %config.user_service_url,
        timeout_ms = config.rpc_timeout.as_millis() as u64,
        "user service client ready"
    );

    // 4. Pick the item store and build the application
    let app = match &config.store_url {
        Some(url) => {
            let pool = server::connect_store(url).await?;
            let store = PostgresItemStore::<OrderRecord>::new(pool, &config.order_table)?;
            store.ensure_table().await?;
            tracing::info!(table = %config.order_table, "using postgres order table");
            api::create_order_app(api::create_order_state(store, users), metrics_handle)
        }
        None => {
            tracing::warn!("STORE_URL not set, orders are kept in memory");
            let store = InMemoryItemStore::<OrderRecord>::new();
            api::create_order_app(api::create_order_state(store, users), metrics_handle)
        }
    };

    // 5. Serve until shutdown
    server::serve(&config.addr(), app).await?;
    Ok(())
}
