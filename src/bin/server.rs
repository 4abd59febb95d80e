use std::sync::Arc;

use clap::Parser;
use serde_json::json;

use etagged::{handlers, MemoryStore, Record};

#[derive(Parser)]
#[command(name = "etagged-server", about = "Conditional-read profile record server")]
struct Cli {
    /// Address to listen on.
    #[arg(long, default_value = "0.0.0.0:3000", env = "ETAGGED_ADDR")]
    addr: String,

    /// Id of the seeded profile record.
    #[arg(long, default_value = "user123", env = "ETAGGED_RECORD_ID")]
    record_id: String,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    let store = MemoryStore::new();
    let seed = Record::new(
        cli.record_id.as_str(),
        json!({
            "name": "Alex",
            "preferences": { "theme": "dark", "notifications": true },
        }),
    );
    if let Err(e) = store.insert(seed) {
        tracing::error!(error = %e, "failed to seed record");
        std::process::exit(1);
    }

    tracing::info!(record_id = %cli.record_id, addr = %cli.addr, "starting server");
    let service = Arc::new(handlers::profile_service(store));

    if let Err(e) = etagged::service::serve(service, &cli.addr).await {
        tracing::error!(error = %e, "server error");
        std::process::exit(1);
    }
}
