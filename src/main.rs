use temphum_sensorhub::{init_tracing, run_hub};
use tracing::error;

#[tokio::main]
async fn main() {
    // RUST_LOG=debug for verbose, RUST_LOG=info for normal, RUST_LOG=warn for production
    init_tracing();

    // Load configuration from CONFIG_PATH or default
    let config_path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config".to_string());

    if let Err(e) = run_hub(&config_path).await {
        error!("[main] hub failed: {}", e);
        std::process::exit(1);
    }
}
