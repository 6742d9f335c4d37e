use pingfederate_provider::{init_logging, serve, PingFederateProvider};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting PingFederate provider");
    serve(PingFederateProvider::new()).await
}
