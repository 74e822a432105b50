use tfp_example::{init_logging, serve, ExampleProvider, PROVIDER_TYPE_NAME};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    tracing::info!(
        provider = PROVIDER_TYPE_NAME,
        version = env!("CARGO_PKG_VERSION"),
        "Starting provider"
    );
    serve(ExampleProvider::new()).await
}
