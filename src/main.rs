use axum::serve;
use subject_area_gateway::config::AppConfig;
use subject_area_gateway::{app, bootstrap_registry};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    // Info by default, RUST_LOG overrides
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Subject Area Gateway");

    let config = AppConfig::load()?;
    log::info!(
        "Configuration loaded: server={}:{}, tenants={}",
        config.server.host,
        config.server.port,
        config.tenants.len()
    );

    let registry = bootstrap_registry(&config);
    for name in registry.server_names() {
        log::info!("Serving subject-area server '{}'", name);
    }

    let bind_address = config.server_address();
    let listener = TcpListener::bind(&bind_address).await?;
    log::info!("Subject Area Gateway running on http://{}", bind_address);

    serve(listener, app(registry)).await?;

    Ok(())
}
