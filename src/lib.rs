pub mod api;
pub mod config;
pub mod error;
pub mod handler;
pub mod logic;
pub mod model;
pub mod store;

// Export API types
pub use api::handlers;
pub use api::routes;

pub use error::{Result, SubjectAreaError};
pub use logic::{ServerInstance, SubjectAreaGateway, TenantRegistry};

// Export all model types
pub use model::*;

pub use store::{InMemoryRepository, MetadataRepository, RepositoryOptions};

use std::sync::Arc;

/// Registers one in-memory server instance per configured tenant.
pub fn bootstrap_registry(config: &crate::config::AppConfig) -> Arc<TenantRegistry> {
    let registry = TenantRegistry::new();
    for tenant in &config.tenants {
        let repository = InMemoryRepository::new(RepositoryOptions {
            soft_delete_supported: tenant.soft_delete_supported,
        });
        registry.register(ServerInstance::with_repository(tenant, Arc::new(repository)));
    }
    Arc::new(registry)
}

/// The HTTP application for a gateway over `registry`.
pub fn app(registry: Arc<TenantRegistry>) -> axum::Router {
    routes::create_router().with_state(Arc::new(SubjectAreaGateway::new(registry)))
}

// Function for integration testing
pub async fn run_server() -> anyhow::Result<()> {
    use axum::serve;
    use tokio::net::TcpListener;

    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();

    let config = crate::config::AppConfig::load()?;
    let registry = bootstrap_registry(&config);

    let bind_address = config.server_address();
    let listener = TcpListener::bind(&bind_address).await?;

    serve(listener, app(registry)).await?;

    Ok(())
}
