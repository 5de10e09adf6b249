use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub tenants: Vec<TenantConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// One subject-area server hosted by this process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantConfig {
    pub server_name: String,
    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,
    /// Users allowed to call this server. Empty allows everyone.
    #[serde(default)]
    pub authorized_users: Vec<String>,
    #[serde(default = "default_soft_delete_supported")]
    pub soft_delete_supported: bool,
}

fn default_max_page_size() -> usize {
    100
}

fn default_soft_delete_supported() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            tenants: vec![TenantConfig::default()],
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 9443,
        }
    }
}

impl Default for TenantConfig {
    fn default() -> Self {
        Self {
            server_name: "cocoMDS1".to_string(),
            max_page_size: default_max_page_size(),
            authorized_users: Vec::new(),
            soft_delete_supported: default_soft_delete_supported(),
        }
    }
}

impl TenantConfig {
    pub fn named(server_name: impl Into<String>) -> Self {
        Self {
            server_name: server_name.into(),
            ..Self::default()
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, an optional config file and the environment
    pub fn load() -> anyhow::Result<Self> {
        let mut config = config::Config::builder();

        config = config.add_source(config::Config::try_from(&AppConfig::default())?);

        config = config.add_source(config::File::with_name("config").required(false));

        // e.g. SUBJECT_AREA_SERVER__PORT=9444
        config = config.add_source(
            config::Environment::with_prefix("SUBJECT_AREA")
                .separator("__")
                .prefix_separator("_"),
        );

        let config = config.build()?;
        let app_config: AppConfig = config.try_deserialize()?;

        if app_config.tenants.is_empty() {
            anyhow::bail!("at least one tenant must be configured");
        }
        Ok(app_config)
    }

    /// Get the server bind address
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
