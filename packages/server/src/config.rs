use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    #[serde(default)]
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    /// Upper bound of pooled connections. Default: 20.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Connections kept open while idle. Default: 2.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Seconds to wait for a connection before failing. Default: 8.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_max_connections() -> u32 {
    20
}
fn default_min_connections() -> u32 {
    2
}
fn default_connect_timeout_secs() -> u64 {
    8
}

/// Bearer tokens are issued by the external identity provider and signed
/// with this shared secret.
#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct RecipeConfig {
    /// Image stored for recipes submitted without an `imageUrl`.
    #[serde(default)]
    pub default_image_url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub recipe: RecipeConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("WONDERFOOD_CONFIG").unwrap_or_else(|_| "config/config".to_string());

        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            .set_default("database.url", "sqlite://wonderfood.sqlite?mode=rwc")?
            .add_source(File::with_name(&config_path).required(false))
            // Override from environment (e.g., WONDERFOOD__AUTH__JWT_SECRET)
            .add_source(Environment::with_prefix("WONDERFOOD").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
