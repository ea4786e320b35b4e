//! Configuration for Catalog API

use core_config::{app_info, env_or_default, server::ServerConfig, AppInfo, FromEnv};
use database::postgres::PostgresConfig;

pub use core_config::Environment;

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub postgres: PostgresConfig,
    pub server: ServerConfig,
    pub environment: Environment,
    pub rate_api_url: String,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let postgres = PostgresConfig::from_env()?;
        let server = ServerConfig::from_env()?;

        let rate_api_url =
            env_or_default("RATE_API_URL", domain_catalog::rates::DEFAULT_BASE_URL);

        Ok(Self {
            app: app_info!(),
            postgres,
            server,
            environment,
            rate_api_url,
        })
    }
}
