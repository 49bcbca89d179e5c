use crate::error::AppError;
use config::{Config as Cfg, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_environment")]
    pub environment: String,
}

fn default_port() -> u16 {
    8080
}

fn default_environment() -> String {
    "dev".to_string()
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let base = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        let mut config: Config = base.try_deserialize()?;

        // The deployment environment is set as a bare variable, not under the
        // APP__ prefix.
        if let Ok(environment) = env::var("ENVIRONMENT") {
            config.environment = environment;
        }

        Ok(config)
    }

    pub fn is_prod(&self) -> bool {
        self.environment == "prod"
    }
}
