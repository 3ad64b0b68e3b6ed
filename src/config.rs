use dotenvy::dotenv;
use std::env;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),
    #[error("invalid value for {0}: {1}")]
    InvalidVar(&'static str, String),
}

/// Process configuration, read once at startup and passed into the router state.
#[derive(Debug, Clone)]
pub struct Config {
    pub project_id: String,
    pub location: String,
    pub collection_id: String,
    pub datastore_id: String,
    pub serving_config_id: String,
    pub engine_id: String,
    pub port: u16,
    pub generative_model: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Config, ConfigError> {
        dotenv().ok(); // Load .env file if present
        Ok(Config {
            project_id: require_env("PROJECT_ID")?,
            location: require_env("LOCATION")?,
            collection_id: require_env("COLLECTION_ID")?,
            datastore_id: require_env("DATASTORE_ID")?,
            serving_config_id: require_env("SERVING_CONFIG_ID")?,
            engine_id: require_env("ENGINE_ID")?,
            port: port_env("PORT", 8080)?,
            generative_model: env::var("GENERATIVE_MODEL").ok(),
        })
    }

    /// Datastore-scoped serving config resource, used by the structured search route.
    pub fn serving_config(&self) -> String {
        format!(
            "projects/{}/locations/{}/collections/{}/dataStores/{}/servingConfigs/{}",
            self.project_id,
            self.location,
            self.collection_id,
            self.datastore_id,
            self.serving_config_id
        )
    }

    /// Engine-scoped serving config resource, used by the conversational route.
    pub fn engine_serving_config(&self) -> String {
        format!(
            "projects/{}/locations/{}/collections/default_collection/engines/{}/servingConfigs/default_config",
            self.project_id, self.location, self.engine_id
        )
    }

    /// Regional API endpoint. The global location uses the bare hostname.
    pub fn api_endpoint(&self) -> String {
        if self.location == "global" {
            "https://discoveryengine.googleapis.com/v1beta".to_string()
        } else {
            format!(
                "https://{}-discoveryengine.googleapis.com/v1beta",
                self.location
            )
        }
    }
}

fn require_env(key: &'static str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::MissingVar(key))
}

fn port_env(key: &'static str, default: u16) -> Result<u16, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| ConfigError::InvalidVar(key, raw.clone())),
        Err(_) => Ok(default),
    }
}
