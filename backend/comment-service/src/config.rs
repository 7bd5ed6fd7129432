use std::{path::PathBuf, time::Duration};

use anyhow::{anyhow, Result};
use serde::Deserialize;

use crate::models::HitPolicy;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // HTTP server
    pub http_host: String,
    pub http_port: u16,

    // Elasticsearch
    pub elasticsearch_url: String,
    pub elasticsearch_index: String,
    pub elasticsearch_timeout_secs: u64,

    // Search
    #[serde(default)]
    pub hit_policy: HitPolicy,

    // Landing page
    pub template_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .set_default("http_host", "0.0.0.0")?
            .set_default("http_port", 8082)?
            .set_default("elasticsearch_url", "http://localhost:9200")?
            .set_default("elasticsearch_index", "comment")?
            .set_default("elasticsearch_timeout_secs", 30)?
            .set_default("hit_policy", "fail_fast")?
            .set_default("template_dir", "templates")?
            .add_source(config::Environment::default().try_parsing(true))
            .build()?;

        config.try_deserialize()
    }

    pub fn validate(&self) -> Result<()> {
        if self.http_port == 0 {
            return Err(anyhow!("HTTP port must be greater than 0"));
        }

        if self.elasticsearch_url.is_empty() {
            return Err(anyhow!("Elasticsearch URL is required"));
        }

        if self.elasticsearch_index.is_empty() {
            return Err(anyhow!("Elasticsearch index name is required"));
        }

        if self.elasticsearch_timeout_secs == 0 {
            return Err(anyhow!("Elasticsearch timeout must be greater than 0"));
        }

        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }

    pub fn elasticsearch_timeout(&self) -> Duration {
        Duration::from_secs(self.elasticsearch_timeout_secs)
    }
}
