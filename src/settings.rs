use std::path::PathBuf;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

use crate::agent::MANAGER_AGENT_ID;
use crate::parser::extract::VisualAssetScanner;

const CONFIG_FILE: &str = "campaign_hub";
const ENV_PREFIX: &str = "CAMPAIGN";

pub const DEFAULT_API_URL: &str = "https://agent-prod.studio.lyzr.ai/v3/inference/chat/";
pub const DEFAULT_METRICS_URL: &str = "wss://metrics.studio.lyzr.ai/ws";
pub const DEFAULT_DB_PATH: &str = "data/campaign_hub.sqlite";

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub api_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    pub agent_id: String,
    pub db_path: PathBuf,
    /// Progress websocket base; the session id is appended per request.
    pub metrics_url: String,
    pub max_retries: u32,
    /// First retry delay; later retries double it.
    pub retry_backoff_ms: u64,
    pub timeout_secs: u64,
    pub history_limit: usize,
    /// Extra closing-summary prefixes for the visual asset scanner.
    #[serde(default)]
    pub closing_phrases: Vec<String>,
}

impl Settings {
    /// Defaults, then `campaign_hub.toml` if present, then `CAMPAIGN_*` env vars.
    pub fn load() -> Result<Self, SettingsError> {
        let settings = defaults()?
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("closing_phrases"),
            )
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    pub fn visual_scanner(&self) -> VisualAssetScanner {
        VisualAssetScanner::new().with_closing_prefixes(self.closing_phrases.iter().cloned())
    }
}

fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("api_url", DEFAULT_API_URL)?
        .set_default("agent_id", MANAGER_AGENT_ID)?
        .set_default("db_path", DEFAULT_DB_PATH)?
        .set_default("metrics_url", DEFAULT_METRICS_URL)?
        .set_default("max_retries", 3)?
        .set_default("retry_backoff_ms", crate::agent::BASE_BACKOFF_MS)?
        .set_default("timeout_secs", 300)?
        .set_default("history_limit", crate::history::HISTORY_LIMIT as u64)
}
