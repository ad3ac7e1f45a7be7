use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use sweeper_core::GameConfig;
use sweeper_protocol::Strategy;

/// Client settings, read from a TOML file. Every field is optional.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Root of the move-provider, without a trailing slash.
    pub base_url: String,
    pub timeout_secs: u64,
    /// Move endpoint; `{strategy}` is replaced with the strategy path segment.
    pub move_path: String,
    pub train_path: String,
    pub ping_path: String,
    pub strategy: Strategy,
    /// Pause before a lost board is cleared in the terminal front-end.
    pub reset_delay_ms: u64,
    pub game: GameConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            timeout_secs: 10,
            move_path: "/api/get_move/{strategy}".to_string(),
            train_path: "/api/train".to_string(),
            ping_path: "/api/ping".to_string(),
            strategy: Strategy::default(),
            reset_delay_ms: 1000,
            game: GameConfig::default(),
        }
    }
}

impl ClientConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).context("Failed to parse client config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        GameConfig::new(self.game.size, self.game.mines).context("Invalid [game] settings")?;
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn move_url(&self, strategy: Strategy) -> String {
        self.url(&self.move_path.replace("{strategy}", strategy.as_str()))
    }

    pub fn train_url(&self) -> String {
        self.url(&self.train_path)
    }

    pub fn ping_url(&self) -> String {
        self.url(&self.ping_path)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}
