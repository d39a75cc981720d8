use crate::error::{NoteCaptureError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

const AUTH_TOKEN_ENV: &str = "NOTECAP_AUTH_TOKEN";
const API_URL_ENV: &str = "NOTECAP_API_URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_url: String,
    pub auth_token: Option<String>,
    /// 全ての通信に適用する上限時間（秒）
    pub timeout_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            serde_json::from_str::<Config>(&content)?
        } else {
            Self::default_config()
        };

        // 環境変数を優先
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                config.api_url = url;
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| NoteCaptureError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("notecap").join("config.json"))
    }

    fn default_config() -> Self {
        Self {
            api_url: "http://localhost:8000".into(),
            auth_token: None,
            timeout_seconds: 10,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.timeout_seconds == 0 {
            return Err(NoteCaptureError::Config("timeout_secondsは1以上にしてください".into()));
        }
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(NoteCaptureError::Config(format!(
                "api_urlはhttp(s)で始まる必要があります: {}",
                self.api_url
            )));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn get_auth_token(&self) -> Result<String> {
        // 環境変数を優先
        if let Ok(token) = std::env::var(AUTH_TOKEN_ENV) {
            if !token.trim().is_empty() {
                return Ok(token);
            }
        }

        self.auth_token.clone().ok_or(NoteCaptureError::MissingAuthToken)
    }

    pub fn set_auth_token(&mut self, token: String) -> Result<()> {
        self.auth_token = Some(token);
        self.save()
    }

    pub fn set_api_url(&mut self, url: String) -> Result<()> {
        self.api_url = url.trim_end_matches('/').to_string();
        self.validate()?;
        self.save()
    }
}
