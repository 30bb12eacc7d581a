use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Errors that can occur when loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read the config file.
    ReadFile { path: PathBuf, source: std::io::Error },
    /// Failed to parse JSON.
    ParseJson { path: PathBuf, source: serde_json::Error },
    /// Validation error.
    Validation(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadFile { path, source } => {
                write!(f, "failed to read config file '{}': {}", path.display(), source)
            }
            Self::ParseJson { path, source } => {
                write!(f, "failed to parse config file '{}': {}", path.display(), source)
            }
            Self::Validation(msg) => write!(f, "config validation error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ReadFile { source, .. } => Some(source),
            Self::ParseJson { source, .. } => Some(source),
            Self::Validation(_) => None,
        }
    }
}

fn default_port() -> u16 {
    3000
}

#[derive(Deserialize)]
struct ConfigFile {
    telegram_bot_token: String,
    /// Description-generation endpoint.
    worker_url: String,
    /// Image hosting upload endpoint.
    upload_url: String,
    /// Liveness HTTP port.
    #[serde(default = "default_port")]
    port: u16,
    /// Directory for persisted session credentials. Defaults to "auth".
    auth_dir: Option<String>,
    /// Directory for state files (logs). Defaults to current directory.
    data_dir: Option<String>,
}

pub struct Config {
    pub telegram_bot_token: String,
    pub worker_url: String,
    pub upload_url: String,
    pub port: u16,
    /// Directory for persisted session credentials.
    pub auth_dir: PathBuf,
    /// Directory for state files (logs).
    pub data_dir: PathBuf,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let env: HashMap<String, String> = std::env::vars().collect();
        Self::load_with_env(path, &env)
    }

    /// Load the config file, then overlay the WORKER_URL / UPLOAD_URL / PORT
    /// environment variables. Split out so tests can inject the environment.
    pub fn load_with_env<P: AsRef<Path>>(
        path: P,
        env: &HashMap<String, String>,
    ) -> Result<Self, ConfigError> {
        let config_path = path.as_ref().to_path_buf();
        let content = std::fs::read_to_string(&config_path)
            .map_err(|e| ConfigError::ReadFile { path: config_path.clone(), source: e })?;
        let mut file: ConfigFile = serde_json::from_str(&content)
            .map_err(|e| ConfigError::ParseJson { path: config_path.clone(), source: e })?;

        if let Some(url) = env.get("WORKER_URL") {
            file.worker_url = url.clone();
        }
        if let Some(url) = env.get("UPLOAD_URL") {
            file.upload_url = url.clone();
        }
        if let Some(port) = env.get("PORT") {
            file.port = port.parse().map_err(|_| {
                ConfigError::Validation(format!("PORT must be a number, got '{port}'"))
            })?;
        }

        if file.telegram_bot_token.is_empty() {
            return Err(ConfigError::Validation("telegram_bot_token is required".into()));
        }
        // Telegram tokens are formatted as {bot_id}:{secret} where bot_id is numeric
        let token_parts: Vec<&str> = file.telegram_bot_token.split(':').collect();
        if token_parts.len() != 2 || token_parts[0].parse::<u64>().is_err() || token_parts[1].is_empty() {
            return Err(ConfigError::Validation(
                "telegram_bot_token appears invalid (expected format: 123456789:ABCdefGHI...)".into()
            ));
        }
        if !file.worker_url.starts_with("http") {
            return Err(ConfigError::Validation(
                "worker_url must be an http(s) URL".into(),
            ));
        }
        if !file.upload_url.starts_with("http") {
            return Err(ConfigError::Validation(
                "upload_url must be an http(s) URL".into(),
            ));
        }

        let auth_dir = file
            .auth_dir
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("auth"));
        let data_dir = file
            .data_dir
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Self {
            telegram_bot_token: file.telegram_bot_token,
            worker_url: file.worker_url,
            upload_url: file.upload_url,
            port: file.port,
            auth_dir,
            data_dir,
        })
    }
}
