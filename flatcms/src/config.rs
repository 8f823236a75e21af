// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const CONFIG_FILE_NAME: &str = "config.yaml";

#[derive(Debug)]
pub enum ConfigError {
    LoadError(String),
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::LoadError(msg) => write!(f, "Configuration load error: {}", msg),
            ConfigError::ValidationError(msg) => {
                write!(f, "Configuration validation error: {}", msg)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default = "default_workers")]
    pub workers: usize,
}

fn default_workers() -> usize {
    4
}

impl ServerConfig {
    pub fn address_tuple(&self) -> (&str, u16) {
        (self.host.as_str(), self.port)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_app_description")]
    pub description: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            description: default_app_description(),
        }
    }
}

fn default_app_name() -> String {
    "flatcms".to_string()
}

fn default_app_description() -> String {
    "A flat-file document manager".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SessionConfig {
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    #[serde(default = "default_idle_timeout_minutes")]
    pub idle_timeout_minutes: u64,
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
    #[serde(default)]
    pub secure_cookie: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            idle_timeout_minutes: default_idle_timeout_minutes(),
            max_sessions: default_max_sessions(),
            secure_cookie: false,
        }
    }
}

fn default_cookie_name() -> String {
    "flatcms_session".to_string()
}

fn default_idle_timeout_minutes() -> u64 {
    120
}

fn default_max_sessions() -> usize {
    10000
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct UploadConfig {
    #[serde(default = "default_max_file_size_mb")]
    pub max_file_size_mb: u64, // 0 means unlimited
    #[serde(default = "default_overwrite_existing")]
    pub overwrite_existing: bool,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: default_max_file_size_mb(),
            overwrite_existing: default_overwrite_existing(),
        }
    }
}

impl UploadConfig {
    pub fn max_file_size_bytes(&self) -> Option<u64> {
        if self.max_file_size_mb == 0 {
            None
        } else {
            Some(self.max_file_size_mb.saturating_mul(1024 * 1024))
        }
    }
}

fn default_max_file_size_mb() -> u64 {
    10
}

fn default_overwrite_existing() -> bool {
    true
}

/// Argon2id cost parameters used when hashing account passwords.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct PasswordConfig {
    #[serde(default = "default_memory_kib")]
    pub memory_kib: u32,
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    #[serde(default = "default_parallelism")]
    pub parallelism: u32,
}

pub const DEFAULT_PASSWORD_PARAMS: PasswordConfig = PasswordConfig {
    memory_kib: 19456,
    iterations: 2,
    parallelism: 1,
};

impl Default for PasswordConfig {
    fn default() -> Self {
        DEFAULT_PASSWORD_PARAMS
    }
}

fn default_memory_kib() -> u32 {
    DEFAULT_PASSWORD_PARAMS.memory_kib
}

fn default_iterations() -> u32 {
    DEFAULT_PASSWORD_PARAMS.iterations
}

fn default_parallelism() -> u32 {
    DEFAULT_PASSWORD_PARAMS.parallelism
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub app: AppConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub upload: UploadConfig,
    #[serde(default)]
    pub password: PasswordConfig,
}

#[derive(Debug, Clone)]
pub struct ValidatedConfig {
    pub server: ServerConfig,
    pub app: AppConfig,
    pub logging: LoggingConfig,
    pub session: SessionConfig,
    pub upload: UploadConfig,
    pub password: PasswordConfig,
}

/// One year. Longer idle timeouts would push session deadlines past what
/// `Instant` can represent on some platforms.
pub const MAX_IDLE_TIMEOUT_MINUTES: u64 = 525_600;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

impl Config {
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let config_path = root.join(CONFIG_FILE_NAME);
        let content = fs::read_to_string(&config_path).map_err(|e| {
            ConfigError::LoadError(format!(
                "Failed to read config file '{}': {}",
                config_path.display(),
                e
            ))
        })?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content)
            .map_err(|e| ConfigError::LoadError(format!("Failed to parse config file: {}", e)))
    }

    pub fn load_and_validate(root: &Path) -> Result<ValidatedConfig, ConfigError> {
        Self::load(root)?.validate()
    }

    pub fn validate(self) -> Result<ValidatedConfig, ConfigError> {
        Self::validate_server(&self.server)?;
        Self::validate_logging(&self.logging)?;
        Self::validate_session(&self.session)?;
        Self::validate_password(&self.password)?;

        if self.upload.max_file_size_mb == 0 {
            warn!("upload.max_file_size_mb is 0; image uploads are not size limited");
        }

        Ok(ValidatedConfig {
            server: self.server,
            app: self.app,
            logging: self.logging,
            session: self.session,
            upload: self.upload,
            password: self.password,
        })
    }

    fn validate_server(server: &ServerConfig) -> Result<(), ConfigError> {
        if server.host.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "server.host must not be empty".to_string(),
            ));
        }
        if server.port == 0 {
            return Err(ConfigError::ValidationError(
                "server.port must be between 1 and 65535".to_string(),
            ));
        }
        if server.workers == 0 {
            return Err(ConfigError::ValidationError(
                "server.workers must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
        let level = logging.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "logging.level must be one of {}, got: {}",
                LOG_LEVELS.join(", "),
                logging.level
            )));
        }
        Ok(())
    }

    fn validate_session(session: &SessionConfig) -> Result<(), ConfigError> {
        let name = session.cookie_name.as_str();
        if name.is_empty() {
            return Err(ConfigError::ValidationError(
                "session.cookie_name must not be empty".to_string(),
            ));
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(ConfigError::ValidationError(format!(
                "session.cookie_name may only contain letters, digits, '_' and '-', got: {}",
                name
            )));
        }
        if session.idle_timeout_minutes == 0
            || session.idle_timeout_minutes > MAX_IDLE_TIMEOUT_MINUTES
        {
            return Err(ConfigError::ValidationError(format!(
                "session.idle_timeout_minutes must be between 1 and {}, got: {}",
                MAX_IDLE_TIMEOUT_MINUTES, session.idle_timeout_minutes
            )));
        }
        if session.max_sessions == 0 {
            return Err(ConfigError::ValidationError(
                "session.max_sessions must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_password(password: &PasswordConfig) -> Result<(), ConfigError> {
        argon2::Params::new(
            password.memory_kib,
            password.iterations,
            password.parallelism,
            None,
        )
        .map(|_| ())
        .map_err(|e| ConfigError::ValidationError(format!("password parameters: {}", e)))
    }
}

impl ValidatedConfig {
    pub fn log_level_filter(&self) -> log::LevelFilter {
        match self.logging.level.to_ascii_lowercase().as_str() {
            "trace" => log::LevelFilter::Trace,
            "debug" => log::LevelFilter::Debug,
            "warn" => log::LevelFilter::Warn,
            "error" => log::LevelFilter::Error,
            "off" => log::LevelFilter::Off,
            _ => log::LevelFilter::Info,
        }
    }
}
