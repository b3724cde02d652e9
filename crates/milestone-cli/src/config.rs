//! Configuration file management for milestone.
//!
//! Provides a TOML-based config file at `~/.config/milestone/config.toml` and
//! a resolution chain: CLI flag > env var > config file > default.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use milestone_core::ingest::DEFAULT_MAX_ATTEMPTS;
use milestone_core::llm::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use milestone_core::{GeminiClient, GenerationConfig, IngestionConfig, Planner};

/// API key variables, checked in order.
pub const API_KEY_VARS: &[&str] = &["MILESTONE_API_KEY", "GOOGLE_API_KEY"];
pub const MODEL_VAR: &str = "MILESTONE_MODEL";

pub const DEFAULT_BIND: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub llm: LlmSection,
    #[serde(default)]
    pub server: ServerSection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LlmSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_attempts: Option<u32>,
    /// Set to `false` to stay template-only even with a key present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refine: Option<bool>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ServerSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the milestone config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/milestone` or
/// `~/.config/milestone`, never the platform-specific `dirs::config_dir()`.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("milestone");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("milestone")
}

pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load the config file. A missing file is `Ok(None)`; a malformed one is
/// an error.
pub fn load_config() -> Result<Option<ConfigFile>> {
    let path = config_path();
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config = toml::from_str(&contents)
        .with_context(|| format!("failed to parse config file at {}", path.display()))?;
    Ok(Some(config))
}

/// Serialize and write the config file, creating parent dirs as needed.
/// Sets file permissions to 0600 on Unix.
pub fn save_config(config: &ConfigFile) -> Result<PathBuf> {
    let path = config_path();
    let dir = config_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create config directory {}", dir.display()))?;

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(&path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(&path, perms)
            .with_context(|| format!("failed to set permissions on {}", path.display()))?;
    }

    Ok(path)
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Values given on the command line. `None` defers to the next layer.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub bind: Option<String>,
    pub port: Option<u16>,
    pub offline: bool,
}

/// Fully resolved configuration, ready for use.
#[derive(Debug, Clone, PartialEq)]
pub struct MilestoneConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub max_attempts: u32,
    pub refine: bool,
    pub bind: String,
    pub port: u16,
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().and_then(non_empty)
}

impl MilestoneConfig {
    /// Resolve configuration using the chain: CLI flag > env var > config file > default.
    ///
    /// - API key: `--api-key` > `MILESTONE_API_KEY` > `GOOGLE_API_KEY` > `llm.api_key` > none
    /// - Model: `--model` > `MILESTONE_MODEL` > `llm.model` > `gemini-pro`
    /// - Bind/port: flags > `server.*` > `127.0.0.1:5000`
    ///
    /// A missing API key is not an error; the planner then runs template-only.
    pub fn resolve(overrides: &Overrides) -> Result<Self> {
        let file = load_config()?.unwrap_or_default();
        Ok(Self::from_layers(overrides, file))
    }

    fn from_layers(overrides: &Overrides, file: ConfigFile) -> Self {
        let api_key = overrides
            .api_key
            .clone()
            .and_then(non_empty)
            .or_else(|| API_KEY_VARS.iter().find_map(|name| env_var(name)))
            .or_else(|| file.llm.api_key.and_then(non_empty));

        let model = overrides
            .model
            .clone()
            .or_else(|| env_var(MODEL_VAR))
            .or(file.llm.model)
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        Self {
            api_key,
            model,
            base_url: file
                .llm
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            max_attempts: file
                .llm
                .max_attempts
                .filter(|n| *n > 0)
                .unwrap_or(DEFAULT_MAX_ATTEMPTS),
            refine: !overrides.offline && file.llm.refine.unwrap_or(true),
            bind: overrides
                .bind
                .clone()
                .or(file.server.bind)
                .unwrap_or_else(|| DEFAULT_BIND.to_string()),
            port: overrides
                .port
                .or(file.server.port)
                .unwrap_or(DEFAULT_PORT),
        }
    }

    pub fn ingestion(&self) -> IngestionConfig {
        IngestionConfig {
            max_attempts: self.max_attempts,
            generation: GenerationConfig::default(),
        }
    }

    /// Build the planner this configuration describes.
    pub fn planner(&self) -> Result<Planner> {
        match (&self.api_key, self.refine) {
            (Some(key), true) => {
                let client = GeminiClient::with_options(
                    key.as_str(),
                    self.model.as_str(),
                    self.base_url.as_str(),
                )
                .context("failed to build generative service client")?;
                tracing::info!(model = %self.model, "refining plans through generative service");
                Ok(Planner::with_generator(Arc::new(client), self.ingestion()))
            }
            (None, true) => {
                tracing::info!("no API key configured; using templates only");
                Ok(Planner::offline())
            }
            (_, false) => Ok(Planner::offline()),
        }
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn lock_env() -> std::sync::MutexGuard<'static, ()> {
        crate::test_util::lock_env()
    }

    fn clear_env() {
        for name in API_KEY_VARS.iter().chain([&MODEL_VAR]) {
            unsafe { std::env::remove_var(name) };
        }
    }

    fn file_with_key(key: &str) -> ConfigFile {
        ConfigFile {
            llm: LlmSection {
                api_key: Some(key.to_string()),
                model: Some("file-model".to_string()),
                ..LlmSection::default()
            },
            server: ServerSection {
                bind: Some("0.0.0.0".to_string()),
                port: Some(8080),
            },
        }
    }

    #[test]
    fn defaults_when_nothing_set() {
        let _lock = lock_env();
        clear_env();

        let config = MilestoneConfig::from_layers(&Overrides::default(), ConfigFile::default());
        assert_eq!(config.api_key, None);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.max_attempts, DEFAULT_MAX_ATTEMPTS);
        assert!(config.refine);
        assert_eq!(config.bind, DEFAULT_BIND);
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn cli_flag_overrides_all() {
        let _lock = lock_env();
        clear_env();
        unsafe { std::env::set_var("MILESTONE_API_KEY", "env-key") };
        unsafe { std::env::set_var(MODEL_VAR, "env-model") };

        let overrides = Overrides {
            api_key: Some("cli-key".to_string()),
            model: Some("cli-model".to_string()),
            port: Some(9000),
            ..Overrides::default()
        };
        let config = MilestoneConfig::from_layers(&overrides, file_with_key("file-key"));
        clear_env();

        assert_eq!(config.api_key.as_deref(), Some("cli-key"));
        assert_eq!(config.model, "cli-model");
        assert_eq!(config.port, 9000);
        assert_eq!(config.bind, "0.0.0.0");
    }

    #[test]
    fn env_var_overrides_config_file() {
        let _lock = lock_env();
        clear_env();
        unsafe { std::env::set_var("GOOGLE_API_KEY", "google-key") };

        let config = MilestoneConfig::from_layers(&Overrides::default(), file_with_key("file-key"));
        assert_eq!(config.api_key.as_deref(), Some("google-key"));
        assert_eq!(config.model, "file-model");

        unsafe { std::env::set_var("MILESTONE_API_KEY", "milestone-key") };
        let config = MilestoneConfig::from_layers(&Overrides::default(), file_with_key("file-key"));
        clear_env();
        assert_eq!(config.api_key.as_deref(), Some("milestone-key"));
    }

    #[test]
    fn blank_values_fall_through() {
        let _lock = lock_env();
        clear_env();
        unsafe { std::env::set_var("MILESTONE_API_KEY", "  ") };

        let config = MilestoneConfig::from_layers(&Overrides::default(), file_with_key("file-key"));
        clear_env();
        assert_eq!(config.api_key.as_deref(), Some("file-key"));
    }

    #[test]
    fn offline_flag_disables_refinement() {
        let _lock = lock_env();
        clear_env();

        let overrides = Overrides {
            offline: true,
            ..Overrides::default()
        };
        let config = MilestoneConfig::from_layers(&overrides, file_with_key("file-key"));
        assert!(!config.refine);
        assert_eq!(config.planner().unwrap().provider_name(), "template");
    }

    #[test]
    fn missing_key_builds_template_planner() {
        let _lock = lock_env();
        clear_env();

        let config = MilestoneConfig::from_layers(&Overrides::default(), ConfigFile::default());
        assert_eq!(config.planner().unwrap().provider_name(), "template");
    }

    #[test]
    fn key_builds_refining_planner() {
        let _lock = lock_env();
        clear_env();

        let config = MilestoneConfig::from_layers(&Overrides::default(), file_with_key("file-key"));
        assert_eq!(config.planner().unwrap().provider_name(), "refiner");
    }

    #[test]
    fn zero_attempts_falls_back_to_default() {
        let file: ConfigFile = toml::from_str("[llm]\nmax_attempts = 0\n").unwrap();
        let config = MilestoneConfig::from_layers(&Overrides::default(), file);
        assert_eq!(config.ingestion().max_attempts, DEFAULT_MAX_ATTEMPTS);
    }

    #[test]
    fn partial_file_parses() {
        let file: ConfigFile = toml::from_str("[server]\nport = 7000\n").unwrap();
        assert_eq!(file.server.port, Some(7000));
        assert!(file.llm.api_key.is_none());
    }

    #[test]
    fn save_and_load_roundtrip_with_permissions() {
        let _lock = lock_env();
        let tmp = tempfile::TempDir::new().unwrap();
        let orig_xdg = std::env::var("XDG_CONFIG_HOME").ok();
        unsafe { std::env::set_var("XDG_CONFIG_HOME", tmp.path()) };

        let saved = save_config(&file_with_key("saved-key"));
        let loaded = load_config();

        match orig_xdg {
            Some(x) => unsafe { std::env::set_var("XDG_CONFIG_HOME", x) },
            None => unsafe { std::env::remove_var("XDG_CONFIG_HOME") },
        }

        let path = saved.unwrap();
        assert!(path.starts_with(tmp.path()));
        let loaded = loaded.unwrap().expect("config file should exist");
        assert_eq!(loaded.llm.api_key.as_deref(), Some("saved-key"));
        assert_eq!(loaded.server.port, Some(8080));

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let meta = std::fs::metadata(&path).unwrap();
            assert_eq!(meta.permissions().mode() & 0o777, 0o600);
        }
    }

    #[test]
    fn malformed_file_is_an_error() {
        let _lock = lock_env();
        let tmp = tempfile::TempDir::new().unwrap();
        let orig_xdg = std::env::var("XDG_CONFIG_HOME").ok();
        unsafe { std::env::set_var("XDG_CONFIG_HOME", tmp.path()) };
        std::fs::create_dir_all(tmp.path().join("milestone")).unwrap();
        std::fs::write(tmp.path().join("milestone/config.toml"), "[llm\n").unwrap();

        let result = MilestoneConfig::resolve(&Overrides::default());

        match orig_xdg {
            Some(x) => unsafe { std::env::set_var("XDG_CONFIG_HOME", x) },
            None => unsafe { std::env::remove_var("XDG_CONFIG_HOME") },
        }

        let msg = format!("{:#}", result.unwrap_err());
        assert!(msg.contains("failed to parse config file"), "unexpected error: {msg}");
    }

    #[test]
    fn config_path_ends_with_expected_filename() {
        let path = config_path();
        assert!(
            path.ends_with("milestone/config.toml"),
            "unexpected config path: {}",
            path.display()
        );
    }
}
