//! Shared configuration for ZTA tools.
//!
//! TOML profiles merged with `ZTA_` environment overrides, and translation
//! to `zta_core::ConsoleConfig`. The CLI layers its own flag overrides on
//! top.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use zta_core::ConsoleConfig;

/// Profile used when neither the caller nor the file names one.
pub const DEFAULT_PROFILE: &str = "default";

const DEFAULT_API_URL: &str = "http://localhost:8000/api";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found (available: {available})")]
    UnknownProfile { name: String, available: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named gateway profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some(DEFAULT_PROFILE.into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Metrics polling period in seconds.
    #[serde(default = "default_poll_interval")]
    pub poll_interval: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
            poll_interval: default_poll_interval(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    10
}
fn default_poll_interval() -> u64 {
    5
}

/// A named gateway profile.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    /// API root (e.g., "http://localhost:8000/api").
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Override request timeout (seconds).
    pub timeout: Option<u64>,

    /// Override metrics polling period (seconds).
    pub poll_interval: Option<u64>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout: None,
            poll_interval: None,
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.into()
}

impl Config {
    /// Resolve a profile by name, falling back to `default_profile`.
    ///
    /// The `"default"` profile always resolves, to built-in values when the
    /// file does not define it.
    pub fn profile(&self, name: Option<&str>) -> Result<(String, Profile), ConfigError> {
        let name = name
            .or(self.default_profile.as_deref())
            .unwrap_or(DEFAULT_PROFILE);

        match self.profiles.get(name) {
            Some(profile) => Ok((name.to_owned(), profile.clone())),
            None if name == DEFAULT_PROFILE => Ok((name.to_owned(), Profile::default())),
            None => Err(ConfigError::UnknownProfile {
                name: name.to_owned(),
                available: if self.profiles.is_empty() {
                    "none".into()
                } else {
                    self.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
                },
            }),
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "zta", "zta").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("zta");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file + environment. A missing file yields defaults.
///
/// Environment keys nest with `__`: `ZTA_DEFAULTS__TIMEOUT=3`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("ZTA_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Translation ─────────────────────────────────────────────────────

/// Build a `ConsoleConfig` from a profile, with `defaults` filling gaps.
pub fn profile_to_console_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<ConsoleConfig, ConfigError> {
    let base_url = parse_api_url(&profile.api_url)?;

    let timeout = profile.timeout.unwrap_or(defaults.timeout);
    if timeout == 0 {
        return Err(ConfigError::Validation {
            field: "timeout".into(),
            reason: "must be at least 1 second".into(),
        });
    }
    let poll_interval = profile.poll_interval.unwrap_or(defaults.poll_interval);

    Ok(ConsoleConfig {
        base_url,
        timeout: Duration::from_secs(timeout),
        poll_interval: Duration::from_secs(poll_interval),
    })
}

/// Parse and check an API root URL.
pub fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::Validation {
        field: "api_url".into(),
        reason,
    };

    let url = Url::parse(raw).map_err(|e| invalid(format!("'{raw}': {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("'{raw}': scheme must be http or https")));
    }
    if url.cannot_be_a_base() || url.host().is_none() {
        return Err(invalid(format!("'{raw}': missing host")));
    }
    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn write_config(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.defaults.timeout, 10);
        assert_eq!(config.defaults.output, "table");
        assert!(config.profiles.is_empty());

        let (name, profile) = config.profile(None).unwrap();
        assert_eq!(name, "default");
        assert_eq!(profile.api_url, "http://localhost:8000/api");
    }

    #[test]
    fn loads_profiles_and_defaults() {
        let (_dir, path) = write_config(
            r#"
default_profile = "lab"

[defaults]
output = "json"
timeout = 20

[profiles.lab]
api_url = "http://10.0.0.5:8000/api"
poll_interval = 2

[profiles.local]
"#,
        );

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.defaults.output, "json");
        assert_eq!(config.defaults.color, "auto");

        let (name, lab) = config.profile(None).unwrap();
        assert_eq!(name, "lab");
        let console = profile_to_console_config(&lab, &config.defaults).unwrap();
        assert_eq!(console.base_url.as_str(), "http://10.0.0.5:8000/api");
        assert_eq!(console.timeout, Duration::from_secs(20));
        assert_eq!(console.poll_interval, Duration::from_secs(2));

        let (_, local) = config.profile(Some("local")).unwrap();
        assert_eq!(local.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn unknown_profile_lists_available() {
        let (_dir, path) = write_config("[profiles.lab]\napi_url = \"http://lab/api\"\n");
        let config = load_config_from(&path).unwrap();

        let err = config.profile(Some("prod")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "profile 'prod' not found (available: lab)"
        );
    }

    #[test]
    fn rejects_bad_urls_and_zero_timeout() {
        let defaults = Defaults::default();
        for raw in ["not a url", "ftp://host/api", "mailto:ops@example.com"] {
            let profile = Profile {
                api_url: raw.into(),
                ..Profile::default()
            };
            assert!(
                matches!(
                    profile_to_console_config(&profile, &defaults),
                    Err(ConfigError::Validation { .. })
                ),
                "accepted {raw}"
            );
        }

        let profile = Profile {
            timeout: Some(0),
            ..Profile::default()
        };
        assert!(profile_to_console_config(&profile, &defaults).is_err());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.profiles.insert(
            "default".into(),
            Profile {
                api_url: "https://gw.example.com/api".into(),
                timeout: Some(3),
                poll_interval: None,
            },
        );
        save_config_to(&config, &path).unwrap();

        assert_eq!(load_config_from(&path).unwrap(), config);
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let (_dir, path) = write_config("defaults = [");
        assert!(matches!(load_config_from(&path), Err(ConfigError::Figment(_))));
    }
}
