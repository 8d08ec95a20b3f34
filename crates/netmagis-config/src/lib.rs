//! Configuration for Netmagis tools.
//!
//! Loads the `netmagis` section (URL, username, password) from a TOML or
//! YAML file plus `NETMAGIS_*` environment variables, and resolves the
//! password through env, then the OS keyring, then the file.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml, Yaml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Keyring service name passwords are stored under.
const KEYRING_SERVICE: &str = "netmagis";

/// Environment variable that takes precedence over any stored password.
const PASSWORD_ENV: &str = "NETMAGIS_PASSWORD";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("{field} not defined")]
    MissingField { field: &'static str },

    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Config structs ──────────────────────────────────────────────────

/// Top-level configuration file.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    /// Server and account.
    #[serde(default)]
    pub netmagis: Server,

    /// Client-side defaults.
    #[serde(default)]
    pub defaults: Defaults,
}

/// The `netmagis` section.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Server {
    /// Netmagis application root (e.g. "https://netmagis.example.com/netmagis").
    pub url: Option<String>,

    /// CAS username.
    pub username: Option<String>,

    /// CAS password (plaintext, prefer the keyring or `NETMAGIS_PASSWORD`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Path to a custom CA certificate.
    pub ca_cert: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_timeout() -> u64 {
    60
}

/// Fully resolved connection settings.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub url: Url,
    pub username: String,
    pub password: SecretString,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the default config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("org", "netmagis", "netmagis").map_or_else(
        || {
            let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
            p.push(".config");
            p.push("netmagis");
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Config loading ──────────────────────────────────────────────────

fn figment_for(path: &Path) -> Figment {
    let file = match path.extension().and_then(|e| e.to_str()) {
        Some("yml" | "yaml") => Figment::new().merge(Yaml::file(path)),
        _ => Figment::new().merge(Toml::file(path)),
    };

    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(file)
        .merge(
            Env::prefixed("NETMAGIS_")
                .filter(|key| key == "url" || key == "username" || key == "password")
                .map(|key| format!("netmagis.{}", key.as_str().to_ascii_lowercase()).into()),
        )
}

/// Load the configuration from an explicit file, which must exist.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::NotFound {
            path: path.to_owned(),
        });
    }
    debug!(path = %path.display(), "loading configuration");
    Ok(figment_for(path).extract()?)
}

/// Load the configuration from the default path; the file is optional.
pub fn load_config() -> Result<Config, ConfigError> {
    Ok(figment_for(&config_path()).extract()?)
}

/// Load config, returning a default if nothing can be read.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path`.
pub fn save_config(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// Keyring entry holding the password of `username` on the server at `url`.
pub fn keyring_entry(url: &Url, username: &str) -> Result<keyring::Entry, ConfigError> {
    let host = url.host_str().unwrap_or("netmagis");
    Ok(keyring::Entry::new(
        KEYRING_SERVICE,
        &format!("{username}@{host}"),
    )?)
}

/// Store a password in the OS keyring for later resolution.
pub fn store_password(url: &Url, username: &str, password: &str) -> Result<(), ConfigError> {
    keyring_entry(url, username)?.set_password(password)?;
    Ok(())
}

/// Resolve URL, username, and password.
///
/// The password is looked up in `NETMAGIS_PASSWORD`, then the keyring,
/// then the plaintext `password` field. Any of the three missing is an
/// error.
pub fn resolve_credentials(cfg: &Config) -> Result<Credentials, ConfigError> {
    let url_str = cfg
        .netmagis
        .url
        .as_deref()
        .filter(|u| !u.is_empty())
        .ok_or(ConfigError::MissingField { field: "URL" })?;
    let url = Url::parse(url_str).map_err(|e| ConfigError::Validation {
        field: "url".into(),
        reason: format!("{url_str}: {e}"),
    })?;

    let username = cfg
        .netmagis
        .username
        .clone()
        .filter(|u| !u.is_empty())
        .ok_or(ConfigError::MissingField { field: "username" })?;

    let password = resolve_password(cfg, &url, &username)
        .ok_or(ConfigError::MissingField { field: "password" })?;

    Ok(Credentials {
        url,
        username,
        password: SecretString::from(password),
    })
}

fn resolve_password(cfg: &Config, url: &Url, username: &str) -> Option<String> {
    if let Some(pw) = std::env::var(PASSWORD_ENV).ok().filter(|p| !p.is_empty()) {
        return Some(pw);
    }

    if let Ok(pw) =
        keyring_entry(url, username).and_then(|e| e.get_password().map_err(ConfigError::from))
    {
        debug!(username, "password resolved from keyring");
        return Some(pw);
    }

    cfg.netmagis.password.clone().filter(|p| !p.is_empty())
}

/// Load `path` and resolve its credentials in one step.
pub fn load_credentials(path: &Path) -> Result<Credentials, ConfigError> {
    resolve_credentials(&load_config_from(path)?)
}
