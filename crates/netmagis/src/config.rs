//! CLI configuration: a thin layer over `netmagis_config`.
//!
//! Loads the config file selected by `--config` (or the default path),
//! applies `--url` / `--username` / `--insecure` / `--timeout` overrides,
//! and builds an authenticated client from the result.

use std::time::Duration;

use clap::ValueEnum;
use netmagis_api::{Client, TlsMode, TransportConfig};
use netmagis_config::{Config, Credentials, resolve_credentials};
use tracing::debug;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;

pub use netmagis_config::{config_path, save_config};

/// Load the config file named by `--config`, else the default one.
///
/// An explicit path must exist; the default path is optional.
pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    let mut cfg = match global.config.as_deref() {
        Some(path) => netmagis_config::load_config_from(path)?,
        None => netmagis_config::load_config()?,
    };

    if let Some(url) = &global.url {
        cfg.netmagis.url = Some(url.clone());
    }
    if let Some(username) = &global.username {
        cfg.netmagis.username = Some(username.clone());
    }
    if global.insecure {
        cfg.defaults.insecure = true;
    }
    if let Some(timeout) = global.timeout {
        cfg.defaults.timeout = timeout;
    }
    Ok(cfg)
}

/// Output format: `--output` first, then `defaults.output`.
pub fn output_format(global: &GlobalOpts, cfg: &Config) -> OutputFormat {
    global.output.unwrap_or_else(|| {
        OutputFormat::from_str(&cfg.defaults.output, true).unwrap_or(OutputFormat::Table)
    })
}

/// Transport settings derived from the config defaults.
pub fn transport_config(cfg: &Config) -> TransportConfig {
    let tls = if cfg.defaults.insecure {
        TlsMode::DangerAcceptInvalid
    } else if let Some(ca) = &cfg.netmagis.ca_cert {
        TlsMode::CustomCa(ca.clone())
    } else {
        TlsMode::System
    };
    TransportConfig::default()
        .with_timeout(Duration::from_secs(cfg.defaults.timeout))
        .with_tls(tls)
}

/// Resolve credentials and open an authenticated session.
pub async fn client_from_config(cfg: &Config) -> Result<Client, CliError> {
    let Credentials {
        url,
        username,
        password,
    } = resolve_credentials(cfg)?;
    debug!(url = %url, username, "connecting");
    Ok(Client::connect(url, &username, &password, &transport_config(cfg)).await?)
}
