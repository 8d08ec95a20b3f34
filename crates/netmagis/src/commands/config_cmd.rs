//! Config subcommand handlers.

use std::fmt::Write;

use netmagis_config::Config;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

/// Format config for display, masking the password.
fn format_config_redacted(cfg: &Config) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "[netmagis]");
    if let Some(ref url) = cfg.netmagis.url {
        let _ = writeln!(out, "url = \"{url}\"");
    }
    if let Some(ref u) = cfg.netmagis.username {
        let _ = writeln!(out, "username = \"{u}\"");
    }
    if cfg.netmagis.password.is_some() {
        let _ = writeln!(out, "password = \"****\"");
    }
    if let Some(ref ca) = cfg.netmagis.ca_cert {
        let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "insecure = {}", cfg.defaults.insecure);
    let _ = write!(out, "timeout = {}", cfg.defaults.timeout);

    out
}

fn required(value: Option<&String>, field: &str) -> Result<String, CliError> {
    value
        .filter(|v| !v.is_empty())
        .cloned()
        .ok_or_else(|| CliError::MissingSetting {
            field: field.into(),
        })
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            let path = global.config.clone().unwrap_or_else(config::config_path);
            output::print_output(&path.display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = config::load(global)?;
            output::print_output(&format_config_redacted(&cfg), global.quiet);
            Ok(())
        }

        ConfigCommand::SetPassword => {
            let cfg = config::load(global)?;
            let url_str = required(cfg.netmagis.url.as_ref(), "URL")?;
            let username = required(cfg.netmagis.username.as_ref(), "username")?;
            let url = url::Url::parse(&url_str).map_err(|e| CliError::Validation {
                field: "url".into(),
                reason: format!("{url_str}: {e}"),
            })?;

            let password = rpassword::prompt_password(format!("Password for {username}: "))?;
            if password.is_empty() {
                return Err(CliError::Validation {
                    field: "password".into(),
                    reason: "password cannot be empty".into(),
                });
            }
            netmagis_config::store_password(&url, &username, &password)?;
            if !global.quiet {
                eprintln!("Password for {username} stored in system keyring");
            }
            Ok(())
        }
    }
}
