//! Shared helpers for command handlers.

use std::io::IsTerminal;

use netmagis_api::HostOptions;

use crate::cli::HostOptionArgs;
use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal to ask on, `--yes` is required.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Overlay the flags that were given onto `base`.
pub fn merge_options(mut base: HostOptions, args: HostOptionArgs) -> HostOptions {
    // 0 asks for the server default, sent as an empty field.
    if let Some(ttl) = args.ttl {
        base.ttl = (ttl != 0).then_some(ttl);
    }
    if let Some(mac) = args.mac {
        base.mac = Some(mac);
    }
    if let Some(profile) = args.dhcp_profile {
        base.dhcp_profile = profile;
    }
    if let Some(device_type) = args.device_type {
        base.device_type = device_type;
    }
    if let Some(comment) = args.comment {
        base.comment = Some(comment);
    }
    if let Some(owner_name) = args.owner_name {
        base.owner_name = Some(owner_name);
    }
    if let Some(owner_mail) = args.owner_mail {
        base.owner_mail = Some(owner_mail);
    }
    if args.smtp {
        base.smtp_allowed = true;
    } else if args.no_smtp {
        base.smtp_allowed = false;
    }
    base
}
