//! Command dispatch: bridges CLI args -> client operations -> output formatting.

pub mod config_cmd;
pub mod hosts;
pub mod util;

use netmagis_api::Client;

use crate::cli::{Command, GlobalOpts, OutputFormat};
use crate::error::CliError;

/// Dispatch a server-bound command to its handler.
pub async fn dispatch(
    cmd: Command,
    client: &mut Client,
    global: &GlobalOpts,
    format: OutputFormat,
) -> Result<(), CliError> {
    match cmd {
        Command::Search { host } => hosts::search(client, &host, global, format).await,
        Command::Show { fqdn } => hosts::show(client, &fqdn, global, format).await,
        Command::Add(args) => hosts::add(client, args, global).await,
        Command::Update(args) => hosts::update(client, args, global).await,
        Command::Delete { fqdn } => hosts::delete(client, &fqdn, global).await,
        Command::Alias { alias, target } => hosts::alias(client, &alias, &target, global).await,
        // Config and Completions are handled before a session is opened
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
