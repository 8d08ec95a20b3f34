//! Clap derive structures for the `netmagis` CLI.
//!
//! Defines the command tree, global flags, and the host option flags
//! shared by `add` and `update`.

use std::net::IpAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// netmagis -- declare and inspect hosts in a Netmagis DNS/IPAM instance
#[derive(Debug, Parser)]
#[command(
    name = "netmagis",
    version,
    about = "Manage Netmagis DNS host records from the command line",
    long_about = "A command-line client for the Netmagis DNS/IP management web application.\n\n\
        Netmagis has no API: this tool logs in through CAS and drives the\n\
        application's HTML forms (search, add, modify, delete).",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Configuration file (TOML, or YAML with a .yml/.yaml extension)
    #[arg(long, short = 'C', env = "NETMAGIS_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Netmagis application URL (overrides config)
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// CAS username (overrides config)
    #[arg(long, short = 'u', global = true)]
    pub username: Option<String>,

    /// Output format [default: from config, else table]
    #[arg(long, short = 'o', env = "NETMAGIS_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', env = "NETMAGIS_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds [default: from config, else 60]
    #[arg(long, env = "NETMAGIS_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Look up a host by FQDN or IP address
    #[command(alias = "s")]
    Search {
        /// Fully-qualified name or IPv4/IPv6 address
        host: String,
    },

    /// Show the edit form of a host, including its record id
    Show {
        /// Fully-qualified host name
        fqdn: String,
    },

    /// Declare a new host
    Add(AddArgs),

    /// Modify an existing host (unset flags keep their current value)
    #[command(alias = "mod")]
    Update(UpdateArgs),

    /// Remove a host
    #[command(alias = "del", alias = "rm")]
    Delete {
        /// Fully-qualified host name
        fqdn: String,
    },

    /// Declare an alias (CNAME) pointing at an existing host
    Alias {
        /// New alias name
        alias: String,

        /// Existing host the alias points at
        target: String,
    },

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Host commands ────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Fully-qualified host name
    pub fqdn: String,

    /// IPv4 or IPv6 address
    pub address: IpAddr,

    #[command(flatten)]
    pub options: HostOptionArgs,

    /// Add a further address even if the name exists (round-robin DNS)
    #[arg(long)]
    pub multiple: bool,
}

#[derive(Debug, Args)]
pub struct UpdateArgs {
    /// Fully-qualified host name
    pub fqdn: String,

    #[command(flatten)]
    pub options: HostOptionArgs,
}

/// Optional host fields, shared by `add` and `update`.
#[derive(Debug, Default, Args)]
pub struct HostOptionArgs {
    /// TTL in seconds (0 for the server default)
    #[arg(long)]
    pub ttl: Option<u32>,

    /// MAC address
    #[arg(long)]
    pub mac: Option<String>,

    /// DHCP profile id (0 for none)
    #[arg(long)]
    pub dhcp_profile: Option<u32>,

    /// Device type, e.g. "PC/Unix"
    #[arg(long)]
    pub device_type: Option<String>,

    /// Free-form comment
    #[arg(long)]
    pub comment: Option<String>,

    /// Name of the person responsible for the host
    #[arg(long)]
    pub owner_name: Option<String>,

    /// Mail of the person responsible for the host
    #[arg(long)]
    pub owner_mail: Option<String>,

    /// Allow the host to emit SMTP
    #[arg(long, conflicts_with = "no_smtp")]
    pub smtp: bool,

    /// Forbid the host to emit SMTP
    #[arg(long)]
    pub no_smtp: bool,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the configuration file path
    Path,

    /// Display the resolved configuration (password masked)
    Show,

    /// Store the password in the system keyring
    SetPassword,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
