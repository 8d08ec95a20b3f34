//! CLI error types with miette diagnostics.
//!
//! Maps library and config errors into user-facing errors with help text
//! and a stable exit code.

use miette::Diagnostic;
use thiserror::Error;

use netmagis_api::Error as ApiError;
use netmagis_config::ConfigError;

/// Process exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const UNEXPECTED_MARKUP: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not reach Netmagis at {url}")]
    #[diagnostic(
        code(netmagis::connection_failed),
        help(
            "Check the URL and that the server is reachable.\n\
             Raise the timeout with --timeout if the server is slow."
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("TLS setup failed: {message}")]
    #[diagnostic(
        code(netmagis::tls_error),
        help("Use --insecure (-k) to accept the certificate, or configure ca_cert.")
    )]
    TlsError { message: String },

    // ── Authentication ───────────────────────────────────────────────

    #[error("{message}")]
    #[diagnostic(
        code(netmagis::auth_failed),
        help(
            "Verify your CAS username and password.\n\
             Run: netmagis config set-password"
        )
    )]
    AuthFailed { message: String },

    #[error("No {field} configured")]
    #[diagnostic(
        code(netmagis::missing_setting),
        help(
            "Set it in the configuration file (see: netmagis config path),\n\
             or through NETMAGIS_URL / NETMAGIS_USERNAME / NETMAGIS_PASSWORD."
        )
    )]
    MissingSetting { field: String },

    // ── Hosts ────────────────────────────────────────────────────────

    #[error("host '{fqdn}' not found")]
    #[diagnostic(code(netmagis::not_found))]
    NotFound { fqdn: String },

    #[error("host '{fqdn}' already declared")]
    #[diagnostic(
        code(netmagis::conflict),
        help("Pass --multiple to add a further address under the same name (round-robin DNS).")
    )]
    Conflict { fqdn: String },

    #[error("Netmagis rejected the request: {message}")]
    #[diagnostic(code(netmagis::rejected))]
    Rejected { message: String },

    #[error("{message}")]
    #[diagnostic(code(netmagis::unexpected_markup))]
    UnexpectedMarkup {
        message: String,
        /// The full HTML answer, when there was one.
        #[help]
        raw_body: Option<String>,
    },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(netmagis::validation))]
    Validation { field: String, reason: String },

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(netmagis::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Configuration file not found: {path}")]
    #[diagnostic(
        code(netmagis::no_config),
        help("Default location: netmagis config path")
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(netmagis::config))]
    Config(Box<ConfigError>),

    // ── IO ───────────────────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::TlsError { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::MissingSetting { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::UnexpectedMarkup { .. } => exit_code::UNEXPECTED_MARKUP,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            Self::Rejected { .. } | Self::NoConfig { .. } | Self::Config(_) | Self::Io(_) => {
                exit_code::GENERAL
            }
        }
    }
}

// ── netmagis_api::Error → CliError ───────────────────────────────────

impl From<ApiError> for CliError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Authentication(e) => Self::AuthFailed {
                message: format!("Authentication failed: {e}"),
            },
            ApiError::ServerRejected { message } => Self::Rejected { message },
            ApiError::UnexpectedResponse { body } => Self::UnexpectedMarkup {
                message: "Unexpected response from Netmagis".into(),
                raw_body: Some(format!("raw HTML answer:\n{body}")),
            },
            e @ ApiError::Parse { .. } => Self::UnexpectedMarkup {
                message: e.to_string(),
                raw_body: None,
            },
            e @ (ApiError::InvalidIdentifier { .. } | ApiError::InvalidFqdn { .. }) => {
                Self::Validation {
                    field: "host".into(),
                    reason: e.to_string(),
                }
            }
            ApiError::DuplicateHost { fqdn } => Self::Conflict { fqdn },
            ApiError::Transport(e) => Self::ConnectionFailed {
                url: e
                    .url()
                    .map_or_else(|| "(unknown)".into(), ToString::to_string),
                source: Box::new(e),
            },
            ApiError::InvalidUrl(e) => Self::Validation {
                field: "url".into(),
                reason: e.to_string(),
            },
            ApiError::Tls(message) => Self::TlsError { message },
        }
    }
}

// ── ConfigError → CliError ───────────────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NotFound { path } => Self::NoConfig {
                path: path.display().to_string(),
            },
            ConfigError::MissingField { field } => Self::MissingSetting {
                field: field.into(),
            },
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config(Box::new(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use netmagis_api::AuthError;

    use super::*;

    #[test]
    fn exit_codes_follow_the_taxonomy() {
        let cases = [
            (
                CliError::from(ApiError::Authentication(AuthError::InvalidCredentials)),
                exit_code::AUTH,
            ),
            (
                CliError::from(ApiError::DuplicateHost {
                    fqdn: "www.example.com".into(),
                }),
                exit_code::CONFLICT,
            ),
            (
                CliError::from(ApiError::UnexpectedResponse {
                    body: "<html></html>".into(),
                }),
                exit_code::UNEXPECTED_MARKUP,
            ),
            (
                CliError::from(ApiError::InvalidFqdn {
                    value: "localhost".into(),
                }),
                exit_code::USAGE,
            ),
            (
                CliError::from(ApiError::ServerRejected {
                    message: "Invalid MAC".into(),
                }),
                exit_code::GENERAL,
            ),
            (
                CliError::from(ConfigError::MissingField { field: "password" }),
                exit_code::AUTH,
            ),
        ];
        for (err, code) in cases {
            assert_eq!(err.exit_code(), code, "{err}");
        }
    }

    #[test]
    fn unexpected_response_keeps_the_whole_body() {
        let body = format!("<html>{}<p>MARKUP-DRIFT-TAIL</p></html>", "x".repeat(400));
        let err = CliError::from(ApiError::UnexpectedResponse { body: body.clone() });

        assert_eq!(err.exit_code(), exit_code::UNEXPECTED_MARKUP);
        let help = err.help().map(|h| h.to_string()).unwrap_or_default();
        assert!(help.contains(&body), "help should carry the full body: {help}");
        assert!(help.ends_with("<p>MARKUP-DRIFT-TAIL</p></html>"));
    }

    #[test]
    fn auth_message_names_the_failure() {
        let err = CliError::from(ApiError::Authentication(AuthError::InvalidCredentials));
        assert_eq!(
            err.to_string(),
            "Authentication failed: invalid login or password"
        );
    }
}
