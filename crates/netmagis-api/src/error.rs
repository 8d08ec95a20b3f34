use thiserror::Error;

/// Longest slice of a raw HTML body echoed in an error message.
const BODY_PREVIEW_LEN: usize = 200;

/// Top-level error type for the `netmagis-api` crate.
///
/// Covers every failure mode of a session: the CAS handshake, form
/// submissions the server rejects or answers with unrecognised markup,
/// HTML that cannot be decoded, and caller input refused before any
/// request leaves the process.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The CAS handshake failed at one of its four stages.
    #[error("Authentication failed: {0}")]
    Authentication(#[from] AuthError),

    // ── Operations ──────────────────────────────────────────────────
    /// Netmagis rendered its error banner; `message` is the text it carried.
    #[error("Netmagis rejected the request: {message}")]
    ServerRejected { message: String },

    /// Neither the error banner nor the operation's confirmation was found.
    ///
    /// `body` holds the full HTML answer so a human can diagnose markup drift.
    #[error("Unexpected response (raw HTML answer for debug): {}", preview(.body))]
    UnexpectedResponse { body: String },

    // ── Decoding ────────────────────────────────────────────────────
    /// The response could not be read as an HTML document at all.
    #[error("Unable to parse HTML response: {message}")]
    Parse { message: String },

    // ── Validation ──────────────────────────────────────────────────
    /// A search identifier that is neither a FQDN nor an IP address.
    #[error("'{value}' is not a FQDN or an IP address")]
    InvalidIdentifier { value: String },

    /// A name that cannot be split into host label and domain.
    #[error("'{value}' is not a fully-qualified domain name")]
    InvalidFqdn { value: String },

    /// A create was refused because the name already exists.
    #[error("host '{fqdn}' already declared, allow multiple records to use round-robin DNS")]
    DuplicateHost { fqdn: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate loading error.
    #[error("TLS error: {0}")]
    Tls(String),
}

/// Failures of the CAS login ceremony, one per handshake stage.
#[derive(Debug, Error)]
pub enum AuthError {
    /// `GET {base}/start` did not answer with a 301/302.
    #[error("unable to retrieve CAS URL: invalid status code '{status}' (30{{1,2}} expected)")]
    NoRedirect { status: u16 },

    /// The CAS login page did not answer 200.
    #[error("CAS login page error: HTTP {status}")]
    LoginPageUnreachable { status: u16 },

    /// The login page carried no hidden `execution` field.
    #[error("CAS execution token not found")]
    TokenNotFound,

    /// CAS displayed its authentication failure notice.
    #[error("invalid login or password")]
    InvalidCredentials,

    /// CAS accepted the form but gave no callback location.
    #[error("CAS login answer carried no callback location")]
    MissingCallback,

    /// The callback leg into the application failed.
    #[error("login call back error: {message}")]
    CallbackFailed { message: String },
}

impl Error {
    /// Returns `true` if the caller's input was refused before any write.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidIdentifier { .. } | Self::InvalidFqdn { .. } | Self::DuplicateHost { .. }
        )
    }

    /// Returns `true` for any handshake failure.
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication(_))
    }

    /// Returns `true` if this is a transient transport error.
    ///
    /// Nothing in this crate retries; the flag is for callers that do.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    /// The verbatim HTML body of an unexpected response, if any.
    pub fn raw_body(&self) -> Option<&str> {
        match self {
            Self::UnexpectedResponse { body } => Some(body),
            _ => None,
        }
    }
}

fn preview(body: &str) -> &str {
    if body.len() <= BODY_PREVIEW_LEN {
        return body;
    }
    let mut end = BODY_PREVIEW_LEN;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}
