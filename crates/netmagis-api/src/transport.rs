// HTTP transport for one Netmagis session.
//
// A `reqwest::Client` with a persistent cookie jar and redirects disabled,
// so handshake legs can read `Location` headers themselves. Every other
// component talks to the network through this type.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use reqwest::cookie::{CookieStore, Jar};
use reqwest::redirect::Policy;
use reqwest::{Response, StatusCode};
use tracing::debug;
use url::Url;

use crate::error::{AuthError, Error};

/// TLS verification mode.
#[derive(Debug, Clone)]
pub enum TlsMode {
    /// Use the system certificate store.
    System,
    /// Use a custom CA certificate from the given PEM file.
    CustomCa(PathBuf),
    /// Accept any certificate (test instances with self-signed certs).
    DangerAcceptInvalid,
}

/// Transport configuration used to build the session's HTTP client.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    pub timeout: Duration,
    pub cookie_jar: Option<Arc<Jar>>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::System,
            timeout: Duration::from_secs(60),
            cookie_jar: None,
        }
    }
}

impl TransportConfig {
    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the TLS verification mode.
    pub fn with_tls(mut self, tls: TlsMode) -> Self {
        self.tls = tls;
        self
    }
}

/// A body-read HTTP answer: status, `Location` header, and text.
#[derive(Debug, Clone)]
pub struct Page {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: String,
}

impl Page {
    async fn read(resp: Response) -> Result<Self, Error> {
        let status = resp.status();
        let location = resp
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let body = resp.text().await.map_err(Error::Transport)?;
        Ok(Self {
            status,
            location,
            body,
        })
    }
}

/// Cookie-carrying, redirect-suppressing HTTP client.
///
/// Owned by exactly one [`Client`](crate::Client); never shared between
/// sessions.
#[derive(Debug)]
pub struct Transport {
    http: reqwest::Client,
    jar: Arc<Jar>,
}

impl Transport {
    /// Build a transport from a `TransportConfig`.
    ///
    /// A fresh cookie jar is created when the config does not carry one.
    pub fn new(config: &TransportConfig) -> Result<Self, Error> {
        let jar = config
            .cookie_jar
            .clone()
            .unwrap_or_else(|| Arc::new(Jar::default()));

        let mut builder = reqwest::Client::builder()
            .timeout(config.timeout)
            .redirect(Policy::none())
            .cookie_provider(Arc::clone(&jar))
            .user_agent(concat!("netmagis-api/", env!("CARGO_PKG_VERSION")));

        match &config.tls {
            TlsMode::System => {}
            TlsMode::CustomCa(path) => {
                let cert_pem = std::fs::read(path)
                    .map_err(|e| Error::Tls(format!("failed to read CA cert: {e}")))?;
                let cert = reqwest::Certificate::from_pem(&cert_pem)
                    .map_err(|e| Error::Tls(format!("invalid CA cert: {e}")))?;
                builder = builder.add_root_certificate(cert);
            }
            TlsMode::DangerAcceptInvalid => {
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        let http = builder
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http, jar })
    }

    /// `GET` a URL and read the whole answer. Redirects are returned as-is.
    pub async fn get(&self, url: &str) -> Result<Page, Error> {
        debug!("GET {}", url);
        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;
        Page::read(resp).await
    }

    /// `GET` a URL that must answer with a 301 or 302.
    pub async fn get_redirect(&self, url: &str) -> Result<Page, Error> {
        let page = self.get(url).await?;
        if page.status != StatusCode::MOVED_PERMANENTLY && page.status != StatusCode::FOUND {
            return Err(AuthError::NoRedirect {
                status: page.status.as_u16(),
            }
            .into());
        }
        Ok(page)
    }

    /// `POST` an `application/x-www-form-urlencoded` body.
    pub async fn post_form(&self, url: &str, fields: &[(&str, String)]) -> Result<Page, Error> {
        debug!("POST {}", url);
        let resp = self
            .http
            .post(url)
            .form(fields)
            .send()
            .await
            .map_err(Error::Transport)?;
        Page::read(resp).await
    }

    /// The `Cookie` header the jar would send to `url`, for diagnostics.
    pub fn cookie_header(&self, url: &Url) -> Option<String> {
        let cookies = self.jar.cookies(url)?;
        cookies.to_str().ok().map(String::from)
    }
}
