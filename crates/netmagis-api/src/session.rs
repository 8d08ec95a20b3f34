// CAS session establishment
//
// Netmagis delegates login to a CAS server. The handshake is a fixed
// sequence of four legs, each fatal on failure:
//
//   1. GET {base}/start          -> 302 to the CAS login URL
//   2. GET <login URL>           -> login page with a one-time `execution` token
//   3. scan the page for the token
//   4. POST credentials + token  -> 302 back into Netmagis, GET it once
//
// Afterwards the transport's jar holds both the CAS and Netmagis session
// cookies. Nothing here retries.

use std::fmt;

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;
use url::Url;

use crate::error::{AuthError, Error};
use crate::markers::Markers;
use crate::transport::Transport;

/// Handshake legs, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeStage {
    Start,
    FetchLoginPage,
    ExtractToken,
    SubmitCredentials,
}

impl fmt::Display for HandshakeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Start => "start",
            Self::FetchLoginPage => "fetch-login-page",
            Self::ExtractToken => "extract-token",
            Self::SubmitCredentials => "submit-credentials",
        };
        f.write_str(name)
    }
}

/// One run of the CAS login ceremony over a transport.
pub(crate) struct CasLogin<'a> {
    transport: &'a Transport,
    markers: &'a Markers,
}

impl<'a> CasLogin<'a> {
    pub(crate) fn new(transport: &'a Transport, markers: &'a Markers) -> Self {
        Self { transport, markers }
    }

    /// Run all four legs against `base_url`.
    pub(crate) async fn establish(
        &self,
        base_url: &Url,
        username: &str,
        password: &SecretString,
    ) -> Result<(), Error> {
        let login_url = self.discover_login_url(base_url).await?;
        let page = self.fetch_login_page(&login_url).await?;
        let token = self.extract_token(&page)?;
        self.submit_credentials(&login_url, username, password, &token)
            .await?;
        debug!(username, "CAS session established");
        Ok(())
    }

    async fn discover_login_url(&self, base_url: &Url) -> Result<Url, Error> {
        let stage = HandshakeStage::Start;
        let start = format!("{}/start", base_url.as_str().trim_end_matches('/'));
        debug!(%stage, "looking up CAS URL at {}", start);

        let page = self.transport.get_redirect(&start).await?;
        let location = page.location.ok_or(AuthError::NoRedirect {
            status: page.status.as_u16(),
        })?;
        let login_url = Url::parse(&start)?.join(&location)?;
        debug!(%stage, "CAS login URL is {}", login_url);
        Ok(login_url)
    }

    async fn fetch_login_page(&self, login_url: &Url) -> Result<String, Error> {
        debug!(stage = %HandshakeStage::FetchLoginPage, "fetching CAS login page");
        let page = self.transport.get(login_url.as_str()).await?;
        if page.status != StatusCode::OK {
            return Err(AuthError::LoginPageUnreachable {
                status: page.status.as_u16(),
            }
            .into());
        }
        Ok(page.body)
    }

    fn extract_token(&self, login_page: &str) -> Result<String, Error> {
        let token = self
            .markers
            .find_execution_token(login_page)
            .ok_or(AuthError::TokenNotFound)?;
        debug!(stage = %HandshakeStage::ExtractToken, "found execution token");
        Ok(token.to_owned())
    }

    async fn submit_credentials(
        &self,
        login_url: &Url,
        username: &str,
        password: &SecretString,
        token: &str,
    ) -> Result<(), Error> {
        let stage = HandshakeStage::SubmitCredentials;
        debug!(%stage, username, "submitting credentials");

        let fields = [
            ("_eventId", "submit".to_owned()),
            ("username", username.to_owned()),
            ("password", password.expose_secret().to_owned()),
            ("execution", token.to_owned()),
        ];
        let answer = self.transport.post_form(login_url.as_str(), &fields).await?;

        if self.markers.login_failed.is_match(&answer.body) {
            return Err(AuthError::InvalidCredentials.into());
        }
        let location = answer.location.ok_or(AuthError::MissingCallback)?;
        let callback = login_url
            .join(&location)
            .map_err(|e| AuthError::CallbackFailed {
                message: format!("invalid callback location '{location}': {e}"),
            })?;

        debug!(%stage, "following callback into Netmagis");
        self.transport
            .get(callback.as_str())
            .await
            .map_err(|e| AuthError::CallbackFailed {
                message: e.to_string(),
            })?;
        Ok(())
    }
}
