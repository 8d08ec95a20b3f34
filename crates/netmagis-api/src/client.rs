// Netmagis client
//
// Owns one authenticated session: the base URL, the cookie-carrying
// transport, and the compiled markers and selectors. Every domain
// operation is a form POST through `call`, whose answer is classified
// from the HTML because Netmagis reports domain failures with HTTP 200.

use secrecy::SecretString;
use tracing::{debug, trace, warn};
use url::Url;

use crate::decode::Decoder;
use crate::error::Error;
use crate::markers::{ERROR_BANNER, Markers};
use crate::session::CasLogin;
use crate::transport::{Transport, TransportConfig};

/// How a form submission's HTML answer was read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifiedResponse {
    /// The operation's confirmation was found.
    Success(String),
    /// Netmagis rendered its error banner with this message.
    StructuredError(String),
    /// Neither; the raw body is kept for diagnosis.
    UnexpectedBody(String),
}

impl ClassifiedResponse {
    /// Classify a body: error banner first, then the success predicate.
    ///
    /// A body without banner and without confirmation is never a success.
    pub fn classify(markers: &Markers, body: String, success: impl Fn(&str) -> bool) -> Self {
        if body.contains(ERROR_BANNER) {
            let message = markers
                .find_error_message(&body)
                .unwrap_or("(no message in error banner)")
                .to_owned();
            return Self::StructuredError(message);
        }
        if success(&body) {
            Self::Success(body)
        } else {
            Self::UnexpectedBody(body)
        }
    }

    /// The success body, or the matching operation error.
    pub fn into_result(self) -> Result<String, Error> {
        match self {
            Self::Success(body) => Ok(body),
            Self::StructuredError(message) => Err(Error::ServerRejected { message }),
            Self::UnexpectedBody(body) => Err(Error::UnexpectedResponse { body }),
        }
    }
}

/// An authenticated Netmagis session.
///
/// Built once by [`Client::connect`], which runs the CAS handshake. The
/// session is never re-established; once its cookies expire, build a new
/// client. Domain operations take `&mut self`, so one session never has
/// two requests in flight.
#[derive(Debug)]
pub struct Client {
    base_url: Url,
    transport: Transport,
    pub(crate) markers: Markers,
    pub(crate) decoder: Decoder,
}

impl Client {
    /// Authenticate through CAS and return a ready client.
    ///
    /// `base_url` is the Netmagis application root, e.g.
    /// `https://netmagis.example.com/netmagis`.
    pub async fn connect(
        base_url: Url,
        username: &str,
        password: &SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let transport = Transport::new(transport)?;
        let markers = Markers::new();

        CasLogin::new(&transport, &markers)
            .establish(&base_url, username, password)
            .await?;

        Ok(Self {
            base_url,
            transport,
            markers,
            decoder: Decoder::new(),
        })
    }

    /// The Netmagis application root.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The `Cookie` header the session sends to the application root.
    pub fn session_cookies(&self) -> Option<String> {
        self.transport.cookie_header(&self.base_url)
    }

    /// `{base}/{path}`, tolerating slashes on either side.
    pub(crate) fn join_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_matches('/')
        )
    }

    /// Submit a form and classify the answer.
    ///
    /// Returns the body when `success` accepts it. A Netmagis error banner
    /// becomes [`Error::ServerRejected`]; anything else becomes
    /// [`Error::UnexpectedResponse`] carrying the raw body.
    ///
    /// Takes `&mut self`: a session never has two requests in flight.
    ///
    /// ```compile_fail
    /// # async fn twice(client: &mut netmagis_api::Client) {
    /// let first = client.call("/del", &[], |_, _| true);
    /// let second = client.call("/del", &[], |_, _| true);
    /// let _ = tokio::join!(first, second);
    /// # }
    /// ```
    pub async fn call(
        &mut self,
        path: &str,
        fields: &[(&str, String)],
        success: impl Fn(&Markers, &str) -> bool,
    ) -> Result<String, Error> {
        let url = self.join_url(path);
        let page = self.transport.post_form(&url, fields).await?;
        if page.status.is_redirection() {
            warn!(status = %page.status, path, "operation redirected, session may have expired");
        } else {
            debug!(status = %page.status, path, "operation answered");
        }
        trace!(path, body = %page.body, "operation body");

        let markers = &self.markers;
        let classified = ClassifiedResponse::classify(markers, page.body, |b| success(markers, b));
        trace!(path, outcome = classified_kind(&classified), "classified response");
        classified.into_result()
    }
}

fn classified_kind(classified: &ClassifiedResponse) -> &'static str {
    match classified {
        ClassifiedResponse::Success(_) => "success",
        ClassifiedResponse::StructuredError(_) => "server-rejected",
        ClassifiedResponse::UnexpectedBody(_) => "unexpected",
    }
}
