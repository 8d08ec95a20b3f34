// Literal markers Netmagis and its CAS server put in their HTML.
//
// The application exposes no status codes for domain-level outcomes, so
// every result is recognised from these patterns. They are compiled once
// per client and owned by it.

use regex::Regex;

/// Banner heading rendered above every Netmagis error message.
pub(crate) const ERROR_BANNER: &str = "<h2>Error!</h2>";

/// Confirmation phrase of `/add` with `action=add-host`.
pub(crate) const HOST_ADDED: &str = "Host has been added.";

/// Confirmation phrase of `/mod` with `action=store`.
pub(crate) const HOST_STORED: &str = "The modification has been stored in database";

/// Confirmation phrase of `/del`.
pub(crate) const HOST_REMOVED: &str = "has been removed";

/// Confirmation phrase of `/add` with `action=add-alias`.
pub(crate) const ALIAS_ADDED: &str = "The alias has been added";

/// Accepted shape of a fully-qualified domain name.
const FQDN_PATTERN: &str =
    r"^[0-9A-Za-z-]{1,63}(\.[0-9A-Za-z-]{1,63})*\.[A-Za-z]{2,63}$";

/// Compiled patterns for handshake and response classification.
#[derive(Debug, Clone)]
pub struct Markers {
    /// Hidden one-time `execution` field on the CAS login page.
    pub execution_token: Regex,
    /// CAS notice shown when the credentials are refused.
    pub login_failed: Regex,
    /// Message inside the Netmagis error banner.
    pub error_message: Regex,
    /// `/search` answer describing an entry ("... is a host in view ...").
    pub search_found: Regex,
    /// `/search` answer for an unknown name or address.
    pub search_not_found: Regex,
    /// `/mod` rejection for a name that is not declared.
    pub name_missing: Regex,
    /// Any HTML form, used to recognise the edit page.
    pub edit_form: Regex,
    /// Accepted shape of a fully-qualified domain name.
    pub fqdn: Regex,
}

impl Default for Markers {
    fn default() -> Self {
        Self::new()
    }
}

impl Markers {
    pub fn new() -> Self {
        Self {
            execution_token: compile(
                r#"<input\s+type="hidden"\s+name="execution"\s+value="?([^"]*)"\s*/?>"#,
            ),
            login_failed: compile(r"Authentication attempt has failed"),
            error_message: compile(r##"(?is)<blockquote>\s*<font color="#FF0000">(.*?)</font>\s*</blockquote>"##),
            search_found: compile(r"is a.* in view "),
            search_not_found: compile(r"String '[^']*' not found"),
            name_missing: compile(r"Name '[^']*' does not exist"),
            edit_form: compile(r"(?i)<form[\s>]"),
            fqdn: compile(FQDN_PATTERN),
        }
    }

    /// The execution token embedded in a CAS login page.
    pub fn find_execution_token<'a>(&self, page: &'a str) -> Option<&'a str> {
        self.execution_token
            .captures(page)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
    }

    /// The text of a Netmagis error banner, stripped of surrounding quotes.
    pub fn find_error_message<'a>(&self, body: &'a str) -> Option<&'a str> {
        self.error_message
            .captures(body)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().trim_matches('"'))
    }

    /// Whether `host` has the shape of a fully-qualified domain name.
    pub fn is_fqdn(&self, host: &str) -> bool {
        self.fqdn.is_match(host)
    }

    /// Whether a `/search` answer is one of the two recognised pages.
    pub fn is_search_page(&self, body: &str) -> bool {
        self.search_found.is_match(body) || self.search_not_found.is_match(body)
    }
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static marker pattern must compile")
}
