// Host record types
//
// `HostRecord` is what `/search` describes, `HostForm` is what the `/mod`
// edit page pre-fills, and `HostOptions` is what `/add` and `/mod` accept.
// All three are plain values rebuilt on every call; nothing is cached.

use std::collections::BTreeMap;
use std::net::IpAddr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Device type Netmagis assigns when none is given (`hinfo` field).
pub const DEFAULT_DEVICE_TYPE: &str = "PC/Unix";

/// DHCP profile id meaning "no profile".
pub const NO_DHCP_PROFILE: u32 = 0;

// ── HostRecord ───────────────────────────────────────────────────────

/// A DNS host entry as decoded from the `/search` results table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostRecord {
    /// First label of the canonical name.
    pub name: String,
    /// Remaining labels of the canonical name.
    pub domain: String,
    pub ip_address: Option<IpAddr>,
    pub mac_address: Option<String>,
    /// Zero when the record uses the server default.
    pub ttl: u32,
    pub dhcp_profile: Option<String>,
    pub device_type: String,
    pub comment: Option<String>,
    pub owner_name: Option<String>,
    pub owner_mail: Option<String>,
    pub smtp_allowed: bool,
    pub aliases: Vec<String>,
    pub allowed_groups: Vec<String>,
    /// Set when the queried name is an alias of this record.
    pub is_alias: bool,
    /// Rows of the results table this client has no typed field for.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl Default for HostRecord {
    fn default() -> Self {
        Self {
            name: String::new(),
            domain: String::new(),
            ip_address: None,
            mac_address: None,
            ttl: 0,
            dhcp_profile: None,
            device_type: DEFAULT_DEVICE_TYPE.into(),
            comment: None,
            owner_name: None,
            owner_mail: None,
            smtp_allowed: false,
            aliases: Vec::new(),
            allowed_groups: Vec::new(),
            is_alias: false,
            extra: BTreeMap::new(),
        }
    }
}

impl HostRecord {
    /// The canonical fully-qualified name (`name.domain`).
    pub fn fqdn(&self) -> String {
        if self.domain.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.name, self.domain)
        }
    }

    /// Re-encode as the label/value cell sequence of the search page.
    pub fn to_table_cells(&self) -> Vec<String> {
        crate::decode::record_to_cells(self)
    }
}

// ── HostOptions ──────────────────────────────────────────────────────

/// Optional fields of the `/add` and `/mod` host forms.
///
/// Defaults match what Netmagis itself applies: server-default TTL, no
/// DHCP profile, `PC/Unix` device type, SMTP not allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostOptions {
    pub ttl: Option<u32>,
    pub mac: Option<String>,
    pub dhcp_profile: u32,
    pub device_type: String,
    pub comment: Option<String>,
    pub owner_name: Option<String>,
    pub owner_mail: Option<String>,
    pub smtp_allowed: bool,
}

impl Default for HostOptions {
    fn default() -> Self {
        Self {
            ttl: None,
            mac: None,
            dhcp_profile: NO_DHCP_PROFILE,
            device_type: DEFAULT_DEVICE_TYPE.into(),
            comment: None,
            owner_name: None,
            owner_mail: None,
            smtp_allowed: false,
        }
    }
}

impl HostOptions {
    /// Encode as form fields.
    ///
    /// `sendsmtp` is only sent when SMTP is allowed: Netmagis reads an
    /// absent checkbox differently from an explicit `0`.
    pub fn to_form(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("ttl", self.ttl.map(|t| t.to_string()).unwrap_or_default()),
            ("mac", self.mac.clone().unwrap_or_default()),
            ("iddhcpprof", self.dhcp_profile.to_string()),
            ("hinfo", self.device_type.clone()),
            ("comment", self.comment.clone().unwrap_or_default()),
            ("respname", self.owner_name.clone().unwrap_or_default()),
            ("respmail", self.owner_mail.clone().unwrap_or_default()),
        ];
        if self.smtp_allowed {
            fields.push(("sendsmtp", "1".into()));
        }
        fields
    }
}

// ── HostForm ─────────────────────────────────────────────────────────

/// Field values pre-filled in the `/mod` edit page, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HostForm {
    pub fields: IndexMap<String, String>,
}

impl HostForm {
    /// Raw value of a form field.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    fn non_empty(&self, name: &str) -> Option<&str> {
        self.get(name).filter(|v| !v.is_empty())
    }

    /// Resource record id (`idrr`) that `/mod` updates are addressed by.
    pub fn record_id(&self) -> Option<&str> {
        self.non_empty("idrr")
    }

    pub fn name(&self) -> Option<&str> {
        self.non_empty("name")
    }

    pub fn domain(&self) -> Option<&str> {
        self.non_empty("domain")
    }

    pub fn ttl(&self) -> Option<u32> {
        self.non_empty("ttl").and_then(|v| v.parse().ok())
    }

    pub fn mac(&self) -> Option<&str> {
        self.non_empty("mac")
    }

    pub fn dhcp_profile(&self) -> u32 {
        self.non_empty("iddhcpprof")
            .and_then(|v| v.parse().ok())
            .unwrap_or(NO_DHCP_PROFILE)
    }

    pub fn device_type(&self) -> &str {
        self.non_empty("hinfo").unwrap_or(DEFAULT_DEVICE_TYPE)
    }

    pub fn comment(&self) -> Option<&str> {
        self.non_empty("comment")
    }

    pub fn owner_name(&self) -> Option<&str> {
        self.non_empty("respname")
    }

    pub fn owner_mail(&self) -> Option<&str> {
        self.non_empty("respmail")
    }

    pub fn smtp_allowed(&self) -> bool {
        self.get("sendsmtp") == Some("1")
    }

    /// The current state as update options, for read-modify-write updates.
    pub fn to_options(&self) -> HostOptions {
        HostOptions {
            ttl: self.ttl(),
            mac: self.mac().map(String::from),
            dhcp_profile: self.dhcp_profile(),
            device_type: self.device_type().to_owned(),
            comment: self.comment().map(String::from),
            owner_name: self.owner_name().map(String::from),
            owner_mail: self.owner_mail().map(String::from),
            smtp_allowed: self.smtp_allowed(),
        }
    }
}
