// Search-results table decoding
//
// `/search` renders a two-column table: label, value, label, value, ...
// Labels are normalised into keys ("Responsible (mail)" -> "responsible_mail")
// and values coerced per key. Unknown keys are kept verbatim in `extra`.

use std::net::IpAddr;

use tracing::warn;

use crate::model::HostRecord;
use crate::names::{check_ip, split_fqdn};

/// Sentinel the results table shows for an unset DHCP profile.
const NO_PROFILE: &str = "No profile";

/// Separator of multi-valued cells (aliases, allowed groups).
const LIST_SEPARATOR: char = ' ';

// Normalised keys of the rows this client decodes into typed fields.
const NAME: &str = "name";
const IP_ADDRESS: &str = "ip_address";
const MAC_ADDRESS: &str = "mac_address";
const TTL: &str = "ttl";
const DHCP_PROFILE: &str = "dhcp_profile";
const MACHINE_INFO: &str = "machine_info";
const COMMENT: &str = "comment";
const RESPONSIBLE_NAME: &str = "responsible_name";
const RESPONSIBLE_MAIL: &str = "responsible_mail";
const SMTP_EMIT_RIGHT: &str = "smtp_emit_right";
const ALIASES: &str = "aliases";
const ALLOWED_GROUPS: &str = "allowed_groups";

/// Turn a table label into a field key.
///
/// Trims, removes parentheses, joins words with `_`, lower-cases.
pub fn normalize_label(label: &str) -> String {
    label
        .replace(['(', ')'], "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase()
}

/// Build a record from the label/value cell sequence of a results page.
///
/// A trailing label without a value is ignored.
pub fn record_from_cells(cells: &[String], queried: &str) -> HostRecord {
    let mut record = HostRecord::default();
    let mut canonical = String::new();

    for pair in cells.chunks_exact(2) {
        let key = normalize_label(&pair[0]);
        let value = pair[1].trim();
        match key.as_str() {
            NAME => value.clone_into(&mut canonical),
            IP_ADDRESS => match value.parse::<IpAddr>() {
                Ok(ip) => record.ip_address = Some(ip),
                Err(_) if value.is_empty() => {}
                Err(_) => {
                    warn!(value, "unparseable address in search results");
                    record.extra.insert(key, value.to_owned());
                }
            },
            MAC_ADDRESS => record.mac_address = optional(value),
            TTL => record.ttl = parse_ttl(value),
            DHCP_PROFILE => {
                record.dhcp_profile = optional(value).filter(|v| v != NO_PROFILE);
            }
            MACHINE_INFO => {
                if !value.is_empty() {
                    value.clone_into(&mut record.device_type);
                }
            }
            COMMENT => record.comment = optional(value),
            RESPONSIBLE_NAME => record.owner_name = optional(value),
            RESPONSIBLE_MAIL => record.owner_mail = optional(value),
            SMTP_EMIT_RIGHT => record.smtp_allowed = value == "Yes",
            ALIASES => record.aliases = split_list(value),
            ALLOWED_GROUPS => record.allowed_groups = split_list(value),
            _ => {
                record.extra.insert(key, value.to_owned());
            }
        }
    }

    let query_domain = split_fqdn(queried).map(|(_, d)| d).unwrap_or_default();
    let qualified = split_fqdn(&canonical)
        .ok()
        .map(|(name, domain)| (name.to_owned(), domain.to_owned()));
    if let Some((name, domain)) = qualified {
        record.name = name;
        record.domain = domain;
    } else {
        record.name = canonical;
        query_domain.clone_into(&mut record.domain);
    }

    // An address query has no name to compare against.
    record.is_alias = !check_ip(queried) && !record.fqdn().eq_ignore_ascii_case(queried);
    record
}

/// Re-encode a record as the label/value cell sequence of a results page.
///
/// Decoding the output with the same query reproduces the record.
pub fn record_to_cells(record: &HostRecord) -> Vec<String> {
    let mut cells = Vec::new();
    let mut row = |label: &str, value: String| {
        cells.push(label.to_owned());
        cells.push(value);
    };

    row("Name", record.fqdn());
    row(
        "IP address",
        record.ip_address.map(|ip| ip.to_string()).unwrap_or_default(),
    );
    row("MAC address", record.mac_address.clone().unwrap_or_default());
    row("TTL", record.ttl.to_string());
    row(
        "DHCP profile",
        record
            .dhcp_profile
            .clone()
            .unwrap_or_else(|| NO_PROFILE.to_owned()),
    );
    row("Machine info", record.device_type.clone());
    row("Comment", record.comment.clone().unwrap_or_default());
    row("Responsible (name)", record.owner_name.clone().unwrap_or_default());
    row("Responsible (mail)", record.owner_mail.clone().unwrap_or_default());
    row(
        "SMTP emit right",
        if record.smtp_allowed { "Yes" } else { "No" }.to_owned(),
    );
    row("Aliases", record.aliases.join(" "));
    row("Allowed groups", record.allowed_groups.join(" "));
    for (key, value) in &record.extra {
        row(key.as_str(), value.clone());
    }
    cells
}

fn optional(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_owned())
}

fn parse_ttl(value: &str) -> u32 {
    if value.is_empty() {
        return 0;
    }
    value.parse().unwrap_or_else(|_| {
        warn!(value, "non-numeric TTL in search results, using 0");
        0
    })
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(LIST_SEPARATOR)
        .filter(|v| !v.is_empty())
        .map(String::from)
        .collect()
}
