// Host name helpers
//
// Netmagis addresses every record as a (name, domain) pair rather than a
// fully-qualified name, so the client splits at the first dot.

use std::net::IpAddr;

use crate::error::Error;

/// Split a FQDN into its first label and the remaining domain.
///
/// `"www.example.com"` becomes `("www", "example.com")`. Names without a
/// dot, or with an empty label on either side, are refused.
pub fn split_fqdn(fqdn: &str) -> Result<(&str, &str), Error> {
    match fqdn.split_once('.') {
        Some((name, domain)) if !name.is_empty() && !domain.is_empty() => Ok((name, domain)),
        _ => Err(Error::InvalidFqdn {
            value: fqdn.to_owned(),
        }),
    }
}

/// Whether `host` parses as an IPv4 or IPv6 address.
pub fn check_ip(host: &str) -> bool {
    host.parse::<IpAddr>().is_ok()
}
