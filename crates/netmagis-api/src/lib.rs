// netmagis-api: Async Rust client for the Netmagis DNS/IP management web application
//
// Netmagis has no API, so the client drives its HTML forms: a CAS login
// handshake, form POSTs classified from their HTML answers, and decoding
// of the search table and edit form into typed host records.

pub mod client;
pub mod decode;
pub mod error;
mod hosts;
pub mod markers;
pub mod model;
pub mod names;
pub mod session;
pub mod transport;

pub use client::{ClassifiedResponse, Client};
pub use error::{AuthError, Error};
pub use model::{DEFAULT_DEVICE_TYPE, HostForm, HostOptions, HostRecord, NO_DHCP_PROFILE};
pub use names::{check_ip, split_fqdn};
pub use session::HandshakeStage;
pub use transport::{Page, TlsMode, Transport, TransportConfig};
