//! The SMTP transport sends emails using the SMTP protocol.
//!
//! It follows [RFC 5321](https://tools.ietf.org/html/rfc5321) with a fixed
//! security policy: the session is always upgraded with
//! [STARTTLS](https://tools.ietf.org/html/rfc2487) before logging in, and the
//! certificate is checked against the system trust store for the configured
//! host name. A server that does not offer STARTTLS is an error, so no
//! credentials are ever sent in clear text.
//!
//! The supported SASL mechanisms are `PLAIN` and `LOGIN`.
//!
//! #### Session
//!
//! ```text
//! resolve ─► connect ─► EHLO ─► STARTTLS ─► EHLO ─► AUTH ─► MAIL/RCPT/DATA ─► QUIT
//! ```
//!
//! The host name is resolved before any socket is opened, so an unknown host
//! is reported as [`Error::is_resolution`] and never as a connection error.
//!
//! ```rust,no_run
//! use attachmail::{
//!     transport::smtp::{authentication::Credentials, SmtpTransport},
//!     Envelope, Transport,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let credentials = Credentials::new("bot@example.com".to_owned(), "hunter2".to_owned());
//! let transport = SmtpTransport::starttls_relay("smtp.example.com", credentials)
//!     .port(587)
//!     .build();
//!
//! let envelope = Envelope::new(
//!     "bot@example.com".to_owned(),
//!     vec!["user@example.com".to_owned()],
//! )?;
//! transport.send_raw(&envelope, b"Subject: Hello\r\n\r\nHi!\r\n")?;
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

pub use self::{
    error::Error,
    transport::{SmtpTransport, SmtpTransportBuilder},
};
use crate::transport::smtp::{
    authentication::{Credentials, Mechanism, DEFAULT_MECHANISMS},
    extension::ClientId,
};

pub mod authentication;
pub mod client;
pub mod commands;
pub mod error;
pub mod extension;
pub mod response;
mod transport;

/// Default submission port, used with STARTTLS
pub const SUBMISSION_PORT: u16 = 587;

/// Default timeout
pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Clone, Debug)]
struct SmtpInfo {
    /// Name sent during EHLO
    hello_name: ClientId,
    /// Server we are connecting to
    server: String,
    /// Port to connect to
    port: u16,
    /// Credentials
    credentials: Credentials,
    /// Accepted authentication mechanisms, in order of preference
    authentication: Vec<Mechanism>,
    /// Connect, read and write timeout
    timeout: Option<Duration>,
}

impl SmtpInfo {
    fn new(server: String, credentials: Credentials) -> Self {
        Self {
            server,
            port: SUBMISSION_PORT,
            hello_name: ClientId::default(),
            credentials,
            authentication: DEFAULT_MECHANISMS.into(),
            timeout: Some(DEFAULT_TIMEOUT),
        }
    }
}
