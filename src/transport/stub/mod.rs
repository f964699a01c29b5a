//! The stub transport logs message envelopes as well as contents. It can be
//! useful for testing purposes.
//!
//! ```rust
//! use attachmail::{Envelope, StubTransport, Transport};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let envelope = Envelope::new(
//!     "bot@example.com".to_owned(),
//!     vec!["user@example.com".to_owned()],
//! )?;
//!
//! let sender = StubTransport::new_ok();
//! sender.send_raw(&envelope, b"Subject: Hello\r\n\r\nHi!\r\n")?;
//! assert_eq!(sender.messages().len(), 1);
//! # Ok(())
//! # }
//! ```

use std::{
    error::Error as StdError,
    fmt,
    sync::{Arc, Mutex, PoisonError},
};

use crate::{address::Envelope, Transport};

/// An error returned by the stub transport
#[derive(Debug, Copy, Clone)]
#[non_exhaustive]
pub struct Error;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("stub error")
    }
}

impl StdError for Error {}

/// This transport records the message envelope and content, and returns the
/// given response
#[derive(Debug, Clone)]
pub struct StubTransport {
    response: Result<(), Error>,
    message_log: Arc<Mutex<Vec<(Envelope, String)>>>,
}

impl StubTransport {
    /// Creates a new transport that always returns the given response
    pub fn new(response: Result<(), Error>) -> StubTransport {
        StubTransport {
            response,
            message_log: Arc::new(Mutex::new(vec![])),
        }
    }

    /// Creates a new transport that always returns a success response
    pub fn new_ok() -> StubTransport {
        Self::new(Ok(()))
    }

    /// Creates a new transport that always returns an error
    pub fn new_error() -> StubTransport {
        Self::new(Err(Error))
    }

    /// Return all logged messages sent using [`Transport::send_raw`]
    ///
    /// Clones of a transport share the same log.
    pub fn messages(&self) -> Vec<(Envelope, String)> {
        self.message_log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Transport for StubTransport {
    type Ok = ();
    type Error = Error;

    fn send_raw(&self, envelope: &Envelope, email: &[u8]) -> Result<Self::Ok, Self::Error> {
        tracing::debug!("stub transport: {} bytes for {:?}", email.len(), envelope.to());
        self.message_log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((envelope.clone(), String::from_utf8_lossy(email).into()));
        self.response
    }
}
