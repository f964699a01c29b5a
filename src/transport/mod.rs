//! ### Sending Messages
//!
//! A transport takes a formatted email and its envelope and hands them over.
//!
//! The following transports are available:
//!
//! * The [`SmtpTransport`](smtp::SmtpTransport) uses the SMTP protocol to send
//!   the message over the network, always upgrading the connection with
//!   STARTTLS before logging in.
//! * The [`StubTransport`](stub::StubTransport) records the messages it is
//!   given and answers with a fixed result. It is used to test code sending
//!   emails without a server.

use crate::{Envelope, Message};

pub mod smtp;
pub mod stub;

/// Blocking Transport method for emails
pub trait Transport {
    /// Response produced by the Transport
    type Ok;
    /// Error produced by the Transport
    type Error;

    /// Sends the email
    fn send(&self, message: &Message) -> Result<Self::Ok, Self::Error> {
        let raw = message.formatted();
        self.send_raw(message.envelope(), &raw)
    }

    /// Sends an already formatted email to the recipients of `envelope`
    fn send_raw(&self, envelope: &Envelope, email: &[u8]) -> Result<Self::Ok, Self::Error>;
}
