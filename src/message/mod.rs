//! Composes the email: headers, a text part and one attachment part
//!
//! Composition never touches the network and never reads files, so it can be
//! checked byte for byte.
//!
//! ```rust
//! use attachmail::message::{Attachment, Message, MultiPart, SinglePart};
//!
//! # use std::error::Error;
//! # fn main() -> Result<(), Box<dyn Error>> {
//! let attachment = Attachment::new("report.txt".to_owned(), b"hello".to_vec());
//! let m = Message::builder()
//!     .from("bot@example.com".to_owned())
//!     .to(vec!["user@example.com".to_owned()])
//!     .subject("Report")
//!     .multipart(
//!         MultiPart::mixed()
//!             .singlepart(SinglePart::plain(String::from("See attached.")))
//!             .singlepart(attachment.into_part()),
//!     )?;
//! # Ok(())
//! # }
//! ```
//!
//! Which produces:
//!
//! ```sh
//! From: bot@example.com
//! To: user@example.com
//! Subject: Report
//! Date: Sat, 12 Dec 2020 16:33:19 -0000
//! MIME-Version: 1.0
//! Content-Type: multipart/mixed; boundary="0oS2k8wLiNzT4pD3bqJYHX7e6FRsuZmEVEvh1a5c"
//!
//! --0oS2k8wLiNzT4pD3bqJYHX7e6FRsuZmEVEvh1a5c
//! Content-Type: text/plain; charset=utf-8
//! Content-Transfer-Encoding: 7bit
//!
//! See attached.
//! --0oS2k8wLiNzT4pD3bqJYHX7e6FRsuZmEVEvh1a5c
//! Content-Type: application/octet-stream
//! Content-Disposition: attachment; filename=report.txt
//! Content-Transfer-Encoding: base64
//!
//! aGVsbG8=
//! --0oS2k8wLiNzT4pD3bqJYHX7e6FRsuZmEVEvh1a5c--
//! ```

use std::io::Write;

pub use attachment::Attachment;
pub use body::Body;
pub use mimebody::{MultiPart, SinglePart, SinglePartBuilder};

use crate::{
    message::header::{Cc, Date, Headers, MimeVersion, Subject, To},
    Config, Envelope, Error,
};

mod attachment;
mod body;
pub mod header;
mod mimebody;

pub(crate) trait EmailFormat {
    fn format(&self, out: &mut Vec<u8>);
}

/// A builder for messages
#[derive(Debug, Clone, Default)]
pub struct MessageBuilder {
    headers: Headers,
    from: Option<String>,
    recipients: Vec<String>,
    envelope: Option<Envelope>,
}

impl MessageBuilder {
    /// Creates a new default message builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `Date` header to the given value
    pub fn date(mut self, date: Date) -> Self {
        self.headers.set(date);
        self
    }

    /// Set `Date` header to the current time
    pub fn date_now(self) -> Self {
        self.date(Date::now())
    }

    /// Set `Subject` header to message
    pub fn subject<S: Into<String>>(mut self, subject: S) -> Self {
        self.headers.set(Subject::new(subject));
        self
    }

    /// Set `From` header, also the envelope sender
    pub fn from(mut self, address: String) -> Self {
        self.headers.set(header::From::new(vec![address.clone()]));
        self.from = Some(address);
        self
    }

    /// Set `To` header, also added to the envelope recipients
    pub fn to(mut self, addresses: Vec<String>) -> Self {
        self.recipients.extend(addresses.iter().cloned());
        self.headers.set(To::new(addresses));
        self
    }

    /// Set `Cc` header, also added to the envelope recipients
    ///
    /// Nothing is set when `addresses` is empty.
    pub fn cc(mut self, addresses: Vec<String>) -> Self {
        if addresses.is_empty() {
            return self;
        }

        self.recipients.extend(addresses.iter().cloned());
        self.headers.set(Cc::new(addresses));
        self
    }

    /// Force specific envelope (by default it is derived from headers)
    pub fn envelope(mut self, envelope: Envelope) -> Self {
        self.envelope = Some(envelope);
        self
    }

    /// Create message using a `multipart/mixed` body
    pub fn multipart(mut self, part: MultiPart) -> Result<Message, Error> {
        // https://tools.ietf.org/html/rfc5322#section-3.6
        if self.headers.get_raw("Date").is_none() {
            self = self.date_now();
        }
        self.headers.set(MimeVersion::VERSION_1_0);

        let envelope = match self.envelope {
            Some(envelope) => envelope,
            None => {
                let from = self
                    .from
                    .ok_or_else(|| Error::malformed("the message has no sender"))?;
                Envelope::new(from, self.recipients)?
            }
        };

        Ok(Message {
            headers: self.headers,
            body: part,
            envelope,
        })
    }
}

/// Email message which can be formatted
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    headers: Headers,
    body: MultiPart,
    envelope: Envelope,
}

impl Message {
    /// Create a new message builder without headers
    pub fn builder() -> MessageBuilder {
        MessageBuilder::new()
    }

    /// Get the headers from the Message
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Get the `multipart/mixed` body
    pub fn body(&self) -> &MultiPart {
        &self.body
    }

    /// Get `Message` envelope
    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    /// Get message content formatted for SMTP
    pub fn formatted(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.format(&mut out);
        out
    }
}

impl EmailFormat for Message {
    fn format(&self, out: &mut Vec<u8>) {
        write!(out, "{}", self.headers)
            .expect("A Write implementation panicked while formatting headers");
        self.body.format(out);
    }
}

/// Builds the message described by `config`, carrying `attachment`
///
/// The envelope lists the `To` recipients followed by the `Cc` ones.
pub fn compose(config: &Config, attachment: Attachment) -> Result<Message, Error> {
    let body = MultiPart::mixed().singlepart(SinglePart::plain(config.body().to_owned()));
    tracing::debug!("Email body attached");

    let filename = attachment.filename().to_owned();
    let body = body.singlepart(attachment.into_part());
    tracing::debug!("Attachment {filename} added");

    Message::builder()
        .from(config.sender().to_owned())
        .to(config.to().to_vec())
        .cc(config.cc().to_vec())
        .subject(config.subject())
        .multipart(body)
}
