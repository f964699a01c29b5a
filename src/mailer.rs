//! Drives one send: read the attachment, compose, deliver
//!
//! ```rust
//! use attachmail::{Config, Mailer, StubTransport};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! # let dir = tempfile::tempdir()?;
//! # let attachment = dir.path().join("report.txt");
//! # std::fs::write(&attachment, b"hello")?;
//! let config = Config::from_ini_str(&format!(
//!     "[Email]
//! SENDER_EMAIL = bot@example.com
//! TO_EMAILS = user@example.com
//! PASSWORD = hunter2
//! SUBJECT = Report
//! BODY = See attached.
//! [File]
//! FILENAME = {}
//! [SMTP]
//! HOST = smtp.example.com
//! PORT = 587",
//!     attachment.display()
//! ))?;
//!
//! let mailer = Mailer::new(StubTransport::new_ok());
//! mailer.send(&config)?;
//! assert_eq!(mailer.transport().messages().len(), 1);
//! # Ok(())
//! # }
//! ```

use crate::{
    message::{self, Attachment},
    transport::smtp::{extension::ClientId, SmtpTransport},
    Config, Error, Transport,
};

/// Sends the email described by a [`Config`] through a [`Transport`]
#[derive(Debug, Clone)]
pub struct Mailer<T> {
    transport: T,
}

impl<T> Mailer<T>
where
    T: Transport,
    T::Error: Into<Error>,
{
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Reads the attachment, composes the message and hands it to the transport
    ///
    /// Nothing is retried. Every error has already been logged when it is returned.
    pub fn send(&self, config: &Config) -> Result<(), Error> {
        tracing::info!("Preparing to send email...");
        tracing::info!("Sender: {}", config.sender());
        tracing::info!("To: {}", config.to().join(", "));
        tracing::info!("Cc: {}", config.cc().join(", "));
        tracing::info!("Subject: {}", config.subject());
        tracing::info!("Attachment: {}", config.attachment());

        let result = self.compose_and_deliver(config);
        match &result {
            Ok(()) => tracing::info!("Email sent successfully!"),
            Err(err) => tracing::error!("An error occurred while sending the email: {err}"),
        }
        tracing::info!("Email sending process completed");

        result
    }

    fn compose_and_deliver(&self, config: &Config) -> Result<(), Error> {
        tracing::debug!("state: composing");
        let attachment = Attachment::read(config.attachment())?;
        let message = message::compose(config, attachment)?;
        let raw = message.formatted();
        tracing::debug!("message composed ({} bytes)", raw.len());

        tracing::debug!("state: delivering");
        self.transport
            .send_raw(message.envelope(), &raw)
            .map_err(Into::into)?;
        tracing::debug!("state: closed");

        Ok(())
    }
}

/// Sends the email described by `config` over SMTP with STARTTLS
///
/// The sender address and the password are the login credentials.
pub fn send(config: &Config) -> Result<(), Error> {
    let smtp = config.smtp();
    let mut builder = SmtpTransport::starttls_relay(
        smtp.host(),
        (config.sender(), config.password()).into(),
    )
    .port(smtp.port());
    if let Some(timeout) = smtp.timeout() {
        builder = builder.timeout(Some(timeout));
    }
    if let Some(name) = smtp.hello_name() {
        builder = builder.hello_name(ClientId::Domain(name.to_owned()));
    }

    Mailer::new(builder.build()).send(config)
}

#[cfg(test)]
mod test {
    use std::io::Write;

    use super::*;
    use crate::StubTransport;

    fn config(attachment: &str, cc: &str) -> Config {
        Config::from_ini_str(&format!(
            "[Email]
SENDER_EMAIL = bot@example.com
TO_EMAILS = user@example.com
CC_EMAILS = {cc}
PASSWORD = hunter2
SUBJECT = Report
BODY = See attached.

[File]
FILENAME = {attachment}

[SMTP]
HOST = smtp.example.invalid
PORT = 587
"
        ))
        .unwrap()
    }

    #[test]
    fn sends_through_transport() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"hello").unwrap();
        let path = file.path().to_str().unwrap();

        let mailer = Mailer::new(StubTransport::new_ok());
        mailer.send(&config(path, "boss@example.com")).unwrap();

        let messages = mailer.transport().messages();
        assert_eq!(messages.len(), 1);
        let (envelope, raw) = &messages[0];
        assert_eq!(envelope.from(), "bot@example.com");
        assert_eq!(envelope.to(), ["user@example.com", "boss@example.com"]);
        assert!(raw.contains("Cc: boss@example.com\r\n"));
        assert!(raw.contains("aGVsbG8=\r\n"));
    }

    #[test]
    fn unreadable_attachment_sends_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.txt");

        let mailer = Mailer::new(StubTransport::new_ok());
        let err = mailer
            .send(&config(path.to_str().unwrap(), ""))
            .unwrap_err();

        assert!(err.is_attachment_read());
        assert!(mailer.transport().messages().is_empty());
    }

    #[test]
    fn transport_error_is_delivery() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"hello").unwrap();

        let mailer = Mailer::new(StubTransport::new_error());
        let err = mailer
            .send(&config(file.path().to_str().unwrap(), ""))
            .unwrap_err();

        assert!(err.is_delivery());
        assert_eq!(mailer.transport().messages().len(), 1);
    }

    #[test]
    fn unresolvable_host() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"hello").unwrap();

        let err = send(&config(file.path().to_str().unwrap(), "")).unwrap_err();
        assert!(err.is_host_resolution(), "{err:?}");
    }
}
