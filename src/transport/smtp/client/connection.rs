use std::{
    fmt::Display,
    io::{self, BufRead, BufReader, Write},
    net::{Shutdown, SocketAddr},
    time::Duration,
};

use super::{escape_crlf, ClientCodec, NetworkStream, TlsParameters};
use crate::{
    address::Envelope,
    transport::smtp::{
        authentication::{Credentials, Mechanism},
        commands::{Auth, Data, Ehlo, Mail, Quit, Rcpt, Starttls},
        error::{self, Error},
        extension::{ClientId, Extension, MailParameter, ServerInfo},
        response::{parse_response, Response},
    },
};

/// Maximum number of AUTH challenges answered before giving up
const MAX_CHALLENGES: u8 = 10;

/// Structure that implements the SMTP client
pub struct SmtpConnection {
    /// TCP stream between client and server
    stream: BufReader<NetworkStream>,
    /// Set once the stream failed or the server sent garbage
    broken: bool,
    /// Whether QUIT has been sent
    sent_quit: bool,
    /// Information about the server
    server_info: ServerInfo,
}

impl SmtpConnection {
    /// Get information about the server
    pub fn server_info(&self) -> &ServerInfo {
        &self.server_info
    }

    /// Connects to the first reachable address of `addresses`
    ///
    /// Reads the greeting, then sends EHLO and parses server information
    pub fn connect(
        addresses: &[SocketAddr],
        timeout: Option<Duration>,
        hello_name: &ClientId,
    ) -> Result<SmtpConnection, Error> {
        let stream = NetworkStream::connect(addresses, timeout)?;
        Self::from_stream(stream, timeout, hello_name)
    }

    fn from_stream(
        stream: NetworkStream,
        timeout: Option<Duration>,
        hello_name: &ClientId,
    ) -> Result<SmtpConnection, Error> {
        let mut conn = SmtpConnection {
            stream: BufReader::new(stream),
            broken: false,
            sent_quit: false,
            server_info: ServerInfo::default(),
        };
        conn.set_timeout(timeout).map_err(error::network)?;

        let greeting = conn.read_response()?;
        tracing::debug!("greeting: {}", greeting.first_line().unwrap_or_default());

        if let Err(err) = conn.ehlo(hello_name) {
            conn.abort();
            return Err(err);
        }

        tracing::debug!("server {}", conn.server_info);
        Ok(conn)
    }

    /// Submits `email` to every recipient of `envelope`
    pub fn send(&mut self, envelope: &Envelope, email: &[u8]) -> Result<Response, Error> {
        // Mail
        let mut mail_options = vec![];

        // Internationalization handling
        //
        // * 8BITMIME: https://tools.ietf.org/html/rfc6152
        // * SMTPUTF8: https://tools.ietf.org/html/rfc6531

        // Check for non-ascii addresses and use the SMTPUTF8 option if any.
        if envelope.has_non_ascii_addresses() {
            if !self.server_info().supports_feature(Extension::SmtpUtfEight) {
                // don't try to send non-ascii addresses (per RFC)
                return Err(error::client(
                    "Envelope contains non-ascii chars but server does not support SMTPUTF8",
                ));
            }
            mail_options.push(MailParameter::SmtpUtfEight);
        }

        // Check for non-ascii content in the message
        if !email.is_ascii() {
            if !self.server_info().supports_feature(Extension::EightBitMime) {
                return Err(error::client(
                    "Message contains non-ascii chars but server does not support 8BITMIME",
                ));
            }
            mail_options.push(MailParameter::EightBitMime);
        }

        self.command(Mail::new(envelope.from().to_owned(), mail_options))?;

        // Recipient
        for to_address in envelope.to() {
            self.command(Rcpt::new(to_address.clone()))?;
        }

        // Data
        self.command(Data)?;

        // Message content
        self.message(email)
    }

    /// Tells if the connection can no longer be used
    pub fn has_broken(&self) -> bool {
        self.sent_quit || self.broken
    }

    /// Upgrades the connection with STARTTLS, then greets the server again
    ///
    /// Fails without sending anything when the server does not offer
    /// STARTTLS: credentials never travel in clear text.
    pub fn starttls(
        &mut self,
        tls_parameters: &TlsParameters,
        hello_name: &ClientId,
    ) -> Result<(), Error> {
        if !self.server_info.supports_feature(Extension::StartTls) {
            return Err(error::client("STARTTLS is not supported on this server"));
        }

        self.command(Starttls)?;
        // anything already buffered arrived in clear text
        if !self.stream.buffer().is_empty() {
            self.broken = true;
            return Err(error::response("unexpected data after STARTTLS"));
        }
        if let Err(err) = self.stream.get_mut().upgrade_tls(tls_parameters) {
            self.broken = true;
            return Err(err);
        }
        tracing::debug!("connection encrypted");

        // Send EHLO again
        self.ehlo(hello_name)
    }

    /// Send EHLO and update server info
    fn ehlo(&mut self, hello_name: &ClientId) -> Result<(), Error> {
        let ehlo_response = self.command(Ehlo::new(hello_name.clone()))?;
        self.server_info = ServerInfo::from_response(&ehlo_response)?;
        Ok(())
    }

    pub fn quit(&mut self) -> Result<Response, Error> {
        self.sent_quit = true;
        self.command(Quit)
    }

    /// Sends QUIT if not done yet, then closes the socket
    ///
    /// Errors are ignored: this runs on paths that already failed.
    pub fn abort(&mut self) {
        if !self.sent_quit && !self.broken {
            let _ = self.quit();
        }

        if let Err(err) = self.stream.get_mut().shutdown(Shutdown::Both) {
            tracing::debug!("could not shut down the connection: {err}");
        }
    }

    /// Tells if the underlying stream is currently encrypted
    pub fn is_encrypted(&self) -> bool {
        self.stream.get_ref().is_encrypted()
    }

    /// Set timeout
    pub fn set_timeout(&mut self, duration: Option<Duration>) -> io::Result<()> {
        self.stream.get_mut().set_read_timeout(duration)?;
        self.stream.get_mut().set_write_timeout(duration)
    }

    /// Sends an AUTH command with the first mechanism of `mechanisms` the server
    /// supports, and handles the challenges if needed
    pub fn auth(
        &mut self,
        mechanisms: &[Mechanism],
        credentials: &Credentials,
    ) -> Result<Response, Error> {
        let mechanism = self
            .server_info
            .get_auth_mechanism(mechanisms)
            .ok_or_else(|| error::client("No compatible authentication mechanism was found"))?;
        tracing::debug!("authenticating as {} with {mechanism}", credentials.username());

        // Limit challenges to avoid blocking
        let mut challenges = MAX_CHALLENGES;
        let mut response = self.auth_command(Auth::new(mechanism, credentials)?)?;

        while challenges > 0 && response.has_code(334) {
            challenges -= 1;
            response =
                self.auth_command(Auth::new_from_response(mechanism, credentials, &response)?)?;
        }

        if response.has_code(334) {
            Err(error::response("Unexpected number of challenges"))
        } else {
            Ok(response)
        }
    }

    /// Sends the message content
    pub fn message(&mut self, message: &[u8]) -> Result<Response, Error> {
        let mut codec = ClientCodec::new();
        let mut out_buf = Vec::with_capacity(message.len());
        codec.encode(message, &mut out_buf);
        self.write_raw(out_buf.as_slice())?;
        tracing::debug!("Wrote: {} bytes of message data", out_buf.len());
        self.write(b"\r\n.\r\n")?;

        self.read_response()
    }

    /// Sends an SMTP command
    pub fn command<C: Display>(&mut self, command: C) -> Result<Response, Error> {
        self.write(command.to_string().as_bytes())?;
        self.read_response()
    }

    /// Sends AUTH data, which is kept out of the logs
    fn auth_command(&mut self, auth: Auth) -> Result<Response, Error> {
        self.write_raw(auth.to_string().as_bytes())?;
        tracing::debug!("Wrote: {auth:?}");
        self.read_response()
    }

    /// Writes a string to the server
    fn write(&mut self, string: &[u8]) -> Result<(), Error> {
        self.write_raw(string)?;
        tracing::debug!("Wrote: {}", escape_crlf(&String::from_utf8_lossy(string)));
        Ok(())
    }

    fn write_raw(&mut self, bytes: &[u8]) -> Result<(), Error> {
        if self.broken {
            return Err(error::client("Connection is broken"));
        }

        let stream = self.stream.get_mut();
        if let Err(err) = stream.write_all(bytes).and_then(|()| stream.flush()) {
            self.broken = true;
            return Err(error::network(err));
        }
        Ok(())
    }

    /// Gets the SMTP response
    pub fn read_response(&mut self) -> Result<Response, Error> {
        let mut buffer = String::with_capacity(100);

        loop {
            match self.stream.read_line(&mut buffer) {
                Ok(0) => break,
                Ok(_) => {}
                Err(err) => {
                    self.broken = true;
                    return Err(error::network(err));
                }
            }

            tracing::debug!("<< {}", escape_crlf(&buffer));
            match parse_response(&buffer) {
                Ok((_remaining, response)) => {
                    return if response.is_positive() {
                        Ok(response)
                    } else {
                        Err(error::code(
                            response.code(),
                            Some(response.message().collect()),
                        ))
                    };
                }
                Err(nom::Err::Incomplete(_)) => { /* read more */ }
                Err(nom::Err::Failure(e) | nom::Err::Error(e)) => {
                    self.broken = true;
                    return Err(error::response(e.to_string()));
                }
            }
        }

        self.broken = true;
        Err(error::response("incomplete response"))
    }
}
