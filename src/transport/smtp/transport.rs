use std::{
    net::{SocketAddr, ToSocketAddrs},
    time::Duration,
};

use super::{
    client::{SmtpConnection, TlsParameters},
    error, ClientId, Credentials, Error, Mechanism, SmtpInfo,
};
use crate::{address::Envelope, transport::smtp::response::Response, Transport};

/// Sends emails using the SMTP protocol, one connection per email
#[derive(Debug, Clone)]
pub struct SmtpTransport {
    info: SmtpInfo,
}

impl Transport for SmtpTransport {
    type Ok = Response;
    type Error = Error;

    /// Resolves the server, then runs a complete session for one email
    fn send_raw(&self, envelope: &Envelope, email: &[u8]) -> Result<Self::Ok, Self::Error> {
        let addresses = self.resolve()?;
        let mut conn = self.connection(&addresses)?;

        tracing::debug!("sending to {} recipient(s)", envelope.to().len());
        let result = match conn.send(envelope, email) {
            Ok(result) => result,
            Err(err) => {
                conn.abort();
                return Err(err);
            }
        };

        // the message is accepted at this point, a failed QUIT does not change that
        if let Err(err) = conn.quit() {
            tracing::warn!("QUIT failed after the message was accepted: {err}");
        }
        conn.abort();
        tracing::debug!("connection closed");

        Ok(result)
    }
}

impl SmtpTransport {
    /// Secure transport, using STARTTLS to obtain encrypted connections
    ///
    /// Connects to the submission port by default, with an unencrypted
    /// connection which is then upgraded with STARTTLS. The server name is used
    /// to validate its TLS certificate.
    ///
    /// An error is returned if the connection can't be upgraded. No credentials
    /// or emails will be sent to the server, protecting from downgrade attacks.
    pub fn starttls_relay<T: Into<String>>(
        server: T,
        credentials: Credentials,
    ) -> SmtpTransportBuilder {
        SmtpTransportBuilder {
            info: SmtpInfo::new(server.into(), credentials),
        }
    }

    /// The server host name
    pub fn server(&self) -> &str {
        &self.info.server
    }

    /// The server port
    pub fn port(&self) -> u16 {
        self.info.port
    }

    /// Looks up the addresses of the server
    ///
    /// Runs before any socket is opened.
    fn resolve(&self) -> Result<Vec<SocketAddr>, Error> {
        let server = self.info.server.as_str();
        tracing::info!(
            "Attempting to connect to SMTP server {server}:{}",
            self.info.port
        );

        let addresses = match (server, self.info.port).to_socket_addrs() {
            Ok(addresses) => addresses.collect::<Vec<_>>(),
            Err(err) => {
                tracing::error!("Failed to resolve server {server}: {err}");
                return Err(error::resolution(server, err));
            }
        };

        let Some(address) = addresses.first() else {
            tracing::error!("Failed to resolve server {server}: no address found");
            return Err(error::resolution(server, "no address found"));
        };
        tracing::info!("Successfully resolved server to {}", address.ip());

        Ok(addresses)
    }

    /// Creates a new connection directly usable to send emails
    ///
    /// Handles encryption and authentication
    fn connection(&self, addresses: &[SocketAddr]) -> Result<SmtpConnection, Error> {
        let mut conn =
            SmtpConnection::connect(addresses, self.info.timeout, &self.info.hello_name)?;
        tracing::info!("Connected to SMTP server");

        match self.secure_and_login(&mut conn) {
            Ok(()) => Ok(conn),
            Err(err) => {
                conn.abort();
                Err(err)
            }
        }
    }

    fn secure_and_login(&self, conn: &mut SmtpConnection) -> Result<(), Error> {
        tracing::debug!("negotiating TLS");
        let tls_parameters = TlsParameters::new(self.info.server.clone())?;
        conn.starttls(&tls_parameters, &self.info.hello_name)?;

        tracing::debug!("authenticating");
        conn.auth(&self.info.authentication, &self.info.credentials)?;
        tracing::info!("Logged in successfully");

        Ok(())
    }
}

/// Contains client configuration.
/// Instances of this struct can be created using functions of [`SmtpTransport`].
#[derive(Debug, Clone)]
pub struct SmtpTransportBuilder {
    info: SmtpInfo,
}

impl SmtpTransportBuilder {
    /// Set the name used during EHLO
    pub fn hello_name(mut self, name: ClientId) -> Self {
        self.info.hello_name = name;
        self
    }

    /// Set the authentication mechanisms to try, in order
    pub fn authentication(mut self, mechanisms: Vec<Mechanism>) -> Self {
        self.info.authentication = mechanisms;
        self
    }

    /// Set the timeout duration
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.info.timeout = timeout;
        self
    }

    /// Set the port to use
    pub fn port(mut self, port: u16) -> Self {
        self.info.port = port;
        self
    }

    /// Build the transport
    pub fn build(self) -> SmtpTransport {
        SmtpTransport { info: self.info }
    }
}
