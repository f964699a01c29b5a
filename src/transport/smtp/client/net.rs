use std::{
    fmt, io, mem,
    net::{Shutdown, SocketAddr, TcpStream},
    time::Duration,
};

use native_tls::{TlsConnector, TlsStream};

#[cfg(test)]
use super::mock::MockStream;
use crate::transport::smtp::error::{self, Error};

/// Parameters to use for secure clients
#[derive(Clone)]
pub struct TlsParameters {
    connector: TlsConnector,
    /// The domain name which is expected in the TLS certificate from the server
    domain: String,
}

impl TlsParameters {
    /// Default verification against the platform trust store, for `domain`
    pub fn new(domain: String) -> Result<Self, Error> {
        let connector = TlsConnector::new().map_err(error::tls)?;
        Ok(Self { connector, domain })
    }

    /// The domain name which is expected in the TLS certificate from the server
    pub fn domain(&self) -> &str {
        &self.domain
    }
}

impl fmt::Debug for TlsParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TlsParameters")
            .field("domain", &self.domain)
            .finish_non_exhaustive()
    }
}

/// A network stream
pub struct NetworkStream {
    inner: InnerNetworkStream,
}

/// Represents the different types of underlying network streams
#[allow(clippy::large_enum_variant)]
enum InnerNetworkStream {
    /// Plain TCP stream
    Tcp(TcpStream),
    /// Encrypted TCP stream
    NativeTls(TlsStream<TcpStream>),
    /// Mock stream
    #[cfg(test)]
    Mock(MockStream),
    /// Only used while upgrading the connection
    None,
}

impl NetworkStream {
    fn new(inner: InnerNetworkStream) -> Self {
        NetworkStream { inner }
    }

    /// Creates a stream backed by an in-memory script
    #[cfg(test)]
    pub(crate) fn mock(stream: MockStream) -> Self {
        Self::new(InnerNetworkStream::Mock(stream))
    }

    /// Returns peer's address
    pub fn peer_addr(&self) -> io::Result<SocketAddr> {
        match self.inner {
            InnerNetworkStream::Tcp(ref s) => s.peer_addr(),
            InnerNetworkStream::NativeTls(ref s) => s.get_ref().peer_addr(),
            #[cfg(test)]
            InnerNetworkStream::Mock(_) => Ok(SocketAddr::from(([127, 0, 0, 1], 25))),
            InnerNetworkStream::None => Err(not_connected()),
        }
    }

    /// Shutdowns the connection
    pub fn shutdown(&mut self, how: Shutdown) -> io::Result<()> {
        match self.inner {
            InnerNetworkStream::Tcp(ref s) => s.shutdown(how),
            InnerNetworkStream::NativeTls(ref mut s) => {
                // the close_notify is best effort, the socket is closed regardless
                let _ = s.shutdown();
                s.get_ref().shutdown(how)
            }
            #[cfg(test)]
            InnerNetworkStream::Mock(_) => Ok(()),
            InnerNetworkStream::None => Ok(()),
        }
    }

    /// Connects to the first address of `addresses` that accepts a connection
    pub fn connect(addresses: &[SocketAddr], timeout: Option<Duration>) -> Result<Self, Error> {
        let mut last_err = None;

        for addr in addresses {
            let result = match timeout {
                Some(timeout) => TcpStream::connect_timeout(addr, timeout),
                None => TcpStream::connect(addr),
            };
            match result {
                Ok(stream) => {
                    tracing::debug!("connected to {addr}");
                    return Ok(NetworkStream::new(InnerNetworkStream::Tcp(stream)));
                }
                Err(err) => {
                    tracing::debug!("could not connect to {addr}: {err}");
                    last_err = Some(err);
                }
            }
        }

        Err(match last_err {
            Some(last_err) => error::connection(last_err),
            None => error::connection("could not connect to any of the resolved addresses"),
        })
    }

    /// Runs the TLS handshake over the current plain connection
    pub fn upgrade_tls(&mut self, tls_parameters: &TlsParameters) -> Result<(), Error> {
        self.inner = match mem::replace(&mut self.inner, InnerNetworkStream::None) {
            InnerNetworkStream::Tcp(tcp_stream) => {
                let stream = tls_parameters
                    .connector
                    .connect(tls_parameters.domain(), tcp_stream)
                    .map_err(error::tls)?;
                InnerNetworkStream::NativeTls(stream)
            }
            #[cfg(test)]
            InnerNetworkStream::Mock(_) => {
                return Err(error::tls("a mock stream cannot be encrypted"));
            }
            already_encrypted => already_encrypted,
        };

        Ok(())
    }

    /// Tells if the stream is encrypted
    pub fn is_encrypted(&self) -> bool {
        matches!(self.inner, InnerNetworkStream::NativeTls(_))
    }

    /// Set read timeout for IO calls
    pub fn set_read_timeout(&mut self, duration: Option<Duration>) -> io::Result<()> {
        match self.inner {
            InnerNetworkStream::Tcp(ref mut stream) => stream.set_read_timeout(duration),
            InnerNetworkStream::NativeTls(ref mut stream) => {
                stream.get_ref().set_read_timeout(duration)
            }
            #[cfg(test)]
            InnerNetworkStream::Mock(_) => Ok(()),
            InnerNetworkStream::None => Err(not_connected()),
        }
    }

    /// Set write timeout for IO calls
    pub fn set_write_timeout(&mut self, duration: Option<Duration>) -> io::Result<()> {
        match self.inner {
            InnerNetworkStream::Tcp(ref mut stream) => stream.set_write_timeout(duration),
            InnerNetworkStream::NativeTls(ref mut stream) => {
                stream.get_ref().set_write_timeout(duration)
            }
            #[cfg(test)]
            InnerNetworkStream::Mock(_) => Ok(()),
            InnerNetworkStream::None => Err(not_connected()),
        }
    }
}

impl fmt::Debug for NetworkStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NetworkStream")
            .field("encrypted", &self.is_encrypted())
            .finish_non_exhaustive()
    }
}

impl io::Read for NetworkStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.inner {
            InnerNetworkStream::Tcp(ref mut s) => s.read(buf),
            InnerNetworkStream::NativeTls(ref mut s) => s.read(buf),
            #[cfg(test)]
            InnerNetworkStream::Mock(ref mut s) => s.read(buf),
            InnerNetworkStream::None => Err(not_connected()),
        }
    }
}

impl io::Write for NetworkStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.inner {
            InnerNetworkStream::Tcp(ref mut s) => s.write(buf),
            InnerNetworkStream::NativeTls(ref mut s) => s.write(buf),
            #[cfg(test)]
            InnerNetworkStream::Mock(ref mut s) => s.write(buf),
            InnerNetworkStream::None => Err(not_connected()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.inner {
            InnerNetworkStream::Tcp(ref mut s) => s.flush(),
            InnerNetworkStream::NativeTls(ref mut s) => s.flush(),
            #[cfg(test)]
            InnerNetworkStream::Mock(ref mut s) => s.flush(),
            InnerNetworkStream::None => Ok(()),
        }
    }
}

fn not_connected() -> io::Error {
    io::Error::new(io::ErrorKind::NotConnected, "the stream is not connected")
}
