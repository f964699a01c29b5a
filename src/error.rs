//! Error type returned by the loader and the mailer

use std::{
    error::Error as StdError,
    fmt::{self, Display, Formatter},
    io,
    path::PathBuf,
};

use crate::{
    transport::{smtp, stub},
    BoxError,
};

/// Everything that can go wrong between reading the configuration and
/// handing the message over to the SMTP server
///
/// Errors are never recovered from locally: each one is logged where it is
/// detected and then propagated unchanged to the caller.
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// No configuration file exists at the given path
    ConfigurationNotFound(PathBuf),
    /// The configuration file is unreadable, is not valid INI, misses a
    /// required key or holds a value of the wrong type
    ConfigurationMalformed(String),
    /// The attachment file could not be opened or read
    AttachmentRead {
        /// Path of the attachment, as configured
        path: PathBuf,
        /// Underlying i/o error
        source: io::Error,
    },
    /// The SMTP host name could not be resolved to any address
    HostResolution {
        /// Host name, as configured
        host: String,
        /// Underlying cause
        source: BoxError,
    },
    /// Connecting, negotiating TLS, authenticating or submitting failed
    Delivery(BoxError),
}

impl Error {
    pub(crate) fn malformed<S: Into<String>>(reason: S) -> Error {
        Error::ConfigurationMalformed(reason.into())
    }

    /// Returns true if the configuration file was missing
    pub fn is_configuration_not_found(&self) -> bool {
        matches!(self, Error::ConfigurationNotFound(_))
    }

    /// Returns true if the configuration file could not be turned into a [`Config`](crate::Config)
    pub fn is_configuration_malformed(&self) -> bool {
        matches!(self, Error::ConfigurationMalformed(_))
    }

    /// Returns true if the attachment could not be read
    pub fn is_attachment_read(&self) -> bool {
        matches!(self, Error::AttachmentRead { .. })
    }

    /// Returns true if the SMTP host could not be resolved
    pub fn is_host_resolution(&self) -> bool {
        matches!(self, Error::HostResolution { .. })
    }

    /// Returns true if the SMTP session failed
    pub fn is_delivery(&self) -> bool {
        matches!(self, Error::Delivery(_))
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Error::ConfigurationNotFound(path) => {
                write!(f, "configuration file {} not found", path.display())
            }
            Error::ConfigurationMalformed(reason) => {
                write!(f, "malformed configuration: {reason}")
            }
            Error::AttachmentRead { path, .. } => {
                write!(f, "failed to read attachment file {}", path.display())
            }
            Error::HostResolution { host, .. } => {
                write!(f, "failed to resolve SMTP server {host}")
            }
            Error::Delivery(e) => write!(f, "failed to deliver the email: {e}"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::ConfigurationNotFound(_) | Error::ConfigurationMalformed(_) => None,
            Error::AttachmentRead { source, .. } => Some(source),
            Error::HostResolution { source, .. } | Error::Delivery(source) => {
                let r: &(dyn StdError + 'static) = &**source;
                Some(r)
            }
        }
    }
}

impl From<smtp::Error> for Error {
    fn from(err: smtp::Error) -> Error {
        match err.host() {
            Some(host) if err.is_resolution() => Error::HostResolution {
                host: host.to_owned(),
                source: Box::new(err),
            },
            _ => Error::Delivery(Box::new(err)),
        }
    }
}

impl From<stub::Error> for Error {
    fn from(err: stub::Error) -> Error {
        Error::Delivery(Box::new(err))
    }
}

#[cfg(test)]
mod test {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn not_found_display() {
        let err = Error::ConfigurationNotFound(PathBuf::from("files/config.ini"));
        assert!(err.is_configuration_not_found());
        assert_eq!(
            err.to_string(),
            "configuration file files/config.ini not found"
        );
        assert!(err.source().is_none());
    }

    #[test]
    fn attachment_read_exposes_io_error() {
        let err = Error::AttachmentRead {
            path: PathBuf::from("missing.bin"),
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        };
        assert!(err.is_attachment_read());
        assert!(err.to_string().contains("missing.bin"));

        let source = err.source().unwrap();
        assert_eq!(
            source.downcast_ref::<io::Error>().unwrap().kind(),
            io::ErrorKind::NotFound
        );
    }

    #[test]
    fn smtp_resolution_error_maps_to_host_resolution() {
        let err: Error = smtp::error::resolution(
            "smtp.example.invalid",
            io::Error::new(io::ErrorKind::Other, "lookup failed"),
        )
        .into();
        assert!(err.is_host_resolution());
        assert_eq!(
            err.to_string(),
            "failed to resolve SMTP server smtp.example.invalid"
        );
    }

    #[test]
    fn other_smtp_errors_map_to_delivery() {
        let err: Error = smtp::error::client("STARTTLS is not supported on this server").into();
        assert!(err.is_delivery());
        assert!(err.to_string().contains("STARTTLS"));
    }
}
