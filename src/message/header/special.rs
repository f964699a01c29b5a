use crate::message::header::{Header, HeaderName};

/// Message format version, defined in [RFC2045](https://tools.ietf.org/html/rfc2045#section-4)
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MimeVersion {
    major: u8,
    minor: u8,
}

impl MimeVersion {
    /// MIME version 1.0
    ///
    /// Should be used in all MIME messages.
    pub const VERSION_1_0: MimeVersion = MimeVersion::new(1, 0);

    pub const fn new(major: u8, minor: u8) -> Self {
        MimeVersion { major, minor }
    }
}

impl Header for MimeVersion {
    fn name() -> HeaderName {
        HeaderName::new_from_ascii_static("MIME-Version")
    }

    fn display(&self) -> String {
        format!("{}.{}", self.major, self.minor)
    }
}

impl Default for MimeVersion {
    fn default() -> Self {
        Self::VERSION_1_0
    }
}
