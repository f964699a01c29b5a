use std::fmt::{Display, Formatter as FmtFormatter, Result as FmtResult};

use mime::Mime;

use super::{Header, HeaderName};

/// `Content-Type` of a part, defined in [RFC2045](https://tools.ietf.org/html/rfc2045#section-5)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentType(String);

impl ContentType {
    /// `multipart/mixed` with the given boundary
    pub(crate) fn multipart_mixed(boundary: &str) -> Self {
        Self(format!("multipart/mixed; boundary=\"{boundary}\""))
    }
}

impl From<Mime> for ContentType {
    fn from(mime: Mime) -> Self {
        Self(mime.to_string())
    }
}

impl Header for ContentType {
    fn name() -> HeaderName {
        HeaderName::new_from_ascii_static("Content-Type")
    }

    fn display(&self) -> String {
        self.0.clone()
    }
}

/// `Content-Transfer-Encoding` of the body
///
/// The body decides which encoding it uses, this header only reports it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ContentTransferEncoding {
    SevenBit,
    QuotedPrintable,
    Base64,
}

impl Display for ContentTransferEncoding {
    fn fmt(&self, f: &mut FmtFormatter<'_>) -> FmtResult {
        f.write_str(match *self {
            Self::SevenBit => "7bit",
            Self::QuotedPrintable => "quoted-printable",
            Self::Base64 => "base64",
        })
    }
}

impl Header for ContentTransferEncoding {
    fn name() -> HeaderName {
        HeaderName::new_from_ascii_static("Content-Transfer-Encoding")
    }

    fn display(&self) -> String {
        self.to_string()
    }
}
