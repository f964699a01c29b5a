//! Headers used by the composed messages
// https://tools.ietf.org/html/rfc5322#section-2.2

use std::{
    fmt::{self, Display},
    ops::Deref,
};

mod content;
mod content_disposition;
mod date;
mod mailbox;
mod special;
mod textual;

pub use self::{
    content::{ContentTransferEncoding, ContentType},
    content_disposition::ContentDisposition,
    date::Date,
    mailbox::{Cc, From, To},
    special::MimeVersion,
    textual::Subject,
};

/// A typed header, rendered to its raw value when set on [`Headers`]
pub trait Header: Clone {
    fn name() -> HeaderName;

    fn display(&self) -> String;
}

/// An ordered header list; names compare case-insensitively
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    headers: Vec<(HeaderName, String)>,
}

/// A header name, ASCII without spaces or colons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderName(&'static str);

impl Headers {
    #[inline]
    pub const fn new() -> Self {
        Self {
            headers: Vec::new(),
        }
    }

    /// Sets `header`, replacing a previous value with the same name
    pub fn set<H: Header>(&mut self, header: H) {
        self.set_raw(H::name(), header.display());
    }

    /// The raw value of the header named `name`
    pub fn get_raw(&self, name: &str) -> Option<&str> {
        self.find_header(name).map(|(_name, value)| value)
    }

    pub fn set_raw(&mut self, name: HeaderName, value: String) {
        match self.headers.iter_mut().find(|(name_, _)| name.eq_ignore_ascii_case(name_)) {
            Some((_, current_value)) => {
                *current_value = value;
            }
            None => {
                self.headers.push((name, value));
            }
        }
    }

    fn find_header(&self, name: &str) -> Option<(&HeaderName, &str)> {
        self.headers
            .iter()
            .find(|&(name_, _value)| name.eq_ignore_ascii_case(name_))
            .map(|t| (&t.0, t.1.as_str()))
    }
}

impl Display for Headers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in &self.headers {
            write!(f, "{name}: {value}\r\n")?;
        }

        Ok(())
    }
}

impl HeaderName {
    /// Creates a header name, panicking at compile time in const contexts
    /// if `ascii` is not a valid name
    pub const fn new_from_ascii_static(ascii: &'static str) -> Self {
        let bytes = ascii.as_bytes();
        assert!(!bytes.is_empty() && bytes.len() <= 76, "invalid header name length");

        let mut i = 0;
        while i < bytes.len() {
            assert!(
                bytes[i].is_ascii() && bytes[i] != b' ' && bytes[i] != b':',
                "invalid character in header name"
            );
            i += 1;
        }

        Self(ascii)
    }
}

impl Display for HeaderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl Deref for HeaderName {
    type Target = str;

    #[inline]
    fn deref(&self) -> &Self::Target {
        self.0
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn set_replaces_case_insensitively() {
        let mut headers = Headers::new();
        headers.set_raw(HeaderName::new_from_ascii_static("X-Mailer"), "a".to_owned());
        headers.set_raw(HeaderName::new_from_ascii_static("x-mailer"), "b".to_owned());

        assert_eq!(headers.get_raw("X-MAILER"), Some("b"));
        assert_eq!(headers.to_string(), "X-Mailer: b\r\n");
    }

    #[test]
    fn headers_keep_insertion_order() {
        let mut headers = Headers::new();
        headers.set(Subject::new("Report"));
        headers.set(MimeVersion::VERSION_1_0);

        assert_eq!(headers.to_string(), "Subject: Report\r\nMIME-Version: 1.0\r\n");
        assert_eq!(headers.get_raw("content-type"), None);
    }
}
