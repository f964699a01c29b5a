use base64::{engine::general_purpose::STANDARD, Engine as _};

use super::{Header, HeaderName};

/// Longest chunk of text put in one encoded-word, in bytes
///
/// Keeps `Subject: =?utf-8?b?...?=` under 76 columns.
const MAX_WORD_INPUT: usize = 39;

/// `Subject` of the message, defined in [RFC5322](https://tools.ietf.org/html/rfc5322#section-3.6.5)
///
/// Text that is not printable ASCII is written as
/// [RFC2047](https://tools.ietf.org/html/rfc2047) `B` encoded-words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject(String);

impl Subject {
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self(text.into())
    }
}

impl AsRef<str> for Subject {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Header for Subject {
    fn name() -> HeaderName {
        HeaderName::new_from_ascii_static("Subject")
    }

    fn display(&self) -> String {
        if self.0.chars().all(allowed_char) {
            self.0.clone()
        } else {
            encode_words(&self.0)
        }
    }
}

fn allowed_char(c: char) -> bool {
    c == '\t' || (' '..='~').contains(&c)
}

/// Encodes all of `text` as folded encoded-words, cutting on char boundaries
fn encode_words(text: &str) -> String {
    let mut words = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        let mut end = rest.len().min(MAX_WORD_INPUT);
        while !rest.is_char_boundary(end) {
            end -= 1;
        }

        let (chunk, tail) = rest.split_at(end);
        words.push(format!("=?utf-8?b?{}?=", STANDARD.encode(chunk)));
        rest = tail;
    }

    words.join("\r\n ")
}
