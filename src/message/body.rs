use std::{mem, ops::Deref};

use crate::message::header::ContentTransferEncoding;

/// A [`SinglePart`][super::SinglePart] body that has already been encoded.
///
/// Encoded bodies are always 7-bit clean, with CRLF line endings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Body {
    buf: Vec<u8>,
    encoding: ContentTransferEncoding,
}

impl Body {
    /// Encode text, making it ready to be sent as a body.
    ///
    /// Automatically chooses the most efficient encoding between
    /// `7bit`, `quoted-printable` and `base64`.
    ///
    /// Line endings are converted to `CRLF`.
    pub fn new_text(mut text: String) -> Self {
        use email_encoding::body::Encoding;

        in_place_crlf_line_endings(&mut text);
        let encoding = match Encoding::choose(text.as_str(), false) {
            Encoding::SevenBit => ContentTransferEncoding::SevenBit,
            Encoding::QuotedPrintable => ContentTransferEncoding::QuotedPrintable,
            // 8bit is never chosen without SMTPUTF8 support
            Encoding::EightBit | Encoding::Base64 => ContentTransferEncoding::Base64,
        };
        Self::new_impl(text.into_bytes(), encoding)
    }

    /// Encode binary content as `base64`, in lines of 76 characters.
    pub fn new_binary(buf: Vec<u8>) -> Self {
        Self::new_impl(buf, ContentTransferEncoding::Base64)
    }

    /// Encodes the supplied `buf` using the provided `encoding`
    fn new_impl(buf: Vec<u8>, encoding: ContentTransferEncoding) -> Self {
        match encoding {
            ContentTransferEncoding::SevenBit => Self { buf, encoding },
            ContentTransferEncoding::QuotedPrintable => Self {
                buf: quoted_printable::encode(buf),
                encoding,
            },
            ContentTransferEncoding::Base64 => {
                let len = email_encoding::body::base64::encoded_len(buf.len());
                let mut out = String::with_capacity(len);
                email_encoding::body::base64::encode(&buf, &mut out)
                    .expect("encode body as base64");
                Self {
                    buf: out.into_bytes(),
                    encoding,
                }
            }
        }
    }

    /// Returns the length of this `Body` in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` if this `Body` has a length of zero, `false` otherwise.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Returns the `Content-Transfer-Encoding` of this `Body`.
    #[inline]
    pub fn encoding(&self) -> ContentTransferEncoding {
        self.encoding
    }

    /// Consumes `Body` and returns the inner `Vec<u8>`
    #[inline]
    pub fn into_vec(self) -> Vec<u8> {
        self.buf
    }
}

impl AsRef<[u8]> for Body {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        self.buf.as_ref()
    }
}

impl Deref for Body {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.buf
    }
}

/// In place conversion to CRLF line endings
fn in_place_crlf_line_endings(string: &mut String) {
    let indices = find_all_lf_char_indices(string);

    for i in indices {
        // this relies on `indices` being in reverse order
        string.insert(i, '\r');
    }
}

/// Find indices to all places where `\r` should be inserted
/// in order to make `s` have CRLF line endings
///
/// The list is reversed, which is more efficient.
fn find_all_lf_char_indices(s: &str) -> Vec<usize> {
    let mut indices = Vec::new();

    let mut found_lf = false;
    for (i, c) in s.char_indices().rev() {
        if mem::take(&mut found_lf) && c != '\r' {
            // the previous character was `\n`, but this isn't a `\r`
            indices.push(i + c.len_utf8());
        }

        found_lf = c == '\n';
    }

    if found_lf {
        // the first character is `\n`
        indices.push(0);
    }

    indices
}

#[cfg(test)]
mod test {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use pretty_assertions::assert_eq;

    use super::{in_place_crlf_line_endings, Body, ContentTransferEncoding};

    #[test]
    fn seven_bit_detect() {
        let encoded = Body::new_text(String::from("Hello, world!"));

        assert_eq!(encoded.encoding(), ContentTransferEncoding::SevenBit);
        assert_eq!(encoded.as_ref(), b"Hello, world!");
    }

    #[test]
    fn seven_bit_too_long_detect() {
        let encoded = Body::new_text("Hello, world!".repeat(100));

        assert_eq!(encoded.encoding(), ContentTransferEncoding::QuotedPrintable);
        assert!(encoded.starts_with(
            b"Hello, world!Hello, world!Hello, world!Hello, world!Hello, world!Hello, wor=\r\n"
        ));
    }

    #[test]
    fn utf8_text_is_seven_bit_clean() {
        let encoded = Body::new_text(String::from("Grüße aus Köln,\nbis bald"));

        assert_ne!(encoded.encoding(), ContentTransferEncoding::SevenBit);
        assert!(encoded.is_ascii());
    }

    #[test]
    fn text_line_endings() {
        let encoded = Body::new_text(String::from("line one\nline two\r\n"));

        assert_eq!(encoded.as_ref(), b"line one\r\nline two\r\n");
    }

    #[test]
    fn base64_encode_bytes() {
        let encoded = Body::new_binary(vec![0; 80]);

        assert_eq!(encoded.encoding(), ContentTransferEncoding::Base64);
        assert_eq!(
            encoded.as_ref(),
            concat!(
                "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA\r\n",
                "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA="
            )
            .as_bytes()
        );
    }

    #[test]
    fn base64_ascii_content() {
        let encoded = Body::new_binary(b"hello".to_vec());

        assert_eq!(encoded.encoding(), ContentTransferEncoding::Base64);
        assert_eq!(encoded.as_ref(), b"aGVsbG8=");
    }

    #[test]
    fn base64_lines_decode_to_input() {
        let input: Vec<u8> = (0..=255).cycle().take(1000).collect();
        let encoded = Body::new_binary(input.clone());

        let lines: Vec<&[u8]> = encoded.split(|&b| b == b'\n').collect();
        assert!(lines.iter().all(|line| line.len() <= 77));

        let joined: Vec<u8> = encoded
            .iter()
            .copied()
            .filter(|b| !b.is_ascii_whitespace())
            .collect();
        assert_eq!(STANDARD.decode(joined).unwrap(), input);
    }

    #[test]
    fn crlf() {
        let mut string = String::from("Send me a ✉️\nwith\nattachmail!\n😀");

        in_place_crlf_line_endings(&mut string);
        assert_eq!(string, "Send me a ✉️\r\nwith\r\nattachmail!\r\n😀");
    }

    #[test]
    fn crlf_noop() {
        let mut string = String::from("\r\nSend me a ✉️\r\nwith\r\nattachmail!\r\n😀");

        in_place_crlf_line_endings(&mut string);
        assert_eq!(string, "\r\nSend me a ✉️\r\nwith\r\nattachmail!\r\n😀");
    }
}
