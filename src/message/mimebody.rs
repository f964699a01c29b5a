use std::io::Write;

use crate::message::{
    header::{ContentType, Header, Headers},
    Body, EmailFormat,
};

/// Creates builder for single part
#[derive(Debug, Clone, Default)]
pub struct SinglePartBuilder {
    headers: Headers,
}

impl SinglePartBuilder {
    /// Creates a default singlepart builder
    pub fn new() -> Self {
        Self {
            headers: Headers::new(),
        }
    }

    /// Set the header to singlepart
    pub fn header<H: Header>(mut self, header: H) -> Self {
        self.headers.set(header);
        self
    }

    /// Set the Content-Type header of the singlepart
    pub fn content_type(self, content_type: ContentType) -> Self {
        self.header(content_type)
    }

    /// Build singlepart using an encoded body
    ///
    /// The `Content-Transfer-Encoding` header always follows the body.
    pub fn body(mut self, body: Body) -> SinglePart {
        self.headers.set(body.encoding());

        SinglePart {
            headers: self.headers,
            body: body.into_vec(),
        }
    }
}

/// Single part
///
/// # Example
///
/// ```
/// use attachmail::message::SinglePart;
///
/// let part = SinglePart::plain(String::from("Текст письма в уникоде"));
/// assert!(part.formatted().is_ascii());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinglePart {
    headers: Headers,
    body: Vec<u8>,
}

impl SinglePart {
    /// Creates a builder for singlepart
    #[inline]
    pub fn builder() -> SinglePartBuilder {
        SinglePartBuilder::new()
    }

    /// A `text/plain; charset=utf-8` part
    pub fn plain(text: String) -> Self {
        Self::builder()
            .content_type(ContentType::from(mime::TEXT_PLAIN_UTF_8))
            .body(Body::new_text(text))
    }

    /// Get the headers from singlepart
    #[inline]
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Get the encoded body
    #[inline]
    pub fn raw_body(&self) -> &[u8] {
        &self.body
    }

    /// Get message content formatted for sending
    pub fn formatted(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.format(&mut out);
        out
    }
}

impl EmailFormat for SinglePart {
    fn format(&self, out: &mut Vec<u8>) {
        write!(out, "{}", self.headers)
            .expect("A Write implementation panicked while formatting headers");
        out.extend_from_slice(b"\r\n");
        out.extend_from_slice(&self.body);
        out.extend_from_slice(b"\r\n");
    }
}

/// Create a random MIME boundary.
fn make_boundary() -> String {
    std::iter::repeat_with(fastrand::alphanumeric)
        .take(40)
        .collect()
}

/// `multipart/mixed` body with its parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiPart {
    headers: Headers,
    boundary: String,
    parts: Vec<SinglePart>,
}

impl MultiPart {
    /// Creates an empty mixed multipart with a random boundary
    pub fn mixed() -> Self {
        Self::mixed_with_boundary(make_boundary())
    }

    /// Creates an empty mixed multipart with a fixed boundary
    pub fn mixed_with_boundary<S: Into<String>>(boundary: S) -> Self {
        let boundary = boundary.into();
        let mut headers = Headers::new();
        headers.set(ContentType::multipart_mixed(&boundary));

        Self {
            headers,
            boundary,
            parts: Vec::new(),
        }
    }

    /// Add single part to multipart
    pub fn singlepart(mut self, part: SinglePart) -> Self {
        self.parts.push(part);
        self
    }

    /// Get the boundary of multipart contents
    #[inline]
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Get the headers from the multipart
    #[inline]
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Get the parts from the multipart
    #[inline]
    pub fn parts(&self) -> &[SinglePart] {
        &self.parts
    }

    /// Get message content formatted for SMTP
    pub fn formatted(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.format(&mut out);
        out
    }
}

impl EmailFormat for MultiPart {
    fn format(&self, out: &mut Vec<u8>) {
        write!(out, "{}", self.headers)
            .expect("A Write implementation panicked while formatting headers");
        out.extend_from_slice(b"\r\n");

        for part in &self.parts {
            out.extend_from_slice(b"--");
            out.extend_from_slice(self.boundary.as_bytes());
            out.extend_from_slice(b"\r\n");
            part.format(out);
        }

        out.extend_from_slice(b"--");
        out.extend_from_slice(self.boundary.as_bytes());
        out.extend_from_slice(b"--\r\n");
    }
}
