use super::{Header, HeaderName};

/// `Content-Disposition` of a part, defined in [RFC2183](https://tools.ietf.org/html/rfc2183)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentDisposition(String);

impl ContentDisposition {
    /// An attachment which should be saved as `file_name`
    ///
    /// The name is written as given, without quoting.
    pub fn attachment(file_name: &str) -> Self {
        Self(format!("attachment; filename={file_name}"))
    }
}

impl Header for ContentDisposition {
    fn name() -> HeaderName {
        HeaderName::new_from_ascii_static("Content-Disposition")
    }

    fn display(&self) -> String {
        self.0.clone()
    }
}
