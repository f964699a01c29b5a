use std::{fs, path::Path};

use crate::{
    message::{
        header::{ContentDisposition, ContentType},
        Body, SinglePart,
    },
    Error,
};

/// A file read into memory, ready to be attached to a message
///
/// ```
/// use attachmail::message::Attachment;
///
/// let attachment = Attachment::new("report.txt".to_owned(), b"hello".to_vec());
/// let part = attachment.into_part();
/// assert_eq!(part.raw_body(), b"aGVsbG8=");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    filename: String,
    content: Vec<u8>,
}

impl Attachment {
    /// Creates an attachment from content already in memory
    pub fn new(filename: String, content: Vec<u8>) -> Self {
        Self { filename, content }
    }

    /// Reads the whole file at `path`
    ///
    /// The path, as given, is also the filename announced to the recipients.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();

        match fs::read(path) {
            Ok(content) => {
                tracing::debug!(
                    "read attachment {} ({} bytes)",
                    path.display(),
                    content.len()
                );
                Ok(Self::new(path.to_string_lossy().into_owned(), content))
            }
            Err(source) => {
                tracing::error!("Failed to read attachment {}: {source}", path.display());
                Err(Error::AttachmentRead {
                    path: path.to_path_buf(),
                    source,
                })
            }
        }
    }

    /// Filename written in the `Content-Disposition` header
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Raw file content
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Builds the `application/octet-stream` part, base64 encoded
    pub fn into_part(self) -> SinglePart {
        SinglePart::builder()
            .content_type(ContentType::from(mime::APPLICATION_OCTET_STREAM))
            .header(ContentDisposition::attachment(&self.filename))
            .body(Body::new_binary(self.content))
    }
}

#[cfg(test)]
mod test {
    use std::io::Write;

    use pretty_assertions::assert_eq;

    use super::Attachment;

    #[test]
    fn attachment_part() {
        let part = Attachment::new("report.txt".to_owned(), b"hello".to_vec()).into_part();

        assert_eq!(
            String::from_utf8(part.formatted()).unwrap(),
            concat!(
                "Content-Type: application/octet-stream\r\n",
                "Content-Disposition: attachment; filename=report.txt\r\n",
                "Content-Transfer-Encoding: base64\r\n",
                "\r\n",
                "aGVsbG8=\r\n"
            )
        );
    }

    #[test]
    fn empty_attachment() {
        let part = Attachment::new("empty.bin".to_owned(), Vec::new()).into_part();

        assert_eq!(part.raw_body(), b"");
        assert_eq!(
            part.headers().get_raw("Content-Disposition"),
            Some("attachment; filename=empty.bin")
        );
    }

    #[test]
    fn read_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0, 159, 146, 150]).unwrap();

        let attachment = Attachment::read(file.path()).unwrap();
        assert_eq!(attachment.content(), &[0, 159, 146, 150]);
        assert_eq!(attachment.filename(), file.path().to_str().unwrap());
    }

    #[test]
    fn read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.bin");

        let err = Attachment::read(&path).unwrap_err();
        assert!(err.is_attachment_read());
        assert!(err.to_string().contains("missing.bin"));
    }
}
