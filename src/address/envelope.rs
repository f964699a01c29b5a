use crate::Error;

/// Simple email envelope representation
///
/// The envelope is what the SMTP server delivers to, independently of the
/// `To` and `Cc` headers of the message.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Envelope {
    /// The envelope recipients' addresses
    ///
    /// This can not be empty.
    forward_path: Vec<String>,
    /// The envelope sender address
    reverse_path: String,
}

impl Envelope {
    /// Creates a new envelope, which may fail if `to` is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// # use std::error::Error;
    /// use attachmail::Envelope;
    ///
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// let envelope = Envelope::new(
    ///     "bot@example.com".to_owned(),
    ///     vec!["user@example.com".to_owned(), "boss@example.com".to_owned()],
    /// )?;
    /// assert_eq!(envelope.to().len(), 2);
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// If `to` has no elements in it.
    pub fn new(from: String, to: Vec<String>) -> Result<Envelope, Error> {
        if to.is_empty() {
            return Err(Error::malformed("the envelope needs at least one recipient"));
        }
        Ok(Envelope {
            forward_path: to,
            reverse_path: from,
        })
    }

    /// Gets the destination addresses of the envelope.
    pub fn to(&self) -> &[String] {
        self.forward_path.as_slice()
    }

    /// Gets the sender of the envelope.
    pub fn from(&self) -> &str {
        &self.reverse_path
    }

    /// Check if any of the addresses in the envelope contains non-ascii chars
    pub(crate) fn has_non_ascii_addresses(&self) -> bool {
        !self.reverse_path.is_ascii() || self.forward_path.iter().any(|a| !a.is_ascii())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_recipients_are_rejected() {
        let err = Envelope::new("bot@example.com".to_owned(), vec![]).unwrap_err();
        assert!(err.is_configuration_malformed());
    }

    #[test]
    fn non_ascii_addresses() {
        let ascii = Envelope::new(
            "bot@example.com".to_owned(),
            vec!["user@example.com".to_owned()],
        )
        .unwrap();
        assert!(!ascii.has_non_ascii_addresses());
        assert_eq!(ascii.from(), "bot@example.com");

        let utf8 = Envelope::new(
            "bot@example.com".to_owned(),
            vec!["user@example.com".to_owned(), "jürgen@example.de".to_owned()],
        )
        .unwrap();
        assert!(utf8.has_non_ascii_addresses());
    }
}
