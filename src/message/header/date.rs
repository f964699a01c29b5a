use std::time::SystemTime;

use httpdate::HttpDate;

use super::{Header, HeaderName};

/// Message `Date` header
///
/// Defined in [RFC2822](https://tools.ietf.org/html/rfc2822#section-3.3)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Date(HttpDate);

impl Date {
    /// Build a `Date` from [`SystemTime`]
    pub fn new(st: SystemTime) -> Self {
        Self(st.into())
    }

    /// Get the current date
    ///
    /// Shortcut for `Date::new(SystemTime::now())`
    pub fn now() -> Self {
        Self::new(SystemTime::now())
    }
}

impl Header for Date {
    fn name() -> HeaderName {
        HeaderName::new_from_ascii_static("Date")
    }

    fn display(&self) -> String {
        let mut s = self.0.to_string();
        if s.ends_with(" GMT") {
            // `GMT` is an obsolete zone for email
            // https://tools.ietf.org/html/rfc2822#appendix-A.6.2
            s.truncate(s.len() - "GMT".len());
            s.push_str("-0000");
        }
        s
    }
}

impl From<SystemTime> for Date {
    fn from(st: SystemTime) -> Self {
        Self::new(st)
    }
}

#[cfg(test)]
mod test {
    use std::time::{Duration, SystemTime};

    use super::Date;
    use crate::message::header::Headers;

    #[test]
    fn format_date() {
        let mut headers = Headers::new();

        // Tue, 15 Nov 1994 08:12:31 GMT
        headers.set(Date::from(
            SystemTime::UNIX_EPOCH + Duration::from_secs(784887151),
        ));

        assert_eq!(
            headers.to_string(),
            "Date: Tue, 15 Nov 1994 08:12:31 -0000\r\n"
        );
    }
}
