//! ESMTP features

use std::{
    collections::HashSet,
    fmt::{self, Display, Formatter},
    net::Ipv4Addr,
};

use crate::transport::smtp::{
    authentication::Mechanism,
    error::{self, Error},
    response::Response,
};

/// Client identifier, the parameter to `EHLO`
#[derive(PartialEq, Eq, Clone, Debug)]
#[non_exhaustive]
pub enum ClientId {
    /// A fully-qualified domain name
    Domain(String),
    /// An IPv4 address
    Ipv4(Ipv4Addr),
}

const LOCALHOST_CLIENT: ClientId = ClientId::Ipv4(Ipv4Addr::new(127, 0, 0, 1));

impl Default for ClientId {
    fn default() -> Self {
        // https://tools.ietf.org/html/rfc5321#section-4.1.4
        //
        // Use the primary host name when there is one, an address literal
        // otherwise.
        hostname::get()
            .ok()
            .and_then(|s| s.into_string().map(Self::Domain).ok())
            .unwrap_or(LOCALHOST_CLIENT)
    }
}

impl Display for ClientId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Domain(ref value) => f.write_str(value),
            Self::Ipv4(ref value) => write!(f, "[{value}]"),
        }
    }
}

/// Supported ESMTP keywords
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
#[non_exhaustive]
pub enum Extension {
    /// 8BITMIME keyword
    ///
    /// Defined in [RFC 6152](https://tools.ietf.org/html/rfc6152)
    EightBitMime,
    /// SMTPUTF8 keyword
    ///
    /// Defined in [RFC 6531](https://tools.ietf.org/html/rfc6531)
    SmtpUtfEight,
    /// STARTTLS keyword
    ///
    /// Defined in [RFC 2487](https://tools.ietf.org/html/rfc2487)
    StartTls,
    /// AUTH mechanism
    Authentication(Mechanism),
}

impl Display for Extension {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            Extension::EightBitMime => f.write_str("8BITMIME"),
            Extension::SmtpUtfEight => f.write_str("SMTPUTF8"),
            Extension::StartTls => f.write_str("STARTTLS"),
            Extension::Authentication(ref mechanism) => write!(f, "AUTH {mechanism}"),
        }
    }
}

/// What the server told us about itself in its EHLO reply
#[derive(Clone, Debug, Eq, PartialEq, Default)]
pub struct ServerInfo {
    /// The name given in the server banner
    name: String,
    /// ESMTP features supported by the server and known to this crate
    features: HashSet<Extension>,
}

impl Display for ServerInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let features = if self.features.is_empty() {
            "no supported features".to_owned()
        } else {
            format!("{:?}", self.features)
        };
        write!(f, "{} with {}", self.name, features)
    }
}

impl ServerInfo {
    /// Parses a EHLO response to create a `ServerInfo`
    pub fn from_response(response: &Response) -> Result<ServerInfo, Error> {
        let Some(name) = response.first_word() else {
            return Err(error::response("Could not read server name"));
        };

        let mut features: HashSet<Extension> = HashSet::new();

        for line in response.message() {
            let mut split = line.split_whitespace();
            let Some(keyword) = split.next() else {
                continue;
            };

            // keywords and mechanism names are case-insensitive
            if keyword.eq_ignore_ascii_case("8BITMIME") {
                features.insert(Extension::EightBitMime);
            } else if keyword.eq_ignore_ascii_case("SMTPUTF8") {
                features.insert(Extension::SmtpUtfEight);
            } else if keyword.eq_ignore_ascii_case("STARTTLS") {
                features.insert(Extension::StartTls);
            } else if keyword.eq_ignore_ascii_case("AUTH") {
                for mechanism in split {
                    if mechanism.eq_ignore_ascii_case("PLAIN") {
                        features.insert(Extension::Authentication(Mechanism::Plain));
                    } else if mechanism.eq_ignore_ascii_case("LOGIN") {
                        features.insert(Extension::Authentication(Mechanism::Login));
                    }
                }
            }
        }

        Ok(ServerInfo {
            name: name.to_owned(),
            features,
        })
    }

    /// Checks if the server supports an ESMTP feature
    pub fn supports_feature(&self, keyword: Extension) -> bool {
        self.features.contains(&keyword)
    }

    /// Checks if the server supports an authentication mechanism
    pub fn supports_auth_mechanism(&self, mechanism: Mechanism) -> bool {
        self.features
            .contains(&Extension::Authentication(mechanism))
    }

    /// Gets the first mechanism of `mechanisms` the server supports
    pub fn get_auth_mechanism(&self, mechanisms: &[Mechanism]) -> Option<Mechanism> {
        mechanisms
            .iter()
            .copied()
            .find(|mechanism| self.supports_auth_mechanism(*mechanism))
    }

    /// The name given in the server banner
    pub fn name(&self) -> &str {
        self.name.as_ref()
    }
}

/// A `MAIL FROM` extension parameter
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum MailParameter {
    /// `BODY=8BITMIME`
    EightBitMime,
    /// `SMTPUTF8`
    SmtpUtfEight,
}

impl Display for MailParameter {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            MailParameter::EightBitMime => f.write_str("BODY=8BITMIME"),
            MailParameter::SmtpUtfEight => f.write_str("SMTPUTF8"),
        }
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashSet;

    use super::*;
    use crate::transport::smtp::response::{Category, Code, Detail, Severity};

    fn ehlo_reply(lines: &[&str]) -> Response {
        Response::new(
            Code::new(
                Severity::PositiveCompletion,
                Category::MailSystem,
                Detail::Zero,
            ),
            lines.iter().map(|line| (*line).to_owned()).collect(),
        )
    }

    #[test]
    fn clientid_fmt() {
        assert_eq!(
            ClientId::Domain("mail.example.com".to_owned()).to_string(),
            "mail.example.com"
        );
        assert_eq!(LOCALHOST_CLIENT.to_string(), "[127.0.0.1]");
    }

    #[test]
    fn extension_fmt() {
        assert_eq!(Extension::StartTls.to_string(), "STARTTLS");
        assert_eq!(
            Extension::Authentication(Mechanism::Plain).to_string(),
            "AUTH PLAIN"
        );
    }

    #[test]
    fn serverinfo_from_ehlo() {
        let server_info = ServerInfo::from_response(&ehlo_reply(&[
            "smtp.example.com Hello",
            "SIZE 35882577",
            "8BITMIME",
            "STARTTLS",
            "AUTH LOGIN PLAIN XOAUTH2",
        ]))
        .unwrap();

        let mut features = HashSet::new();
        features.insert(Extension::EightBitMime);
        features.insert(Extension::StartTls);
        features.insert(Extension::Authentication(Mechanism::Login));
        features.insert(Extension::Authentication(Mechanism::Plain));

        assert_eq!(server_info.name(), "smtp.example.com");
        assert_eq!(server_info.features, features);
        assert!(server_info.supports_feature(Extension::StartTls));
        assert!(!server_info.supports_feature(Extension::SmtpUtfEight));
        assert_eq!(
            server_info.get_auth_mechanism(&[Mechanism::Plain, Mechanism::Login]),
            Some(Mechanism::Plain)
        );
    }

    #[test]
    fn serverinfo_before_tls() {
        let server_info =
            ServerInfo::from_response(&ehlo_reply(&["relay.example.net", "", "SIZE 1000"]))
                .unwrap();

        assert!(!server_info.supports_feature(Extension::StartTls));
        assert_eq!(server_info.get_auth_mechanism(&[Mechanism::Plain]), None);
        assert_eq!(
            server_info.to_string(),
            "relay.example.net with no supported features"
        );
    }

    #[test]
    fn mail_parameter_fmt() {
        assert_eq!(MailParameter::EightBitMime.to_string(), "BODY=8BITMIME");
        assert_eq!(MailParameter::SmtpUtfEight.to_string(), "SMTPUTF8");
    }
}
