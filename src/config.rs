//! Loading and validating the INI configuration
//!
//! ```ini
//! [Email]
//! SENDER_EMAIL = bot@example.com
//! TO_EMAILS = user@example.com,other@example.com
//! CC_EMAILS =
//! PASSWORD = hunter2
//! SUBJECT = Report
//! BODY = See attached.
//!
//! [File]
//! FILENAME = report.txt
//!
//! [SMTP]
//! HOST = smtp.example.com
//! PORT = 587
//! # optional
//! TIMEOUT = 30
//! HELLO_NAME = client.example.com
//! ```
//!
//! Section and key names are matched case-insensitively.

use std::{
    fmt,
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use ini::{Ini, ParseOption};

use crate::{address::split_addresses, Error};

/// Where the binary looks for its configuration, relative to the working directory
pub const DEFAULT_PATH: &str = "files/config.ini";

const EMAIL: &str = "Email";
const FILE: &str = "File";
const SMTP: &str = "SMTP";

/// Everything needed to compose and send one email
///
/// Immutable once loaded.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    sender: String,
    to: Vec<String>,
    cc: Vec<String>,
    password: String,
    subject: String,
    body: String,
    attachment: String,
    smtp: SmtpSettings,
}

/// The `[SMTP]` section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    host: String,
    port: u16,
    timeout: Option<Duration>,
    hello_name: Option<String>,
}

impl SmtpSettings {
    /// Server host name
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Server port
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Connect, read and write timeout, when configured
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Name to send in EHLO, when configured
    pub fn hello_name(&self) -> Option<&str> {
        self.hello_name.as_deref()
    }
}

impl Config {
    /// Loads the configuration from `path`
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Config, Error> {
        let path = path.as_ref();

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::error!("Configuration file {} not found", path.display());
                return Err(Error::ConfigurationNotFound(path.to_path_buf()));
            }
            Err(err) => {
                tracing::error!("Could not read configuration file {}: {err}", path.display());
                return Err(Error::malformed(format!(
                    "could not read {}: {err}",
                    path.display()
                )));
            }
        };

        let config = Self::from_ini_str(&content)?;
        tracing::debug!("configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Loads the configuration from [`DEFAULT_PATH`]
    pub fn load_default() -> Result<Config, Error> {
        Self::load(PathBuf::from(DEFAULT_PATH))
    }

    /// Parses and validates INI text
    pub fn from_ini_str(content: &str) -> Result<Config, Error> {
        // backslashes are kept as is, FILENAME may be a Windows path
        let options = ParseOption {
            enabled_escape: false,
            ..ParseOption::default()
        };
        let ini = Ini::load_from_str_opt(content, options).map_err(|err| {
            tracing::error!("Configuration is not valid INI: {err}");
            Error::malformed(format!("invalid INI syntax: {err}"))
        })?;

        let config = Self::from_ini(&ini);
        if let Err(ref err) = config {
            tracing::error!("{err}");
        }
        config
    }

    fn from_ini(ini: &Ini) -> Result<Config, Error> {
        let to = split_addresses(required(ini, EMAIL, "TO_EMAILS")?);
        if to.is_empty() {
            return Err(Error::malformed("Email.TO_EMAILS holds no address"));
        }

        let smtp = SmtpSettings {
            host: required(ini, SMTP, "HOST")?.to_owned(),
            port: parse_number(ini, SMTP, "PORT")?,
            timeout: match lookup(ini, SMTP, "TIMEOUT") {
                Some(_) => Some(Duration::from_secs(parse_number(ini, SMTP, "TIMEOUT")?)),
                None => None,
            },
            hello_name: lookup(ini, SMTP, "HELLO_NAME")
                .filter(|name| !name.is_empty())
                .map(str::to_owned),
        };

        Ok(Config {
            sender: required(ini, EMAIL, "SENDER_EMAIL")?.to_owned(),
            to,
            cc: lookup(ini, EMAIL, "CC_EMAILS")
                .map(split_addresses)
                .unwrap_or_default(),
            password: required(ini, EMAIL, "PASSWORD")?.to_owned(),
            subject: required(ini, EMAIL, "SUBJECT")?.to_owned(),
            body: required(ini, EMAIL, "BODY")?.to_owned(),
            attachment: required(ini, FILE, "FILENAME")?.to_owned(),
            smtp,
        })
    }

    /// Sender address, also the login name
    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// Primary recipients, never empty
    pub fn to(&self) -> &[String] {
        &self.to
    }

    /// Carbon-copy recipients, possibly empty
    pub fn cc(&self) -> &[String] {
        &self.cc
    }

    /// Every envelope recipient: `to` followed by `cc`
    pub fn recipients(&self) -> Vec<String> {
        self.to.iter().chain(&self.cc).cloned().collect()
    }

    /// Login password
    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Path of the file to attach, as written in the configuration
    pub fn attachment(&self) -> &str {
        &self.attachment
    }

    pub fn smtp(&self) -> &SmtpSettings {
        &self.smtp
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("sender", &self.sender)
            .field("to", &self.to)
            .field("cc", &self.cc)
            .field("password", &"<redacted>")
            .field("subject", &self.subject)
            .field("body", &self.body)
            .field("attachment", &self.attachment)
            .field("smtp", &self.smtp)
            .finish()
    }
}

fn lookup<'a>(ini: &'a Ini, section: &str, key: &str) -> Option<&'a str> {
    ini.iter()
        .filter(|(name, _)| name.is_some_and(|name| name.eq_ignore_ascii_case(section)))
        .flat_map(|(_, properties)| properties.iter())
        .find(|(name, _)| name.eq_ignore_ascii_case(key))
        .map(|(_, value)| value)
}

fn required<'a>(ini: &'a Ini, section: &str, key: &str) -> Result<&'a str, Error> {
    lookup(ini, section, key)
        .ok_or_else(|| Error::malformed(format!("missing required key {section}.{key}")))
}

fn parse_number<T: std::str::FromStr>(ini: &Ini, section: &str, key: &str) -> Result<T, Error>
where
    T::Err: fmt::Display,
{
    let value = required(ini, section, key)?;
    value.trim().parse().map_err(|err| {
        Error::malformed(format!("{section}.{key} is not a valid number ({value:?}): {err}"))
    })
}

#[cfg(test)]
mod test {
    use std::io::Write;

    use pretty_assertions::assert_eq;

    use super::*;

    const VALID: &str = "[Email]
SENDER_EMAIL = bot@example.com
TO_EMAILS = user@example.com
CC_EMAILS =
PASSWORD = hunter2
SUBJECT = Report
BODY = See attached.

[File]
FILENAME = report.txt

[SMTP]
HOST = smtp.example.com
PORT = 587
";

    fn without(key: &str) -> String {
        VALID
            .lines()
            .filter(|line| !line.starts_with(key))
            .map(|line| format!("{line}\n"))
            .collect()
    }

    #[test]
    fn parses_valid_config() {
        let config = Config::from_ini_str(VALID).unwrap();

        assert_eq!(config.sender(), "bot@example.com");
        assert_eq!(config.to(), ["user@example.com"]);
        assert!(config.cc().is_empty());
        assert_eq!(config.password(), "hunter2");
        assert_eq!(config.subject(), "Report");
        assert_eq!(config.body(), "See attached.");
        assert_eq!(config.attachment(), "report.txt");
        assert_eq!(config.smtp().host(), "smtp.example.com");
        assert_eq!(config.smtp().port(), 587);
        assert_eq!(config.smtp().timeout(), None);
        assert_eq!(config.smtp().hello_name(), None);
    }

    #[test]
    fn recipients_are_to_then_cc() {
        let ini = VALID
            .replace(
                "TO_EMAILS = user@example.com",
                "TO_EMAILS = a@x.com,b@x.com",
            )
            .replace("CC_EMAILS =", "CC_EMAILS = c@x.com");
        let config = Config::from_ini_str(&ini).unwrap();

        assert_eq!(config.to(), ["a@x.com", "b@x.com"]);
        assert_eq!(config.cc(), ["c@x.com"]);
        assert_eq!(config.recipients(), vec!["a@x.com", "b@x.com", "c@x.com"]);
    }

    #[test]
    fn blank_or_missing_cc_means_no_cc() {
        let blank = VALID.replace("CC_EMAILS =", "CC_EMAILS =    ");
        assert!(Config::from_ini_str(&blank).unwrap().cc().is_empty());

        let missing = without("CC_EMAILS");
        assert!(Config::from_ini_str(&missing).unwrap().cc().is_empty());
    }

    #[test]
    fn missing_key_is_named() {
        for (key, name) in [
            ("SENDER_EMAIL", "Email.SENDER_EMAIL"),
            ("PASSWORD", "Email.PASSWORD"),
            ("FILENAME", "File.FILENAME"),
            ("PORT", "SMTP.PORT"),
        ] {
            let err = Config::from_ini_str(&without(key)).unwrap_err();
            assert!(err.is_configuration_malformed(), "{key}");
            assert!(err.to_string().contains(name), "{err}");
        }
    }

    #[test]
    fn missing_section() {
        let ini = VALID.replace("[File]\nFILENAME = report.txt\n", "");
        let err = Config::from_ini_str(&ini).unwrap_err();
        assert!(err.to_string().contains("File.FILENAME"));
    }

    #[test]
    fn invalid_port() {
        for port in ["smtp", "70000", "-1", ""] {
            let ini = VALID.replace("PORT = 587", &format!("PORT = {port}"));
            let err = Config::from_ini_str(&ini).unwrap_err();
            assert!(err.is_configuration_malformed(), "{port}");
            assert!(err.to_string().contains("SMTP.PORT"), "{err}");
        }
    }

    #[test]
    fn empty_to_is_rejected() {
        let ini = VALID.replace("TO_EMAILS = user@example.com", "TO_EMAILS = , ");
        let err = Config::from_ini_str(&ini).unwrap_err();
        assert!(err.to_string().contains("Email.TO_EMAILS"));
    }

    #[test]
    fn optional_smtp_settings() {
        let ini = format!("{VALID}TIMEOUT = 30\nHELLO_NAME = client.example.com\n");
        let config = Config::from_ini_str(&ini).unwrap();
        assert_eq!(config.smtp().timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.smtp().hello_name(), Some("client.example.com"));

        let ini = format!("{VALID}TIMEOUT = soon\n");
        assert!(Config::from_ini_str(&ini)
            .unwrap_err()
            .to_string()
            .contains("SMTP.TIMEOUT"));
    }

    #[test]
    fn keys_are_case_insensitive() {
        let ini = VALID
            .replace("[Email]", "[email]")
            .replace("CC_EMAILS =", "cc_emails = boss@example.com")
            .replace("HOST", "host");
        let config = Config::from_ini_str(&ini).unwrap();
        assert_eq!(config.cc(), ["boss@example.com"]);
        assert_eq!(config.smtp().host(), "smtp.example.com");
    }

    #[test]
    fn windows_path_is_kept() {
        let ini = VALID.replace("report.txt", r"C:\files\new\report.txt");
        let config = Config::from_ini_str(&ini).unwrap();
        assert_eq!(config.attachment(), r"C:\files\new\report.txt");
    }

    #[test]
    fn debug_hides_password() {
        let config = Config::from_ini_str(VALID).unwrap();
        let debug = format!("{config:?}");
        assert!(debug.contains("bot@example.com"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(VALID.as_bytes()).unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config, Config::from_ini_str(VALID).unwrap());
    }

    #[test]
    fn load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");

        let err = Config::load(&path).unwrap_err();
        assert!(err.is_configuration_not_found());
        match err {
            Error::ConfigurationNotFound(missing) => assert_eq!(missing, path),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn garbage_is_malformed() {
        let err = Config::from_ini_str("[Email\nSENDER_EMAIL").unwrap_err();
        assert!(err.is_configuration_malformed());
    }
}
