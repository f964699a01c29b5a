//! Send one email, with one file attachment, over an encrypted SMTP session.
//!
//! The work is split in two halves:
//!
//! * **Composition** turns a [`Config`] and an [`Attachment`] into a
//!   [`Message`]: a `multipart/mixed` email holding a plain text part and a
//!   base64 encoded attachment part. It never touches the network.
//! * **Delivery** hands the formatted message and its [`Envelope`] to a
//!   [`Transport`]. [`SmtpTransport`] resolves the server, connects, upgrades
//!   the connection with STARTTLS, authenticates and submits the message.
//!
//! [`Mailer`] ties both halves together.
//!
//! ## Configuration
//!
//! The configuration is an INI file, read from `files/config.ini` by default:
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
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use attachmail::Config;
//!
//! # fn main() -> Result<(), attachmail::Error> {
//! let config = Config::load_default()?;
//! attachmail::send(&config)?;
//! # Ok(())
//! # }
//! ```
//!
//! Composing without sending:
//!
//! ```rust,no_run
//! use attachmail::{message, Attachment, Config};
//!
//! # fn main() -> Result<(), attachmail::Error> {
//! let config = Config::load("files/config.ini")?;
//! let attachment = Attachment::read(config.attachment())?;
//! let message = message::compose(&config, attachment)?;
//! println!("{}", String::from_utf8_lossy(&message.formatted()));
//! # Ok(())
//! # }
//! ```

#![doc(html_root_url = "https://docs.rs/crate/attachmail/0.1.0")]
#![forbid(unsafe_code)]
#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unused_import_braces,
    rust_2018_idioms,
    clippy::string_add,
    clippy::string_add_assign,
    clippy::clone_on_ref_ptr,
    clippy::verbose_file_reads,
    clippy::unnecessary_self_imports,
    clippy::string_to_string,
    clippy::mem_forget,
    clippy::cast_lossless,
    clippy::inefficient_to_string,
    clippy::inline_always,
    clippy::linkedlist,
    clippy::macro_use_imports,
    clippy::manual_assert,
    clippy::unnecessary_join,
    clippy::wildcard_imports,
    clippy::zero_sized_map_values
)]

pub mod address;
pub mod config;
pub mod error;
pub mod logging;
pub mod mailer;
pub mod message;
pub mod transport;

pub use crate::{
    address::Envelope,
    config::Config,
    error::Error,
    mailer::{send, Mailer},
    message::{Attachment, Message},
    transport::{smtp::SmtpTransport, stub::StubTransport, Transport},
};

pub(crate) type BoxError = Box<dyn std::error::Error + Send + Sync>;
