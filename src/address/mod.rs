//! Email addresses, as written in the configuration, and the SMTP envelope

pub use self::envelope::Envelope;

mod envelope;

/// Splits a comma separated address list
///
/// Entries are trimmed and empty entries are dropped, so an empty or blank
/// value gives no address at all. Addresses are not validated.
///
/// ```
/// use attachmail::address::split_addresses;
///
/// assert_eq!(
///     split_addresses("a@x.com, b@x.com"),
///     vec!["a@x.com".to_owned(), "b@x.com".to_owned()]
/// );
/// assert!(split_addresses("  ").is_empty());
/// ```
pub fn split_addresses(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|address| !address.is_empty())
        .map(str::to_owned)
        .collect()
}
