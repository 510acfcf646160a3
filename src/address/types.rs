//! Representation of an email address

use std::{
    error::Error,
    fmt::{Display, Formatter, Result as FmtResult},
    net::IpAddr,
    str::FromStr,
};

use email_address::EmailAddress;
use idna::domain_to_ascii;

/// An email address in canonical `user@domain` form.
///
/// The user part is checked against RFC 5322 local-part rules, the domain
/// may be a hostname (internationalized names are accepted) or an IP
/// literal such as `[192.0.2.1]`.
///
/// ```
/// use missive::Address;
///
/// # use std::error::Error;
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let address: Address = "jane@example.com".parse()?;
/// assert_eq!(address.user(), "jane");
/// assert_eq!(address.domain(), "example.com");
/// assert_eq!(address, Address::new("jane", "example.com")?);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialOrd, Ord, PartialEq, Eq, Hash)]
pub struct Address {
    full: String,
    /// Byte offset of the `@`
    at: usize,
}

impl Address {
    /// Build an address from its two halves, validating each of them.
    pub fn new<U: AsRef<str>, D: AsRef<str>>(user: U, domain: D) -> Result<Self, AddressError> {
        let (user, domain) = (user.as_ref(), domain.as_ref());
        validate_user(user)?;
        validate_domain(domain)?;

        Ok(Self {
            full: format!("{user}@{domain}"),
            at: user.len(),
        })
    }

    /// The part before the `@`
    pub fn user(&self) -> &str {
        &self.full[..self.at]
    }

    /// The part after the `@`
    pub fn domain(&self) -> &str {
        &self.full[self.at + 1..]
    }
}

fn validate_user(user: &str) -> Result<(), AddressError> {
    if EmailAddress::is_valid_local_part(user) {
        Ok(())
    } else {
        Err(AddressError::InvalidUser)
    }
}

fn validate_domain(domain: &str) -> Result<(), AddressError> {
    if is_valid_ascii_domain(domain) {
        return Ok(());
    }

    match domain_to_ascii(domain) {
        Ok(ascii) if is_valid_ascii_domain(&ascii) => Ok(()),
        _ => Err(AddressError::InvalidDomain),
    }
}

fn is_valid_ascii_domain(domain: &str) -> bool {
    if EmailAddress::is_valid_domain(domain) {
        return true;
    }

    let literal = domain
        .strip_prefix('[')
        .and_then(|ip| ip.strip_suffix(']'))
        .unwrap_or(domain);
    literal.parse::<IpAddr>().is_ok()
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (user, domain) = s.rsplit_once('@').ok_or(AddressError::MissingParts)?;
        if user.is_empty() || domain.is_empty() {
            return Err(AddressError::MissingParts);
        }

        Address::new(user, domain)
    }
}

impl TryFrom<String> for Address {
    type Error = AddressError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.full)
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        &self.full
    }
}

/// Errors raised while parsing an email address or a mailbox
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[non_exhaustive]
pub enum AddressError {
    /// Missing domain or user
    MissingParts,
    /// Unbalanced angle bracket
    Unbalanced,
    /// Invalid email user
    InvalidUser,
    /// Invalid email domain
    InvalidDomain,
    /// Input isn't a mailbox or a list of mailboxes
    InvalidInput,
}

impl Error for AddressError {}

impl Display for AddressError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(match self {
            AddressError::MissingParts => "Missing domain or user",
            AddressError::Unbalanced => "Unbalanced angle bracket",
            AddressError::InvalidUser => "Invalid email user",
            AddressError::InvalidDomain => "Invalid email domain",
            AddressError::InvalidInput => "Invalid input",
        })
    }
}
