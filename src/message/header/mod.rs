//! Headers widely used in email messages

use std::{
    borrow::Cow,
    error::Error as StdError,
    fmt::{self, Display, Formatter, Write},
    ops::Deref,
};

use email_encoding::headers::writer::EmailWriter;

pub use self::{
    content::{ContentDisposition, ContentTransferEncoding, ContentType},
    date::Date,
    mailbox::{Bcc, Cc, From, To},
    special::{MimeVersion, MIME_VERSION_1_0},
    textual::{ContentDescription, ContentId, Subject},
};
use crate::BoxError;

mod content;
mod date;
mod mailbox;
mod special;
mod textual;

/// A typed header
pub trait Header: Clone {
    /// Name of the header
    fn name() -> HeaderName;

    /// Parse the raw, unencoded, value of the header
    fn parse(s: &str) -> Result<Self, BoxError>;

    /// Render the header into a value ready to be formatted
    fn display(&self) -> HeaderValue;
}

/// An ordered set of headers
///
/// Insertion order is kept when formatting. Names are compared case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct Headers {
    headers: Vec<HeaderValue>,
}

impl Headers {
    /// Create an empty set of headers
    #[inline]
    pub const fn new() -> Self {
        Self {
            headers: Vec::new(),
        }
    }

    /// Get the typed header `H`, if present and parseable
    pub fn get<H: Header>(&self) -> Option<H> {
        self.get_raw(&H::name()).and_then(|raw| H::parse(raw).ok())
    }

    /// Set the typed header `H`, replacing any previous value
    pub fn set<H: Header>(&mut self, header: H) {
        self.insert_raw(header.display());
    }

    /// Remove the typed header `H`, returning it if it was present
    pub fn remove<H: Header>(&mut self) -> Option<H> {
        self.remove_raw(&H::name())
            .and_then(|value| H::parse(&value.raw_value).ok())
    }

    /// Whether a header named like `H` is present
    pub fn has<H: Header>(&self) -> bool {
        self.find_index(&H::name()).is_some()
    }

    /// Get the raw, unencoded, value of the header called `name`
    pub fn get_raw(&self, name: &str) -> Option<&str> {
        self.find_index(name)
            .map(|i| self.headers[i].raw_value.as_str())
    }

    /// Insert a header value, replacing any previous value with the same name
    pub fn insert_raw(&mut self, value: HeaderValue) {
        match self.find_index(&value.name) {
            Some(i) => self.headers[i] = value,
            None => self.headers.push(value),
        }
    }

    /// Remove the header called `name`
    pub fn remove_raw(&mut self, name: &str) -> Option<HeaderValue> {
        self.find_index(name).map(|i| self.headers.remove(i))
    }

    /// Iterate over the headers, in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &HeaderValue> + '_ {
        self.headers.iter()
    }

    /// Number of headers
    #[inline]
    pub fn len(&self) -> usize {
        self.headers.len()
    }

    /// Whether there are no headers
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    fn find_index(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|value| name.eq_ignore_ascii_case(&value.name))
    }
}

impl Display for Headers {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for value in &self.headers {
            f.write_str(&value.name)?;
            f.write_str(": ")?;
            f.write_str(&value.encoded_value)?;
            f.write_str("\r\n")?;
        }

        Ok(())
    }
}

/// A header name was not a valid RFC 5322 field name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidHeaderName;

impl Display for InvalidHeaderName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("Invalid header name")
    }
}

impl StdError for InvalidHeaderName {}

/// The name of a header
#[derive(Debug, Clone)]
pub struct HeaderName(Cow<'static, str>);

impl HeaderName {
    /// Create a header name from an owned string
    pub fn new_from_ascii(ascii: String) -> Result<Self, InvalidHeaderName> {
        if is_valid_name(ascii.as_bytes()) {
            Ok(Self(Cow::Owned(ascii)))
        } else {
            Err(InvalidHeaderName)
        }
    }

    /// Create a header name from a static string
    ///
    /// Panics, at compile time when used in a `const`, if `ascii` isn't a valid name.
    pub const fn new_from_ascii_str(ascii: &'static str) -> Self {
        assert!(is_valid_name(ascii.as_bytes()), "invalid header name");
        Self(Cow::Borrowed(ascii))
    }
}

/// Printable ASCII except `:` and space, at most 76 characters
const fn is_valid_name(bytes: &[u8]) -> bool {
    if bytes.is_empty() || bytes.len() > 76 {
        return false;
    }

    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b <= b' ' || b >= 127 || b == b':' {
            return false;
        }
        i += 1;
    }
    true
}

impl Deref for HeaderName {
    type Target = str;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for HeaderName {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for HeaderName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq for HeaderName {
    fn eq(&self, other: &HeaderName) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl PartialEq<&str> for HeaderName {
    fn eq(&self, other: &&str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }
}

/// A header value, in both its raw and its encoded form
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderValue {
    name: HeaderName,
    raw_value: String,
    encoded_value: String,
}

impl HeaderValue {
    /// Build a header value, encoding `raw_value` as an unstructured header
    ///
    /// Printable ASCII values are folded at spaces, anything else is turned
    /// into RFC 2047 encoded words.
    pub fn new(name: HeaderName, raw_value: String) -> Self {
        let mut encoded_value = String::with_capacity(raw_value.len());
        {
            let mut w = EmailWriter::new(&mut encoded_value, name.len() + ": ".len(), 0, false);
            write_text(&raw_value, &mut w).expect("writing into a `String` never fails");
        }

        Self {
            name,
            raw_value,
            encoded_value,
        }
    }

    /// Build a header value from an already encoded value
    ///
    /// `encoded_value` is written as is: it must be ASCII and correctly folded.
    pub fn dangerous_new_pre_encoded(
        name: HeaderName,
        raw_value: String,
        encoded_value: String,
    ) -> Self {
        Self {
            name,
            raw_value,
            encoded_value,
        }
    }

    /// Encode `raw_value` with a writer that knows about the header name length
    pub(crate) fn encode_with<F>(name: HeaderName, raw_value: String, encode: F) -> Self
    where
        F: FnOnce(&mut EmailWriter<'_>) -> fmt::Result,
    {
        let mut encoded_value = String::new();
        {
            let mut w = EmailWriter::new(&mut encoded_value, name.len() + ": ".len(), 0, false);
            encode(&mut w).expect("writing into a `String` never fails");
        }

        Self::dangerous_new_pre_encoded(name, raw_value, encoded_value)
    }

    /// Name of the header
    pub fn name(&self) -> &HeaderName {
        &self.name
    }

    /// Value before encoding
    pub fn raw_value(&self) -> &str {
        &self.raw_value
    }

    /// Value as written in the message
    pub fn encoded_value(&self) -> &str {
        &self.encoded_value
    }
}

fn is_printable_ascii(c: char) -> bool {
    matches!(c, ' '..='~' | '\t')
}

/// Writes `s` folded at spaces when it's printable ASCII, as encoded words otherwise
pub(crate) fn write_text(s: &str, w: &mut EmailWriter<'_>) -> fmt::Result {
    if s.chars().all(is_printable_ascii) {
        w.folding().write_str(s)
    } else {
        email_encoding::headers::rfc2047::encode(s, w)
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::{HeaderName, HeaderValue, Headers};

    #[test]
    fn valid_headername() {
        assert!(HeaderName::new_from_ascii(String::from("From")).is_ok());
        assert!(HeaderName::new_from_ascii(String::from("X-Duck")).is_ok());
    }

    #[test]
    fn invalid_headername() {
        assert!(HeaderName::new_from_ascii(String::from("From:")).is_err());
        assert!(HeaderName::new_from_ascii(String::from("Date ")).is_err());
        assert!(HeaderName::new_from_ascii(String::from("✉️")).is_err());
        assert!(HeaderName::new_from_ascii(String::new()).is_err());
    }

    #[test]
    #[should_panic]
    fn invalid_headername_static() {
        HeaderName::new_from_ascii_str("From:");
    }

    #[test]
    fn names_compare_case_insensitively() {
        assert_eq!(HeaderName::new_from_ascii_str("Content-Type"), "content-type");
    }

    #[test]
    fn set_replaces_in_place() {
        let mut headers = Headers::new();
        headers.insert_raw(HeaderValue::new(
            HeaderName::new_from_ascii_str("X-First"),
            "1".into(),
        ));
        headers.insert_raw(HeaderValue::new(
            HeaderName::new_from_ascii_str("X-Second"),
            "2".into(),
        ));
        headers.insert_raw(HeaderValue::new(
            HeaderName::new_from_ascii_str("x-first"),
            "3".into(),
        ));

        assert_eq!(headers.len(), 2);
        assert_eq!(headers.to_string(), "x-first: 3\r\nX-Second: 2\r\n");
    }

    #[test]
    fn remove_raw() {
        let mut headers = Headers::new();
        headers.insert_raw(HeaderValue::new(
            HeaderName::new_from_ascii_str("X-Gone"),
            "soon".into(),
        ));

        let removed = headers.remove_raw("x-gone").unwrap();
        assert_eq!(removed.raw_value(), "soon");
        assert!(headers.is_empty());
    }

    #[test]
    fn long_value_is_folded() {
        let raw = "lorem ipsum ".repeat(20);
        let value = HeaderValue::new(
            HeaderName::new_from_ascii_str("Content-Description"),
            raw.clone(),
        );
        let encoded = value.encoded_value();

        assert_eq!(value.raw_value(), raw);
        assert_eq!(encoded.replace("\r\n", ""), raw);
        assert!(encoded.contains("\r\n "));
        let mut lines = encoded.split("\r\n");
        assert!("Content-Description: ".len() + lines.next().unwrap().len() <= 76);
        assert!(lines.all(|line| line.len() <= 76));
    }

    #[test]
    fn non_ascii_value_is_encoded() {
        let value = HeaderValue::new(
            HeaderName::new_from_ascii_str("Content-Description"),
            "Отчёт".into(),
        );

        assert_eq!(value.raw_value(), "Отчёт");
        assert!(value.encoded_value().starts_with("=?utf-8?b?"));
        assert!(value.encoded_value().is_ascii());
    }
}
