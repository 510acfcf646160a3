use std::{
    fmt::{Display, Formatter as FmtFormatter, Result as FmtResult, Write},
    str::FromStr,
};

use mime::Mime;

use super::{Header, HeaderName, HeaderValue};
use crate::BoxError;

/// `Content-Type` of a body part
///
/// Defined in [RFC2045](https://tools.ietf.org/html/rfc2045#section-5)
#[derive(Debug, Clone, PartialEq)]
pub struct ContentType(Mime);

impl ContentType {
    /// `text/plain; charset=utf-8`
    pub const TEXT_PLAIN: ContentType = Self::from_mime(mime::TEXT_PLAIN_UTF_8);

    /// `text/html; charset=utf-8`
    pub const TEXT_HTML: ContentType = Self::from_mime(mime::TEXT_HTML_UTF_8);

    /// Wrap an existing media type
    pub const fn from_mime(mime: Mime) -> Self {
        Self(mime)
    }

    /// The wrapped media type
    pub fn as_mime(&self) -> &Mime {
        &self.0
    }
}

impl Header for ContentType {
    fn name() -> HeaderName {
        HeaderName::new_from_ascii_str("Content-Type")
    }

    fn parse(s: &str) -> Result<Self, BoxError> {
        Ok(Self(s.parse()?))
    }

    fn display(&self) -> HeaderValue {
        HeaderValue::new(Self::name(), self.0.to_string())
    }
}

impl FromStr for ContentType {
    type Err = mime::FromStrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

impl From<Mime> for ContentType {
    fn from(mime: Mime) -> Self {
        Self(mime)
    }
}

/// `Content-Transfer-Encoding` of a body part
///
/// Chosen automatically from the content of the body unless a part asks
/// for a specific one.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ContentTransferEncoding {
    /// ASCII, lines shorter than 1000 octets
    SevenBit,
    /// Mostly ASCII text
    QuotedPrintable,
    /// Arbitrary bytes
    Base64,
    /// UTF-8 text, needs 8BITMIME
    EightBit,
    /// Raw bytes, needs BINARYMIME
    Binary,
}

impl Display for ContentTransferEncoding {
    fn fmt(&self, f: &mut FmtFormatter<'_>) -> FmtResult {
        f.write_str(match *self {
            Self::SevenBit => "7bit",
            Self::QuotedPrintable => "quoted-printable",
            Self::Base64 => "base64",
            Self::EightBit => "8bit",
            Self::Binary => "binary",
        })
    }
}

impl FromStr for ContentTransferEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "7bit" => Ok(Self::SevenBit),
            "quoted-printable" => Ok(Self::QuotedPrintable),
            "base64" => Ok(Self::Base64),
            "8bit" => Ok(Self::EightBit),
            "binary" => Ok(Self::Binary),
            _ => Err(s.into()),
        }
    }
}

impl Header for ContentTransferEncoding {
    fn name() -> HeaderName {
        HeaderName::new_from_ascii_str("Content-Transfer-Encoding")
    }

    fn parse(s: &str) -> Result<Self, BoxError> {
        Ok(s.parse()?)
    }

    fn display(&self) -> HeaderValue {
        HeaderValue::new(Self::name(), self.to_string())
    }
}

/// `Content-Disposition` of a body part
///
/// Defined in [RFC2183](https://tools.ietf.org/html/rfc2183). File names are
/// written as RFC 2231 parameters, so they may contain any character.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentDisposition(HeaderValue);

impl ContentDisposition {
    /// Displayed as part of the message
    pub fn inline() -> Self {
        Self(HeaderValue::new(Self::name(), "inline".into()))
    }

    /// Displayed as part of the message, with a name to use if saved
    pub fn inline_with_name(file_name: &str) -> Self {
        Self::with_name("inline", file_name)
    }

    /// Separate from the main content, meant to be saved
    pub fn attachment(file_name: &str) -> Self {
        Self::with_name("attachment", file_name)
    }

    /// Separate from the main content, with no name suggested
    pub fn attachment_unnamed() -> Self {
        Self(HeaderValue::new(Self::name(), "attachment".into()))
    }

    fn with_name(kind: &str, file_name: &str) -> Self {
        let raw_value = format!("{kind}; filename=\"{file_name}\"");
        Self(HeaderValue::encode_with(Self::name(), raw_value, |w| {
            w.write_str(kind)?;
            w.write_char(';')?;
            w.space();
            email_encoding::headers::rfc2231::encode("filename", file_name, w)
        }))
    }

    /// `inline` or `attachment`
    pub fn kind(&self) -> &str {
        let raw = self.0.raw_value();
        raw.split(';').next().unwrap_or(raw).trim()
    }
}

impl Header for ContentDisposition {
    fn name() -> HeaderName {
        HeaderName::new_from_ascii_str("Content-Disposition")
    }

    fn parse(s: &str) -> Result<Self, BoxError> {
        Ok(Self(HeaderValue::new(Self::name(), s.into())))
    }

    fn display(&self) -> HeaderValue {
        self.0.clone()
    }
}
