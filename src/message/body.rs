use std::ops::Deref;

use email_encoding::body::Encoding;

use crate::{message::header::ContentTransferEncoding, Error};

/// The encoded body of a [`SinglePart`][super::SinglePart]
///
/// Holds the bytes exactly as they will be written in the message, along
/// with the `Content-Transfer-Encoding` they were encoded with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Body {
    buf: Vec<u8>,
    encoding: ContentTransferEncoding,
}

/// Content to be encoded into a [`Body`]
///
/// Text gets its line endings converted to CRLF and may be sent as `7bit`
/// or `quoted-printable`. Bytes are left untouched and usually end up as
/// `base64`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    /// UTF-8 text
    Text(String),
    /// Arbitrary bytes
    Bytes(Vec<u8>),
}

impl Body {
    /// Encode `content` with the most compact encoding among `7bit`,
    /// `quoted-printable` and `base64`
    pub fn new<C: Into<Content>>(content: C) -> Self {
        let content = content.into().with_crlf();
        let encoding = content.best_encoding(false);
        Self::encode(content.into(), encoding)
    }

    /// Encode `content` with `encoding`
    ///
    /// Fails with [`Error::InvalidEncoding`] when `encoding` can't carry
    /// the content, for example `7bit` for non-ASCII text.
    pub fn with_encoding<C: Into<Content>>(
        content: C,
        encoding: ContentTransferEncoding,
    ) -> Result<Self, Error> {
        let content = content.into().with_crlf();

        let acceptable = match encoding {
            ContentTransferEncoding::SevenBit => {
                content.best_encoding(true) == ContentTransferEncoding::SevenBit
            }
            ContentTransferEncoding::EightBit => matches!(
                content.best_encoding(true),
                ContentTransferEncoding::SevenBit | ContentTransferEncoding::EightBit
            ),
            ContentTransferEncoding::QuotedPrintable
            | ContentTransferEncoding::Base64
            | ContentTransferEncoding::Binary => true,
        };
        if !acceptable {
            return Err(Error::InvalidEncoding(encoding));
        }

        Ok(Self::encode(content.into(), encoding))
    }

    /// Keep `content` unencoded, labelled `7bit`, `8bit` or `binary`
    ///
    /// Used for `message/rfc822` parts, which can't be transfer-encoded.
    pub fn identity<C: Into<Content>>(content: C) -> Self {
        let content = content.into();
        let encoding = match content.best_encoding(true) {
            ContentTransferEncoding::SevenBit => ContentTransferEncoding::SevenBit,
            ContentTransferEncoding::EightBit => ContentTransferEncoding::EightBit,
            _ => ContentTransferEncoding::Binary,
        };

        Self {
            buf: content.into(),
            encoding,
        }
    }

    /// A body that has already been encoded with `encoding`
    ///
    /// `buf` is written as is; it must not contain bare line feeds, lines
    /// over 998 octets or, unless `encoding` allows it, non-ASCII bytes.
    #[inline]
    pub fn dangerous_pre_encoded(buf: Vec<u8>, encoding: ContentTransferEncoding) -> Self {
        Self { buf, encoding }
    }

    fn encode(buf: Vec<u8>, encoding: ContentTransferEncoding) -> Self {
        let buf = match encoding {
            ContentTransferEncoding::SevenBit
            | ContentTransferEncoding::EightBit
            | ContentTransferEncoding::Binary => buf,
            ContentTransferEncoding::QuotedPrintable => quoted_printable::encode(buf),
            ContentTransferEncoding::Base64 => {
                let mut out =
                    String::with_capacity(email_encoding::body::base64::encoded_len(buf.len()));
                email_encoding::body::base64::encode(&buf, &mut out)
                    .expect("writing into a `String` never fails");
                out.into_bytes()
            }
        };

        Self { buf, encoding }
    }

    /// Length of the encoded body, in bytes
    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether the encoded body is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// The `Content-Transfer-Encoding` of the body
    #[inline]
    pub fn encoding(&self) -> ContentTransferEncoding {
        self.encoding
    }

    /// The encoded bytes
    #[inline]
    pub fn into_vec(self) -> Vec<u8> {
        self.buf
    }
}

impl AsRef<[u8]> for Body {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        &self.buf
    }
}

impl Content {
    /// The best encoding for the content; never `binary`
    fn best_encoding(&self, allow_8bit: bool) -> ContentTransferEncoding {
        let chosen = match self {
            Self::Text(s) => Encoding::choose(s.as_str(), allow_8bit),
            Self::Bytes(b) => Encoding::choose(b.as_slice(), allow_8bit),
        };

        match chosen {
            Encoding::SevenBit => ContentTransferEncoding::SevenBit,
            Encoding::EightBit => ContentTransferEncoding::EightBit,
            Encoding::QuotedPrintable => ContentTransferEncoding::QuotedPrintable,
            Encoding::Base64 => ContentTransferEncoding::Base64,
        }
    }

    fn with_crlf(self) -> Self {
        match self {
            Self::Text(text) => Self::Text(crlf_line_endings(&text)),
            bytes @ Self::Bytes(_) => bytes,
        }
    }
}

impl From<String> for Content {
    #[inline]
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for Content {
    #[inline]
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<Vec<u8>> for Content {
    #[inline]
    fn from(b: Vec<u8>) -> Self {
        Self::Bytes(b)
    }
}

impl From<&[u8]> for Content {
    #[inline]
    fn from(b: &[u8]) -> Self {
        Self::Bytes(b.to_vec())
    }
}

impl From<Content> for Vec<u8> {
    #[inline]
    fn from(content: Content) -> Self {
        match content {
            Content::Text(s) => s.into_bytes(),
            Content::Bytes(b) => b,
        }
    }
}

impl Deref for Content {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &Self::Target {
        match self {
            Self::Text(s) => s.as_bytes(),
            Self::Bytes(b) => b,
        }
    }
}

/// Convert every bare `\n` into `\r\n`
fn crlf_line_endings(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + s.len() / 32);
    let mut previous = None;
    for c in s.chars() {
        if c == '\n' && previous != Some('\r') {
            out.push('\r');
        }
        out.push(c);
        previous = Some(c);
    }
    out
}
