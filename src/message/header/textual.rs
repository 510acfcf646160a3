use super::{Header, HeaderName, HeaderValue};
use crate::{message::Text, BoxError};

/// `Subject` of the message, defined in [RFC5322](https://tools.ietf.org/html/rfc5322#section-3.6.5)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject(Text);

impl Subject {
    /// The subject text
    pub fn text(&self) -> &Text {
        &self.0
    }
}

impl Header for Subject {
    fn name() -> HeaderName {
        HeaderName::new_from_ascii_str("Subject")
    }

    fn parse(s: &str) -> Result<Self, BoxError> {
        Ok(Self(Text::from(s)))
    }

    fn display(&self) -> HeaderValue {
        HeaderValue::encode_with(Self::name(), self.0.to_string(), |w| self.0.encode(w))
    }
}

impl From<Text> for Subject {
    fn from(text: Text) -> Self {
        Self(text)
    }
}

impl From<Subject> for Text {
    fn from(subject: Subject) -> Self {
        subject.0
    }
}

macro_rules! text_header {
    ($(#[$attr:meta])* Header($type_name: ident, $header_name: expr )) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $type_name(String);

        impl Header for $type_name {
            fn name() -> HeaderName {
                HeaderName::new_from_ascii_str($header_name)
            }

            fn parse(s: &str) -> Result<Self, BoxError> {
                Ok(Self(s.into()))
            }

            fn display(&self) -> HeaderValue {
                HeaderValue::new(Self::name(), self.0.clone())
            }
        }

        impl From<String> for $type_name {
            #[inline]
            fn from(text: String) -> Self {
                Self(text)
            }
        }

        impl AsRef<str> for $type_name {
            #[inline]
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

text_header!(
    /// `Content-ID` header, defined in [RFC2045](https://tools.ietf.org/html/rfc2045#section-7)
    ///
    /// Holds the identifier with its angle brackets, e.g. `<logo@example.com>`.
    Header(ContentId, "Content-ID")
);
text_header!(
    /// `Content-Description` header, defined in [RFC2045](https://tools.ietf.org/html/rfc2045#section-8)
    Header(ContentDescription, "Content-Description")
);
