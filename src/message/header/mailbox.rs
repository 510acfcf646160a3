use super::{Header, HeaderName, HeaderValue};
use crate::{
    message::mailbox::{Mailbox, Mailboxes},
    BoxError,
};

macro_rules! mailbox_header {
    ($(#[$doc:meta])*($type_name: ident, $header_name: expr)) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $type_name(Mailbox);

        impl Header for $type_name {
            fn name() -> HeaderName {
                HeaderName::new_from_ascii_str($header_name)
            }

            fn parse(s: &str) -> Result<Self, BoxError> {
                let mailbox: Mailbox = s.parse()?;
                Ok(Self(mailbox))
            }

            fn display(&self) -> HeaderValue {
                HeaderValue::encode_with(Self::name(), self.0.to_string(), |w| self.0.encode(w))
            }
        }

        impl std::convert::From<Mailbox> for $type_name {
            #[inline]
            fn from(mailbox: Mailbox) -> Self {
                Self(mailbox)
            }
        }

        impl std::convert::From<$type_name> for Mailbox {
            #[inline]
            fn from(this: $type_name) -> Mailbox {
                this.0
            }
        }
    };
}

macro_rules! mailboxes_header {
    ($(#[$doc:meta])*($type_name: ident, $header_name: expr)) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $type_name(Mailboxes);

        impl Header for $type_name {
            fn name() -> HeaderName {
                HeaderName::new_from_ascii_str($header_name)
            }

            fn parse(s: &str) -> Result<Self, BoxError> {
                let mailboxes: Mailboxes = s.parse()?;
                Ok(Self(mailboxes))
            }

            fn display(&self) -> HeaderValue {
                HeaderValue::encode_with(Self::name(), self.0.to_string(), |w| self.0.encode(w))
            }
        }

        impl std::convert::From<Mailboxes> for $type_name {
            #[inline]
            fn from(mailboxes: Mailboxes) -> Self {
                Self(mailboxes)
            }
        }

        impl std::convert::From<$type_name> for Mailboxes {
            #[inline]
            fn from(this: $type_name) -> Mailboxes {
                this.0
            }
        }
    };
}

mailbox_header! {
    /// `From` header, the expeditor of the message
    (From, "From")
}

mailboxes_header! {
    /// `To` header, the primary recipients
    (To, "To")
}

mailboxes_header! {
    /// `Cc` header, the carbon copy recipients
    (Cc, "Cc")
}

mailboxes_header! {
    /// `Bcc` header, the blind carbon copy recipients
    ///
    /// Kept in the composed message; whoever delivers it decides whether
    /// to strip it.
    (Bcc, "Bcc")
}
