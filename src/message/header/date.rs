use std::time::SystemTime;

use httpdate::HttpDate;

use super::{Header, HeaderName, HeaderValue};
use crate::BoxError;

/// Message `Date` header
///
/// Defined in [RFC5322](https://tools.ietf.org/html/rfc5322#section-3.3).
/// Second precision; the zone is always written as `-0000`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Date(HttpDate);

impl Date {
    /// Build a `Date` from a [`SystemTime`]
    pub fn new(st: SystemTime) -> Self {
        Self(st.into())
    }

    /// The current date
    pub fn now() -> Self {
        Self::new(SystemTime::now())
    }
}

impl Header for Date {
    fn name() -> HeaderName {
        HeaderName::new_from_ascii_str("Date")
    }

    fn parse(s: &str) -> Result<Self, BoxError> {
        // httpdate only understands the obsolete `GMT` zone
        let s = match s.strip_suffix("-0000") {
            Some(prefix) => format!("{prefix}GMT"),
            None => s.to_owned(),
        };

        Ok(Self(s.parse::<HttpDate>()?))
    }

    fn display(&self) -> HeaderValue {
        let http = self.0.to_string();
        let val = match http.strip_suffix("GMT") {
            Some(prefix) => format!("{prefix}-0000"),
            None => http,
        };

        HeaderValue::new(Self::name(), val)
    }
}

impl From<SystemTime> for Date {
    fn from(st: SystemTime) -> Self {
        Self::new(st)
    }
}

impl From<Date> for SystemTime {
    fn from(this: Date) -> SystemTime {
        this.0.into()
    }
}
