use super::{Header, HeaderName, HeaderValue};
use crate::BoxError;

/// Message format version, defined in [RFC2045](https://tools.ietf.org/html/rfc2045#section-4)
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MimeVersion {
    major: u8,
    minor: u8,
}

/// MIME version 1.0, the only one in use
pub const MIME_VERSION_1_0: MimeVersion = MimeVersion::new(1, 0);

impl MimeVersion {
    /// Build a version from its two components
    pub const fn new(major: u8, minor: u8) -> Self {
        MimeVersion { major, minor }
    }

    /// Major version
    #[inline]
    pub const fn major(self) -> u8 {
        self.major
    }

    /// Minor version
    #[inline]
    pub const fn minor(self) -> u8 {
        self.minor
    }
}

impl Header for MimeVersion {
    fn name() -> HeaderName {
        HeaderName::new_from_ascii_str("MIME-Version")
    }

    fn parse(s: &str) -> Result<Self, BoxError> {
        let (major, minor) = s
            .trim()
            .split_once('.')
            .ok_or("MIME-Version header doesn't contain '.'")?;

        Ok(MimeVersion::new(major.parse()?, minor.parse()?))
    }

    fn display(&self) -> HeaderValue {
        HeaderValue::new(Self::name(), format!("{}.{}", self.major, self.minor))
    }
}

impl Default for MimeVersion {
    fn default() -> Self {
        MIME_VERSION_1_0
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::{MimeVersion, MIME_VERSION_1_0};
    use crate::message::header::Headers;

    #[test]
    fn format_mime_version() {
        let mut headers = Headers::new();

        headers.set(MIME_VERSION_1_0);
        assert_eq!(headers.to_string(), "MIME-Version: 1.0\r\n");

        headers.set(MimeVersion::new(0, 1));
        assert_eq!(headers.to_string(), "MIME-Version: 0.1\r\n");
    }

    #[test]
    fn parse_mime_version() {
        let mut headers = Headers::new();
        headers.set(MIME_VERSION_1_0);

        assert_eq!(headers.get::<MimeVersion>(), Some(MIME_VERSION_1_0));
    }
}
