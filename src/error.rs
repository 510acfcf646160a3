//! Error type for message composition

use std::{
    error::Error as StdError,
    fmt::{self, Display, Formatter},
    io,
};

use mime::Mime;

use crate::message::header::ContentTransferEncoding;

/// Error type for message composition
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// No text part variant implements the requested media type
    UnsupportedPartType(Mime),
    /// Attachment position outside of `0..len`
    IndexOutOfRange {
        /// Requested position
        index: usize,
        /// Number of attachments at the time of the request
        len: usize,
    },
    /// The content of an attachment can't be represented with the requested encoding
    InvalidEncoding(ContentTransferEncoding),
    /// A media type built while rendering a part is not valid
    InvalidMediaType(String),
    /// An attachment source couldn't be read
    Io(io::Error),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnsupportedPartType(mime) => {
                write!(f, "no text part implements media type {}", mime)
            }
            Error::IndexOutOfRange { index, len } => write!(
                f,
                "attachment index {} out of range for {} attachment(s)",
                index, len
            ),
            Error::InvalidEncoding(encoding) => {
                write!(f, "content can't be encoded as {}", encoding)
            }
            Error::InvalidMediaType(raw) => write!(f, "invalid media type: {}", raw),
            Error::Io(err) => write!(f, "attachment source: {}", err),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}
