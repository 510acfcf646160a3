//! Compose MIME messages
//!
//! A [`MessageComposer`] holds the parts of a message being written: the
//! expeditor, the recipients, the subject, one main [`TextPart`] and any
//! number of [`Attachment`]s. [`MessageComposer::construct`] nests them into
//! a MIME tree:
//!
//! | text part | attachments | body                                         |
//! |-----------|-------------|----------------------------------------------|
//! | no        | none        | empty `text/plain`                           |
//! | yes       | none        | the rendered text part                       |
//! | no        | some        | `multipart/mixed` of the attachments         |
//! | yes       | some        | `multipart/mixed`, text part then attachments |
//!
//! ## Plain text with an attachment
//!
//! ```rust
//! use missive::message::{MemoryAttachment, MessageComposer};
//!
//! # use std::error::Error;
//! # fn main() -> Result<(), Box<dyn Error>> {
//! let mut composer = MessageComposer::new();
//! composer.set_expeditor("NoBody <nobody@domain.tld>".parse()?);
//! composer.recipients_mut().push("Hei <hei@domain.tld>".parse()?);
//! composer.set_subject("Happy new year");
//! composer
//!     .construct_text_part(&mime::TEXT_PLAIN)?
//!     .set_text("Be happy!");
//! composer.attach(Box::new(
//!     MemoryAttachment::new(b"Hello world!".to_vec(), mime::TEXT_PLAIN).filename("hello.txt"),
//! ));
//!
//! let message = composer.construct()?;
//! # Ok(())
//! # }
//! ```
//!
//! Which produces:
//!
//! ```sh
//! From: NoBody <nobody@domain.tld>
//! To: Hei <hei@domain.tld>
//! Subject: Happy new year
//! Date: Sat, 12 Dec 2020 16:33:19 -0000
//! MIME-Version: 1.0
//! Content-Type: multipart/mixed;
//!  boundary="0oVZ2r6AoLAhLlb0gPNSKy6BEqdS2IfwxrcbUuo1"
//!
//! --0oVZ2r6AoLAhLlb0gPNSKy6BEqdS2IfwxrcbUuo1
//! Content-Type: text/plain; charset=utf-8
//! Content-Transfer-Encoding: 7bit
//!
//! Be happy!
//! --0oVZ2r6AoLAhLlb0gPNSKy6BEqdS2IfwxrcbUuo1
//! Content-Type: text/plain
//! Content-Disposition: attachment; filename="hello.txt"
//! Content-Transfer-Encoding: 7bit
//!
//! Hello world!
//! --0oVZ2r6AoLAhLlb0gPNSKy6BEqdS2IfwxrcbUuo1--
//! ```
//!
//! ## HTML with an inline image
//!
//! ```rust
//! use missive::message::MessageComposer;
//!
//! # use std::error::Error;
//! # fn main() -> Result<(), Box<dyn Error>> {
//! let mut composer = MessageComposer::new();
//! composer.set_expeditor("nobody@domain.tld".parse()?);
//! composer.recipients_mut().push("hei@domain.tld".parse()?);
//!
//! let html = composer
//!     .construct_text_part(&mime::TEXT_HTML)?
//!     .as_html_mut()
//!     .expect("text/html gives an HTML part");
//! let logo = html.embed(b"GIF89a".to_vec(), mime::IMAGE_GIF);
//! html.set_text(format!("<p>Hello <img src=\"{logo}\"></p>"));
//! html.set_plain_text("Hello");
//!
//! let message = composer.construct()?;
//! assert_eq!(message.body().content_type().essence_str(), "multipart/alternative");
//! # Ok(())
//! # }
//! ```

pub use self::{
    attachment::{Attachment, Disposition, FileAttachment, MemoryAttachment, PartAttachment},
    body::{Body, Content},
    composer::MessageComposer,
    mailbox::{Mailbox, Mailboxes},
    mimebody::{MultiPart, MultiPartBuilder, MultiPartKind, Part, SinglePart, SinglePartBuilder},
    text::{Text, Word},
    textpart::{EmbeddedObject, HtmlTextPart, PlainTextPart, TextPart},
};

mod attachment;
mod body;
mod composer;
pub mod header;
mod mailbox;
mod mimebody;
mod text;
mod textpart;

use self::header::{ContentTransferEncoding, ContentType, Headers, MimeVersion, MIME_VERSION_1_0};

trait EmailFormat {
    fn format(&self, out: &mut Vec<u8>);
}

/// A composed message: top-level headers and a body part
///
/// The root part's own headers (`Content-Type`, `Content-Transfer-Encoding`)
/// are written right after the message headers.
#[derive(Debug, Clone)]
pub struct Message {
    headers: Headers,
    body: Part,
}

impl Message {
    /// A message with `headers` and `body`
    ///
    /// `MIME-Version: 1.0` is added when `headers` lacks a `MIME-Version`.
    /// Any `Content-Type` or `Content-Transfer-Encoding` in `headers` is
    /// dropped: the root part writes its own.
    pub fn new(mut headers: Headers, body: Part) -> Self {
        headers.remove::<ContentType>();
        headers.remove::<ContentTransferEncoding>();
        if !headers.has::<MimeVersion>() {
            headers.set(MIME_VERSION_1_0);
        }

        Self { headers, body }
    }

    /// Top-level headers
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// The root body part
    pub fn body(&self) -> &Part {
        &self.body
    }

    /// Split into headers and body
    pub fn into_parts(self) -> (Headers, Part) {
        (self.headers, self.body)
    }

    /// The whole message, formatted with CRLF line endings
    pub fn formatted(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.format(&mut out);
        out
    }
}

impl EmailFormat for Message {
    fn format(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(self.headers.to_string().as_bytes());
        self.body.format(out);
    }
}
