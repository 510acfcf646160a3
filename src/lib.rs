//! Compose well-formed MIME email messages.
//!
//! `missive` takes the logical ingredients of an email (an expeditor,
//! recipients, a subject, one main text part and any number of
//! attachments) and assembles them into a correctly nested MIME tree with
//! consistent headers.
//!
//! ```rust
//! use missive::message::{MemoryAttachment, MessageComposer};
//!
//! # use std::error::Error;
//! # fn main() -> Result<(), Box<dyn Error>> {
//! let mut composer = MessageComposer::new();
//! composer.set_expeditor("a@x.com".parse()?);
//! composer.recipients_mut().push("b@x.com".parse()?);
//! composer.set_subject("Hi");
//! composer
//!     .construct_text_part(&mime::TEXT_PLAIN)?
//!     .set_text("hello");
//! composer.attach(Box::new(
//!     MemoryAttachment::new(b"%PDF-1.4".to_vec(), "application/pdf".parse()?)
//!         .filename("report.pdf"),
//! ));
//!
//! let message = composer.construct()?;
//! assert_eq!(message.body().content_type().essence_str(), "multipart/mixed");
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! * **tracing** (default): log construction decisions with [tracing](https://docs.rs/tracing)
//! * **serde**: (de)serialize [`Address`], [`message::Mailbox`] and [`message::Mailboxes`]

#![doc(html_root_url = "https://docs.rs/missive/0.1.0")]
#![forbid(unsafe_code)]
#![deny(trivial_numeric_casts, unused_import_braces, rust_2018_idioms)]
#![warn(missing_debug_implementations, missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod address;
pub mod error;
pub mod message;

pub use crate::{
    address::{Address, AddressError},
    error::Error,
    message::{Message, MessageComposer},
};

pub(crate) type BoxError = Box<dyn std::error::Error + Send + Sync>;
