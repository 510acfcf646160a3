//! Attachments: content added to a message next to its main text

use std::{
    fmt::Debug,
    fs,
    path::{Path, PathBuf},
};

use mime::Mime;

use crate::{
    message::{
        body::{Body, Content},
        header::{
            ContentDescription, ContentDisposition, ContentId, ContentTransferEncoding,
            ContentType,
        },
        Message, Part, SinglePart,
    },
    Error,
};

/// Something that can be attached to a message
///
/// [`MessageComposer::construct`][super::MessageComposer::construct] calls
/// [`render`](Attachment::render) once per construction, so rendering must
/// not consume the attachment.
pub trait Attachment: Debug + Send {
    /// Media type of the content
    fn media_type(&self) -> &Mime;

    /// File name suggested to the recipient
    fn name(&self) -> Option<&str>;

    /// Short description of the content
    fn description(&self) -> Option<&str>;

    /// Render into a body part, with its headers and encoded body
    fn render(&self) -> Result<Part, Error>;
}

/// How the recipient should present an attachment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Disposition {
    /// Separate from the main text, meant to be saved
    #[default]
    Attachment,
    /// Displayed with the main text, optionally referenced by content id
    Inline {
        /// Content id, without angle brackets
        content_id: Option<String>,
    },
}

/// What every provided attachment knows about itself
#[derive(Debug, Clone)]
struct Descriptor {
    media_type: Mime,
    name: Option<String>,
    description: Option<String>,
    disposition: Disposition,
    encoding: Option<ContentTransferEncoding>,
}

impl Descriptor {
    fn new(media_type: Mime) -> Self {
        Self {
            media_type,
            name: None,
            description: None,
            disposition: Disposition::default(),
            encoding: None,
        }
    }

    fn content_disposition(&self) -> ContentDisposition {
        match (&self.disposition, self.name.as_deref()) {
            (Disposition::Attachment, Some(name)) => ContentDisposition::attachment(name),
            (Disposition::Attachment, None) => ContentDisposition::attachment_unnamed(),
            (Disposition::Inline { .. }, Some(name)) => ContentDisposition::inline_with_name(name),
            (Disposition::Inline { .. }, None) => ContentDisposition::inline(),
        }
    }

    fn render(&self, data: Vec<u8>) -> Result<Part, Error> {
        // Textual content keeps a chance at 7bit or quoted-printable
        let content = if self.media_type.type_() == mime::TEXT {
            match String::from_utf8(data) {
                Ok(text) => Content::Text(text),
                Err(err) => Content::Bytes(err.into_bytes()),
            }
        } else {
            Content::Bytes(data)
        };

        let media_type = match &content {
            Content::Text(text)
                if !text.is_ascii() && self.media_type.get_param(mime::CHARSET).is_none() =>
            {
                with_utf8_charset(&self.media_type)?
            }
            _ => self.media_type.clone(),
        };

        let mut builder = SinglePart::builder()
            .content_type(ContentType::from_mime(media_type))
            .header(self.content_disposition());

        if let Disposition::Inline {
            content_id: Some(id),
        } = &self.disposition
        {
            builder = builder.header(ContentId::from(format!("<{id}>")));
        }
        if let Some(description) = &self.description {
            builder = builder.header(ContentDescription::from(description.clone()));
        }

        let body = match self.encoding {
            Some(encoding) => Body::with_encoding(content, encoding)?,
            None => Body::new(content),
        };

        Ok(Part::Single(builder.body(body)))
    }
}

fn with_utf8_charset(media_type: &Mime) -> Result<Mime, Error> {
    let raw = format!("{media_type}; charset=utf-8");
    raw.parse().map_err(|_| Error::InvalidMediaType(raw))
}

macro_rules! descriptor_setters {
    ($type_name: ident) => {
        impl $type_name {
            /// Set the file name suggested to the recipient
            pub fn filename<S: Into<String>>(mut self, name: S) -> Self {
                self.descriptor.name = Some(name.into());
                self
            }

            /// Set a short description, sent as `Content-Description`
            pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
                self.descriptor.description = Some(description.into());
                self
            }

            /// Set how the recipient should present the content
            pub fn disposition(mut self, disposition: Disposition) -> Self {
                self.descriptor.disposition = disposition;
                self
            }

            /// Present the content inline, referenced by `content_id`
            pub fn inline<S: Into<String>>(self, content_id: S) -> Self {
                self.disposition(Disposition::Inline {
                    content_id: Some(content_id.into()),
                })
            }

            /// Force a `Content-Transfer-Encoding` instead of picking the
            /// most compact one
            pub fn encoding(mut self, encoding: ContentTransferEncoding) -> Self {
                self.descriptor.encoding = Some(encoding);
                self
            }

            /// How the recipient should present the content
            pub fn content_disposition(&self) -> &Disposition {
                &self.descriptor.disposition
            }
        }
    };
}

/// Content held in memory
///
/// ```
/// use missive::message::{Attachment, MemoryAttachment};
///
/// # use std::error::Error;
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let report = MemoryAttachment::new(b"%PDF-1.4".to_vec(), "application/pdf".parse()?)
///     .filename("report.pdf")
///     .with_description("Monthly report");
///
/// assert_eq!(report.name(), Some("report.pdf"));
/// assert_eq!(report.render()?.content_type().essence_str(), "application/pdf");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MemoryAttachment {
    descriptor: Descriptor,
    data: Vec<u8>,
}

impl MemoryAttachment {
    /// Attach `data`, of type `media_type`
    pub fn new(data: Vec<u8>, media_type: Mime) -> Self {
        Self {
            descriptor: Descriptor::new(media_type),
            data,
        }
    }

    /// The raw content
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

descriptor_setters!(MemoryAttachment);

impl Attachment for MemoryAttachment {
    fn media_type(&self) -> &Mime {
        &self.descriptor.media_type
    }

    fn name(&self) -> Option<&str> {
        self.descriptor.name.as_deref()
    }

    fn description(&self) -> Option<&str> {
        self.descriptor.description.as_deref()
    }

    fn render(&self) -> Result<Part, Error> {
        self.descriptor.render(self.data.clone())
    }
}

/// Content read from a file each time it is rendered
///
/// The file name defaults to the last component of the path, the media
/// type to `application/octet-stream`.
#[derive(Debug, Clone)]
pub struct FileAttachment {
    descriptor: Descriptor,
    path: PathBuf,
}

impl FileAttachment {
    /// Attach the file at `path`
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        let path = path.into();
        let mut descriptor = Descriptor::new(mime::APPLICATION_OCTET_STREAM);
        descriptor.name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());

        Self { descriptor, path }
    }

    /// Set the media type of the file
    pub fn with_media_type(mut self, media_type: Mime) -> Self {
        self.descriptor.media_type = media_type;
        self
    }

    /// Path of the file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

descriptor_setters!(FileAttachment);

impl Attachment for FileAttachment {
    fn media_type(&self) -> &Mime {
        &self.descriptor.media_type
    }

    fn name(&self) -> Option<&str> {
        self.descriptor.name.as_deref()
    }

    fn description(&self) -> Option<&str> {
        self.descriptor.description.as_deref()
    }

    fn render(&self) -> Result<Part, Error> {
        let data = fs::read(&self.path)?;
        self.descriptor.render(data)
    }
}

/// An existing body part, or a whole message, attached as is
#[derive(Debug, Clone)]
pub struct PartAttachment {
    part: Part,
    name: Option<String>,
    description: Option<String>,
}

impl PartAttachment {
    /// Attach `part` without changing it
    pub fn new(part: Part) -> Self {
        Self {
            part,
            name: None,
            description: None,
        }
    }

    /// Forward `message` as a `message/rfc822` part
    ///
    /// The message is copied in its formatted form: later changes to it
    /// don't affect the attachment.
    pub fn message(message: &Message) -> Result<Self, Error> {
        const RFC822: &str = "message/rfc822";

        let media_type: Mime = RFC822
            .parse()
            .map_err(|_| Error::InvalidMediaType(RFC822.to_owned()))?;

        let content = match String::from_utf8(message.formatted()) {
            Ok(text) => Content::Text(text),
            Err(err) => Content::Bytes(err.into_bytes()),
        };

        let part = SinglePart::builder()
            .content_type(ContentType::from_mime(media_type))
            .header(ContentDisposition::attachment_unnamed())
            .body(Body::identity(content));

        Ok(Self::new(Part::Single(part)))
    }

    /// Set the file name suggested to the recipient
    ///
    /// Overrides the `Content-Disposition` of the part with an
    /// `attachment` disposition.
    pub fn filename<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set a short description, sent as `Content-Description`
    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The attached part
    pub fn part(&self) -> &Part {
        &self.part
    }
}

impl Attachment for PartAttachment {
    fn media_type(&self) -> &Mime {
        self.part.content_type()
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn render(&self) -> Result<Part, Error> {
        let mut part = self.part.clone();
        if let Some(name) = &self.name {
            part.set_header(ContentDisposition::attachment(name));
        }
        if let Some(description) = &self.description {
            part.set_header(ContentDescription::from(description.clone()));
        }

        Ok(part)
    }
}
