//! The main text of a message

use mime::Mime;

use crate::{
    message::{
        body::Body,
        header::{ContentDisposition, ContentId, ContentType},
        MultiPart, Part, SinglePart,
    },
    Error,
};

/// The main text of a message
///
/// One variant per supported media type. Pick one with
/// [`TextPart::for_media_type`].
#[derive(Debug, Clone, PartialEq)]
pub enum TextPart {
    /// `text/plain`
    Plain(PlainTextPart),
    /// `text/html`, with an optional plain alternative and embedded objects
    Html(HtmlTextPart),
}

impl TextPart {
    /// A fresh, empty text part for `media_type`
    ///
    /// Parameters such as `charset` are ignored: text is always UTF-8.
    ///
    /// ```
    /// use missive::message::TextPart;
    ///
    /// assert!(TextPart::for_media_type(&mime::TEXT_HTML).is_ok());
    /// assert!(TextPart::for_media_type(&mime::IMAGE_PNG).is_err());
    /// ```
    pub fn for_media_type(media_type: &Mime) -> Result<Self, Error> {
        if media_type.type_() != mime::TEXT {
            return Err(Error::UnsupportedPartType(media_type.clone()));
        }

        if media_type.subtype() == mime::PLAIN {
            Ok(TextPart::Plain(PlainTextPart::default()))
        } else if media_type.subtype() == mime::HTML {
            Ok(TextPart::Html(HtmlTextPart::default()))
        } else {
            Err(Error::UnsupportedPartType(media_type.clone()))
        }
    }

    /// The media type this part was created for
    pub fn media_type(&self) -> Mime {
        match self {
            TextPart::Plain(_) => mime::TEXT_PLAIN_UTF_8,
            TextPart::Html(_) => mime::TEXT_HTML_UTF_8,
        }
    }

    /// The main text
    pub fn text(&self) -> &str {
        match self {
            TextPart::Plain(part) => part.text(),
            TextPart::Html(part) => part.text(),
        }
    }

    /// Replace the main text
    pub fn set_text<S: Into<String>>(&mut self, text: S) {
        match self {
            TextPart::Plain(part) => part.set_text(text),
            TextPart::Html(part) => part.set_text(text),
        }
    }

    /// The plain variant, if this is one
    pub fn as_plain(&self) -> Option<&PlainTextPart> {
        match self {
            TextPart::Plain(part) => Some(part),
            TextPart::Html(_) => None,
        }
    }

    /// The plain variant, if this is one
    pub fn as_plain_mut(&mut self) -> Option<&mut PlainTextPart> {
        match self {
            TextPart::Plain(part) => Some(part),
            TextPart::Html(_) => None,
        }
    }

    /// The HTML variant, if this is one
    pub fn as_html(&self) -> Option<&HtmlTextPart> {
        match self {
            TextPart::Html(part) => Some(part),
            TextPart::Plain(_) => None,
        }
    }

    /// The HTML variant, if this is one
    pub fn as_html_mut(&mut self) -> Option<&mut HtmlTextPart> {
        match self {
            TextPart::Html(part) => Some(part),
            TextPart::Plain(_) => None,
        }
    }

    /// Number of leaf parts [`render`](Self::render) produces
    pub fn part_count(&self) -> usize {
        match self {
            TextPart::Plain(_) => 1,
            TextPart::Html(part) => part.part_count(),
        }
    }

    /// Render into a body part
    ///
    /// Each call renders a fresh, independent part.
    pub fn render(&self) -> Result<Part, Error> {
        match self {
            TextPart::Plain(part) => Ok(Part::Single(part.render())),
            TextPart::Html(part) => part.render(),
        }
    }
}

/// Plain UTF-8 text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlainTextPart {
    text: String,
}

impl PlainTextPart {
    /// Plain text part holding `text`
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self { text: text.into() }
    }

    /// The text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text
    pub fn set_text<S: Into<String>>(&mut self, text: S) {
        self.text = text.into();
    }

    fn render(&self) -> SinglePart {
        SinglePart::plain(self.text.clone())
    }
}

/// An inline resource of an [`HtmlTextPart`], referenced as `cid:<id>`
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedObject {
    id: String,
    media_type: Mime,
    data: Vec<u8>,
}

impl EmbeddedObject {
    /// An object with an explicit content id, given without angle brackets
    pub fn new<S: Into<String>>(id: S, data: Vec<u8>, media_type: Mime) -> Self {
        Self {
            id: id.into(),
            media_type,
            data,
        }
    }

    /// Content id, without angle brackets
    pub fn id(&self) -> &str {
        &self.id
    }

    /// URL to use in the HTML to refer to this object
    pub fn reference(&self) -> String {
        format!("cid:{}", self.id)
    }

    /// Media type of the data
    pub fn media_type(&self) -> &Mime {
        &self.media_type
    }

    /// Raw data
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    fn render(&self) -> SinglePart {
        SinglePart::builder()
            .content_type(ContentType::from_mime(self.media_type.clone()))
            .header(ContentDisposition::inline())
            .header(ContentId::from(format!("<{}>", self.id)))
            .body(Body::new(self.data.clone()))
    }
}

/// HTML text, with an optional plain text alternative and embedded objects
///
/// ```
/// use missive::message::{HtmlTextPart, Part};
///
/// # use std::error::Error;
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let mut html = HtmlTextPart::new("");
/// let logo = html.embed(b"\x89PNG".to_vec(), mime::IMAGE_PNG);
/// html.set_text(format!("<img src=\"{logo}\">"));
/// html.set_plain_text("Our logo");
///
/// let part = html.render()?;
/// assert_eq!(part.content_type().essence_str(), "multipart/alternative");
/// assert_eq!(part.leaf_count(), 3);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HtmlTextPart {
    text: String,
    plain_text: Option<String>,
    objects: Vec<EmbeddedObject>,
}

impl HtmlTextPart {
    /// HTML part holding `html`
    pub fn new<S: Into<String>>(html: S) -> Self {
        Self {
            text: html.into(),
            ..Self::default()
        }
    }

    /// The HTML
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the HTML
    pub fn set_text<S: Into<String>>(&mut self, html: S) {
        self.text = html.into();
    }

    /// The plain text alternative, if any
    pub fn plain_text(&self) -> Option<&str> {
        self.plain_text.as_deref()
    }

    /// Set the plain text alternative
    pub fn set_plain_text<S: Into<String>>(&mut self, text: S) {
        self.plain_text = Some(text.into());
    }

    /// Drop the plain text alternative
    pub fn clear_plain_text(&mut self) {
        self.plain_text = None;
    }

    /// Embed `data` under a generated content id, returning the `cid:` URL
    /// that refers to it
    pub fn embed(&mut self, data: Vec<u8>, media_type: Mime) -> String {
        let id: String = std::iter::repeat_with(fastrand::alphanumeric)
            .take(24)
            .collect();
        let object = EmbeddedObject::new(format!("{id}@missive"), data, media_type);
        let reference = object.reference();
        self.objects.push(object);
        reference
    }

    /// Add an embedded object
    pub fn add_object(&mut self, object: EmbeddedObject) {
        self.objects.push(object);
    }

    /// Remove the embedded object with content id `id`
    pub fn remove_object(&mut self, id: &str) -> Option<EmbeddedObject> {
        let index = self.objects.iter().position(|object| object.id == id)?;
        Some(self.objects.remove(index))
    }

    /// Embedded objects, in order
    pub fn objects(&self) -> &[EmbeddedObject] {
        &self.objects
    }

    /// Number of leaf parts [`render`](Self::render) produces
    pub fn part_count(&self) -> usize {
        1 + self.objects.len() + usize::from(self.plain_text.is_some())
    }

    /// Render into a body part
    ///
    /// The HTML alone when there is nothing else. Objects are grouped with
    /// the HTML into `multipart/related`, and a plain text alternative puts
    /// everything into `multipart/alternative`, plain text first.
    pub fn render(&self) -> Result<Part, Error> {
        let html = SinglePart::html(self.text.clone());

        let rich = if self.objects.is_empty() {
            Part::Single(html)
        } else {
            let related = self
                .objects
                .iter()
                .fold(MultiPart::related().singlepart(html), |related, object| {
                    related.singlepart(object.render())
                });
            Part::Multi(related)
        };

        Ok(match &self.plain_text {
            Some(plain) => Part::Multi(
                MultiPart::alternative()
                    .singlepart(SinglePart::plain(plain.clone()))
                    .part(rich),
            ),
            None => rich,
        })
    }
}
