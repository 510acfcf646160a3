use mime::Mime;

use crate::message::{
    body::Body,
    header::{ContentTransferEncoding, ContentType, Header, HeaderName, Headers},
    EmailFormat,
};

/// A MIME body part, either a leaf or a container
#[derive(Debug, Clone)]
pub enum Part {
    /// Leaf part with content
    Single(SinglePart),

    /// Container of other parts
    Multi(MultiPart),
}

impl EmailFormat for Part {
    fn format(&self, out: &mut Vec<u8>) {
        match self {
            Part::Single(part) => part.format(out),
            Part::Multi(part) => part.format(out),
        }
    }
}

impl Part {
    /// Headers and body, formatted with CRLF line endings
    pub fn formatted(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.format(&mut out);
        out
    }

    /// Media type of the part
    pub fn content_type(&self) -> &Mime {
        match self {
            Part::Single(part) => part.content_type(),
            Part::Multi(part) => part.content_type(),
        }
    }

    /// Headers of the part
    pub fn headers(&self) -> &Headers {
        match self {
            Part::Single(part) => part.headers(),
            Part::Multi(part) => part.headers(),
        }
    }

    /// Set a header
    ///
    /// `Content-Type` and `Content-Transfer-Encoding` follow the content of
    /// the part and are left unchanged.
    pub fn set_header<H: Header>(&mut self, header: H) {
        match self {
            Part::Single(part) => part.set_header(header),
            Part::Multi(part) => part.set_header(header),
        }
    }

    /// Whether this is a container
    pub fn is_multipart(&self) -> bool {
        matches!(self, Part::Multi(_))
    }

    /// Number of leaf parts in this part and its descendants
    pub fn leaf_count(&self) -> usize {
        match self {
            Part::Single(_) => 1,
            Part::Multi(part) => part.parts().iter().map(Part::leaf_count).sum(),
        }
    }
}

impl From<SinglePart> for Part {
    fn from(part: SinglePart) -> Self {
        Part::Single(part)
    }
}

impl From<MultiPart> for Part {
    fn from(part: MultiPart) -> Self {
        Part::Multi(part)
    }
}

/// Builder for a [`SinglePart`]
#[derive(Debug, Clone, Default)]
pub struct SinglePartBuilder {
    headers: Headers,
}

impl SinglePartBuilder {
    /// A builder with no headers
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a header
    ///
    /// `Content-Transfer-Encoding` is always taken from the body.
    pub fn header<H: Header>(mut self, header: H) -> Self {
        self.headers.set(header);
        self
    }

    /// Set the `Content-Type`
    pub fn content_type(self, content_type: ContentType) -> Self {
        self.header(content_type)
    }

    /// Finish the part with an encoded body
    ///
    /// Without a `Content-Type`, the part is `text/plain; charset=utf-8`.
    pub fn body(mut self, body: Body) -> SinglePart {
        let content_type = match self.headers.get::<ContentType>() {
            Some(content_type) => content_type,
            None => {
                self.headers.set(ContentType::TEXT_PLAIN);
                ContentType::TEXT_PLAIN
            }
        };
        self.headers.set(body.encoding());

        SinglePart {
            headers: self.headers,
            content_type: content_type.as_mime().clone(),
            body: body.into_vec(),
        }
    }
}

/// A leaf body part
///
/// ```
/// use missive::message::{header::ContentType, Body, SinglePart};
///
/// let part = SinglePart::builder()
///     .content_type(ContentType::TEXT_PLAIN)
///     .body(Body::new("Hello"));
///
/// assert_eq!(
///     String::from_utf8(part.formatted()).unwrap(),
///     concat!(
///         "Content-Type: text/plain; charset=utf-8\r\n",
///         "Content-Transfer-Encoding: 7bit\r\n",
///         "\r\n",
///         "Hello\r\n"
///     )
/// );
/// ```
#[derive(Debug, Clone)]
pub struct SinglePart {
    headers: Headers,
    content_type: Mime,
    body: Vec<u8>,
}

impl SinglePart {
    /// Start building a part
    #[inline]
    pub fn builder() -> SinglePartBuilder {
        SinglePartBuilder::new()
    }

    /// A `text/plain; charset=utf-8` part
    pub fn plain<S: Into<String>>(text: S) -> Self {
        Self::builder()
            .content_type(ContentType::TEXT_PLAIN)
            .body(Body::new(text.into()))
    }

    /// A `text/html; charset=utf-8` part
    pub fn html<S: Into<String>>(html: S) -> Self {
        Self::builder()
            .content_type(ContentType::TEXT_HTML)
            .body(Body::new(html.into()))
    }

    /// Headers of the part
    #[inline]
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Set a header, unless it is `Content-Type` or `Content-Transfer-Encoding`
    pub fn set_header<H: Header>(&mut self, header: H) {
        if !is_structural(&H::name()) {
            self.headers.set(header);
        }
    }

    /// Media type of the part
    #[inline]
    pub fn content_type(&self) -> &Mime {
        &self.content_type
    }

    /// `Content-Transfer-Encoding` the body was encoded with
    pub fn encoding(&self) -> Option<ContentTransferEncoding> {
        self.headers.get()
    }

    /// The encoded body
    #[inline]
    pub fn raw_body(&self) -> &[u8] {
        &self.body
    }

    /// Headers and body, formatted with CRLF line endings
    pub fn formatted(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.format(&mut out);
        out
    }
}

impl EmailFormat for SinglePart {
    fn format(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(self.headers.to_string().as_bytes());
        out.extend_from_slice(b"\r\n");
        out.extend_from_slice(&self.body);
        out.extend_from_slice(b"\r\n");
    }
}

fn is_structural(name: &HeaderName) -> bool {
    *name == ContentType::name() || *name == ContentTransferEncoding::name()
}

/// The kind of a [`MultiPart`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultiPartKind {
    /// Unrelated parts, usually a text and its attachments
    Mixed,

    /// Equivalent renderings of the same content, simplest first
    Alternative,

    /// A root part and the resources it refers to, like HTML and its images
    Related,
}

impl MultiPartKind {
    /// The `multipart/*` subtype
    pub fn subtype(self) -> &'static str {
        match self {
            Self::Mixed => "mixed",
            Self::Alternative => "alternative",
            Self::Related => "related",
        }
    }

    fn to_mime(self, boundary: &str) -> Mime {
        format!("multipart/{}; boundary=\"{}\"", self.subtype(), boundary)
            .parse()
            .expect("boundary only contains bchars")
    }
}

/// A random boundary of 40 alphanumeric characters
fn make_boundary() -> String {
    std::iter::repeat_with(fastrand::alphanumeric)
        .take(40)
        .collect()
}

// RFC 2046 bchars, minus space
fn is_valid_boundary(boundary: &str) -> bool {
    (1..=70).contains(&boundary.len())
        && boundary
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "'()+_,-./:=?".contains(c))
}

/// Builder for a [`MultiPart`]
#[derive(Debug, Clone)]
pub struct MultiPartBuilder {
    kind: MultiPartKind,
    boundary: Option<String>,
    headers: Headers,
}

impl MultiPartBuilder {
    /// A builder for the given kind
    pub fn new(kind: MultiPartKind) -> Self {
        Self {
            kind,
            boundary: None,
            headers: Headers::new(),
        }
    }

    /// Set a header
    ///
    /// `Content-Type` is always derived from the kind and boundary.
    pub fn header<H: Header>(mut self, header: H) -> Self {
        self.headers.set(header);
        self
    }

    /// Change the kind
    pub fn kind(mut self, kind: MultiPartKind) -> Self {
        self.kind = kind;
        self
    }

    /// Use a fixed boundary instead of a random one
    ///
    /// The boundary must be 1 to 70 characters made of letters, digits and
    /// `'()+_,-./:=?`. Any other value is ignored.
    pub fn boundary<S: Into<String>>(mut self, boundary: S) -> Self {
        let boundary = boundary.into();
        if is_valid_boundary(&boundary) {
            self.boundary = Some(boundary);
        }
        self
    }

    /// A container without parts
    pub fn build(mut self) -> MultiPart {
        let boundary = self.boundary.unwrap_or_else(make_boundary);
        let content_type = self.kind.to_mime(&boundary);
        self.headers
            .set(ContentType::from_mime(content_type.clone()));
        self.headers.remove::<ContentTransferEncoding>();

        MultiPart {
            kind: self.kind,
            boundary,
            content_type,
            headers: self.headers,
            parts: Vec::new(),
        }
    }

    /// A container holding `part`
    pub fn part(self, part: Part) -> MultiPart {
        self.build().part(part)
    }

    /// A container holding `part`
    pub fn singlepart(self, part: SinglePart) -> MultiPart {
        self.build().singlepart(part)
    }

    /// A container holding `part`
    pub fn multipart(self, part: MultiPart) -> MultiPart {
        self.build().multipart(part)
    }
}

/// A container body part
///
/// Children are written in order, each preceded by a `--boundary` line;
/// the last one is followed by `--boundary--`.
#[derive(Debug, Clone)]
pub struct MultiPart {
    kind: MultiPartKind,
    boundary: String,
    content_type: Mime,
    headers: Headers,
    parts: Vec<Part>,
}

impl MultiPart {
    /// Start building a container of the given kind
    pub fn builder(kind: MultiPartKind) -> MultiPartBuilder {
        MultiPartBuilder::new(kind)
    }

    /// Start building a `multipart/mixed` container
    pub fn mixed() -> MultiPartBuilder {
        MultiPart::builder(MultiPartKind::Mixed)
    }

    /// Start building a `multipart/alternative` container
    pub fn alternative() -> MultiPartBuilder {
        MultiPart::builder(MultiPartKind::Alternative)
    }

    /// Start building a `multipart/related` container
    pub fn related() -> MultiPartBuilder {
        MultiPart::builder(MultiPartKind::Related)
    }

    /// Append a child
    pub fn part(mut self, part: Part) -> Self {
        self.parts.push(part);
        self
    }

    /// Append a leaf child
    pub fn singlepart(self, part: SinglePart) -> Self {
        self.part(Part::Single(part))
    }

    /// Append a container child
    pub fn multipart(self, part: MultiPart) -> Self {
        self.part(Part::Multi(part))
    }

    /// Kind of the container
    #[inline]
    pub fn kind(&self) -> MultiPartKind {
        self.kind
    }

    /// Boundary separating the children
    #[inline]
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// `multipart/<kind>; boundary="<boundary>"`
    #[inline]
    pub fn content_type(&self) -> &Mime {
        &self.content_type
    }

    /// Headers of the container
    #[inline]
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Set a header
    ///
    /// `Content-Type` stays derived from the kind and boundary.
    pub fn set_header<H: Header>(&mut self, header: H) {
        if !is_structural(&H::name()) {
            self.headers.set(header);
        }
    }

    /// Children, in order
    #[inline]
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Headers, children and closing delimiter, formatted with CRLF line endings
    pub fn formatted(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.format(&mut out);
        out
    }
}

impl EmailFormat for MultiPart {
    fn format(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(self.headers.to_string().as_bytes());
        out.extend_from_slice(b"\r\n");

        for part in &self.parts {
            out.extend_from_slice(b"--");
            out.extend_from_slice(self.boundary.as_bytes());
            out.extend_from_slice(b"\r\n");
            part.format(out);
        }

        out.extend_from_slice(b"--");
        out.extend_from_slice(self.boundary.as_bytes());
        out.extend_from_slice(b"--\r\n");
    }
}
