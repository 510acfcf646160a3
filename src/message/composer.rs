use std::time::SystemTime;

use mime::Mime;

use crate::{
    message::{
        header::{self, Bcc, Cc, Date, Headers, Subject, To},
        Attachment, Mailbox, Mailboxes, Message, MultiPart, Part, SinglePart, Text, TextPart,
    },
    Error,
};

/// Builder state for a message: addresses, subject, one main text part and
/// an ordered list of attachments
///
/// The composer owns what it is given. [`construct`](Self::construct) only
/// reads that state, so it can be called any number of times, and every
/// attachment stays in place until [`remove_attachment_at`](Self::remove_attachment_at)
/// hands it back.
///
/// ```
/// use missive::message::{Attachment, MemoryAttachment, MessageComposer};
///
/// # use std::error::Error;
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let mut composer = MessageComposer::new();
/// composer.attach(Box::new(MemoryAttachment::new(b"a".to_vec(), mime::TEXT_PLAIN)));
/// composer.attach(Box::new(MemoryAttachment::new(b"b".to_vec(), mime::TEXT_PLAIN)));
/// assert_eq!(composer.attachment_count(), 2);
///
/// let first = composer.remove_attachment_at(0)?;
/// assert_eq!(first.media_type(), &mime::TEXT_PLAIN);
/// assert_eq!(composer.attachment_count(), 1);
/// assert!(composer.remove_attachment_at(1).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct MessageComposer {
    expeditor: Option<Mailbox>,
    recipients: Mailboxes,
    copy_recipients: Mailboxes,
    blind_copy_recipients: Mailboxes,
    subject: Text,
    date: Option<SystemTime>,
    text_part: Option<TextPart>,
    attachments: Vec<Box<dyn Attachment>>,
}

impl MessageComposer {
    /// An empty composer: no addresses, empty subject, no text part and
    /// no attachments
    pub fn new() -> Self {
        Self::default()
    }

    /// The `From` mailbox
    pub fn expeditor(&self) -> Option<&Mailbox> {
        self.expeditor.as_ref()
    }

    /// Set the `From` mailbox
    pub fn set_expeditor(&mut self, expeditor: Mailbox) {
        self.expeditor = Some(expeditor);
    }

    /// `To` mailboxes
    pub fn recipients(&self) -> &Mailboxes {
        &self.recipients
    }

    /// `To` mailboxes, for changes in place
    pub fn recipients_mut(&mut self) -> &mut Mailboxes {
        &mut self.recipients
    }

    /// Replace the `To` mailboxes
    pub fn set_recipients(&mut self, recipients: Mailboxes) {
        self.recipients = recipients;
    }

    /// `Cc` mailboxes
    pub fn copy_recipients(&self) -> &Mailboxes {
        &self.copy_recipients
    }

    /// `Cc` mailboxes, for changes in place
    pub fn copy_recipients_mut(&mut self) -> &mut Mailboxes {
        &mut self.copy_recipients
    }

    /// Replace the `Cc` mailboxes
    pub fn set_copy_recipients(&mut self, copy_recipients: Mailboxes) {
        self.copy_recipients = copy_recipients;
    }

    /// `Bcc` mailboxes
    pub fn blind_copy_recipients(&self) -> &Mailboxes {
        &self.blind_copy_recipients
    }

    /// `Bcc` mailboxes, for changes in place
    pub fn blind_copy_recipients_mut(&mut self) -> &mut Mailboxes {
        &mut self.blind_copy_recipients
    }

    /// Replace the `Bcc` mailboxes
    pub fn set_blind_copy_recipients(&mut self, blind_copy_recipients: Mailboxes) {
        self.blind_copy_recipients = blind_copy_recipients;
    }

    /// The subject
    pub fn subject(&self) -> &Text {
        &self.subject
    }

    /// Replace the subject
    pub fn set_subject<T: Into<Text>>(&mut self, subject: T) {
        self.subject = subject.into();
    }

    /// The fixed `Date`, if any
    pub fn date(&self) -> Option<SystemTime> {
        self.date
    }

    /// Use `date` instead of the time of construction
    pub fn set_date(&mut self, date: SystemTime) {
        self.date = Some(date);
    }

    /// Replace the text part by an empty one of type `media_type`
    ///
    /// Only the type and subtype of `media_type` matter. On
    /// [`Error::UnsupportedPartType`] the current text part is kept.
    pub fn construct_text_part(&mut self, media_type: &Mime) -> Result<&mut TextPart, Error> {
        let part = TextPart::for_media_type(media_type)?;

        #[cfg(feature = "tracing")]
        if let Some(previous) = &self.text_part {
            tracing::debug!(
                "replacing {} text part by {}",
                previous.media_type().essence_str(),
                media_type.essence_str()
            );
        }

        Ok(self.text_part.insert(part))
    }

    /// The text part, once [`construct_text_part`](Self::construct_text_part) succeeded
    pub fn text_part(&self) -> Option<&TextPart> {
        self.text_part.as_ref()
    }

    /// The text part, for changes in place
    pub fn text_part_mut(&mut self) -> Option<&mut TextPart> {
        self.text_part.as_mut()
    }

    /// Append an attachment
    pub fn attach(&mut self, attachment: Box<dyn Attachment>) {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            "attaching {} at position {}",
            attachment.media_type(),
            self.attachments.len()
        );

        self.attachments.push(attachment);
    }

    /// Take back the attachment at `pos`, shifting the following ones down
    pub fn remove_attachment_at(&mut self, pos: usize) -> Result<Box<dyn Attachment>, Error> {
        self.check_index(pos)?;

        #[cfg(feature = "tracing")]
        tracing::debug!("removing attachment at position {}", pos);

        Ok(self.attachments.remove(pos))
    }

    /// The attachment at `pos`
    pub fn attachment_at(&self, pos: usize) -> Result<&dyn Attachment, Error> {
        self.check_index(pos)?;
        Ok(self.attachments[pos].as_ref())
    }

    /// The attachment at `pos`, for changes in place
    pub fn attachment_at_mut(&mut self, pos: usize) -> Result<&mut dyn Attachment, Error> {
        self.check_index(pos)?;
        Ok(self.attachments[pos].as_mut())
    }

    /// Number of attachments
    pub fn attachment_count(&self) -> usize {
        self.attachments.len()
    }

    /// All attachments, in order
    pub fn attachments(&self) -> Vec<&dyn Attachment> {
        self.attachments.iter().map(|a| a.as_ref()).collect()
    }

    /// All attachments, in order, for changes in place
    pub fn attachments_mut(&mut self) -> Vec<&mut dyn Attachment> {
        self.attachments
            .iter_mut()
            .map(|a| a.as_mut() as &mut dyn Attachment)
            .collect()
    }

    fn check_index(&self, pos: usize) -> Result<(), Error> {
        let len = self.attachments.len();
        if pos < len {
            Ok(())
        } else {
            Err(Error::IndexOutOfRange { index: pos, len })
        }
    }

    /// Assemble a message from the current state
    ///
    /// The body depends on what the composer holds:
    /// * nothing: an empty `text/plain` part
    /// * only a text part: the text part itself
    /// * attachments: a `multipart/mixed` container holding the text part,
    ///   if any, followed by every attachment in order
    ///
    /// `From`, `To`, `Cc` and `Bcc` are written when set, `Subject` always,
    /// then `Date` and `MIME-Version`. The composer is left untouched, and
    /// the first rendering error is returned as is.
    pub fn construct(&self) -> Result<Message, Error> {
        let body = match (&self.text_part, self.attachments.len()) {
            (None, 0) => {
                #[cfg(feature = "tracing")]
                tracing::debug!("constructing a message without body");

                Part::Single(SinglePart::plain(String::new()))
            }
            (Some(text), 0) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    "constructing a {} message",
                    text.media_type().essence_str()
                );

                text.render()?
            }
            (text, _) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    "constructing a multipart/mixed message with {} attachment(s){}",
                    self.attachments.len(),
                    if text.is_some() { " and a text part" } else { "" }
                );

                let mut mixed = MultiPart::mixed().build();
                if let Some(text) = text {
                    mixed = mixed.part(text.render()?);
                }
                for attachment in &self.attachments {
                    let part = attachment.render();

                    #[cfg(feature = "tracing")]
                    if let Err(err) = &part {
                        tracing::debug!(
                            "rendering {} attachment failed: {}",
                            attachment.media_type(),
                            err
                        );
                    }

                    mixed = mixed.part(part?);
                }

                Part::Multi(mixed)
            }
        };

        Ok(Message::new(self.headers(), body))
    }

    fn headers(&self) -> Headers {
        let mut headers = Headers::new();

        if let Some(expeditor) = &self.expeditor {
            headers.set::<header::From>(expeditor.clone().into());
        }
        if !self.recipients.is_empty() {
            headers.set(To::from(self.recipients.clone()));
        }
        if !self.copy_recipients.is_empty() {
            headers.set(Cc::from(self.copy_recipients.clone()));
        }
        if !self.blind_copy_recipients.is_empty() {
            headers.set(Bcc::from(self.blind_copy_recipients.clone()));
        }
        headers.set(Subject::from(self.subject.clone()));
        headers.set(Date::new(self.date.unwrap_or_else(SystemTime::now)));

        headers
    }
}

#[cfg(test)]
mod test {
    use std::time::{Duration, SystemTime};

    use pretty_assertions::assert_eq;

    use super::MessageComposer;
    use crate::{
        message::{
            header::{self, Date, MimeVersion},
            Attachment, FileAttachment, MemoryAttachment, Message, MultiPart, Part, Text, Word,
        },
        Error,
    };

    fn memory(data: &str, name: &str) -> Box<dyn Attachment> {
        Box::new(MemoryAttachment::new(data.as_bytes().to_vec(), mime::TEXT_PLAIN).filename(name))
    }

    fn multipart(message: &Message) -> &MultiPart {
        match message.body() {
            Part::Multi(multi) => multi,
            Part::Single(_) => panic!("expected a multipart body"),
        }
    }

    fn names(composer: &MessageComposer) -> Vec<String> {
        composer
            .attachments()
            .iter()
            .map(|a| a.name().unwrap_or_default().to_owned())
            .collect()
    }

    fn header_names(message: &Message) -> Vec<String> {
        message
            .headers()
            .iter()
            .map(|value| value.name().to_string())
            .collect()
    }

    #[test]
    fn empty_composer() {
        let composer = MessageComposer::new();
        let message = composer.construct().unwrap();

        assert_eq!(header_names(&message), ["Subject", "Date", "MIME-Version"]);
        assert_eq!(message.headers().get_raw("Subject"), Some(""));

        let Part::Single(body) = message.body() else {
            panic!("expected a single part");
        };
        assert_eq!(body.content_type(), &mime::TEXT_PLAIN_UTF_8);
        assert!(body.raw_body().is_empty());
    }

    #[test]
    fn address_headers() {
        let mut composer = MessageComposer::new();
        composer.set_expeditor("Alice <a@x.com>".parse().unwrap());
        composer.recipients_mut().push("b@x.com".parse().unwrap());
        composer.recipients_mut().push("b@x.com".parse().unwrap());
        composer.set_copy_recipients("c@x.com, d@x.com".parse().unwrap());
        composer.blind_copy_recipients_mut().push("e@x.com".parse().unwrap());
        composer.set_subject("Hi");

        let message = composer.construct().unwrap();
        let headers = message.headers();

        assert_eq!(
            header_names(&message),
            ["From", "To", "Cc", "Bcc", "Subject", "Date", "MIME-Version"]
        );
        assert_eq!(headers.get_raw("From"), Some("Alice <a@x.com>"));
        assert_eq!(headers.get_raw("To"), Some("b@x.com, b@x.com"));
        assert_eq!(headers.get_raw("Cc"), Some("c@x.com, d@x.com"));
        assert_eq!(headers.get_raw("Bcc"), Some("e@x.com"));
        assert_eq!(headers.get_raw("Subject"), Some("Hi"));
    }

    #[test]
    fn omits_missing_addresses() {
        let mut composer = MessageComposer::new();
        composer.copy_recipients_mut().push("c@x.com".parse().unwrap());

        let message = composer.construct().unwrap();

        assert_eq!(
            header_names(&message),
            ["Cc", "Subject", "Date", "MIME-Version"]
        );
        assert!(!message.headers().has::<header::From>());
        assert!(!message.headers().has::<header::To>());
    }

    #[test]
    fn encoded_subject() {
        let mut composer = MessageComposer::new();
        composer.set_subject(Text::from_iter([
            Word::new("Re: "),
            Word::encoded("Грузовик"),
        ]));

        let message = composer.construct().unwrap();
        let subject = message
            .headers()
            .iter()
            .find(|value| value.name() == &"Subject")
            .unwrap();

        assert_eq!(subject.raw_value(), "Re: Грузовик");
        assert!(subject.encoded_value().starts_with("Re: =?utf-8?b?"));
        assert_eq!(composer.subject().words().len(), 2);
    }

    #[test]
    fn fixed_date() {
        let mut composer = MessageComposer::new();
        composer.set_date(SystemTime::UNIX_EPOCH + Duration::from_secs(784887151));

        let message = composer.construct().unwrap();

        assert_eq!(
            message.headers().get_raw("Date"),
            Some("Tue, 15 Nov 1994 08:12:31 -0000")
        );
    }

    #[test]
    fn current_date() {
        let before = SystemTime::now() - Duration::from_secs(1);
        let message = MessageComposer::new().construct().unwrap();
        let date: SystemTime = message.headers().get::<Date>().unwrap().into();

        assert!(date >= before);
    }

    #[test]
    fn text_only_body_is_text_rendering() {
        let mut composer = MessageComposer::new();
        composer
            .construct_text_part(&mime::TEXT_PLAIN)
            .unwrap()
            .set_text("hello");

        let message = composer.construct().unwrap();
        let rendered = composer.text_part().unwrap().render().unwrap();

        assert!(!message.body().is_multipart());
        assert_eq!(message.body().formatted(), rendered.formatted());
    }

    #[test]
    fn html_text_part_is_not_wrapped() {
        let mut composer = MessageComposer::new();
        let html = composer
            .construct_text_part(&mime::TEXT_HTML)
            .unwrap()
            .as_html_mut()
            .unwrap();
        html.set_text("<p>hello</p>");
        html.set_plain_text("hello");

        let message = composer.construct().unwrap();

        assert_eq!(
            message.body().content_type().essence_str(),
            "multipart/alternative"
        );
        assert_eq!(message.body().leaf_count(), 2);
    }

    #[test]
    fn attachments_only() {
        let mut composer = MessageComposer::new();
        composer.attach(memory("one", "1.txt"));
        composer.attach(memory("two", "2.txt"));
        composer.attach(memory("three", "3.txt"));

        let message = composer.construct().unwrap();
        let mixed = multipart(&message);

        assert_eq!(mixed.content_type().essence_str(), "multipart/mixed");
        assert_eq!(mixed.parts().len(), 3);
        for (part, attachment) in mixed.parts().iter().zip(composer.attachments()) {
            assert_eq!(part.formatted(), attachment.render().unwrap().formatted());
        }
    }

    #[test]
    fn text_comes_first() {
        let mut composer = MessageComposer::new();
        composer.attach(memory("one", "1.txt"));
        composer
            .construct_text_part(&mime::TEXT_PLAIN)
            .unwrap()
            .set_text("body");
        composer.attach(memory("two", "2.txt"));

        let message = composer.construct().unwrap();
        let mixed = multipart(&message);

        assert_eq!(mixed.parts().len(), 3);
        assert_eq!(
            mixed.parts()[0].formatted(),
            composer.text_part().unwrap().render().unwrap().formatted()
        );
        for (part, attachment) in mixed.parts()[1..].iter().zip(composer.attachments()) {
            assert_eq!(part.formatted(), attachment.render().unwrap().formatted());
        }
    }

    #[test]
    fn multipart_text_part_is_one_child() {
        let mut composer = MessageComposer::new();
        let html = composer
            .construct_text_part(&mime::TEXT_HTML)
            .unwrap()
            .as_html_mut()
            .unwrap();
        html.set_text("<p>hi</p>");
        html.set_plain_text("hi");
        composer.attach(memory("one", "1.txt"));

        let message = composer.construct().unwrap();
        let mixed = multipart(&message);

        assert_eq!(mixed.parts().len(), 2);
        assert_eq!(
            mixed.parts()[0].content_type().essence_str(),
            "multipart/alternative"
        );
        assert_eq!(message.body().leaf_count(), 3);
    }

    #[test]
    fn remove_keeps_order() {
        let mut composer = MessageComposer::new();
        for name in ["a", "b", "c", "d"] {
            composer.attach(memory(name, name));
        }

        let removed = composer.remove_attachment_at(1).unwrap();

        assert_eq!(removed.name(), Some("b"));
        assert_eq!(names(&composer), ["a", "c", "d"]);
        assert_eq!(composer.attachment_count(), 3);
    }

    #[test]
    fn remove_out_of_range() {
        let mut composer = MessageComposer::new();
        composer.attach(memory("a", "a"));

        assert!(matches!(
            composer.remove_attachment_at(1),
            Err(Error::IndexOutOfRange { index: 1, len: 1 })
        ));
        assert!(matches!(
            composer.attachment_at(5),
            Err(Error::IndexOutOfRange { index: 5, len: 1 })
        ));
        assert!(composer.attachment_at_mut(1).is_err());
        assert_eq!(names(&composer), ["a"]);
    }

    #[test]
    fn positional_access() {
        let mut composer = MessageComposer::new();
        composer.attach(memory("a", "a"));
        composer.attach(Box::new(MemoryAttachment::new(
            b"%PDF".to_vec(),
            mime::APPLICATION_PDF,
        )));

        assert_eq!(composer.attachment_at(0).unwrap().name(), Some("a"));
        assert_eq!(
            composer.attachment_at_mut(1).unwrap().media_type(),
            &mime::APPLICATION_PDF
        );
        assert_eq!(composer.attachments_mut().len(), 2);
    }

    #[test]
    fn replace_text_part() {
        let mut composer = MessageComposer::new();
        composer
            .construct_text_part(&mime::TEXT_PLAIN)
            .unwrap()
            .set_text("first");

        let part = composer.construct_text_part(&mime::TEXT_HTML).unwrap();
        assert!(part.as_html().is_some());
        assert_eq!(part.text(), "");

        let part = composer.text_part().unwrap();
        assert_eq!(part.media_type(), mime::TEXT_HTML_UTF_8);
        assert!(part.as_plain().is_none());
    }

    #[test]
    fn unsupported_text_part_keeps_previous() {
        let mut composer = MessageComposer::new();
        composer
            .construct_text_part(&mime::TEXT_PLAIN)
            .unwrap()
            .set_text("kept");

        let result = composer.construct_text_part(&mime::TEXT_CSS);

        assert!(matches!(result, Err(Error::UnsupportedPartType(_))));
        assert_eq!(composer.text_part().unwrap().text(), "kept");
    }

    #[test]
    fn unsupported_text_part_on_empty_composer() {
        let mut composer = MessageComposer::new();

        assert!(composer.construct_text_part(&mime::IMAGE_PNG).is_err());
        assert!(composer.text_part().is_none());
    }

    #[test]
    fn construct_twice() {
        let mut composer = MessageComposer::new();
        composer.set_expeditor("a@x.com".parse().unwrap());
        composer.recipients_mut().push("b@x.com".parse().unwrap());
        composer.set_subject("Twice");
        composer.set_date(SystemTime::UNIX_EPOCH);
        composer
            .construct_text_part(&mime::TEXT_PLAIN)
            .unwrap()
            .set_text("hello");
        composer.attach(memory("a", "a.txt"));

        let first = composer.construct().unwrap();
        let second = composer.construct().unwrap();

        assert_eq!(header_names(&first), header_names(&second));
        for name in ["From", "To", "Subject", "Date", "MIME-Version"] {
            assert_eq!(first.headers().get_raw(name), second.headers().get_raw(name));
        }

        let (first, second) = (multipart(&first), multipart(&second));
        assert_eq!(first.kind(), second.kind());
        assert_eq!(first.parts().len(), second.parts().len());
        for (a, b) in first.parts().iter().zip(second.parts()) {
            assert_eq!(a.formatted(), b.formatted());
        }
        assert_eq!(composer.attachment_count(), 1);
    }

    #[test]
    fn message_outlives_composer() {
        let mut composer = MessageComposer::new();
        composer.attach(memory("payload", "p.txt"));
        let message = composer.construct().unwrap();

        let mut composer = composer;
        let _ = composer.remove_attachment_at(0).unwrap();
        drop(composer);

        assert_eq!(multipart(&message).parts().len(), 1);
        assert!(String::from_utf8(message.formatted())
            .unwrap()
            .contains("payload"));
    }

    #[test]
    fn report_example() {
        let mut composer = MessageComposer::new();
        composer.set_expeditor("a@x.com".parse().unwrap());
        composer.recipients_mut().push("b@x.com".parse().unwrap());
        composer.set_subject("Hi");
        composer
            .construct_text_part(&mime::TEXT_PLAIN)
            .unwrap()
            .set_text("hello");
        composer.attach(Box::new(
            MemoryAttachment::new(b"%PDF-1.4".to_vec(), mime::APPLICATION_PDF)
                .filename("report.pdf"),
        ));

        let message = composer.construct().unwrap();
        assert_eq!(message.headers().get_raw("From"), Some("a@x.com"));
        assert_eq!(message.headers().get_raw("To"), Some("b@x.com"));
        assert_eq!(message.headers().get_raw("Subject"), Some("Hi"));
        assert!(message.headers().has::<MimeVersion>());

        let mixed = multipart(&message);
        assert_eq!(mixed.parts().len(), 2);

        let Part::Single(text) = &mixed.parts()[0] else {
            panic!("expected a single part");
        };
        assert_eq!(text.content_type(), &mime::TEXT_PLAIN_UTF_8);
        assert_eq!(text.raw_body(), b"hello");

        let report = &mixed.parts()[1];
        assert_eq!(report.content_type(), &mime::APPLICATION_PDF);
        assert_eq!(
            report.headers().get_raw("Content-Disposition"),
            Some("attachment; filename=\"report.pdf\"")
        );
    }

    #[test]
    fn root_content_type_follows_headers() {
        let mut composer = MessageComposer::new();
        composer.attach(memory("a", "a.txt"));

        let message = composer.construct().unwrap();
        let formatted = String::from_utf8(message.formatted()).unwrap();

        assert!(formatted.contains(&format!(
            "MIME-Version: 1.0\r\nContent-Type: multipart/mixed;\r\n boundary=\"{}\"\r\n\r\n",
            multipart(&message).boundary()
        )));
    }

    #[test]
    fn render_error_propagates() {
        let mut composer = MessageComposer::new();
        composer.attach(memory("a", "a.txt"));
        composer.attach(Box::new(FileAttachment::new(
            "/nonexistent/missive/report.pdf",
        )));

        assert!(matches!(composer.construct(), Err(Error::Io(_))));
        assert_eq!(composer.attachment_count(), 2);
    }
}
