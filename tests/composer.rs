use std::time::{Duration, SystemTime};

use base64::{engine::general_purpose::STANDARD, Engine};
use missive::{
    message::{
        Attachment, FileAttachment, MemoryAttachment, MessageComposer, Part, PartAttachment,
    },
    Error,
};
use pretty_assertions::assert_eq;

fn composer() -> MessageComposer {
    let mut composer = MessageComposer::new();
    composer.set_expeditor("NoBody <nobody@domain.tld>".parse().unwrap());
    composer
        .recipients_mut()
        .push("Hei <hei@domain.tld>".parse().unwrap());
    composer.set_subject("Happy new year");
    composer.set_date(SystemTime::UNIX_EPOCH + Duration::from_secs(784887151));
    composer
}

fn formatted(composer: &MessageComposer) -> String {
    String::from_utf8(composer.construct().unwrap().formatted()).unwrap()
}

fn boundary(composer: &MessageComposer) -> (String, String) {
    let message = composer.construct().unwrap();
    let Part::Multi(mixed) = message.body() else {
        panic!("expected a multipart body");
    };
    (
        mixed.boundary().to_owned(),
        String::from_utf8(message.formatted()).unwrap(),
    )
}

#[test]
fn plain_text_message() {
    let mut composer = composer();
    composer
        .construct_text_part(&mime::TEXT_PLAIN)
        .unwrap()
        .set_text("Be happy!\nReally.");

    assert_eq!(
        formatted(&composer),
        concat!(
            "From: NoBody <nobody@domain.tld>\r\n",
            "To: Hei <hei@domain.tld>\r\n",
            "Subject: Happy new year\r\n",
            "Date: Tue, 15 Nov 1994 08:12:31 -0000\r\n",
            "MIME-Version: 1.0\r\n",
            "Content-Type: text/plain; charset=utf-8\r\n",
            "Content-Transfer-Encoding: 7bit\r\n",
            "\r\n",
            "Be happy!\r\n",
            "Really.\r\n"
        )
    );
}

#[test]
fn message_with_attachment() {
    let mut composer = composer();
    composer
        .construct_text_part(&mime::TEXT_PLAIN)
        .unwrap()
        .set_text("Be happy!");
    composer.attach(Box::new(
        MemoryAttachment::new(b"Hello world!".to_vec(), mime::TEXT_PLAIN).filename("hello.txt"),
    ));

    let (boundary, formatted) = boundary(&composer);

    assert_eq!(
        formatted,
        format!(
            concat!(
                "From: NoBody <nobody@domain.tld>\r\n",
                "To: Hei <hei@domain.tld>\r\n",
                "Subject: Happy new year\r\n",
                "Date: Tue, 15 Nov 1994 08:12:31 -0000\r\n",
                "MIME-Version: 1.0\r\n",
                "Content-Type: multipart/mixed;\r\n boundary=\"{b}\"\r\n",
                "\r\n",
                "--{b}\r\n",
                "Content-Type: text/plain; charset=utf-8\r\n",
                "Content-Transfer-Encoding: 7bit\r\n",
                "\r\n",
                "Be happy!\r\n",
                "--{b}\r\n",
                "Content-Type: text/plain\r\n",
                "Content-Disposition: attachment; filename=\"hello.txt\"\r\n",
                "Content-Transfer-Encoding: 7bit\r\n",
                "\r\n",
                "Hello world!\r\n",
                "--{b}--\r\n"
            ),
            b = boundary
        )
    );
}

#[test]
fn binary_attachment_round_trips_through_base64() {
    let payload: Vec<u8> = (0..=255).cycle().take(1000).collect();

    let mut composer = composer();
    composer.attach(Box::new(
        MemoryAttachment::new(payload.clone(), mime::APPLICATION_OCTET_STREAM)
            .filename("blob.bin"),
    ));

    let (boundary, formatted) = boundary(&composer);

    let start = formatted
        .find("Content-Transfer-Encoding: base64\r\n\r\n")
        .expect("base64 part");
    let encoded = &formatted[start..];
    let encoded = &encoded[encoded.find("\r\n\r\n").unwrap() + 4..];
    let encoded = &encoded[..encoded.find(&format!("\r\n--{boundary}--")).unwrap()];

    assert!(encoded.split("\r\n").all(|line| line.len() <= 76));
    let decoded = STANDARD.decode(encoded.replace("\r\n", "")).unwrap();
    assert_eq!(decoded, payload);
}

#[test]
fn non_ascii_headers_are_encoded() {
    let mut composer = MessageComposer::new();
    composer.set_expeditor("Кайо <kayo@example.com>".parse().unwrap());
    composer.set_subject("Привет");
    composer.attach(Box::new(
        MemoryAttachment::new(b"x".to_vec(), mime::TEXT_PLAIN).filename("отчёт.txt"),
    ));

    let formatted = formatted(&composer);

    assert!(formatted.starts_with("From: =?utf-8?b?"));
    assert!(formatted.contains("Subject: =?utf-8?b?"));
    assert!(formatted.contains("filename*"));
    assert!(formatted.contains("utf-8''"));
    assert!(formatted.is_ascii());
}

#[test]
fn long_headers_are_folded() {
    let mut composer = composer();
    composer.set_subject("word ".repeat(300));
    composer.attach(Box::new(
        MemoryAttachment::new(b"x".to_vec(), mime::TEXT_PLAIN)
            .with_description("a rather long description ".repeat(10)),
    ));

    let formatted = formatted(&composer);

    assert!(formatted.contains("\r\nSubject: word word "));
    assert!(formatted.contains("\r\nContent-Description: a rather long "));
    assert!(formatted.split("\r\n").all(|line| line.len() <= 78));
}

#[test]
fn html_with_alternative_and_attachment() {
    let mut composer = composer();
    let html = composer
        .construct_text_part(&mime::TEXT_HTML)
        .unwrap()
        .as_html_mut()
        .unwrap();
    let logo = html.embed(b"GIF89a".to_vec(), mime::IMAGE_GIF);
    html.set_text(format!("<p><img src=\"{logo}\"> Be happy!</p>"));
    html.set_plain_text("Be happy!");
    composer.attach(Box::new(MemoryAttachment::new(
        b"%PDF-1.4".to_vec(),
        mime::APPLICATION_PDF,
    )));

    let message = composer.construct().unwrap();
    let Part::Multi(mixed) = message.body() else {
        panic!("expected a multipart body");
    };

    let kinds: Vec<&str> = mixed
        .parts()
        .iter()
        .map(|part| part.content_type().essence_str())
        .collect();
    assert_eq!(kinds, ["multipart/alternative", "application/pdf"]);

    let Part::Multi(alternative) = &mixed.parts()[0] else {
        panic!("expected an alternative part");
    };
    let kinds: Vec<&str> = alternative
        .parts()
        .iter()
        .map(|part| part.content_type().essence_str())
        .collect();
    assert_eq!(kinds, ["text/plain", "multipart/related"]);
    assert_eq!(message.body().leaf_count(), 4);

    let formatted = String::from_utf8(message.formatted()).unwrap();
    let id = logo.strip_prefix("cid:").unwrap();
    assert!(formatted.contains(&format!("Content-ID: <{id}>\r\n")));
}

#[test]
fn file_attachment_errors_surface_from_construct() {
    let mut composer = composer();
    composer.attach(Box::new(FileAttachment::new(
        "/nonexistent/missive/archive.zip",
    )));

    match composer.construct() {
        Err(Error::Io(err)) => assert_eq!(err.kind(), std::io::ErrorKind::NotFound),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn file_attachment() {
    let path = std::env::temp_dir().join(format!("missive-it-{}.csv", unique_suffix()));
    std::fs::write(&path, "a,b\n1,2\n").unwrap();

    let mut composer = composer();
    composer.attach(Box::new(
        FileAttachment::new(&path)
            .with_media_type("text/csv".parse().unwrap())
            .filename("data.csv"),
    ));
    let formatted = formatted(&composer);
    std::fs::remove_file(&path).unwrap();

    assert!(formatted.contains(
        "Content-Type: text/csv\r\nContent-Disposition: attachment; filename=\"data.csv\"\r\n"
    ));
    assert!(formatted.contains("\r\n\r\na,b\r\n1,2\r\n"));
}

#[test]
fn forwarded_message() {
    let mut original = composer();
    original
        .construct_text_part(&mime::TEXT_PLAIN)
        .unwrap()
        .set_text("Original");
    let original = original.construct().unwrap();

    let mut composer = composer();
    composer
        .construct_text_part(&mime::TEXT_PLAIN)
        .unwrap()
        .set_text("See below");
    composer.attach(Box::new(PartAttachment::message(&original).unwrap()));

    assert_eq!(
        composer.attachment_at(0).unwrap().media_type().essence_str(),
        "message/rfc822"
    );

    let formatted = formatted(&composer);
    let inner = String::from_utf8(original.formatted()).unwrap();
    assert!(formatted.contains(&format!("Content-Transfer-Encoding: 7bit\r\n\r\n{inner}")));
}

#[test]
fn attachments_survive_construct() {
    let mut composer = composer();
    composer.attach(Box::new(MemoryAttachment::new(b"1".to_vec(), mime::TEXT_PLAIN)));

    let first = composer.construct().unwrap();
    let second = composer.construct().unwrap();

    assert_eq!(composer.attachment_count(), 1);
    assert_eq!(first.body().leaf_count(), second.body().leaf_count());

    let removed: Box<dyn Attachment> = composer.remove_attachment_at(0).unwrap();
    assert_eq!(removed.media_type(), &mime::TEXT_PLAIN);
    assert!(!composer.construct().unwrap().body().is_multipart());
}

fn unique_suffix() -> String {
    format!(
        "{}-{}",
        std::process::id(),
        SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    )
}
