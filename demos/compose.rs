use std::io::Write;

use missive::message::{MemoryAttachment, MessageComposer};

fn main() {
    tracing_subscriber::fmt::init();

    let mut composer = MessageComposer::new();
    composer.set_expeditor("NoBody <nobody@domain.tld>".parse().unwrap());
    composer
        .recipients_mut()
        .push("Hei <hei@domain.tld>".parse().unwrap());
    composer
        .copy_recipients_mut()
        .push("Accounting <accounting@domain.tld>".parse().unwrap());
    composer.set_subject("Monthly report");

    composer
        .construct_text_part(&mime::TEXT_PLAIN)
        .expect("text/plain is supported")
        .set_text("Hello,\n\nThe report for this month is attached.\n");

    // A tiny but valid PDF header is enough for the recipient's client to pick a viewer.
    composer.attach(Box::new(
        MemoryAttachment::new(b"%PDF-1.4\n%\xe2\xe3\xcf\xd3\n".to_vec(), mime::APPLICATION_PDF)
            .filename("report.pdf")
            .with_description("Monthly report"),
    ));

    let message = composer.construct().expect("failed to build email");

    std::io::stdout()
        .write_all(&message.formatted())
        .expect("failed to write message");
}
