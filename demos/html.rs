use std::io::Write;

use maud::html;
use missive::message::MessageComposer;

fn main() {
    tracing_subscriber::fmt::init();

    // The recipient's name. We might obtain this from a form or their email address.
    let recipient = "Hei";

    let mut composer = MessageComposer::new();
    composer.set_expeditor("NoBody <nobody@domain.tld>".parse().unwrap());
    composer
        .recipients_mut()
        .push("Hei <hei@domain.tld>".parse().unwrap());
    composer.set_subject("Hello from missive!");

    let part = composer
        .construct_text_part(&mime::TEXT_HTML)
        .expect("text/html is supported")
        .as_html_mut()
        .expect("text/html gives an HTML part");

    // Embedded images are referenced from the HTML by their `cid:` URL.
    let logo = part.embed(
        b"GIF89a\x01\x00\x01\x00\x80\x00\x00\x00\x00\x00\xff\xff\xff!\xf9\x04\x01\x00\x00\x00\x00,\x00\x00\x00\x00\x01\x00\x01\x00\x00\x02\x02D\x01\x00;".to_vec(),
        mime::IMAGE_GIF,
    );

    let html = html! {
        head {
            title { "Hello from missive!" }
        }
        div style="display: flex; flex-direction: column; align-items: center;" {
            img src=(logo) alt="logo";
            h2 { "Hello from missive!" }
            p { "Dear " (recipient) "," }
            p { "This message has an HTML body, a plain text fallback and an inline image." }
        }
    };
    part.set_text(html.into_string());
    // Every message should have a plain text fallback.
    part.set_plain_text(format!("Dear {recipient},\n\nThis message has an HTML body."));

    let message = composer.construct().expect("failed to build email");

    std::io::stdout()
        .write_all(&message.formatted())
        .expect("failed to write message");
}
