//! Grammar for mailboxes and mailbox lists
//!
//! A pragmatic subset of RFC 5322 section 3.4: comments and folding white
//! space are not supported, UTF-8 is accepted anywhere `atext` is (RFC 6532).

use chumsky::prelude::*;

/// `(display name, (user, domain))`
pub(super) type ParsedMailbox = (Option<String>, (String, String));

// atext           =   ALPHA / DIGIT / "!" / "#" / "$" / "%" / "&" / "'" /
//                     "*" / "+" / "-" / "/" / "=" / "?" / "^" / "_" /
//                     "`" / "{" / "|" / "}" / "~" / UTF8-non-ascii
fn is_atext(c: &char) -> bool {
    c.is_ascii_alphanumeric() || "!#$%&'*+-/=?^_`{|}~".contains(*c) || !c.is_ascii()
}

// atom            =   1*atext
fn atom() -> impl Parser<char, String, Error = Simple<char>> {
    filter(is_atext).repeated().at_least(1).collect::<String>()
}

// dot-atom-text   =   1*atext *("." 1*atext)
fn dot_atom() -> impl Parser<char, String, Error = Simple<char>> {
    atom()
        .separated_by(just('.'))
        .at_least(1)
        .map(|atoms| atoms.join("."))
}

// quoted-string   =   DQUOTE *(qtext / quoted-pair) DQUOTE
//
// Yields the unescaped content.
fn quoted_string() -> impl Parser<char, String, Error = Simple<char>> {
    let quoted_pair = just('\\').ignore_then(any());

    none_of(['"', '\\', '\r', '\n'])
        .or(quoted_pair)
        .repeated()
        .collect::<String>()
        .delimited_by(just('"'), just('"'))
}

// local-part      =   dot-atom / quoted-string
fn local_part() -> impl Parser<char, String, Error = Simple<char>> {
    dot_atom().or(quoted_string().map(|content| {
        let mut quoted = String::with_capacity(content.len() + 2);
        quoted.push('"');
        for c in content.chars() {
            if matches!(c, '"' | '\\') {
                quoted.push('\\');
            }
            quoted.push(c);
        }
        quoted.push('"');
        quoted
    }))
}

// domain          =   dot-atom / domain-literal
// domain-literal  =   "[" *dtext "]"
fn domain() -> impl Parser<char, String, Error = Simple<char>> {
    let literal = none_of(['[', ']', '\\'])
        .repeated()
        .collect::<String>()
        .delimited_by(just('['), just(']'))
        .map(|inner| format!("[{inner}]"));

    dot_atom().or(literal)
}

// addr-spec       =   local-part "@" domain
fn addr_spec() -> impl Parser<char, (String, String), Error = Simple<char>> {
    local_part().then_ignore(just('@')).then(domain())
}

// display-name    =   phrase
// phrase          =   1*(atom / quoted-string) / obs-phrase
//
// Words are joined with a single space. Dots are accepted inside words,
// as in the obsolete phrase syntax still produced by many clients.
fn display_name() -> impl Parser<char, String, Error = Simple<char>> {
    let obs_word = filter(|c: &char| is_atext(c) || *c == '.')
        .repeated()
        .at_least(1)
        .collect::<String>();

    obs_word
        .or(quoted_string())
        .padded()
        .repeated()
        .at_least(1)
        .map(|words| words.join(" "))
}

// name-addr       =   [display-name] "<" addr-spec ">"
fn name_addr() -> impl Parser<char, ParsedMailbox, Error = Simple<char>> {
    display_name()
        .or_not()
        .then(addr_spec().delimited_by(just('<'), just('>')).padded())
        .map(|(name, addr)| (name.filter(|name| !name.trim().is_empty()), addr))
}

// mailbox         =   name-addr / addr-spec
pub(super) fn mailbox() -> impl Parser<char, ParsedMailbox, Error = Simple<char>> {
    name_addr()
        .or(addr_spec().map(|addr| (None, addr)))
        .padded()
}

// mailbox-list    =   mailbox *("," mailbox)
//
// An empty input is an empty list.
pub(super) fn mailbox_list() -> impl Parser<char, Vec<ParsedMailbox>, Error = Simple<char>> {
    mailbox().separated_by(just(',')).allow_trailing().padded()
}
