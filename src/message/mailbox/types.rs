use std::{
    fmt::{Display, Formatter, Result as FmtResult, Write},
    mem,
    slice::{Iter, IterMut},
    str::FromStr,
};

use chumsky::prelude::*;
use email_encoding::headers::writer::EmailWriter;

use super::parsers;
use crate::address::{Address, AddressError};

/// An email address with an optional display name
///
/// Formatted as `Name <user@domain>`, or just `user@domain` without a name.
///
/// ```
/// use missive::{message::Mailbox, Address};
///
/// # use std::error::Error;
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let parsed: Mailbox = "Jane Doe <jane@example.com>".parse()?;
/// let built = Mailbox::new(Some("Jane Doe".into()), Address::new("jane", "example.com")?);
/// assert_eq!(parsed, built);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialOrd, Ord, PartialEq, Eq, Hash)]
pub struct Mailbox {
    /// Display name
    pub name: Option<String>,

    /// Address
    pub email: Address,
}

impl Mailbox {
    /// Create a mailbox from an optional display name and an address
    pub fn new(name: Option<String>, email: Address) -> Self {
        Mailbox { name, email }
    }

    /// Write the mailbox into a header, encoding a non-ASCII name
    pub(crate) fn encode(&self, w: &mut EmailWriter<'_>) -> FmtResult {
        match self.display_name() {
            Some(name) => {
                email_encoding::headers::quoted_string::encode(name, w)?;
                w.space();
                w.write_char('<')?;
                w.write_str(self.email.as_ref())?;
                w.write_char('>')
            }
            None => w.write_str(self.email.as_ref()),
        }
    }

    fn display_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

impl Display for Mailbox {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self.display_name() {
            Some(name) => {
                write_phrase(f, name)?;
                write!(f, " <{}>", self.email)
            }
            None => self.email.fmt(f),
        }
    }
}

impl<S: Into<String>, T: AsRef<str>> TryFrom<(S, T)> for Mailbox {
    type Error = AddressError;

    fn try_from((name, address): (S, T)) -> Result<Self, Self::Error> {
        Ok(Mailbox::new(Some(name.into()), address.as_ref().parse()?))
    }
}

impl FromStr for Mailbox {
    type Err = AddressError;

    fn from_str(src: &str) -> Result<Mailbox, Self::Err> {
        let (name, (user, domain)) = parsers::mailbox()
            .then_ignore(end())
            .parse(src)
            .map_err(|_errs| AddressError::InvalidInput)?;

        Ok(Mailbox::new(name, Address::new(user, domain)?))
    }
}

impl From<Address> for Mailbox {
    fn from(email: Address) -> Self {
        Self::new(None, email)
    }
}

/// An ordered list of [`Mailbox`]es
///
/// Duplicates are kept, and so is insertion order.
///
/// ```
/// use missive::message::Mailboxes;
///
/// # use std::error::Error;
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let mut list: Mailboxes = "a@example.com, B <b@example.com>".parse()?;
/// list.push("c@example.com".parse()?);
/// assert_eq!(list.len(), 3);
///
/// let removed = list.remove(0);
/// assert_eq!(removed.map(|m| m.to_string()), Some("a@example.com".to_owned()));
/// assert_eq!(list.to_string(), "B <b@example.com>, c@example.com");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default, PartialOrd, Ord, PartialEq, Eq, Hash)]
pub struct Mailboxes(Vec<Mailbox>);

impl Mailboxes {
    /// An empty list
    pub const fn new() -> Self {
        Mailboxes(Vec::new())
    }

    /// Append a mailbox, builder style
    pub fn with(mut self, mbox: Mailbox) -> Self {
        self.0.push(mbox);
        self
    }

    /// Append a mailbox
    pub fn push(&mut self, mbox: Mailbox) {
        self.0.push(mbox);
    }

    /// The mailbox at `index`
    pub fn get(&self, index: usize) -> Option<&Mailbox> {
        self.0.get(index)
    }

    /// Remove the mailbox at `index`, shifting the following ones down
    pub fn remove(&mut self, index: usize) -> Option<Mailbox> {
        (index < self.0.len()).then(|| self.0.remove(index))
    }

    /// Remove every mailbox
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Number of mailboxes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the list is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the mailboxes, in order
    pub fn iter(&self) -> Iter<'_, Mailbox> {
        self.0.iter()
    }

    /// Iterate mutably over the mailboxes, in order
    pub fn iter_mut(&mut self) -> IterMut<'_, Mailbox> {
        self.0.iter_mut()
    }

    pub(crate) fn encode(&self, w: &mut EmailWriter<'_>) -> FmtResult {
        let mut first = true;
        for mailbox in self.iter() {
            if !mem::take(&mut first) {
                w.write_char(',')?;
                w.space();
            }

            mailbox.encode(w)?;
        }

        Ok(())
    }
}

impl From<Mailbox> for Mailboxes {
    fn from(mailbox: Mailbox) -> Self {
        Mailboxes(vec![mailbox])
    }
}

impl From<Vec<Mailbox>> for Mailboxes {
    fn from(vec: Vec<Mailbox>) -> Self {
        Mailboxes(vec)
    }
}

impl From<Mailboxes> for Vec<Mailbox> {
    fn from(mailboxes: Mailboxes) -> Vec<Mailbox> {
        mailboxes.0
    }
}

impl FromIterator<Mailbox> for Mailboxes {
    fn from_iter<T: IntoIterator<Item = Mailbox>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<Mailbox> for Mailboxes {
    fn extend<T: IntoIterator<Item = Mailbox>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}

impl IntoIterator for Mailboxes {
    type Item = Mailbox;
    type IntoIter = std::vec::IntoIter<Mailbox>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Mailboxes {
    type Item = &'a Mailbox;
    type IntoIter = Iter<'a, Mailbox>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Display for Mailboxes {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let mut first = true;
        for mbox in self.iter() {
            if !mem::take(&mut first) {
                f.write_str(", ")?;
            }
            mbox.fmt(f)?;
        }

        Ok(())
    }
}

impl FromStr for Mailboxes {
    type Err = AddressError;

    fn from_str(src: &str) -> Result<Self, Self::Err> {
        let parsed = parsers::mailbox_list()
            .then_ignore(end())
            .parse(src)
            .map_err(|_errs| AddressError::InvalidInput)?;

        parsed
            .into_iter()
            .map(|(name, (user, domain))| Ok(Mailbox::new(name, Address::new(user, domain)?)))
            .collect()
    }
}

// Display names made only of atoms and spaces are written bare, anything
// else as a quoted string (RFC 5322 section 3.2.4 and 3.2.5)
fn write_phrase(f: &mut Formatter<'_>, name: &str) -> FmtResult {
    if name.chars().all(|c| c == ' ' || is_atext(c)) {
        return f.write_str(name);
    }

    f.write_char('"')?;
    for c in name.chars() {
        match c {
            '"' | '\\' => {
                f.write_char('\\')?;
                f.write_char(c)?;
            }
            '\r' | '\n' => f.write_char(' ')?,
            c => f.write_char(c)?,
        }
    }
    f.write_char('"')
}

fn is_atext(c: char) -> bool {
    c.is_ascii_alphanumeric() || "!#$%&'*+-/=?^_`{|}~".contains(c) || !c.is_ascii()
}
