use serde::{de::Error as DeError, Deserialize, Deserializer, Serialize, Serializer};

use crate::{
    address::Address,
    message::{Mailbox, Mailboxes},
};

impl Serialize for Mailbox {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// `"Name <user@domain>"` or `{ "name": .., "email": .. }`
#[derive(Deserialize)]
#[serde(untagged)]
enum MailboxRepr {
    Text(String),
    Parts {
        #[serde(default)]
        name: Option<String>,
        email: Address,
    },
}

impl<'de> Deserialize<'de> for Mailbox {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match MailboxRepr::deserialize(deserializer)? {
            MailboxRepr::Text(s) => s.parse().map_err(DeError::custom),
            MailboxRepr::Parts { name, email } => Ok(Mailbox::new(name, email)),
        }
    }
}

impl Serialize for Mailboxes {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// A comma separated list, or a sequence of mailboxes
#[derive(Deserialize)]
#[serde(untagged)]
enum MailboxesRepr {
    Text(String),
    List(Vec<Mailbox>),
}

impl<'de> Deserialize<'de> for Mailboxes {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match MailboxesRepr::deserialize(deserializer)? {
            MailboxesRepr::Text(s) => s.parse().map_err(DeError::custom),
            MailboxesRepr::List(list) => Ok(list.into()),
        }
    }
}
