use serde::{de::Error as DeError, Deserialize, Deserializer, Serialize, Serializer};

use super::Address;

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_ref())
    }
}

/// Accepted input shapes: `"user@domain"` or `{ "user": .., "domain": .. }`
#[derive(Deserialize)]
#[serde(untagged)]
enum AddressRepr {
    Text(String),
    Parts { user: String, domain: String },
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match AddressRepr::deserialize(deserializer)? {
            AddressRepr::Text(s) => s.parse().map_err(DeError::custom),
            AddressRepr::Parts { user, domain } => {
                Address::new(user, domain).map_err(DeError::custom)
            }
        }
    }
}
