use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Display name a user registers under. Never blank.
#[derive(Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identity(String);

impl Identity {
    /// Returns `None` when `name` is empty or only whitespace.
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            None
        } else {
            Some(Self(name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Identity {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Identity {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| "identity must not be blank".to_string())
    }
}

impl From<Identity> for String {
    fn from(identity: Identity) -> Self {
        identity.0
    }
}

impl PartialEq<str> for Identity {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Identity {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_and_blank() {
        assert!(Identity::new("").is_none());
        assert!(Identity::new("   \t").is_none());
    }

    #[test]
    fn keeps_name_verbatim() {
        let id = Identity::new(" alice ").unwrap();
        assert_eq!(id.as_str(), " alice ");
    }

    #[test]
    fn deserialize_rejects_blank() {
        assert!(serde_json::from_str::<Identity>(r#""""#).is_err());
        let id: Identity = serde_json::from_str(r#""bob""#).unwrap();
        assert_eq!(id, "bob");
    }
}
