//! Identity tokens of the form `urn:<nid>:<nss>`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Maximum length of the namespace identifier segment.
const MAX_NID: usize = 31;

/// A validated identity token, e.g. `urn:facebook:998`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Urn {
    text: String,
    nid_end: usize,
}

/// Returned when a string is not a well-formed URN.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid URN '{text}': {reason}")]
pub struct UrnError {
    pub text: String,
    pub reason: &'static str,
}

impl Urn {
    /// `urn:void:0`, the identity of nobody in particular.
    pub fn void() -> Urn {
        Urn {
            text: "urn:void:0".to_owned(),
            nid_end: 8,
        }
    }

    /// Namespace identifier, e.g. `facebook`.
    pub fn nid(&self) -> &str {
        &self.text[4..self.nid_end]
    }

    /// Namespace-specific string, e.g. `998`.
    pub fn nss(&self) -> &str {
        &self.text[self.nid_end + 1..]
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

/// True for characters allowed in the namespace-specific part and in unit names.
pub(crate) fn is_segment_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == '-'
}

impl FromStr for Urn {
    type Err = UrnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fail = |reason| UrnError {
            text: s.to_owned(),
            reason,
        };
        let rest = s.strip_prefix("urn:").ok_or_else(|| fail("must start with 'urn:'"))?;
        let (nid, nss) = rest
            .split_once(':')
            .ok_or_else(|| fail("missing namespace-specific part"))?;
        if nid.is_empty() || nid.len() > MAX_NID {
            return Err(fail("namespace identifier must be 1-31 characters"));
        }
        let mut nid_chars = nid.chars();
        if !nid_chars.next().is_some_and(|c| c.is_ascii_lowercase()) {
            return Err(fail("namespace identifier must start with a lowercase letter"));
        }
        if !nid_chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-') {
            return Err(fail("namespace identifier has invalid characters"));
        }
        if nss.is_empty() || !nss.chars().all(is_segment_char) {
            return Err(fail("namespace-specific part has invalid characters"));
        }
        Ok(Urn {
            text: s.to_owned(),
            nid_end: 4 + nid.len(),
        })
    }
}

impl fmt::Display for Urn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl Serialize for Urn {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.text)
    }
}

impl<'de> Deserialize<'de> for Urn {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
