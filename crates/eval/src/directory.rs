//! Users directory abstraction.
//!
//! The engine only reads through these traits: look up a user by URN, list
//! the user's unit names, fetch a unit's spec text. Persistence and access
//! control belong to the implementations. [`InMemoryUsers`] serves tests
//! and file-backed tooling.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use unitspec_core::Urn;

/// Errors reported by a users directory.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectoryError {
    /// No user with this URN.
    #[error("user not found: {0}")]
    UserNotFound(Urn),

    /// The user exists but owns no unit with this name.
    #[error("unit not found: {owner}:{name}")]
    UnitNotFound { owner: Urn, name: String },

    /// Directory contents could not be decoded.
    #[error("malformed directory: {0}")]
    Malformed(String),

    /// A backend-specific failure (network, storage, etc.).
    #[error("directory backend error: {0}")]
    Backend(String),
}

// ──────────────────────────────────────────────
// Spec and Unit
// ──────────────────────────────────────────────

/// Immutable spec text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Spec(String);

impl Spec {
    pub fn new(text: impl Into<String>) -> Self {
        Spec(text.into())
    }

    pub fn as_text(&self) -> &str {
        &self.0
    }
}

/// A named spec owned by a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    name: String,
    spec: Spec,
}

impl Unit {
    pub fn new(name: impl Into<String>, spec: Spec) -> Self {
        Unit {
            name: name.into(),
            spec,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn spec(&self) -> &Spec {
        &self.spec
    }
}

// ──────────────────────────────────────────────
// Directory traits
// ──────────────────────────────────────────────

/// One identity and the units it owns.
pub trait User: Send + Sync {
    fn urn(&self) -> &Urn;

    /// Names of all units owned by this user.
    fn units(&self) -> Result<BTreeSet<String>, DirectoryError>;

    /// Fetch one unit by name.
    fn get(&self, name: &str) -> Result<Unit, DirectoryError>;
}

/// Lookup of users by identity.
///
/// Lookups may block on network or storage I/O. Implementations must be
/// safe to call from many rule executions at once.
pub trait Users: Send + Sync {
    fn get(&self, urn: &Urn) -> Result<Arc<dyn User>, DirectoryError>;
}

// ──────────────────────────────────────────────
// In-memory directory
// ──────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct InMemoryUser {
    urn: Urn,
    units: BTreeMap<String, Spec>,
}

impl User for InMemoryUser {
    fn urn(&self) -> &Urn {
        &self.urn
    }

    fn units(&self) -> Result<BTreeSet<String>, DirectoryError> {
        Ok(self.units.keys().cloned().collect())
    }

    fn get(&self, name: &str) -> Result<Unit, DirectoryError> {
        self.units
            .get(name)
            .map(|spec| Unit::new(name, spec.clone()))
            .ok_or_else(|| DirectoryError::UnitNotFound {
                owner: self.urn.clone(),
                name: name.to_owned(),
            })
    }
}

/// Users directory held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUsers {
    users: HashMap<Urn, Arc<InMemoryUser>>,
}

impl InMemoryUsers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a unit, creating its owner on first use.
    pub fn with_unit(mut self, owner: Urn, name: impl Into<String>, spec: impl Into<String>) -> Self {
        let user = self.users.entry(owner.clone()).or_insert_with(|| {
            Arc::new(InMemoryUser {
                urn: owner,
                units: BTreeMap::new(),
            })
        });
        Arc::make_mut(user).units.insert(name.into(), Spec::new(spec));
        self
    }

    /// Add a user that owns no units.
    pub fn with_user(mut self, owner: Urn) -> Self {
        self.users.entry(owner.clone()).or_insert_with(|| {
            Arc::new(InMemoryUser {
                urn: owner,
                units: BTreeMap::new(),
            })
        });
        self
    }

    /// Load from JSON of the shape `{ "<urn>": { "<unit>": "<spec text>" } }`.
    pub fn from_json(text: &str) -> Result<Self, DirectoryError> {
        let raw: BTreeMap<String, BTreeMap<String, String>> =
            serde_json::from_str(text).map_err(|e| DirectoryError::Malformed(e.to_string()))?;
        let mut users = InMemoryUsers::new();
        for (owner, units) in raw {
            let urn: Urn = owner
                .parse()
                .map_err(|e: unitspec_core::UrnError| DirectoryError::Malformed(e.to_string()))?;
            users = users.with_user(urn.clone());
            for (name, spec) in units {
                users = users.with_unit(urn.clone(), name, spec);
            }
        }
        Ok(users)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl Users for InMemoryUsers {
    fn get(&self, urn: &Urn) -> Result<Arc<dyn User>, DirectoryError> {
        match self.users.get(urn) {
            Some(user) => Ok(Arc::clone(user) as Arc<dyn User>),
            None => Err(DirectoryError::UserNotFound(urn.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urn(s: &str) -> Urn {
        s.parse().unwrap()
    }

    #[test]
    fn in_memory_lookup_found() {
        let users = InMemoryUsers::new().with_unit(urn("urn:facebook:1"), "build", "a.B()");
        let user = users.get(&urn("urn:facebook:1")).unwrap();
        assert_eq!(user.units().unwrap(), BTreeSet::from(["build".to_owned()]));
        assert_eq!(user.get("build").unwrap().spec().as_text(), "a.B()");
    }

    #[test]
    fn in_memory_lookup_not_found() {
        let users = InMemoryUsers::new().with_user(urn("urn:facebook:1"));
        assert_eq!(
            users.get(&urn("urn:facebook:2")).err(),
            Some(DirectoryError::UserNotFound(urn("urn:facebook:2")))
        );
        let user = users.get(&urn("urn:facebook:1")).unwrap();
        assert!(user.units().unwrap().is_empty());
        assert!(matches!(
            user.get("missing"),
            Err(DirectoryError::UnitNotFound { .. })
        ));
    }

    #[test]
    fn loads_from_json() {
        let users = InMemoryUsers::from_json(
            r#"{ "urn:github:1": { "a": "java.lang.Long(1L)", "b": "\"x\"" }, "urn:github:2": {} }"#,
        )
        .unwrap();
        assert_eq!(users.len(), 2);
        let user = users.get(&urn("urn:github:1")).unwrap();
        assert_eq!(user.units().unwrap().len(), 2);
    }

    #[test]
    fn json_with_bad_urn_is_malformed() {
        let err = InMemoryUsers::from_json(r#"{ "github:1": {} }"#).unwrap_err();
        assert!(matches!(err, DirectoryError::Malformed(_)));
        assert!(InMemoryUsers::from_json("[1, 2]").is_err());
    }
}
