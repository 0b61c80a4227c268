//! Capability registry: type name -> factory.
//!
//! The registry is the only place where a type name from spec text becomes
//! a live value. Hosts populate it once at startup through
//! [`RegistryBuilder`] and share it read-only afterwards.

use std::collections::BTreeMap;

use tracing::warn;

use crate::error::{ConstructionError, SpecError};
use crate::value::Value;

/// Builds a value from already-resolved constructor arguments.
pub trait Factory: Send + Sync {
    fn construct(&self, args: Vec<Value>) -> Result<Value, ConstructionError>;
}

impl<F> Factory for F
where
    F: Fn(Vec<Value>) -> Result<Value, ConstructionError> + Send + Sync,
{
    fn construct(&self, args: Vec<Value>) -> Result<Value, ConstructionError> {
        self(args)
    }
}

pub struct Registry {
    factories: BTreeMap<String, Box<dyn Factory>>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Registry holding only the standard value types.
    pub fn standard() -> Self {
        Registry::builder().with_standard().build()
    }

    pub fn resolve(&self, type_name: &str) -> Result<&dyn Factory, SpecError> {
        self.factories
            .get(type_name)
            .map(|f| f.as_ref())
            .ok_or_else(|| SpecError::UnknownCapability {
                type_name: type_name.to_owned(),
            })
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.factories.contains_key(type_name)
    }

    /// Registered type names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("names", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[derive(Default)]
pub struct RegistryBuilder {
    factories: BTreeMap<String, Box<dyn Factory>>,
}

impl RegistryBuilder {
    /// Register a factory; a later registration under the same name replaces
    /// the earlier one.
    pub fn register(mut self, type_name: impl Into<String>, factory: impl Factory + 'static) -> Self {
        let type_name = type_name.into();
        if self.factories.contains_key(&type_name) {
            warn!(type_name = %type_name, "capability registered twice, keeping the later factory");
        }
        self.factories.insert(type_name, Box::new(factory));
        self
    }

    /// Add `java.lang.Long`, `java.lang.Integer`, `java.lang.String` and
    /// `java.lang.Boolean`.
    pub fn with_standard(self) -> Self {
        self.register("java.lang.Long", make_long)
            .register("java.lang.Integer", make_int)
            .register("java.lang.String", make_string)
            .register("java.lang.Boolean", make_bool)
    }

    pub fn build(self) -> Registry {
        Registry {
            factories: self.factories,
        }
    }
}

// ──────────────────────────────────────────────
// Standard factories
// ──────────────────────────────────────────────

/// Unpack exactly one argument.
pub fn single(args: Vec<Value>) -> Result<Value, ConstructionError> {
    let got = args.len();
    let mut it = args.into_iter();
    match (it.next(), it.next()) {
        (Some(v), None) => Ok(v),
        _ => Err(ConstructionError::Arity { expected: 1, got }),
    }
}

fn mismatch(expected: &'static str, got: &Value) -> ConstructionError {
    ConstructionError::Mismatch {
        position: 0,
        expected,
        got: got.kind(),
    }
}

fn invalid(message: String) -> ConstructionError {
    ConstructionError::Invalid {
        position: 0,
        message,
    }
}

fn make_long(args: Vec<Value>) -> Result<Value, ConstructionError> {
    match single(args)? {
        Value::Long(n) => Ok(Value::Long(n)),
        Value::Int(n) => Ok(Value::Long(i64::from(n))),
        Value::Text(s) => s
            .trim()
            .parse::<i64>()
            .map(Value::Long)
            .map_err(|e| invalid(format!("'{}' is not a Long: {}", s, e))),
        other => Err(mismatch("Long, Int or Text", &other)),
    }
}

fn make_int(args: Vec<Value>) -> Result<Value, ConstructionError> {
    match single(args)? {
        Value::Int(n) => Ok(Value::Int(n)),
        Value::Long(n) => i32::try_from(n)
            .map(Value::Int)
            .map_err(|_| invalid(format!("{} does not fit an Integer", n))),
        Value::Text(s) => s
            .trim()
            .parse::<i32>()
            .map(Value::Int)
            .map_err(|e| invalid(format!("'{}' is not an Integer: {}", s, e))),
        other => Err(mismatch("Int, Long or Text", &other)),
    }
}

fn make_string(args: Vec<Value>) -> Result<Value, ConstructionError> {
    match single(args)? {
        Value::Text(s) => Ok(Value::Text(s)),
        Value::Long(n) => Ok(Value::Text(n.to_string())),
        Value::Int(n) => Ok(Value::Text(n.to_string())),
        Value::Bool(b) => Ok(Value::Text(b.to_string())),
        other => Err(mismatch("Text, Long, Int or Bool", &other)),
    }
}

fn make_bool(args: Vec<Value>) -> Result<Value, ConstructionError> {
    match single(args)? {
        Value::Bool(b) => Ok(Value::Bool(b)),
        Value::Text(s) => match s.trim() {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err(invalid(format!("'{}' is not a Boolean", s))),
        },
        other => Err(mismatch("Bool or Text", &other)),
    }
}
