//! Runtime values produced by instantiation.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::context::{Coordinates, Wallet};

// ──────────────────────────────────────────────
// Instances
// ──────────────────────────────────────────────

/// A host object built by a registered factory.
///
/// Instances are shared, immutable handles; callers recover the concrete
/// type with [`Instance::downcast_ref`].
#[derive(Clone)]
pub struct Instance {
    type_name: String,
    object: Arc<dyn Any + Send + Sync>,
}

impl Instance {
    pub fn new<T: Any + Send + Sync>(type_name: impl Into<String>, object: T) -> Self {
        Instance {
            type_name: type_name.into(),
            object: Arc::new(object),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.object.downcast_ref::<T>()
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

// ──────────────────────────────────────────────
// Runtime values
// ──────────────────────────────────────────────

#[derive(Debug, Clone)]
pub enum Value {
    Long(i64),
    Int(i32),
    Bool(bool),
    Text(String),
    Coordinates(Coordinates),
    Wallet(Arc<dyn Wallet>),
    Instance(Instance),
}

impl Value {
    /// Returns a human-readable kind name for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Long(_) => "Long",
            Value::Int(_) => "Int",
            Value::Bool(_) => "Bool",
            Value::Text(_) => "Text",
            Value::Coordinates(_) => "Coordinates",
            Value::Wallet(_) => "Wallet",
            Value::Instance(_) => "Instance",
        }
    }

    pub fn as_instance<T: Any>(&self) -> Option<&T> {
        match self {
            Value::Instance(i) => i.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// JSON form used by tooling output.
    pub fn to_json_value(&self) -> serde_json::Value {
        match self {
            Value::Long(n) => serde_json::json!({ "kind": "long", "value": n }),
            Value::Int(n) => serde_json::json!({ "kind": "int", "value": n }),
            Value::Bool(b) => serde_json::json!({ "kind": "bool", "value": b }),
            Value::Text(s) => serde_json::json!({ "kind": "text", "value": s }),
            Value::Coordinates(c) => serde_json::json!({
                "kind": "coordinates",
                "owner": c.owner().to_string(),
                "rule": c.rule(),
                "scheduled": c.scheduled().unix_timestamp(),
            }),
            Value::Wallet(_) => serde_json::json!({ "kind": "wallet" }),
            Value::Instance(i) => serde_json::json!({
                "kind": "instance",
                "type_name": i.type_name(),
            }),
        }
    }
}

/// Wallets and instances compare by identity; everything else by value.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Long(a), Value::Long(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Coordinates(a), Value::Coordinates(b)) => a == b,
            (Value::Wallet(a), Value::Wallet(b)) => Arc::ptr_eq(a, b),
            (Value::Instance(a), Value::Instance(b)) => Arc::ptr_eq(&a.object, &b.object),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Long(n) => write!(f, "{}L", n),
            Value::Int(n) => write!(f, "{}", n),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Text(s) => f.write_str(s),
            Value::Coordinates(c) => write!(f, "{}", c),
            Value::Wallet(w) => write!(f, "{:?}", w),
            Value::Instance(i) => write!(f, "<{}>", i.type_name()),
        }
    }
}
