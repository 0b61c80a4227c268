use std::error::Error as StdError;

use unitspec_core::{SyntaxError, Urn};

use crate::directory::DirectoryError;

/// Any failure to turn a spec into a value.
///
/// Every variant keeps its underlying cause reachable through
/// [`std::error::Error::source`]; [`SpecError::root_cause`] walks the chain.
#[derive(Debug, thiserror::Error)]
pub enum SpecError {
    /// Spec text is malformed.
    #[error("spec cannot be parsed")]
    Syntax(#[from] SyntaxError),

    /// No factory is registered for the type name.
    #[error("unknown capability '{type_name}'")]
    UnknownCapability { type_name: String },

    /// The factory rejected the resolved argument values.
    #[error("cannot construct '{type_name}'")]
    Construction {
        type_name: String,
        #[source]
        source: ConstructionError,
    },

    /// An override directive was evaluated where a value is required.
    #[error("#arg({index},...) is an override directive, not a value")]
    Alter { index: u32 },

    /// Composites and references nest deeper than the engine allows,
    /// counted across every unit on the way down.
    #[error("evaluation nested deeper than {limit} levels")]
    NestingExceeded { limit: usize },

    /// A reference to another unit could not be resolved.
    #[error("foreign reference cannot be resolved")]
    Foreign(#[from] ForeignError),
}

impl SpecError {
    /// The innermost error of the cause chain.
    pub fn root_cause(&self) -> &(dyn StdError + 'static) {
        let mut cur: &(dyn StdError + 'static) = self;
        while let Some(next) = cur.source() {
            cur = next;
        }
        cur
    }

    /// The error raised in the innermost referenced unit, looking through
    /// every `ForeignError::Unit` wrapper.
    pub fn innermost(&self) -> &SpecError {
        let mut cur = self;
        while let SpecError::Foreign(ForeignError::Unit { source, .. }) = cur {
            cur = source;
        }
        cur
    }

    /// All messages of the cause chain joined with `": "`.
    pub fn chain(&self) -> String {
        let mut parts = vec![self.to_string()];
        let mut cur = self.source();
        while let Some(err) = cur {
            parts.push(err.to_string());
            cur = err.source();
        }
        parts.join(": ")
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SpecError::Syntax(_) => "syntax",
            SpecError::UnknownCapability { .. } => "unknown_capability",
            SpecError::Construction { .. } => "construction",
            SpecError::Alter { .. } => "alter",
            SpecError::NestingExceeded { .. } => "nesting",
            SpecError::Foreign(_) => "foreign",
        }
    }

    /// Serialize to the JSON shape used by tooling error reports.
    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::json!({
            "kind":    self.kind(),
            "message": self.chain(),
        })
    }
}

/// A factory found no constructor shape matching the argument values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConstructionError {
    #[error("no matching constructor: expected {expected} argument(s), got {got}")]
    Arity { expected: usize, got: usize },

    #[error("no matching constructor: argument {position} is {got}, expected {expected}")]
    Mismatch {
        position: usize,
        expected: &'static str,
        got: &'static str,
    },

    #[error("invalid argument {position}: {message}")]
    Invalid { position: usize, message: String },

    #[error("override for argument {index} but the constructor has {arity} argument(s)")]
    OverrideOutOfRange { index: u32, arity: usize },
}

/// Failures specific to resolving `urn:...:unit(...)` references.
#[derive(Debug, thiserror::Error)]
pub enum ForeignError {
    #[error("unknown owner {owner}")]
    UnknownOwner {
        owner: Urn,
        #[source]
        source: DirectoryError,
    },

    #[error("{owner} has no unit '{name}'")]
    UnknownUnit { owner: Urn, name: String },

    #[error("directory lookup of {owner}:{name} failed")]
    Directory {
        owner: Urn,
        name: String,
        #[source]
        source: DirectoryError,
    },

    #[error("reference {owner}:{name} accepts only #arg overrides, found {found}")]
    NotAnOverride {
        owner: Urn,
        name: String,
        found: String,
    },

    #[error("reference cycle: {chain}")]
    Cycle { chain: String },

    #[error("reference chain deeper than {limit}: {chain}")]
    DepthExceeded { limit: usize, chain: String },

    /// Failure inside the referenced unit's own spec.
    #[error("in unit {owner}:{name}")]
    Unit {
        owner: Urn,
        name: String,
        #[source]
        source: Box<SpecError>,
    },
}
