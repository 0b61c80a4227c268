//! The Variable tree produced by the parser.
//!
//! Trees are immutable after construction and acyclic by construction:
//! every composite owns its children exclusively. Cross-unit cycles can
//! only appear through `RefForeign` chains, which are resolved (and
//! guarded) at instantiation time.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::urn::Urn;

// ──────────────────────────────────────────────
// Literals
// ──────────────────────────────────────────────

/// A literal value fixed at parse time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Literal {
    /// Decimal integer, canonically written with an `L` suffix.
    Long(i64),
    /// 32-bit integer; only built programmatically by hosts.
    Int(i32),
}

// ──────────────────────────────────────────────
// Mnemonics
// ──────────────────────────────────────────────

/// Placeholders resolved from the invocation context: `${work}`, `${wallet}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mnemonic {
    Work,
    Wallet,
}

impl Mnemonic {
    pub fn as_str(self) -> &'static str {
        match self {
            Mnemonic::Work => "work",
            Mnemonic::Wallet => "wallet",
        }
    }
}

impl FromStr for Mnemonic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "work" => Ok(Mnemonic::Work),
            "wallet" => Ok(Mnemonic::Wallet),
            other => Err(format!("unknown mnemonic '${{{}}}'", other)),
        }
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ──────────────────────────────────────────────
// Variables
// ──────────────────────────────────────────────

/// A node of the specification tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Variable {
    Constant {
        literal: Literal,
    },
    Text {
        value: String,
    },
    /// A named type applied to ordered constructor arguments.
    Composite {
        type_name: String,
        children: Vec<Variable>,
    },
    Meta {
        mnemonic: Mnemonic,
    },
    /// `#arg(index,'value')`: positional argument `index` should take `value`.
    Alter {
        index: u32,
        value: String,
    },
    /// A unit owned by `owner`, referenced by `caller`.
    RefForeign {
        caller: Urn,
        owner: Urn,
        name: String,
        overrides: Vec<Variable>,
    },
}

impl Variable {
    pub fn long(n: i64) -> Self {
        Variable::Constant {
            literal: Literal::Long(n),
        }
    }

    pub fn int(n: i32) -> Self {
        Variable::Constant {
            literal: Literal::Int(n),
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Variable::Text {
            value: value.into(),
        }
    }

    pub fn composite(type_name: impl Into<String>, children: Vec<Variable>) -> Self {
        Variable::Composite {
            type_name: type_name.into(),
            children,
        }
    }

    pub fn meta(mnemonic: Mnemonic) -> Self {
        Variable::Meta { mnemonic }
    }

    pub fn alter(index: u32, value: impl Into<String>) -> Self {
        Variable::Alter {
            index,
            value: value.into(),
        }
    }

    pub fn foreign(caller: Urn, owner: Urn, name: impl Into<String>, overrides: Vec<Variable>) -> Self {
        Variable::RefForeign {
            caller,
            owner,
            name: name.into(),
            overrides,
        }
    }

    /// True when the node is an override directive rather than a value.
    pub fn is_alter(&self) -> bool {
        matches!(self, Variable::Alter { .. })
    }

    /// Child nodes in declaration order (empty for leaves).
    pub fn children(&self) -> &[Variable] {
        match self {
            Variable::Composite { children, .. } => children,
            Variable::RefForeign { overrides, .. } => overrides,
            _ => &[],
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::render::render(self))
    }
}
