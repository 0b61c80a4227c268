//! unitspec-core: grammar, tree model and text rendering for unit specs.
//!
//! A spec is a small expression language describing how to build a unit:
//! dotted type names applied to arguments, string and integer literals,
//! context placeholders (`${work}`, `${wallet}`), positional override
//! directives (`#arg(0,'value')`) and references to units owned by other
//! identities (`urn:github:42:unit-name(...)`).
//!
//! # Public API
//!
//! - [`parse()`] -- spec text to [`Variable`] tree
//! - [`render()`] -- tree back to canonical text
//! - [`overrides()`] -- positional overrides declared anywhere in a tree
//! - [`Urn`] -- validated identity token
//! - [`SyntaxError`] -- the only error this crate produces

/// Version of the spec grammar, for callers that cache parsed trees.
pub const GRAMMAR_VERSION: &str = "1.0";

pub mod ast;
pub mod error;
pub mod lexer;
pub mod overrides;
pub mod parser;
pub mod render;
pub mod urn;

// ── Convenience re-exports ───────────────────────────────────────────

pub use ast::{Literal, Mnemonic, Variable};
pub use error::SyntaxError;
pub use overrides::{embedded_overrides, overrides, Overrides};
pub use parser::parse;
pub use render::render;
pub use urn::{Urn, UrnError};
