//! Turning a user's stored spec into a tree.

use std::fmt;

use unitspec_core::{parse, SyntaxError, Variable};

use crate::directory::{Spec, User};

/// Builds Variable trees from specs owned by users. The engine goes
/// through this seam for every referenced unit.
pub trait Repo: fmt::Debug + Send + Sync {
    fn make(&self, user: &dyn User, spec: &Spec) -> Result<Variable, SyntaxError>;
}

/// Parses with the built-in grammar, recording the user as caller of
/// every reference in the spec.
#[derive(Debug, Default, Clone, Copy)]
pub struct GrammarRepo;

impl Repo for GrammarRepo {
    fn make(&self, user: &dyn User, spec: &Spec) -> Result<Variable, SyntaxError> {
        parse(user.urn(), spec.as_text())
    }
}
