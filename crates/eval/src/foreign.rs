//! Resolution of `urn:<nid>:<nss>:<unit>(...)` references.
//!
//! The referenced unit's spec is fetched through the users directory,
//! turned into a tree by the engine's repo under the owner's identity and
//! instantiated with the same
//! context. Chains are bounded: a unit already on the trail is a cycle,
//! and no chain may exceed the configured depth.

use tracing::debug;
use unitspec_core::overrides::{merge, Overrides};
use unitspec_core::{embedded_overrides, overrides, Urn, Variable};

use crate::context::Context;
use crate::engine::Engine;
use crate::error::{ForeignError, SpecError};
use crate::value::Value;

/// The stack of `(owner, unit)` pairs being resolved, plus how deep the
/// evaluation has nested in total.
pub(crate) struct Trail<'a> {
    frame: Option<(&'a Urn, &'a str)>,
    parent: Option<&'a Trail<'a>>,
    /// References followed so far.
    depth: usize,
    /// Composites and references entered so far, across all units.
    nesting: usize,
}

impl<'a> Trail<'a> {
    pub(crate) fn root() -> Self {
        Trail {
            frame: None,
            parent: None,
            depth: 0,
            nesting: 0,
        }
    }

    fn push(&'a self, owner: &'a Urn, name: &'a str) -> Trail<'a> {
        Trail {
            frame: Some((owner, name)),
            parent: Some(self),
            depth: self.depth + 1,
            nesting: self.nesting + 1,
        }
    }

    /// One composite level further down, within the same unit.
    pub(crate) fn nested(&'a self) -> Trail<'a> {
        Trail {
            frame: None,
            parent: Some(self),
            depth: self.depth,
            nesting: self.nesting + 1,
        }
    }

    pub(crate) fn nesting(&self) -> usize {
        self.nesting
    }

    fn contains(&self, owner: &Urn, name: &str) -> bool {
        let mut cur = Some(self);
        while let Some(t) = cur {
            if t.frame == Some((owner, name)) {
                return true;
            }
            cur = t.parent;
        }
        false
    }

    /// `a:x → b:y → <owner>:<name>`, outermost first.
    fn describe(&self, owner: &Urn, name: &str) -> String {
        let mut frames = vec![format!("{}:{}", owner, name)];
        let mut cur = Some(self);
        while let Some(t) = cur {
            if let Some((o, n)) = t.frame {
                frames.push(format!("{}:{}", o, n));
            }
            cur = t.parent;
        }
        frames.reverse();
        frames.join(" \u{2192} ")
    }
}

pub(crate) struct Reference<'n> {
    pub caller: &'n Urn,
    pub owner: &'n Urn,
    pub name: &'n str,
    pub node: &'n Variable,
}

pub(crate) fn resolve(
    engine: &Engine,
    reference: Reference<'_>,
    ctx: &Context<'_>,
    trail: &Trail<'_>,
    inherited: Option<&Overrides>,
) -> Result<Value, SpecError> {
    let Reference {
        caller,
        owner,
        name,
        node,
    } = reference;

    if let Some(stray) = node.children().iter().find(|c| !c.is_alter()) {
        return Err(ForeignError::NotAnOverride {
            owner: owner.clone(),
            name: name.to_owned(),
            found: stray.to_string(),
        }
        .into());
    }

    if trail.contains(owner, name) {
        return Err(ForeignError::Cycle {
            chain: trail.describe(owner, name),
        }
        .into());
    }
    let limit = engine.config().max_reference_depth;
    if trail.depth >= limit {
        return Err(ForeignError::DepthExceeded {
            limit,
            chain: trail.describe(owner, name),
        }
        .into());
    }

    debug!(
        caller = %caller,
        owner = %owner,
        unit = %name,
        depth = trail.depth + 1,
        "resolving foreign reference"
    );

    let user = ctx
        .users()
        .get(owner)
        .map_err(|source| ForeignError::UnknownOwner {
            owner: owner.clone(),
            source,
        })?;
    let directory = |source| ForeignError::Directory {
        owner: owner.clone(),
        name: name.to_owned(),
        source,
    };
    if !user.units().map_err(directory)?.contains(name) {
        return Err(ForeignError::UnknownUnit {
            owner: owner.clone(),
            name: name.to_owned(),
        }
        .into());
    }
    let unit = user.get(name).map_err(directory)?;

    let in_unit = |source: SpecError| -> SpecError {
        ForeignError::Unit {
            owner: owner.clone(),
            name: name.to_owned(),
            source: Box::new(source),
        }
        .into()
    };

    let tree = engine
        .repo()
        .make(user.as_ref(), unit.spec())
        .map_err(|e| in_unit(e.into()))?;

    // Embedded directives first, then the referencing site, then whatever
    // an enclosing reference handed down: closer declarations win. Nested
    // references inside the unit apply their own directives when they
    // resolve, so the embedded layer leaves them out.
    let mut effective = merge(embedded_overrides(&tree), &overrides(node));
    if let Some(outer) = inherited {
        effective = merge(effective, outer);
    }

    let frame = trail.push(owner, name);
    engine
        .eval(&tree, ctx, &frame, Some(&effective))
        .map_err(in_unit)
}
