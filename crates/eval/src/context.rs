//! Per-invocation resolution context.
//!
//! A [`Context`] is built by the caller for one rule execution and passed
//! by reference through the whole evaluation. It holds no mutable state.

use std::fmt;
use std::sync::Arc;

use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use unitspec_core::Urn;

use crate::directory::Users;

// ──────────────────────────────────────────────
// Coordinates
// ──────────────────────────────────────────────

/// Identity of one rule execution: owner, rule name, scheduled time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coordinates {
    owner: Urn,
    rule: String,
    scheduled: OffsetDateTime,
}

impl Coordinates {
    pub fn new(owner: Urn, rule: impl Into<String>, scheduled: OffsetDateTime) -> Self {
        Coordinates {
            owner,
            rule: rule.into(),
            scheduled,
        }
    }

    /// Placeholder coordinates for evaluations outside any rule execution.
    pub fn none() -> Self {
        Coordinates {
            owner: Urn::void(),
            rule: String::new(),
            scheduled: OffsetDateTime::UNIX_EPOCH,
        }
    }

    pub fn owner(&self) -> &Urn {
        &self.owner
    }

    pub fn rule(&self) -> &str {
        &self.rule
    }

    pub fn scheduled(&self) -> OffsetDateTime {
        self.scheduled
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let when = self.scheduled.format(&Rfc3339).map_err(|_| fmt::Error)?;
        write!(f, "{}:{}:{}", self.owner, self.rule, when)
    }
}

// ──────────────────────────────────────────────
// Wallet
// ──────────────────────────────────────────────

/// Billing sink handed to cost-accounting consumers.
///
/// The engine passes wallets through untouched; it never charges them.
pub trait Wallet: fmt::Debug + Send + Sync {
    fn charge(&self, details: &str, points: i64);
}

/// A wallet that discards every charge.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyWallet;

impl Wallet for EmptyWallet {
    fn charge(&self, _details: &str, _points: i64) {}
}

// ──────────────────────────────────────────────
// Arguments and Context
// ──────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Arguments {
    coordinates: Coordinates,
    wallet: Arc<dyn Wallet>,
}

impl Arguments {
    pub fn new(coordinates: Coordinates, wallet: Arc<dyn Wallet>) -> Self {
        Arguments {
            coordinates,
            wallet,
        }
    }

    /// No coordinates and an [`EmptyWallet`].
    pub fn none() -> Self {
        Arguments::new(Coordinates::none(), Arc::new(EmptyWallet))
    }

    pub fn coordinates(&self) -> &Coordinates {
        &self.coordinates
    }

    pub fn wallet(&self) -> &Arc<dyn Wallet> {
        &self.wallet
    }
}

/// Requesting identity, users directory and invocation arguments.
#[derive(Clone, Copy)]
pub struct Context<'a> {
    identity: &'a Urn,
    users: &'a dyn Users,
    arguments: &'a Arguments,
}

impl<'a> Context<'a> {
    pub fn new(identity: &'a Urn, users: &'a dyn Users, arguments: &'a Arguments) -> Self {
        Context {
            identity,
            users,
            arguments,
        }
    }

    pub fn identity(&self) -> &'a Urn {
        self.identity
    }

    pub fn users(&self) -> &'a dyn Users {
        self.users
    }

    pub fn arguments(&self) -> &'a Arguments {
        self.arguments
    }
}

impl fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("identity", &self.identity)
            .field("arguments", &self.arguments)
            .finish_non_exhaustive()
    }
}
