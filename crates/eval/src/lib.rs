//! unitspec-eval: turns unit spec trees into live values.
//!
//! Composites are built by factories looked up in a host-supplied
//! [`Registry`]; `${work}` and `${wallet}` come from the caller's
//! [`Arguments`]; references to other users' units are fetched through a
//! [`Users`] directory, parsed under the owner's identity and instantiated
//! recursively, with positional `#arg` overrides merged on the way.
//!
//! Evaluation is synchronous and side-effect free apart from directory
//! reads. Trees, registries and engines are `Send + Sync` and can be shared
//! by concurrent rule executions without locking.

pub mod config;
pub mod context;
pub mod directory;
pub mod engine;
pub mod error;
mod foreign;
pub mod registry;
pub mod repo;
pub mod value;

pub use config::{ConfigError, EngineConfig};
pub use context::{Arguments, Context, Coordinates, EmptyWallet, Wallet};
pub use directory::{DirectoryError, InMemoryUsers, Spec, Unit, User, Users};
pub use engine::Engine;
pub use error::{ConstructionError, ForeignError, SpecError};
pub use registry::{Factory, Registry, RegistryBuilder};
pub use repo::{GrammarRepo, Repo};
pub use value::{Instance, Value};
