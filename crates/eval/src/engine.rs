//! Instantiation engine: Variable tree -> runtime value.
//!
//! Evaluation is depth-first and left-to-right. Any failure aborts the
//! whole instantiation; no partial value is ever returned and the context
//! is never mutated.

use std::sync::Arc;

use tracing::{trace, warn};
use unitspec_core::{parse, Literal, Mnemonic, Overrides, Variable};

use crate::config::EngineConfig;
use crate::context::Context;
use crate::error::{ConstructionError, SpecError};
use crate::foreign::{self, Reference, Trail};
use crate::registry::Registry;
use crate::repo::{GrammarRepo, Repo};
use crate::value::Value;

/// Registry, repo and configuration; cheap to clone and share across threads.
#[derive(Debug, Clone)]
pub struct Engine {
    registry: Arc<Registry>,
    repo: Arc<dyn Repo>,
    config: EngineConfig,
}

impl Engine {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self::with_config(registry, EngineConfig::default())
    }

    pub fn with_config(registry: Arc<Registry>, config: EngineConfig) -> Self {
        Engine {
            registry,
            repo: Arc::new(GrammarRepo),
            config,
        }
    }

    /// Replace the repo used to turn referenced units into trees.
    pub fn with_repo(mut self, repo: Arc<dyn Repo>) -> Self {
        self.repo = repo;
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn repo(&self) -> &dyn Repo {
        self.repo.as_ref()
    }

    /// Evaluate a tree into a value.
    pub fn instantiate(&self, node: &Variable, ctx: &Context<'_>) -> Result<Value, SpecError> {
        self.eval(node, ctx, &Trail::root(), None)
    }

    /// Parse `text` under the context's identity, then instantiate it.
    pub fn instantiate_text(&self, text: &str, ctx: &Context<'_>) -> Result<Value, SpecError> {
        let tree = parse(ctx.identity(), text)?;
        self.instantiate(&tree, ctx)
    }

    /// `inherited` carries overrides for this node's own constructor
    /// arguments; only the root of a referenced unit receives them.
    pub(crate) fn eval(
        &self,
        node: &Variable,
        ctx: &Context<'_>,
        trail: &Trail<'_>,
        inherited: Option<&Overrides>,
    ) -> Result<Value, SpecError> {
        let limit = self.config.max_nesting;
        if matches!(node, Variable::Composite { .. } | Variable::RefForeign { .. })
            && trail.nesting() >= limit
        {
            return Err(SpecError::NestingExceeded { limit });
        }
        match node {
            Variable::Constant { literal } => {
                ignore_overrides(node, inherited);
                Ok(match literal {
                    Literal::Long(n) => Value::Long(*n),
                    Literal::Int(n) => Value::Int(*n),
                })
            }
            Variable::Text { value } => {
                ignore_overrides(node, inherited);
                Ok(Value::Text(value.clone()))
            }
            Variable::Meta { mnemonic } => {
                ignore_overrides(node, inherited);
                let args = ctx.arguments();
                Ok(match mnemonic {
                    Mnemonic::Work => Value::Coordinates(args.coordinates().clone()),
                    Mnemonic::Wallet => Value::Wallet(Arc::clone(args.wallet())),
                })
            }
            Variable::Alter { index, .. } => Err(SpecError::Alter { index: *index }),
            Variable::Composite {
                type_name,
                children,
            } => self.construct(type_name, children, ctx, trail, inherited),
            Variable::RefForeign {
                caller,
                owner,
                name,
                ..
            } => foreign::resolve(
                self,
                Reference {
                    caller,
                    owner,
                    name,
                    node,
                },
                ctx,
                trail,
                inherited,
            ),
        }
    }

    fn construct(
        &self,
        type_name: &str,
        children: &[Variable],
        ctx: &Context<'_>,
        trail: &Trail<'_>,
        inherited: Option<&Overrides>,
    ) -> Result<Value, SpecError> {
        // Override directives are not constructor arguments.
        let inner = trail.nested();
        let mut values = children
            .iter()
            .filter(|c| !c.is_alter())
            .map(|c| self.eval(c, ctx, &inner, None))
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(map) = inherited {
            let arity = values.len();
            for (index, text) in map {
                let slot = values
                    .get_mut(*index as usize)
                    .ok_or_else(|| SpecError::Construction {
                        type_name: type_name.to_owned(),
                        source: ConstructionError::OverrideOutOfRange {
                            index: *index,
                            arity,
                        },
                    })?;
                *slot = Value::Text(text.clone());
            }
        }

        let factory = self.registry.resolve(type_name)?;
        trace!(type_name, args = values.len(), "constructing");
        factory
            .construct(values)
            .map_err(|source| SpecError::Construction {
                type_name: type_name.to_owned(),
                source,
            })
    }
}

fn ignore_overrides(node: &Variable, inherited: Option<&Overrides>) {
    if let Some(map) = inherited.filter(|m| !m.is_empty()) {
        warn!(
            node = %node,
            overrides = map.len(),
            "overrides ignored: referenced unit is not a composite"
        );
    }
}
