use std::path::Path;
use std::process;
use std::sync::Arc;

use time::OffsetDateTime;
use unitspec_core::Urn;
use unitspec_eval::{
    Arguments, Context, Coordinates, EmptyWallet, Engine, EngineConfig, InMemoryUsers, Registry,
};

use crate::OutputFormat;

pub(crate) struct InstantiateOptions<'a> {
    pub file: &'a Path,
    pub directory: &'a Path,
    pub owner: &'a Urn,
    pub rule: &'a str,
    pub config: EngineConfig,
}

pub(crate) fn cmd_instantiate(opts: InstantiateOptions<'_>, output: OutputFormat, quiet: bool) {
    let tree = super::load_tree(opts.file, opts.owner, output, quiet);

    let directory_text = crate::read_file(opts.directory, output, quiet);
    let users = match InMemoryUsers::from_json(&directory_text) {
        Ok(u) => u,
        Err(e) => {
            let msg = format!("error loading directory '{}': {}", opts.directory.display(), e);
            crate::report_error(&msg, output, quiet);
            process::exit(1);
        }
    };
    tracing::debug!(users = users.len(), "loaded users directory");

    let engine = Engine::with_config(Arc::new(Registry::standard()), opts.config);
    let coordinates = Coordinates::new(opts.owner.clone(), opts.rule, OffsetDateTime::now_utc());
    let args = Arguments::new(coordinates, Arc::new(EmptyWallet));
    let ctx = Context::new(opts.owner, &users, &args);

    match engine.instantiate(&tree, &ctx) {
        Ok(value) => match output {
            OutputFormat::Text => println!("{}", value),
            OutputFormat::Json => {
                let pretty = serde_json::to_string_pretty(&value.to_json_value())
                    .unwrap_or_else(|e| format!("serialization error: {}", e));
                println!("{}", pretty);
            }
        },
        Err(e) => {
            crate::report_json_error(&e.to_json_value(), &e.chain(), output, quiet);
            process::exit(1);
        }
    }
}
