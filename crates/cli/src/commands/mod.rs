pub(crate) mod instantiate;
pub(crate) mod overrides;
pub(crate) mod parse;
pub(crate) mod render;

use std::path::Path;
use std::process;

use unitspec_core::{Urn, Variable};

use crate::OutputFormat;

/// Read and parse a spec file, exiting on failure.
pub(crate) fn load_tree(file: &Path, owner: &Urn, output: OutputFormat, quiet: bool) -> Variable {
    let text = crate::read_file(file, output, quiet);
    match unitspec_core::parse(owner, &text) {
        Ok(tree) => {
            tracing::debug!(file = %file.display(), %owner, "parsed spec");
            tree
        }
        Err(e) => {
            let msg = format!("{}: {}", file.display(), e);
            crate::report_json_error(&e.to_json_value(), &msg, output, quiet);
            process::exit(1);
        }
    }
}
