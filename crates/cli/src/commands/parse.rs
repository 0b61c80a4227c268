use std::path::Path;

use unitspec_core::Urn;

use crate::OutputFormat;

pub(crate) fn cmd_parse(file: &Path, owner: &Urn, output: OutputFormat, quiet: bool) {
    let tree = super::load_tree(file, owner, output, quiet);
    let pretty = serde_json::to_string_pretty(&tree)
        .unwrap_or_else(|e| format!("serialization error: {}", e));
    println!("{}", pretty);
}
