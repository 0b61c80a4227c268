use std::path::Path;

use unitspec_core::Urn;

use crate::OutputFormat;

pub(crate) fn cmd_overrides(file: &Path, owner: &Urn, output: OutputFormat, quiet: bool) {
    let tree = super::load_tree(file, owner, output, quiet);
    let map = unitspec_core::overrides(&tree);
    match output {
        OutputFormat::Text => {
            if map.is_empty() && !quiet {
                eprintln!("no overrides");
            }
            for (index, value) in &map {
                println!("{}\t{}", index, value);
            }
        }
        OutputFormat::Json => {
            let pretty = serde_json::to_string_pretty(&map)
                .unwrap_or_else(|e| format!("serialization error: {}", e));
            println!("{}", pretty);
        }
    }
}
