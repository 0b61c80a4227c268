use std::path::Path;

use serde::Serialize;
use unitspec_core::Urn;

use crate::OutputFormat;

#[derive(Serialize)]
struct Rendered<'a> {
    owner: &'a Urn,
    text: String,
}

pub(crate) fn cmd_render(file: &Path, owner: &Urn, output: OutputFormat, quiet: bool) {
    let tree = super::load_tree(file, owner, output, quiet);
    let text = unitspec_core::render(&tree);
    match output {
        OutputFormat::Text => println!("{}", text),
        OutputFormat::Json => {
            let pretty = serde_json::to_string_pretty(&Rendered { owner, text })
                .unwrap_or_else(|e| format!("serialization error: {}", e));
            println!("{}", pretty);
        }
    }
}
