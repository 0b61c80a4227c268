use serde::{Deserialize, Serialize};

/// A syntax error raised while lexing or parsing spec text.
///
/// Syntax errors are detected entirely during parsing and never during
/// instantiation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, thiserror::Error)]
#[error("syntax error at line {line}: {message}")]
pub struct SyntaxError {
    pub line: u32,
    pub message: String,
}

impl SyntaxError {
    pub fn new(line: u32, message: impl Into<String>) -> Self {
        SyntaxError {
            line,
            message: message.into(),
        }
    }

    /// Serialize to the JSON shape used by tooling error reports.
    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::json!({
            "kind":    "syntax",
            "line":    self.line,
            "message": self.message,
        })
    }
}
