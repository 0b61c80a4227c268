//! Canonical text rendering of Variable trees.
//!
//! Rendering never fails. Re-parsing the output yields a tree structurally
//! equal to the input: `parse(render(parse(s))) == parse(s)`.

use crate::ast::{Literal, Variable};

/// Indentation applied to each nesting level.
const INDENT: &str = "  ";

pub fn render(node: &Variable) -> String {
    match node {
        Variable::Constant { literal } => match literal {
            Literal::Long(n) => format!("{}L", n),
            Literal::Int(n) => n.to_string(),
        },
        Variable::Text { value } => format!("\"{}\"", escape(value, '"')),
        Variable::Composite {
            type_name,
            children,
        } => render_call(type_name, children),
        Variable::Meta { mnemonic } => format!("${{{}}}", mnemonic),
        Variable::Alter { index, value } => format!("#arg({},'{}')", index, escape(value, '\'')),
        Variable::RefForeign {
            owner,
            name,
            overrides,
            ..
        } => render_call(&format!("{}:{}", owner, name), overrides),
    }
}

/// `head(\n  c1,\n  c2\n)`, or `head()` without arguments.
fn render_call(head: &str, args: &[Variable]) -> String {
    if args.is_empty() {
        return format!("{}()", head);
    }
    let body: Vec<String> = args.iter().map(|a| indent(&render(a))).collect();
    format!("{}(\n{}\n)", head, body.join(",\n"))
}

fn indent(text: &str) -> String {
    text.lines()
        .map(|line| format!("{}{}", INDENT, line))
        .collect::<Vec<_>>()
        .join("\n")
}

fn escape(value: &str, quote: char) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out
}
