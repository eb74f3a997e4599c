//! Intermediate representation for parsed Charm code.
//!
//! A parsed program is a flat sequence of nodes consumed left to right
//! against a shared operand stack. List literals carry their own node
//! sequence (a quotation, pushed as a value), and definition lines carry
//! theirs (the named body). Nodes are immutable once built; the parser
//! hands ownership of the sequence to its caller.
//!
//! Node equality is structural. The pipeline re-lexes isolated
//! substrings (definition bodies, list interiors), so byte offsets are
//! not stable across re-entry and nodes carry no source positions.

use std::sync::Arc;

use crate::core::{Name, NameTable};
use crate::value::Number;

/// A node in the parsed program.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    /// Numeric literal.
    Number(Number),
    /// String literal, already escape-decoded.
    String(Arc<str>),
    /// List literal: a quotation, pushed rather than executed.
    List(Vec<Node>),
    /// A name, resolved against the runtime's function table.
    Defined(Name),
    /// A `name := body` definition.
    Definition(Definition),
}

impl Node {
    /// Create a numeric literal node.
    pub fn number(value: Number) -> Self {
        Node::Number(value)
    }

    /// Create a string literal node.
    pub fn string(value: impl Into<Arc<str>>) -> Self {
        Node::String(value.into())
    }

    /// Create a list node.
    pub fn list(body: Vec<Node>) -> Self {
        Node::List(body)
    }

    /// Create a name-reference node.
    pub fn defined(name: Name) -> Self {
        Node::Defined(name)
    }

    /// Check if this node is a reference to `name`.
    pub fn is_reference_to(&self, name: Name) -> bool {
        matches!(self, Node::Defined(n) if *n == name)
    }

    /// Render this node back to source text.
    ///
    /// The output re-parses to an equal node: strings are re-escaped,
    /// lists spelled with free-standing brackets, floats keep a `.`.
    pub fn render(&self, names: &NameTable) -> String {
        match self {
            Node::Number(n) => n.to_string(),
            Node::String(s) => format!("\" {} \"", escape(s)),
            Node::List(body) => {
                if body.is_empty() {
                    "[ ]".to_owned()
                } else {
                    format!("[ {} ]", render_nodes(body, names))
                }
            }
            Node::Defined(name) => names.text(*name).to_owned(),
            Node::Definition(def) => {
                if def.body.is_empty() {
                    format!("{} :=", names.text(def.name))
                } else {
                    format!("{} := {}", names.text(def.name), render_nodes(&def.body, names))
                }
            }
        }
    }
}

/// Render a node sequence as source text, space separated.
pub fn render_nodes(nodes: &[Node], names: &NameTable) -> String {
    let rendered: Vec<String> = nodes.iter().map(|node| node.render(names)).collect();
    rendered.join(" ")
}

/// A named definition with its analyzed properties.
#[derive(Clone, Debug, PartialEq)]
pub struct Definition {
    /// The defined name.
    pub name: Name,
    /// The body the name stands for.
    pub body: Vec<Node>,
    /// Analysis results, computed when the definition was parsed.
    pub info: DefinitionInfo,
}

/// Static properties of a definition.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DefinitionInfo {
    /// Body may replace call sites at parse time.
    pub inlineable: bool,
    /// Body ends in a self-call and self-calls nowhere else.
    pub tail_call_recursive: bool,
}

/// Escape a decoded string back to its source spelling.
fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\0' => out.push_str("\\0"),
            _ => out.push(c),
        }
    }
    out
}
