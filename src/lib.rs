//! Charm: the core pipeline of a concatenative stack language.
//!
//! A Charm program is a sequence of functions that consume and produce
//! values on a shared operand stack. This crate implements everything up
//! to execution:
//!
//! ```text
//! Source → Tokens → Nodes → (analysis: inlining, tail calls)
//!            ↑        ↑               ↑
//!        scanner   parser      FunctionAnalyzer
//! ```
//!
//! - **Scan**: lines split on LF, tokens on spaces; `[` `]` `"` `:=`
//!   `::` `->` `|` are reserved only as free-standing tokens.
//! - **Parse**: each line becomes a definition, a type signature, or a
//!   run of expression nodes; list literals are quotations holding their
//!   own node sequence.
//! - **Analyze**: definitions are checked for inlineability and
//!   tail-call recursion as they parse; inlineable calls are substituted
//!   at their call sites.
//!
//! The runtime that executes nodes, the library of primitive functions,
//! and the interactive terminal are separate concerns built on top of
//! the [`Parser`] session: they consume the parsed nodes and borrow the
//! session's [`FunctionAnalyzer`].
//!
//! # Example
//!
//! ```
//! use charm_lang::{parse, Node};
//!
//! let nodes = parse("2 3 +").unwrap();
//! assert_eq!(nodes.len(), 3);
//! assert!(matches!(nodes[2], Node::Defined(_)));
//! ```

pub mod analysis;
pub mod core;
pub mod error;
pub mod ir;
pub mod parse;
pub mod types;
pub mod value;

// Re-export the working set at the crate root
pub use crate::analysis::FunctionAnalyzer;
pub use crate::core::{Name, NameTable};
pub use crate::error::ParseError;
pub use crate::ir::{render_nodes, Definition, DefinitionInfo, Node};
pub use crate::parse::{Parser, ParserConfig, TokenKind, Tokens};
pub use crate::types::{SignatureUnit, Type, TypeSignature};
pub use crate::value::Number;

/// Parse Charm source with a throwaway session.
///
/// Convenient for one-shot inputs; definitions and signatures registered
/// by the source are discarded with the session. Use a [`Parser`] to
/// keep them across calls (a REPL does).
///
/// # Errors
///
/// Returns [`ParseError`] on the first fatal condition in the source.
pub fn parse(source: &str) -> Result<Vec<Node>, ParseError> {
    let mut parser = Parser::new();
    parser.parse(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_literals() {
        let nodes = parse("1 2.5 \" hi \"").unwrap();
        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[0], Node::number(Number::integer(1)));
        assert_eq!(nodes[1], Node::number(Number::float(2.5)));
        assert_eq!(nodes[2], Node::string("hi"));
    }

    #[test]
    fn parse_quotation() {
        let nodes = parse("[ 1 2 ]").unwrap();
        assert_eq!(nodes.len(), 1);
        assert!(matches!(&nodes[0], Node::List(body) if body.len() == 2));
    }

    #[test]
    fn parse_error_propagates() {
        assert!(parse("\" oops").is_err());
    }

    #[test]
    fn session_keeps_definitions() {
        let mut parser = Parser::new();
        parser.parse("sq := dup *").unwrap();
        assert!(parser.definition_info("sq").is_some());
    }
}
