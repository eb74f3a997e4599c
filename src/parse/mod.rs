//! Parser for Charm source code.
//!
//! Converts source text to the node sequence the runtime consumes.
//!
//! # Grammar
//!
//! ```text
//! input       = line ("\n" line)*
//! line        = definition | signature | expr*
//! definition  = name ":=" expr*
//! signature   = name "::" types "->" types ("|" types "->" types)*
//! expr        = number | string | list | name
//! string      = '"' token* '"'
//! list        = "[" expr* "]"
//! number      = token over "-" "." "0".."9" with at least one digit
//! name        = any other token
//! ```
//!
//! Tokens are maximal space-free runs; every piece of punctuation above
//! (`[`, `]`, `"`, `:=`, `::`, `->`, `|`) is only recognized as a
//! free-standing token. A line is classified *before* expression parsing:
//! a free-standing `:=` outside brackets and quotes makes it a
//! definition, else a free-standing `::` makes it a type signature.
//!
//! Definition bodies and list interiors are isolated as substrings and
//! re-lexed through the same pipeline; a list interior is parsed with
//! call-site inlining disabled because its body stays quoted until the
//! runtime chooses to execute it.

mod signature;

use std::collections::HashMap;

use log::{debug, trace};

use crate::analysis::FunctionAnalyzer;
use crate::core::{Name, NameTable};
use crate::error::ParseError;
use crate::ir::{Definition, DefinitionInfo, Node};
use crate::value::Number;

/// What a single token is, before any context is applied.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TokenKind {
    /// Free-standing `[`.
    ListOpen,
    /// Free-standing `"`.
    StringOpen,
    /// Free-standing `:=`.
    DefinitionMarker,
    /// Numeric literal spelling.
    Number,
    /// Anything else: a name to resolve at run time.
    Name,
}

/// Classify one token.
pub fn recognize(token: &str) -> TokenKind {
    match token {
        "[" => TokenKind::ListOpen,
        "\"" => TokenKind::StringOpen,
        ":=" => TokenKind::DefinitionMarker,
        _ if is_number_token(token) => TokenKind::Number,
        _ => TokenKind::Name,
    }
}

/// Numeric spelling: only `-`, `.`, digits, and at least one digit.
/// Semantically malformed spellings (`1.2.3`, `--5`) still count; the
/// number library rejects them later.
fn is_number_token(token: &str) -> bool {
    let mut has_digit = false;
    for c in token.chars() {
        match c {
            '0'..='9' => has_digit = true,
            '-' | '.' => {}
            _ => return false,
        }
    }
    has_digit
}

/// Iterator over the space-separated tokens of one line.
///
/// Yields maximal non-empty runs of non-space characters, so runs of
/// spaces collapse and never produce empty tokens.
#[derive(Clone, Debug)]
pub struct Tokens<'a> {
    rest: &'a str,
}

impl<'a> Tokens<'a> {
    pub fn new(line: &'a str) -> Self {
        Self { rest: line }
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let rest = self.rest.trim_start_matches(' ');
        match rest.find(' ') {
            Some(i) => {
                self.rest = &rest[i + 1..];
                Some(&rest[..i])
            }
            None => {
                self.rest = "";
                if rest.is_empty() {
                    None
                } else {
                    Some(rest)
                }
            }
        }
    }
}

/// How a whole line is handled.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum LineKind {
    Definition,
    Signature,
    Expression,
}

/// Classify a line by scanning for a free-standing `:=` or `::` at list
/// depth zero and outside a string. Depth updates and the separator
/// check happen in the same pass; when a line somehow contains both
/// separators, the definition reading wins.
fn classify_line(line: &str) -> LineKind {
    let mut list_depth: i64 = 0;
    let mut in_string = false;
    let mut kind = LineKind::Expression;
    for token in Tokens::new(line) {
        match token {
            "[" => list_depth += 1,
            "]" => list_depth -= 1,
            "\"" => in_string = !in_string,
            _ => {}
        }
        if list_depth == 0 && !in_string {
            match token {
                ":=" => return LineKind::Definition,
                "::" if kind == LineKind::Expression => kind = LineKind::Signature,
                _ => {}
            }
        }
    }
    kind
}

/// Parser configuration options.
#[derive(Clone, Debug)]
pub struct ParserConfig {
    /// Substitute inlineable definitions at call sites while parsing.
    pub optimize_inline: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            optimize_inline: true,
        }
    }
}

/// The parsing session.
///
/// Owns the function analyzer, the name table, and the per-name
/// [`DefinitionInfo`] cache. All three accumulate over the lifetime of
/// the session; expression lines only read them, definition and
/// signature lines mutate them. Collaborators receive shared borrows
/// and cannot mutate anything.
pub struct Parser {
    analyzer: FunctionAnalyzer,
    names: NameTable,
    definition_info: HashMap<Name, DefinitionInfo>,
    config: ParserConfig,
}

impl Parser {
    /// Create a parser with default configuration.
    pub fn new() -> Self {
        Self::with_config(ParserConfig::default())
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self {
            analyzer: FunctionAnalyzer::new(),
            names: NameTable::new(),
            definition_info: HashMap::new(),
            config,
        }
    }

    /// Parse one input text (any number of LF-separated lines).
    ///
    /// Returns the parsed node sequence, with inlineable calls already
    /// substituted when optimization is on. The first error aborts the
    /// call with no partial result.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] for an unterminated string or list, an
    /// unknown type token, a misplaced `|`, or a malformed number.
    pub fn parse(&mut self, source: &str) -> Result<Vec<Node>, ParseError> {
        self.lex(source, true)
    }

    /// The function analyzer accumulated by this session.
    pub fn analyzer(&self) -> &FunctionAnalyzer {
        &self.analyzer
    }

    /// The table resolving the `Name` handles in parsed nodes.
    pub fn names(&self) -> &NameTable {
        &self.names
    }

    /// Cached analysis results for a defined name.
    pub fn definition_info(&self, name: &str) -> Option<DefinitionInfo> {
        let name = self.names.find(name)?;
        self.definition_info.get(&name).copied()
    }

    /// Names defined so far, for completion surfaces.
    pub fn defined_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.definition_info
            .keys()
            .map(|&name| self.names.text(name))
    }

    fn lex(&mut self, source: &str, will_inline: bool) -> Result<Vec<Node>, ParseError> {
        let mut out = Vec::new();
        for line in source.split('\n') {
            match classify_line(line) {
                LineKind::Definition => {
                    let definition = self.parse_definition(line)?;
                    out.push(Node::Definition(definition));
                }
                LineKind::Signature => {
                    let sig = signature::parse_signature(line, &mut self.names)?;
                    trace!(
                        "registered type signature for `{}`",
                        self.names.text(sig.name)
                    );
                    self.analyzer.add_type_signature(sig);
                }
                LineKind::Expression => {
                    let mut tokens = Tokens::new(line);
                    while let Some(token) = tokens.next() {
                        self.parse_token(&mut out, token, &mut tokens, will_inline)?;
                    }
                }
            }
        }
        Ok(out)
    }

    /// Parse a `name := body` line. The name is everything before the
    /// first `:=`, trimmed, taken verbatim; the body is re-lexed through
    /// the full pipeline (so it may itself contain definitions).
    fn parse_definition(&mut self, line: &str) -> Result<Definition, ParseError> {
        let (name, body) = match line.split_once(":=") {
            Some(parts) => parts,
            // the classifier only sends lines containing a free-standing :=
            None => (line, ""),
        };
        let name = self.names.get_or_insert(name.trim());
        let body = self.lex(body, true)?;
        let info = self.analyze_definition(name, &body);
        Ok(Definition { name, body, info })
    }

    /// Run the analyzer over a fresh definition and update the session
    /// registries: the inline registry reflects the latest body iff it
    /// is inlineable ignoring type signatures, and the info cache is
    /// overwritten.
    fn analyze_definition(&mut self, name: Name, body: &[Node]) -> DefinitionInfo {
        let inlineable = self.analyzer.is_inlinable(name, body);
        if self.analyzer.is_inlinable_ignoring_signature(name, body) {
            self.analyzer.add_inline_definition(name, body.to_vec());
        } else {
            self.analyzer.remove_inline_definition(name);
        }
        let tail_call_recursive = self.analyzer.is_tail_call_recursive(name, body);
        let info = DefinitionInfo {
            inlineable,
            tail_call_recursive,
        };
        self.definition_info.insert(name, info);
        debug!(
            "analyzed `{}`: inlineable={} tail_call_recursive={}",
            self.names.text(name),
            inlineable,
            tail_call_recursive
        );
        info
    }

    /// Dispatch one expression token, consuming further tokens from the
    /// line for string and list literals.
    fn parse_token(
        &mut self,
        out: &mut Vec<Node>,
        token: &str,
        tokens: &mut Tokens<'_>,
        will_inline: bool,
    ) -> Result<(), ParseError> {
        match recognize(token) {
            TokenKind::Number => out.push(Node::Number(token.parse::<Number>()?)),
            TokenKind::StringOpen => out.push(parse_string(tokens)?),
            TokenKind::ListOpen => {
                let body = self.parse_list(tokens)?;
                out.push(Node::List(body));
            }
            // a := the classifier declined is an ordinary name here
            TokenKind::Name | TokenKind::DefinitionMarker => {
                let name = self.names.get_or_insert(token);
                if self.config.optimize_inline
                    && will_inline
                    && self
                        .definition_info
                        .get(&name)
                        .is_some_and(|info| info.inlineable)
                    && self.analyzer.inline_into(out, name)
                {
                    trace!("inlined call to `{}`", token);
                    return Ok(());
                }
                out.push(Node::Defined(name));
            }
        }
        Ok(())
    }

    /// Consume tokens up to the `]` matching an already-consumed `[`,
    /// then re-lex the interior as fresh input with inlining disabled.
    /// Only brackets move the depth; quotes do not shield a `]`.
    fn parse_list(&mut self, tokens: &mut Tokens<'_>) -> Result<Vec<Node>, ParseError> {
        let mut interior = String::new();
        let mut depth = 1u32;
        loop {
            let token = match tokens.next() {
                Some(token) => token,
                None => return Err(ParseError::UnterminatedList),
            };
            match token {
                "[" => depth += 1,
                "]" => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                _ => {}
            }
            interior.push_str(token);
            interior.push(' ');
        }
        self.lex(interior.trim_end_matches(' '), false)
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Consume tokens up to the `"` matching an already-consumed `"`.
/// Interior tokens are escape-decoded individually and joined by single
/// spaces; the separator after the last one is stripped.
fn parse_string(tokens: &mut Tokens<'_>) -> Result<Node, ParseError> {
    let mut value = String::new();
    let mut terminated = false;
    for token in tokens {
        if token == "\"" {
            terminated = true;
            break;
        }
        value.push_str(&unescape_token(token));
        value.push(' ');
    }
    if !terminated {
        return Err(ParseError::UnterminatedString);
    }
    value.pop();
    Ok(Node::string(value))
}

/// Apply the escape table to one token: `\n` `\t` `\"` `\0` `\\`.
///
/// Escapes never span token boundaries, and a backslash that is the
/// final character of its token is left intact.
fn unescape_token(token: &str) -> String {
    let mut out = String::with_capacity(token.len());
    let mut chars = token.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            let replacement = match chars.peek() {
                Some('n') => Some('\n'),
                Some('t') => Some('\t'),
                Some('"') => Some('"'),
                Some('0') => Some('\0'),
                Some('\\') => Some('\\'),
                _ => None,
            };
            if let Some(decoded) = replacement {
                chars.next();
                out.push(decoded);
                continue;
            }
        }
        out.push(c);
    }
    out
}
