//! Static analysis over parsed definitions.
//!
//! The [`FunctionAnalyzer`] owns the two session-scope registries:
//!
//! - inline definitions: `name -> body`, holding the latest body of every
//!   definition that is inlineable when type signatures are ignored;
//! - type signatures: `name -> declared stack effect`.
//!
//! It answers the queries the parser asks while rewriting the function
//! list: is a definition inlineable, is it tail-call recursive, and what
//! does substituting a call site look like.
//!
//! Two inlineability predicates exist on purpose. A function with a type
//! signature must not be silently replaced by its body at call sites
//! (the runtime's type check would lose its anchor), but the body is
//! still *registered* so an explicit inline request in the source can
//! reach it. Registration uses the weaker predicate, call-site
//! substitution the stronger one.

use std::collections::HashMap;

use log::trace;

use crate::core::Name;
use crate::ir::Node;
use crate::types::TypeSignature;

/// Registry and query engine for inlineability, recursion, and type
/// signatures. One per parser session; mutated only by definition and
/// signature lines.
#[derive(Clone, Debug, Default)]
pub struct FunctionAnalyzer {
    inline_definitions: HashMap<Name, Vec<Node>>,
    type_signatures: HashMap<Name, TypeSignature>,
}

impl FunctionAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type signature, replacing any prior one for the name.
    pub fn add_type_signature(&mut self, signature: TypeSignature) {
        self.type_signatures.insert(signature.name, signature);
    }

    /// Look up the signature registered for a name.
    pub fn signature(&self, name: Name) -> Option<&TypeSignature> {
        self.type_signatures.get(&name)
    }

    /// Check if a name has a registered type signature.
    pub fn has_signature(&self, name: Name) -> bool {
        self.type_signatures.contains_key(&name)
    }

    /// Iterate all registered signatures.
    pub fn signatures(&self) -> impl Iterator<Item = &TypeSignature> {
        self.type_signatures.values()
    }

    /// Check if a definition may replace its call sites unconditionally.
    ///
    /// True iff the body never references the defined name (scanning
    /// nested list and definition bodies) and no type signature is
    /// registered for the name.
    pub fn is_inlinable(&self, name: Name, body: &[Node]) -> bool {
        self.is_inlinable_ignoring_signature(name, body) && !self.has_signature(name)
    }

    /// Inlineability without the type-signature clause.
    ///
    /// Decides *registration*: a body that passes only this test is still
    /// stored so an explicit inline request can use it.
    pub fn is_inlinable_ignoring_signature(&self, name: Name, body: &[Node]) -> bool {
        !references(body, name)
    }

    /// Store a body for call-site substitution, replacing any prior one.
    pub fn add_inline_definition(&mut self, name: Name, body: Vec<Node>) {
        self.inline_definitions.insert(name, body);
    }

    /// Drop a stored body. Used when a name is redefined with a body
    /// that no longer qualifies for substitution.
    pub fn remove_inline_definition(&mut self, name: Name) {
        self.inline_definitions.remove(&name);
    }

    /// The stored inline body for a name, if any.
    pub fn inline_body(&self, name: Name) -> Option<&[Node]> {
        self.inline_definitions.get(&name).map(Vec::as_slice)
    }

    /// Check if a body is tail-call recursive: its last node calls the
    /// defined name and no earlier node in the body does.
    pub fn is_tail_call_recursive(&self, name: Name, body: &[Node]) -> bool {
        match body.split_last() {
            Some((last, rest)) if last.is_reference_to(name) => {
                !rest.iter().any(|node| node.is_reference_to(name))
            }
            _ => false,
        }
    }

    /// Substitute a call to `name` by appending its stored body to `out`.
    ///
    /// Returns true when a body was appended; the caller then skips
    /// emitting the call node itself.
    pub fn inline_into(&self, out: &mut Vec<Node>, name: Name) -> bool {
        match self.inline_definitions.get(&name) {
            Some(body) => {
                trace!("substituting inline body ({} nodes)", body.len());
                out.extend(body.iter().cloned());
                true
            }
            None => false,
        }
    }
}

/// Check if any node in `body` references `name`, descending into list
/// and definition bodies.
fn references(body: &[Node], name: Name) -> bool {
    body.iter().any(|node| match node {
        Node::Defined(n) => *n == name,
        Node::List(items) => references(items, name),
        Node::Definition(def) => references(&def.body, name),
        Node::Number(_) | Node::String(_) => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::NameTable;
    use crate::types::{SignatureUnit, Type, TypeSignature};
    use crate::value::Number;
    use smallvec::smallvec;

    fn signature_for(name: Name) -> TypeSignature {
        TypeSignature {
            name,
            units: vec![SignatureUnit {
                pops: smallvec![Type::Any],
                pushes: smallvec![Type::Any],
            }],
        }
    }

    #[test]
    fn non_recursive_body_is_inlineable() {
        let mut names = NameTable::new();
        let sq = names.get_or_insert("sq");
        let dup = names.get_or_insert("dup");
        let analyzer = FunctionAnalyzer::new();
        let body = vec![Node::defined(dup), Node::defined(dup)];
        assert!(analyzer.is_inlinable(sq, &body));
        assert!(analyzer.is_inlinable_ignoring_signature(sq, &body));
    }

    #[test]
    fn self_reference_blocks_inlining() {
        let mut names = NameTable::new();
        let f = names.get_or_insert("f");
        let analyzer = FunctionAnalyzer::new();
        let body = vec![Node::defined(f)];
        assert!(!analyzer.is_inlinable(f, &body));
        assert!(!analyzer.is_inlinable_ignoring_signature(f, &body));
    }

    #[test]
    fn self_reference_inside_list_blocks_inlining() {
        let mut names = NameTable::new();
        let f = names.get_or_insert("f");
        let analyzer = FunctionAnalyzer::new();
        let body = vec![Node::list(vec![Node::list(vec![Node::defined(f)])])];
        assert!(!analyzer.is_inlinable_ignoring_signature(f, &body));
    }

    #[test]
    fn signature_blocks_inlining_but_not_registration() {
        let mut names = NameTable::new();
        let id = names.get_or_insert("id");
        let mut analyzer = FunctionAnalyzer::new();
        analyzer.add_type_signature(signature_for(id));
        let body = Vec::new();
        assert!(!analyzer.is_inlinable(id, &body));
        assert!(analyzer.is_inlinable_ignoring_signature(id, &body));
    }

    #[test]
    fn signature_redefinition_overwrites() {
        let mut names = NameTable::new();
        let f = names.get_or_insert("f");
        let mut analyzer = FunctionAnalyzer::new();
        analyzer.add_type_signature(signature_for(f));
        let replacement = TypeSignature {
            name: f,
            units: vec![SignatureUnit {
                pops: smallvec![Type::Int],
                pushes: smallvec![Type::Int],
            }],
        };
        analyzer.add_type_signature(replacement.clone());
        assert_eq!(analyzer.signature(f), Some(&replacement));
        assert_eq!(analyzer.signatures().count(), 1);
    }

    #[test]
    fn tail_call_detection() {
        let mut names = NameTable::new();
        let looping = names.get_or_insert("loop");
        let body_word = names.get_or_insert("body");
        let analyzer = FunctionAnalyzer::new();

        // body loop
        let tail = vec![Node::defined(body_word), Node::defined(looping)];
        assert!(analyzer.is_tail_call_recursive(looping, &tail));

        // loop body
        let head = vec![Node::defined(looping), Node::defined(body_word)];
        assert!(!analyzer.is_tail_call_recursive(looping, &head));

        // loop body loop
        let both = vec![
            Node::defined(looping),
            Node::defined(body_word),
            Node::defined(looping),
        ];
        assert!(!analyzer.is_tail_call_recursive(looping, &both));

        // no self-call at all
        let none = vec![Node::defined(body_word)];
        assert!(!analyzer.is_tail_call_recursive(looping, &none));
        assert!(!analyzer.is_tail_call_recursive(looping, &[]));
    }

    #[test]
    fn tail_call_ignores_quoted_self_reference() {
        let mut names = NameTable::new();
        let f = names.get_or_insert("f");
        let body = vec![Node::list(vec![Node::defined(f)]), Node::defined(f)];
        let analyzer = FunctionAnalyzer::new();
        assert!(analyzer.is_tail_call_recursive(f, &body));
    }

    #[test]
    fn inline_substitution_appends_stored_body() {
        let mut names = NameTable::new();
        let sq = names.get_or_insert("sq");
        let dup = names.get_or_insert("dup");
        let star = names.get_or_insert("*");
        let mut analyzer = FunctionAnalyzer::new();
        analyzer.add_inline_definition(sq, vec![Node::defined(dup), Node::defined(star)]);

        let mut out = vec![Node::number(Number::integer(5))];
        assert!(analyzer.inline_into(&mut out, sq));
        assert_eq!(
            out,
            vec![
                Node::number(Number::integer(5)),
                Node::defined(dup),
                Node::defined(star),
            ]
        );

        let unknown = names.get_or_insert("unknown");
        assert!(!analyzer.inline_into(&mut out, unknown));
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn redefinition_replaces_and_removal_clears() {
        let mut names = NameTable::new();
        let f = names.get_or_insert("f");
        let a = names.get_or_insert("a");
        let b = names.get_or_insert("b");
        let mut analyzer = FunctionAnalyzer::new();

        analyzer.add_inline_definition(f, vec![Node::defined(a)]);
        analyzer.add_inline_definition(f, vec![Node::defined(b)]);
        assert_eq!(analyzer.inline_body(f), Some(&[Node::defined(b)][..]));

        analyzer.remove_inline_definition(f);
        assert_eq!(analyzer.inline_body(f), None);
    }
}
