use std::collections::HashMap;
use std::sync::Arc;

/// Compact handle for a function name.
///
/// Parsed nodes and the analyzer registries carry handles, not
/// spellings: recursion checks, registry lookups, and the info cache
/// all compare names, and a handle comparison is one integer. The
/// session's [`NameTable`] owns the spellings.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct Name(u32);

/// Owner of every function-name spelling a session has seen.
///
/// A spelling is stored once, behind a shared allocation: the by-handle
/// list and the by-spelling index point at the same `Arc<str>`. Names
/// accumulate for the lifetime of the session and are never removed,
/// so handles stay valid across parse calls.
#[derive(Clone, Debug, Default)]
pub struct NameTable {
    spellings: Vec<Arc<str>>,
    index: HashMap<Arc<str>, Name>,
}

impl NameTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle for a spelling, registering it on first sight.
    pub fn get_or_insert(&mut self, text: &str) -> Name {
        if let Some(&name) = self.index.get(text) {
            return name;
        }

        let spelling: Arc<str> = text.into();
        let name = Name(self.spellings.len() as u32);
        self.spellings.push(Arc::clone(&spelling));
        self.index.insert(spelling, name);
        name
    }

    /// The spelling behind a handle.
    pub fn text(&self, name: Name) -> &str {
        &self.spellings[name.0 as usize]
    }

    /// Handle for a spelling that may not have been seen yet.
    pub fn find(&self, text: &str) -> Option<Name> {
        self.index.get(text).copied()
    }
}
