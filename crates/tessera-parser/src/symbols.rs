use std::collections::HashSet;

/// Set of element ids seen so far in a document. Ids compare case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    seen: HashSet<String>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `symbol`. Returns `false` if it was already present.
    pub fn insert(&mut self, symbol: &str) -> bool {
        self.seen.insert(symbol.to_ascii_lowercase())
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.seen.contains(&symbol.to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
