use std::collections::HashSet;

use crate::business::BusinessRecord;

/// Identities seen so far in one scope (a single run, or the master list).
/// Identities are only ever added.
#[derive(Debug, Default)]
pub struct DedupSet {
    seen: HashSet<(String, String)>,
}

impl DedupSet {
    pub fn new() -> Self {
        DedupSet::default()
    }

    /// True if the record's identity has not been seen yet; records it as seen.
    pub fn is_new(&mut self, record: &BusinessRecord) -> bool {
        self.seen.insert(record.identity())
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
