use std::collections::HashMap;

use crate::graph::VisualNode;

#[derive(Clone, Debug, PartialEq)]
pub struct LayoutMeta {
    pub repo_name: String,
    pub system_health: f32,
    pub total_files: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LayoutEntry {
    pub nodes: Vec<VisualNode>,
    pub meta: LayoutMeta,
}

/// Session-scoped cache of derived layouts, keyed by repository entry id.
/// Entries are whole snapshots: `set` replaces atomically and readers never
/// observe a partially built layout. Unlike the repository store, this does
/// not survive process restart.
#[derive(Default)]
pub struct LayoutCache {
    entries: HashMap<String, LayoutEntry>,
}

impl LayoutCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, repo_id: &str) -> Option<&LayoutEntry> {
        self.entries.get(repo_id)
    }

    pub fn set(&mut self, repo_id: &str, nodes: Vec<VisualNode>, meta: LayoutMeta) {
        self.entries.insert(repo_id.to_owned(), LayoutEntry { nodes, meta });
    }

    pub fn invalidate(&mut self, repo_id: &str) {
        self.entries.remove(repo_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta() -> LayoutMeta {
        LayoutMeta {
            repo_name: "acme".to_owned(),
            system_health: 90.0,
            total_files: 3,
        }
    }

    #[test]
    fn set_then_get_round_trips() {
        let mut cache = LayoutCache::new();
        assert!(cache.get("r1").is_none());

        cache.set("r1", Vec::new(), meta());
        assert_eq!(cache.get("r1").unwrap().meta.repo_name, "acme");
    }

    #[test]
    fn invalidate_removes_the_entry() {
        let mut cache = LayoutCache::new();
        cache.set("r1", Vec::new(), meta());
        cache.invalidate("r1");
        assert!(cache.get("r1").is_none());
    }

    #[test]
    fn entries_are_independent_per_repo() {
        let mut cache = LayoutCache::new();
        cache.set("r1", Vec::new(), meta());
        cache.invalidate("r2");
        assert!(cache.get("r1").is_some());
    }
}
