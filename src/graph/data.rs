//! Read API for UI collaborators: the current visible node list, active
//! repository metadata, the live/demo flag. Derivation goes through the
//! per-repository layout cache; a cache hit skips the cold path entirely.

use crate::store::{LayoutCache, LayoutMeta, RepoEntry, RepoStore};

use super::demo::demo_nodes;
use super::{VisualNode, build_visual_nodes};

#[derive(Clone, Debug, PartialEq)]
pub struct GraphMeta {
    pub repo_name: String,
    pub repo_url: String,
    pub system_health: f32,
    pub total_files: usize,
    pub project_root: String,
}

pub struct GraphData {
    pub nodes: Vec<VisualNode>,
    pub meta: Option<GraphMeta>,
    /// False means the demo placeholder is showing.
    pub is_live: bool,
}

/// Derive the graph for the active repository, or the demo placeholder when
/// none is active.
pub fn load(store: &RepoStore, layouts: &mut LayoutCache) -> GraphData {
    match store.active() {
        Some(entry) => {
            let (nodes, meta) = build_from_entry(entry, layouts, false);
            GraphData {
                nodes,
                meta: Some(meta),
                is_live: true,
            }
        }
        None => GraphData {
            nodes: demo_nodes(),
            meta: None,
            is_live: false,
        },
    }
}

/// Layout for one entry, cache-first. `force` skips the cache read (manual
/// refresh); the fresh result is cached either way.
pub fn build_from_entry(
    entry: &RepoEntry,
    layouts: &mut LayoutCache,
    force: bool,
) -> (Vec<VisualNode>, GraphMeta) {
    if !force && let Some(cached) = layouts.get(&entry.id) {
        let meta = GraphMeta {
            repo_name: cached.meta.repo_name.clone(),
            repo_url: entry.repo_url.clone(),
            system_health: cached.meta.system_health,
            total_files: cached.meta.total_files,
            project_root: entry.graph.project_root.clone(),
        };
        return (cached.nodes.clone(), meta);
    }

    let nodes = build_visual_nodes(&entry.graph);
    let meta = GraphMeta {
        repo_name: entry.graph.project_name.clone(),
        repo_url: entry.repo_url.clone(),
        system_health: entry.graph.health_score,
        total_files: entry.graph.nodes.len(),
        project_root: entry.graph.project_root.clone(),
    };

    layouts.set(
        &entry.id,
        nodes.clone(),
        LayoutMeta {
            repo_name: meta.repo_name.clone(),
            system_health: meta.system_health,
            total_files: meta.total_files,
        },
    );

    (nodes, meta)
}
