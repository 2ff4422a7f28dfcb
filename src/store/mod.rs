//! Durable multi-repository registry plus the session layout cache. The
//! registry is process-wide state with an explicit lifecycle: loaded once at
//! startup, mutated only through the CRUD operations below, written back on
//! every mutation.

mod cache;
mod events;

pub use cache::{LayoutCache, LayoutEntry, LayoutMeta};
pub use events::{RepoEvent, RepoEvents};

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::RawGraph;

const STORE_FILE: &str = "repos.json";

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct RepoEntry {
    /// Generated once, stable for the entry's lifetime (re-imports of the
    /// same URL keep it).
    pub id: String,
    pub repo_url: String,
    pub repo_name: String,
    pub added_at: DateTime<Utc>,
    pub graph: RawGraph,
}

#[derive(Default, Deserialize, Serialize)]
struct PersistedState {
    entries: Vec<RepoEntry>,
    active_id: Option<String>,
}

pub struct RepoStore {
    path: Option<PathBuf>,
    /// Kept newest-first by `added_at`.
    entries: Vec<RepoEntry>,
    active_id: Option<String>,
}

impl RepoStore {
    /// Load from the durable state file. Malformed or missing state degrades
    /// to an empty store; the no-repository view renders instead of a crash.
    pub fn load(data_dir: &Path) -> Self {
        let path = data_dir.join(STORE_FILE);
        let state = match read_state(&path) {
            Ok(state) => state,
            Err(error) => {
                warn!("discarding unreadable repo store at {}: {error:#}", path.display());
                PersistedState::default()
            }
        };

        let mut store = Self {
            path: Some(path),
            entries: state.entries,
            active_id: state.active_id,
        };
        store.sort_entries();
        store
    }

    /// A store that never touches disk. Used by tests and as the fallback
    /// when no data directory can be resolved.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            entries: Vec::new(),
            active_id: None,
        }
    }

    /// Replace the graph of an existing entry with this URL (same id,
    /// refreshed timestamp) or prepend a new one. Either path invalidates
    /// that entry's layout cache. Returns the entry id.
    pub fn upsert(&mut self, repo_url: &str, graph: RawGraph, layouts: &mut LayoutCache) -> String {
        let id = if let Some(entry) = self.entries.iter_mut().find(|e| e.repo_url == repo_url) {
            entry.repo_name = graph.project_name.clone();
            entry.graph = graph;
            entry.added_at = Utc::now();
            entry.id.clone()
        } else {
            let entry = RepoEntry {
                id: Uuid::new_v4().to_string(),
                repo_url: repo_url.to_owned(),
                repo_name: graph.project_name.clone(),
                added_at: Utc::now(),
                graph,
            };
            let id = entry.id.clone();
            self.entries.insert(0, entry);
            id
        };

        layouts.invalidate(&id);
        self.sort_entries();
        self.persist();
        id
    }

    /// Delete an entry and its cached layout. If it was active, the most
    /// recently added remaining entry takes over, or the pointer clears.
    pub fn remove(&mut self, id: &str, layouts: &mut LayoutCache) {
        self.entries.retain(|entry| entry.id != id);
        layouts.invalidate(id);

        if self.active_id.as_deref() == Some(id) {
            self.active_id = self.entries.first().map(|entry| entry.id.clone());
        }
        self.persist();
    }

    pub fn set_active(&mut self, id: &str) {
        self.active_id = Some(id.to_owned());
        self.persist();
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    /// The entry the pointer refers to, or None when unset or dangling.
    pub fn active(&self) -> Option<&RepoEntry> {
        let id = self.active_id.as_deref()?;
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// All entries, newest-first.
    pub fn entries(&self) -> &[RepoEntry] {
        &self.entries
    }

    fn sort_entries(&mut self) {
        self.entries.sort_by(|a, b| b.added_at.cmp(&a.added_at));
    }

    fn persist(&self) {
        let Some(path) = &self.path else {
            return;
        };

        let state = PersistedState {
            entries: self.entries.clone(),
            active_id: self.active_id.clone(),
        };
        if let Err(error) = write_state(path, &state) {
            // Persistence failure is not fatal; the session keeps working
            // from memory and the next successful write catches up.
            warn!("failed to persist repo store to {}: {error:#}", path.display());
        }
    }
}

fn read_state(path: &Path) -> Result<PersistedState> {
    if !path.exists() {
        return Ok(PersistedState::default());
    }
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).context("repo store JSON did not parse")
}

fn write_state(path: &Path, state: &PersistedState) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let tmp = path.with_extension("json.tmp");
    let raw = serde_json::to_string_pretty(state).context("failed to serialize repo store")?;
    fs::write(&tmp, raw).with_context(|| format!("failed to write {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("failed to replace {}", path.display()))
}
