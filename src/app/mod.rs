use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context};
use log::{info, warn};

use crate::backend::{BackendClient, RawGraph};
use crate::graph::data::{self, GraphData};
use crate::store::{LayoutCache, RepoEvent, RepoEvents, RepoStore};

mod panels;
mod physics;
mod view;
mod viewport;

use physics::SimGraph;
use viewport::Viewport;

pub struct RepographApp {
    store: RepoStore,
    layouts: LayoutCache,
    events: RepoEvents,
    events_rx: Receiver<RepoEvent>,
    backend: Option<BackendClient>,
    model: ViewModel,
    pending_scan: Option<PendingScan>,
    status: Option<StatusLine>,
}

enum ScanOrigin {
    NewImport,
    /// Manual refresh of an existing entry; carries the id it was started
    /// for so a result arriving after a switch can be recognized as stale.
    Refresh {
        repo_id: String,
    },
}

struct PendingScan {
    repo_url: String,
    origin: ScanOrigin,
    rx: Receiver<Result<RawGraph, String>>,
}

struct StatusLine {
    text: String,
    is_error: bool,
}

struct ViewModel {
    data: GraphData,
    sim: SimGraph,
    /// Index pairs into `data.nodes`/`sim`, precomputed for edge drawing.
    edges: Vec<(usize, usize)>,
    viewport: Viewport,
    selected: Option<String>,
    dragging: Option<usize>,
    search: String,
    import_url: String,
    import_branch: String,
}

impl ViewModel {
    fn new(data: GraphData) -> Self {
        let sim = SimGraph::build(&data.nodes);
        let edges = Self::collect_edges(&data, &sim);
        Self {
            data,
            sim,
            edges,
            viewport: Viewport::default(),
            selected: None,
            dragging: None,
            search: String::new(),
            import_url: String::new(),
            import_branch: String::new(),
        }
    }

    /// Swap in a freshly derived graph. The simulation restarts from the
    /// derived placement; viewport and form state survive the swap.
    fn set_data(&mut self, data: GraphData) {
        self.sim = SimGraph::build(&data.nodes);
        self.edges = Self::collect_edges(&data, &self.sim);
        if let Some(selected) = &self.selected
            && !data.nodes.iter().any(|node| &node.id == selected)
        {
            self.selected = None;
        }
        self.dragging = None;
        self.data = data;
    }

    fn collect_edges(data: &GraphData, sim: &SimGraph) -> Vec<(usize, usize)> {
        let mut edges = Vec::new();
        for (from, node) in data.nodes.iter().enumerate() {
            for target in &node.connections {
                if let Some(to) = sim.index_of(target)
                    && from != to
                {
                    edges.push((from, to));
                }
            }
        }
        edges
    }
}

impl RepographApp {
    pub fn new(backend_url: &str, data_dir: Option<PathBuf>) -> Self {
        let store = match data_dir.or_else(|| dirs::data_dir().map(|dir| dir.join("repograph"))) {
            Some(dir) => RepoStore::load(&dir),
            None => {
                warn!("no data directory available; repositories will not persist");
                RepoStore::in_memory()
            }
        };

        let backend = match BackendClient::new(backend_url) {
            Ok(client) => Some(client),
            Err(error) => {
                warn!("backend client unavailable: {error:#}");
                None
            }
        };

        Self::from_parts(store, backend)
    }

    fn from_parts(store: RepoStore, backend: Option<BackendClient>) -> Self {
        let mut layouts = LayoutCache::new();
        let mut events = RepoEvents::new();
        let events_rx = events.subscribe();
        let model = ViewModel::new(data::load(&store, &mut layouts));

        Self {
            store,
            layouts,
            events,
            events_rx,
            backend,
            model,
            pending_scan: None,
            status: None,
        }
    }

    fn set_status(&mut self, text: String, is_error: bool) {
        self.status = Some(StatusLine { text, is_error });
    }

    fn reload_model(&mut self) {
        let data = data::load(&self.store, &mut self.layouts);
        self.model.set_data(data);
    }

    /// Spawn a backend scan on a worker thread. At most one is in flight;
    /// the frame loop polls for its completion.
    fn start_scan(&mut self, repo_url: String, branch: Option<String>, origin: ScanOrigin) {
        if self.pending_scan.is_some() {
            return;
        }
        let Some(client) = self.backend.clone() else {
            self.set_status("backend client unavailable".to_owned(), true);
            return;
        };

        let (tx, rx) = mpsc::channel();
        let scan_url = repo_url.clone();
        thread::spawn(move || {
            let result = client
                .analyze_repository(&scan_url, branch.as_deref())
                .map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        info!("scan started for {repo_url}");
        self.set_status(format!("scanning {repo_url}..."), false);
        self.pending_scan = Some(PendingScan {
            repo_url,
            origin,
            rx,
        });
    }

    fn refresh_active(&mut self) {
        let Some(entry) = self.store.active() else {
            return;
        };
        let repo_url = entry.repo_url.clone();
        let branch = match entry.graph.branch.as_str() {
            "" => None,
            branch => Some(branch.to_owned()),
        };
        let repo_id = entry.id.clone();
        self.start_scan(repo_url, branch, ScanOrigin::Refresh { repo_id });
    }

    fn poll_pending_scan(&mut self) {
        let Some(scan) = self.pending_scan.take() else {
            return;
        };

        match scan.rx.try_recv() {
            Ok(result) => self.apply_scan_result(&scan.repo_url, scan.origin, result),
            Err(TryRecvError::Empty) => self.pending_scan = Some(scan),
            Err(TryRecvError::Disconnected) => {
                self.set_status("scan worker disconnected".to_owned(), true);
            }
        }
    }

    /// Fold a finished scan into the store. A failed scan leaves the prior
    /// graph and layout untouched. A refresh whose repository is no longer
    /// active is discarded wholesale rather than misapplied.
    fn apply_scan_result(
        &mut self,
        repo_url: &str,
        origin: ScanOrigin,
        result: Result<RawGraph, String>,
    ) {
        let graph = match result {
            Ok(graph) => graph,
            Err(error) => {
                warn!("scan of {repo_url} failed: {error}");
                self.set_status(format!("scan failed: {error}"), true);
                return;
            }
        };

        match origin {
            ScanOrigin::NewImport => {
                let id = self.store.upsert(repo_url, graph, &mut self.layouts);
                self.store.set_active(&id);
                self.events.emit(RepoEvent::ActiveChanged);
                self.set_status(format!("imported {repo_url}"), false);
            }
            ScanOrigin::Refresh { repo_id } => {
                if self.store.active_id() != Some(repo_id.as_str()) {
                    info!("discarding stale rescan of {repo_url}; active repository changed");
                    self.set_status(format!("discarded stale rescan of {repo_url}"), false);
                    return;
                }
                self.store.upsert(repo_url, graph, &mut self.layouts);
                self.events.emit(RepoEvent::ActiveChanged);
                self.set_status(format!("rescanned {repo_url}"), false);
            }
        }
    }

    fn select_repo(&mut self, id: &str) {
        if self.store.active_id() == Some(id) {
            return;
        }
        self.store.set_active(id);
        self.events.emit(RepoEvent::ActiveChanged);
    }

    fn remove_repo(&mut self, id: &str) {
        let was_active = self.store.active_id() == Some(id);
        self.store.remove(id, &mut self.layouts);
        if was_active {
            self.events.emit(RepoEvent::ActiveChanged);
        }
    }

    fn drain_events(&mut self) {
        let mut changed = false;
        while let Ok(event) = self.events_rx.try_recv() {
            match event {
                RepoEvent::ActiveChanged => changed = true,
            }
        }
        if changed {
            self.reload_model();
        }
    }
}

impl eframe::App for RepographApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.poll_pending_scan();
        self.drain_events();

        self.show_top_bar(ctx);
        self.show_repo_panel(ctx);
        self.show_details_panel(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_graph(ui);
        });

        // The refiner stays alive at floor alpha; keep frames coming.
        ctx.request_repaint();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{RawEdge, RawNode};

    fn graph(name: &str, node_ids: &[&str]) -> RawGraph {
        RawGraph {
            project_name: name.to_owned(),
            branch: "main".to_owned(),
            nodes: node_ids
                .iter()
                .map(|id| RawNode {
                    id: (*id).to_owned(),
                    label: (*id).to_owned(),
                    kind: "file".to_owned(),
                    metrics: None,
                    layer: None,
                })
                .collect(),
            edges: Vec::<RawEdge>::new(),
            health_score: 70.0,
            project_root: "/tmp/p".to_owned(),
        }
    }

    fn test_app() -> RepographApp {
        RepographApp::from_parts(RepoStore::in_memory(), None)
    }

    #[test]
    fn starts_in_demo_mode_without_repositories() {
        let app = test_app();
        assert!(!app.model.data.is_live);
        assert!(!app.model.data.nodes.is_empty());
    }

    #[test]
    fn new_import_activates_and_reloads() {
        let mut app = test_app();
        app.apply_scan_result(
            "https://example.com/r.git",
            ScanOrigin::NewImport,
            Ok(graph("fresh", &["a", "b"])),
        );
        app.drain_events();

        assert!(app.model.data.is_live);
        assert_eq!(app.model.data.nodes.len(), 2);
        assert_eq!(app.store.active().unwrap().repo_name, "fresh");
    }

    #[test]
    fn failed_scan_leaves_prior_state_untouched() {
        let mut app = test_app();
        app.apply_scan_result(
            "u",
            ScanOrigin::NewImport,
            Ok(graph("v1", &["a"])),
        );
        app.drain_events();

        app.apply_scan_result("u", ScanOrigin::NewImport, Err("boom".to_owned()));
        app.drain_events();

        assert_eq!(app.store.active().unwrap().graph.project_name, "v1");
        assert!(app.model.data.is_live);
        assert!(app.status.as_ref().unwrap().is_error);
    }

    #[test]
    fn stale_rescan_for_switched_repo_is_discarded() {
        let mut app = test_app();
        app.apply_scan_result("first", ScanOrigin::NewImport, Ok(graph("first", &["a"])));
        app.drain_events();
        let first_id = app.store.active().unwrap().id.clone();

        app.apply_scan_result("second", ScanOrigin::NewImport, Ok(graph("second", &["b"])));
        app.drain_events();

        // A rescan of "first" finishes only now, after the switch.
        app.apply_scan_result(
            "first",
            ScanOrigin::Refresh {
                repo_id: first_id.clone(),
            },
            Ok(graph("first-rescanned", &["a", "z"])),
        );
        app.drain_events();

        let first_entry = app
            .store
            .entries()
            .iter()
            .find(|entry| entry.id == first_id)
            .unwrap();
        assert_eq!(first_entry.graph.project_name, "first");
        assert_eq!(app.store.active().unwrap().repo_name, "second");
        assert_eq!(app.model.data.meta.as_ref().unwrap().repo_name, "second");
    }

    #[test]
    fn rescan_of_still_active_repo_applies() {
        let mut app = test_app();
        app.apply_scan_result("u", ScanOrigin::NewImport, Ok(graph("v1", &["a"])));
        app.drain_events();
        let id = app.store.active().unwrap().id.clone();

        app.apply_scan_result(
            "u",
            ScanOrigin::Refresh { repo_id: id.clone() },
            Ok(graph("v2", &["a", "b", "c"])),
        );
        app.drain_events();

        assert_eq!(app.store.active().unwrap().id, id);
        assert_eq!(app.model.data.nodes.len(), 3);
        assert_eq!(app.model.data.meta.as_ref().unwrap().repo_name, "v2");
    }

    #[test]
    fn removing_the_active_repo_falls_back() {
        let mut app = test_app();
        app.apply_scan_result("one", ScanOrigin::NewImport, Ok(graph("one", &["a"])));
        app.apply_scan_result("two", ScanOrigin::NewImport, Ok(graph("two", &["b"])));
        app.drain_events();

        let active = app.store.active().unwrap().id.clone();
        app.remove_repo(&active);
        app.drain_events();

        assert_eq!(app.store.active().unwrap().repo_name, "one");
        assert!(app.model.data.is_live);

        let remaining = app.store.active().unwrap().id.clone();
        app.remove_repo(&remaining);
        app.drain_events();
        assert!(!app.model.data.is_live);
    }

    #[test]
    fn selection_is_dropped_when_its_node_disappears() {
        let mut app = test_app();
        app.apply_scan_result("u", ScanOrigin::NewImport, Ok(graph("v1", &["keep", "gone"])));
        app.drain_events();
        app.model.selected = Some("gone".to_owned());

        app.apply_scan_result(
            "u",
            ScanOrigin::Refresh {
                repo_id: app.store.active().unwrap().id.clone(),
            },
            Ok(graph("v2", &["keep"])),
        );
        app.drain_events();

        assert_eq!(app.model.selected, None);
    }
}
