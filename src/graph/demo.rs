//! Built-in placeholder graph shown when no repository is active. Rendering
//! it is a defined state, not an error.

use super::VisualNode;
use super::classify::NodeCategory;

struct DemoNode {
    id: &'static str,
    label: &'static str,
    x: f32,
    y: f32,
    category: NodeCategory,
    connections: &'static [&'static str],
}

const DEMO_NODES: &[DemoNode] = &[
    DemoNode { id: "app", label: "App Layout", x: 400.0, y: 80.0, category: NodeCategory::Module, connections: &["dashboard", "settings", "header"] },
    DemoNode { id: "dashboard", label: "Dashboard", x: 250.0, y: 200.0, category: NodeCategory::Module, connections: &["graph-view", "chat-panel", "use-graph"] },
    DemoNode { id: "settings", label: "Settings", x: 550.0, y: 200.0, category: NodeCategory::Module, connections: &["use-auth", "card"] },
    DemoNode { id: "header", label: "Header", x: 400.0, y: 200.0, category: NodeCategory::Component, connections: &["button", "use-auth"] },
    DemoNode { id: "graph-view", label: "GraphView", x: 100.0, y: 340.0, category: NodeCategory::Component, connections: &["graph-engine", "tooltip"] },
    DemoNode { id: "chat-panel", label: "ChatPanel", x: 300.0, y: 340.0, category: NodeCategory::Component, connections: &["utils", "input"] },
    DemoNode { id: "sidebar", label: "Sidebar", x: 500.0, y: 340.0, category: NodeCategory::Component, connections: &["button", "use-auth"] },
    DemoNode { id: "graph-engine", label: "graph-engine", x: 50.0, y: 480.0, category: NodeCategory::Utility, connections: &["utils"] },
    DemoNode { id: "utils", label: "utils", x: 200.0, y: 480.0, category: NodeCategory::Utility, connections: &[] },
    DemoNode { id: "auth", label: "auth", x: 350.0, y: 480.0, category: NodeCategory::Utility, connections: &["db"] },
    DemoNode { id: "db", label: "db", x: 500.0, y: 480.0, category: NodeCategory::Utility, connections: &[] },
    DemoNode { id: "use-auth", label: "useAuth", x: 650.0, y: 340.0, category: NodeCategory::Hook, connections: &["auth"] },
    DemoNode { id: "use-graph", label: "useGraph", x: 150.0, y: 420.0, category: NodeCategory::Hook, connections: &["graph-engine"] },
    DemoNode { id: "api-auth", label: "API /auth", x: 700.0, y: 200.0, category: NodeCategory::Api, connections: &["auth", "db"] },
    DemoNode { id: "api-repos", label: "API /repos", x: 750.0, y: 340.0, category: NodeCategory::Api, connections: &["db", "utils"] },
    DemoNode { id: "button", label: "Button", x: 550.0, y: 480.0, category: NodeCategory::Component, connections: &[] },
    DemoNode { id: "card", label: "Card", x: 650.0, y: 480.0, category: NodeCategory::Component, connections: &[] },
    DemoNode { id: "input", label: "Input", x: 300.0, y: 480.0, category: NodeCategory::Component, connections: &[] },
    DemoNode { id: "tooltip", label: "Tooltip", x: 100.0, y: 540.0, category: NodeCategory::Component, connections: &[] },
];

pub fn demo_nodes() -> Vec<VisualNode> {
    DEMO_NODES
        .iter()
        .map(|demo| VisualNode {
            id: demo.id.to_owned(),
            label: demo.label.to_owned(),
            x: demo.x,
            y: demo.y,
            category: demo.category,
            connections: demo.connections.iter().map(|&id| id.to_owned()).collect(),
            metrics: None,
            path: demo.id.to_owned(),
            layer: None,
        })
        .collect()
}
