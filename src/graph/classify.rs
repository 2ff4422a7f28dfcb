use serde::{Deserialize, Serialize};

/// Visual category of a rendered node. Drives color, icon, and legend; the
/// set is closed so renderers can match exhaustively.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeCategory {
    Module,
    Component,
    Utility,
    Api,
    Hook,
    File,
    Folder,
}

impl NodeCategory {
    pub fn label(self) -> &'static str {
        match self {
            Self::Module => "Module",
            Self::Component => "Component",
            Self::Utility => "Utility",
            Self::Api => "API",
            Self::Hook => "Hook",
            Self::File => "File",
            Self::Folder => "Folder",
        }
    }

    pub const ALL: [Self; 7] = [
        Self::Module,
        Self::Component,
        Self::Utility,
        Self::Api,
        Self::Hook,
        Self::File,
        Self::Folder,
    ];
}

struct Rule {
    category: NodeCategory,
    keywords: &'static [&'static str],
    prefixes: &'static [&'static str],
}

impl Rule {
    fn matches(&self, label: &str) -> bool {
        self.keywords.iter().any(|keyword| label.contains(keyword))
            || self.prefixes.iter().any(|prefix| label.starts_with(prefix))
    }
}

// Evaluated top to bottom; the first matching rule wins. Order matters:
// "use_router" classifies as Api because the routing rule precedes the
// hook-prefix rule.
const RULES: &[Rule] = &[
    Rule {
        category: NodeCategory::Api,
        keywords: &["router", "route", "api", "endpoint", "controller"],
        prefixes: &[],
    },
    Rule {
        category: NodeCategory::Hook,
        keywords: &["hook"],
        prefixes: &["use_", "use-"],
    },
    Rule {
        category: NodeCategory::Utility,
        keywords: &["util", "helper", "tool", "lib", "service"],
        prefixes: &[],
    },
    Rule {
        category: NodeCategory::Component,
        keywords: &["component", "widget", "view", "panel", "schema"],
        prefixes: &[],
    },
];

/// Map a backend node kind plus label onto a visual category. Pure and
/// stable: the same inputs always produce the same category.
pub fn classify(kind: &str, label: &str) -> NodeCategory {
    if kind == "folder" {
        return NodeCategory::Folder;
    }

    let lowered = label.to_lowercase();
    for rule in RULES {
        if rule.matches(&lowered) {
            return rule.category;
        }
    }

    NodeCategory::File
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folders_map_directly() {
        assert_eq!(classify("folder", "utils"), NodeCategory::Folder);
    }

    #[test]
    fn keyword_groups_classify_files() {
        assert_eq!(classify("file", "user_controller.py"), NodeCategory::Api);
        assert_eq!(classify("file", "AuthRouter.ts"), NodeCategory::Api);
        assert_eq!(classify("file", "use-graph.ts"), NodeCategory::Hook);
        assert_eq!(classify("file", "useFetchHook.tsx"), NodeCategory::Hook);
        assert_eq!(classify("file", "string_helpers.go"), NodeCategory::Utility);
        assert_eq!(classify("file", "AuthService.java"), NodeCategory::Utility);
        assert_eq!(classify("file", "SidebarWidget.tsx"), NodeCategory::Component);
        assert_eq!(classify("file", "user_schema.py"), NodeCategory::Component);
    }

    #[test]
    fn first_matching_rule_wins() {
        // Routing keywords outrank the hook prefix.
        assert_eq!(classify("file", "use_router.ts"), NodeCategory::Api);
        // "service" outranks "panel".
        assert_eq!(classify("file", "panel_service.py"), NodeCategory::Utility);
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(classify("file", "API_CLIENT.PY"), NodeCategory::Api);
        assert_eq!(classify("file", "Use_Auth.ts"), NodeCategory::Hook);
    }

    #[test]
    fn unmatched_labels_are_plain_files() {
        assert_eq!(classify("file", "main.rs"), NodeCategory::File);
        assert_eq!(classify("file", "README.md"), NodeCategory::File);
    }
}
