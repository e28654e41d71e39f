use crate::config::RouteConfig;

/// Ordered prefix routes.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<RouteConfig>,
}

impl RouteTable {
    #[must_use]
    pub fn new(routes: Vec<RouteConfig>) -> Self {
        Self { routes }
    }

    /// First route whose prefix covers `path` on a segment boundary:
    /// `/books` matches `/books` and `/books/1`, not `/bookstore`.
    #[must_use]
    pub fn match_path(&self, path: &str) -> Option<&RouteConfig> {
        self.routes
            .iter()
            .find(|r| prefix_matches(&r.path_prefix, path))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

fn prefix_matches(prefix: &str, path: &str) -> bool {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        return true;
    }
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}
