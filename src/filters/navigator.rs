//! URL navigation abstraction

/// Access to the current location's query string.
///
/// Implementations must give `replace_query` replace semantics: the current
/// history entry is rewritten, no new entry is pushed.
pub trait Navigator {
    /// The query string without the leading `?`.
    fn current_query(&self) -> String;

    /// Rewrites the query string of the current history entry.
    fn replace_query(&mut self, query: &str);
}

/// In-memory location used by the HTTP handlers and in tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryNavigator {
    path: String,
    /// Query of every history entry; the last one is current.
    history: Vec<String>,
    replace_count: usize,
}

impl MemoryNavigator {
    pub fn new(path: impl Into<String>) -> Self {
        Self::with_query(path, "")
    }

    /// Starts at `path` with an existing query (a leading `?` is ignored).
    pub fn with_query(path: impl Into<String>, query: &str) -> Self {
        Self {
            path: path.into(),
            history: vec![query.trim_start_matches('?').to_string()],
            replace_count: 0,
        }
    }

    /// Full relative URL, e.g. `/books?page=2`.
    pub fn url(&self) -> String {
        let query = self.current();
        if query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, query)
        }
    }

    fn current(&self) -> &str {
        self.history.last().map(String::as_str).unwrap_or_default()
    }

    /// Ordinary navigation: adds a history entry with `query`.
    pub fn push_query(&mut self, query: &str) {
        self.history.push(query.to_string());
    }

    /// Number of replace navigations performed so far.
    pub fn replace_count(&self) -> usize {
        self.replace_count
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }
}

impl Navigator for MemoryNavigator {
    fn current_query(&self) -> String {
        self.current().to_string()
    }

    fn replace_query(&mut self, query: &str) {
        match self.history.last_mut() {
            Some(current) => *current = query.to_string(),
            None => self.history.push(query.to_string()),
        }
        self.replace_count += 1;
    }
}
