//! Browser history seam.

use parking_lot::Mutex;

/// The history collaborator the router writes to.
///
/// Only the router writes history, and only for GET visits that are not
/// background loads. `assign` and `reload` leave the single-page app.
pub trait History: Send + Sync {
    /// Current location (path and query).
    fn location(&self) -> String;

    /// Push a new entry.
    fn push(&self, url: &str);

    /// Replace the current entry.
    fn replace(&self, url: &str);

    /// Full browser navigation to `url`.
    fn assign(&self, url: &str);

    /// Full reload of the current location.
    fn reload(&self);
}

#[derive(Debug, Default)]
struct MemoryHistoryState {
    entries: Vec<String>,
    hard_navigations: Vec<String>,
    reloads: usize,
}

/// In-memory history, for headless use and tests.
///
/// # Examples
///
/// ```
/// use laika_http::client::{History, MemoryHistory};
///
/// let history = MemoryHistory::new("/");
/// history.push("/blog");
/// history.replace("/blog?page=2");
/// assert_eq!(history.location(), "/blog?page=2");
/// assert_eq!(history.entries(), vec!["/", "/blog?page=2"]);
/// ```
#[derive(Debug)]
pub struct MemoryHistory {
    state: Mutex<MemoryHistoryState>,
}

impl MemoryHistory {
    /// Create a history whose only entry is `initial`.
    pub fn new(initial: impl Into<String>) -> Self {
        MemoryHistory {
            state: Mutex::new(MemoryHistoryState {
                entries: vec![initial.into()],
                ..Default::default()
            }),
        }
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> Vec<String> {
        self.state.lock().entries.clone()
    }

    /// Targets of full navigations, in order.
    pub fn hard_navigations(&self) -> Vec<String> {
        self.state.lock().hard_navigations.clone()
    }

    /// Number of full reloads.
    pub fn reloads(&self) -> usize {
        self.state.lock().reloads
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new("/")
    }
}

impl History for MemoryHistory {
    fn location(&self) -> String {
        self.state.lock().entries.last().cloned().unwrap_or_else(|| "/".to_string())
    }

    fn push(&self, url: &str) {
        self.state.lock().entries.push(url.to_string());
    }

    fn replace(&self, url: &str) {
        let mut state = self.state.lock();
        match state.entries.last_mut() {
            Some(last) => *last = url.to_string(),
            None => state.entries.push(url.to_string()),
        }
    }

    fn assign(&self, url: &str) {
        self.state.lock().hard_navigations.push(url.to_string());
    }

    fn reload(&self) {
        self.state.lock().reloads += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_replace() {
        let history = MemoryHistory::new("/");
        history.push("/a");
        history.push("/b");
        history.replace("/c");
        assert_eq!(history.entries(), vec!["/", "/a", "/c"]);
        assert_eq!(history.location(), "/c");
    }

    #[test]
    fn test_hard_navigation_does_not_touch_entries() {
        let history = MemoryHistory::default();
        history.assign("/login");
        history.reload();
        assert_eq!(history.entries(), vec!["/"]);
        assert_eq!(history.hard_navigations(), vec!["/login"]);
        assert_eq!(history.reloads(), 1);
    }
}
