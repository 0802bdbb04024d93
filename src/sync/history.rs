//! Access to the current route and its query string

use crate::core::constants::FACILITY_ROUTE_PREFIX;
use url::Url;

/// Origin that relative routes are resolved against
const ROUTE_BASE: &str = "http://localhost/";

/// Path and query string (without the leading `?`) of the current route
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
    pub path: String,
    pub query: String,
}

impl Location {
    pub fn new(path: impl Into<String>, query: impl Into<String>) -> Self {
        let query = query.into();
        Self {
            path: path.into(),
            query: query.strip_prefix('?').map(str::to_string).unwrap_or(query),
        }
    }

    /// Resolves a relative URL like `/facilities/US1?q=mill#top`. The
    /// fragment is dropped. A URL that cannot be resolved falls back to `/`.
    pub fn parse(url: &str) -> Self {
        match Url::parse(ROUTE_BASE).and_then(|base| base.join(url)) {
            Ok(resolved) => Self::new(resolved.path(), resolved.query().unwrap_or_default()),
            Err(err) => {
                log::debug!("unusable route {:?}: {}", url, err);
                Self::new("/", "")
            }
        }
    }

    /// The facility id when the route is `/facilities/{id}`
    pub fn facility_id(&self) -> Option<&str> {
        let id = self
            .path
            .strip_prefix(FACILITY_ROUTE_PREFIX)?
            .trim_end_matches('/');
        (!id.is_empty() && !id.contains('/')).then_some(id)
    }

    pub fn href(&self) -> String {
        if self.query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.query)
        }
    }
}

/// Route storage, e.g. the browser history
pub trait History {
    fn location(&self) -> Location;

    /// Replaces the query string of the current entry without adding a new one
    fn replace_query(&mut self, query: &str);
}

/// In-memory history used by the viewer app and tests
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    entries: Vec<Location>,
    index: usize,
    replacements: usize,
}

impl MemoryHistory {
    pub fn new(url: &str) -> Self {
        Self {
            entries: vec![Location::parse(url)],
            index: 0,
            replacements: 0,
        }
    }

    /// Navigates to a new entry, dropping any forward entries
    pub fn push(&mut self, url: &str) {
        self.entries.truncate(self.index + 1);
        self.entries.push(Location::parse(url));
        self.index = self.entries.len() - 1;
    }

    pub fn back(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// How many times `replace_query` has rewritten an entry
    pub fn replacements(&self) -> usize {
        self.replacements
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new("/")
    }
}

impl History for MemoryHistory {
    fn location(&self) -> Location {
        self.entries[self.index].clone()
    }

    fn replace_query(&mut self, query: &str) {
        let entry = &mut self.entries[self.index];
        entry.query = query.strip_prefix('?').unwrap_or(query).to_string();
        self.replacements += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_location() {
        let location = Location::parse("/facilities/US2020001?q=mill#map");
        assert_eq!(location.path, "/facilities/US2020001");
        assert_eq!(location.query, "q=mill");
        assert_eq!(location.facility_id(), Some("US2020001"));
        assert_eq!(location.href(), "/facilities/US2020001?q=mill");
    }

    #[test]
    fn test_parse_follows_url_rules() {
        // An encoded `?` belongs to the path, not the query
        let location = Location::parse("/facilities/A%3Fb?q=1");
        assert_eq!(location.path, "/facilities/A%3Fb");
        assert_eq!(location.query, "q=1");

        let location = Location::parse("/facilities/../?countries=BD&q=#top");
        assert_eq!(location.path, "/");
        assert_eq!(location.query, "countries=BD&q=");

        assert_eq!(Location::parse("?q=mill"), Location::new("/", "q=mill"));
        assert_eq!(Location::parse("").href(), "/");
    }

    #[test]
    fn test_facility_route_detection() {
        assert_eq!(Location::parse("/facilities/").facility_id(), None);
        assert_eq!(Location::parse("/facilities/A/").facility_id(), Some("A"));
        assert_eq!(Location::parse("/facilities/A/claim").facility_id(), None);
        assert_eq!(Location::parse("/?q=x").facility_id(), None);
    }

    #[test]
    fn test_memory_history_navigation() {
        let mut history = MemoryHistory::new("/?q=a");
        history.push("/?q=b");
        history.replace_query("?q=c");
        assert_eq!(history.location().query, "q=c");
        assert_eq!(history.replacements(), 1);

        assert!(history.back());
        assert_eq!(history.location().query, "q=a");
        assert!(!history.back());

        history.push("/facilities/X");
        assert_eq!(history.len(), 2);
    }
}
