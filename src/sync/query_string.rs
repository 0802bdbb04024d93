//! Keeps the URL query string and the active filter in step
//!
//! Writing the URL can itself produce a navigation event, which would decode
//! into a filter, which would be written back again. Both directions compare
//! against the last string seen or written and stop when nothing changed.

use crate::search::codec::FilterCodec;
use crate::search::filters::FilterState;
use crate::sync::history::History;

/// What the map should do after mounting
#[derive(Debug, Clone, PartialEq)]
pub struct MountOutcome {
    /// Filter for the single initial search
    pub filter: FilterState,
    /// The filter came from the URL rather than the empty default
    pub from_url: bool,
    /// Facility named by the route, if any
    pub focus: Option<String>,
}

pub struct QueryStringSync<H> {
    history: H,
    last_query: Option<String>,
}

impl<H: History> QueryStringSync<H> {
    pub fn new(history: H) -> Self {
        Self {
            history,
            last_query: None,
        }
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut H {
        &mut self.history
    }

    pub fn is_mounted(&self) -> bool {
        self.last_query.is_some()
    }

    /// Reads the initial filter. A URL without a query string gets the
    /// canonical empty-filter string written, which never triggers a search
    /// of its own.
    pub fn mount(&mut self) -> MountOutcome {
        let location = self.history.location();
        let focus = location.facility_id().map(str::to_string);

        if location.query.is_empty() {
            let canonical = FilterCodec::encode(&FilterState::default());
            if canonical != location.query {
                self.history.replace_query(&canonical);
            }
            self.last_query = Some(canonical);
            return MountOutcome {
                filter: FilterState::default(),
                from_url: false,
                focus,
            };
        }

        log::debug!("restoring filter from `{}`", location.query);
        let filter = FilterCodec::decode(&location.query);
        self.last_query = Some(location.query);
        MountOutcome {
            filter,
            from_url: true,
            focus,
        }
    }

    /// Handles a route change. Returns the decoded filter only when the query
    /// string differs from the last one seen or written.
    pub fn on_navigation(&mut self) -> Option<FilterState> {
        let query = self.history.location().query;
        match &self.last_query {
            None => {
                log::debug!("navigation before mount ignored");
                None
            }
            Some(last) if *last == query => None,
            Some(_) => {
                let filter = FilterCodec::decode(&query);
                self.last_query = Some(query);
                Some(filter)
            }
        }
    }

    /// Writes `filter` to the URL if its encoding differs from the current
    /// query string. Returns whether the URL was replaced.
    pub fn on_filter_change(&mut self, filter: &FilterState) -> bool {
        if !self.is_mounted() {
            return false;
        }
        let encoded = FilterCodec::encode(filter);
        let current = self.history.location().query;
        let changed = encoded != current;
        if changed {
            log::debug!("replacing query `{}` with `{}`", current, encoded);
            self.history.replace_query(&encoded);
        }
        self.last_query = Some(encoded);
        changed
    }

    pub fn unmount(&mut self) {
        self.last_query = None;
    }
}
