//! Search-as-you-type plumbing: debounce window and stale-result
//! suppression.
//!
//! Requests are never aborted at the transport; instead every attempt
//! takes a monotonically increasing ticket from a [`SearchSequencer`],
//! and a response is applied only if its ticket is still the newest at
//! resolution time.  Results for superseded queries are dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// How long input must be stable before a search request is issued.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(250);

/// Normalize raw keystrokes into a query: trim whitespace, `None` when
/// nothing remains (an empty query clears results without a request).
pub fn normalize_query(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Ticket identifying one search attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchTicket(u64);

/// Issues tickets and remembers the newest one.
///
/// Shared by reference between the task issuing requests and the code
/// applying results; no lock is needed beyond the atomic counter.
#[derive(Debug, Default)]
pub struct SearchSequencer {
    latest: AtomicU64,
}

impl SearchSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new attempt, superseding every earlier ticket.
    pub fn begin(&self) -> SearchTicket {
        SearchTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether `ticket` is still the newest attempt.  Checked at
    /// resolution time; a stale ticket means the response is dropped.
    pub fn is_current(&self, ticket: SearchTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_trims_and_rejects_blank() {
        assert_eq!(normalize_query("  bio  "), Some("bio"));
        assert_eq!(normalize_query("   "), None);
        assert_eq!(normalize_query(""), None);
    }

    #[test]
    fn freshly_issued_ticket_is_current() {
        let seq = SearchSequencer::new();
        let t = seq.begin();
        assert!(seq.is_current(t));
    }

    #[test]
    fn newer_ticket_supersedes_older() {
        let seq = SearchSequencer::new();
        let stale = seq.begin(); // "a"
        let fresh = seq.begin(); // "ab"
        assert!(!seq.is_current(stale));
        assert!(seq.is_current(fresh));
    }

    #[test]
    fn stale_result_arriving_late_is_still_stale() {
        let seq = SearchSequencer::new();
        let a = seq.begin();
        let ab = seq.begin();
        // The response for "a" resolves after "ab" was issued.
        assert!(!seq.is_current(a));
        // And the "ab" response is applied whenever it lands.
        assert!(seq.is_current(ab));
    }
}
