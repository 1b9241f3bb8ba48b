//! Input debouncing for the parts search box
//!
//! Time is passed in by the caller so the settle rule is deterministic.

use std::time::{Duration, Instant};

/// Quiet period after the last keystroke before a search fires
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(250);

#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<(String, Instant)>,
    settled: String,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(SEARCH_DEBOUNCE)
    }
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
            settled: String::new(),
        }
    }

    /// Record an edit; the query settles once `delay` passes without another edit
    pub fn set_query(&mut self, query: &str, now: Instant) {
        self.pending = Some((query.trim().to_string(), now));
    }

    /// The settled query if it changed since the last call, else `None`
    pub fn poll(&mut self, now: Instant) -> Option<&str> {
        let ready = matches!(&self.pending, Some((_, at)) if now.duration_since(*at) >= self.delay);
        if !ready {
            return None;
        }
        let (query, _) = self.pending.take()?;
        if query == self.settled {
            return None;
        }
        self.settled = query;
        Some(&self.settled)
    }

    /// Settle a pending edit immediately (the user pressed Enter)
    pub fn flush(&mut self) -> Option<&str> {
        let at = self.pending.as_ref().map(|(_, at)| *at)?;
        self.poll(at + self.delay)
    }

    /// The last settled (trimmed) query
    pub fn settled(&self) -> &str {
        &self.settled
    }

    /// Whether an edit is still waiting out the delay
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settles_after_delay() {
        let t0 = Instant::now();
        let mut d = Debouncer::default();
        d.set_query("bra", t0);
        assert_eq!(d.poll(t0 + Duration::from_millis(100)), None);
        d.set_query(" brake ", t0 + Duration::from_millis(150));
        assert_eq!(d.poll(t0 + Duration::from_millis(300)), None);
        assert_eq!(d.poll(t0 + Duration::from_millis(400)), Some("brake"));
        assert_eq!(d.settled(), "brake");
        assert!(!d.is_pending());
    }

    #[test]
    fn test_unchanged_query_does_not_fire_again() {
        let t0 = Instant::now();
        let mut d = Debouncer::default();
        d.set_query("pad", t0);
        assert_eq!(d.poll(t0 + SEARCH_DEBOUNCE), Some("pad"));
        d.set_query("pad ", t0 + Duration::from_secs(1));
        assert_eq!(d.poll(t0 + Duration::from_secs(2)), None);
    }

    #[test]
    fn test_flush_settles_immediately() {
        let mut d = Debouncer::default();
        d.set_query("filter", Instant::now());
        assert_eq!(d.flush(), Some("filter"));
        assert_eq!(d.flush(), None);
    }
}
