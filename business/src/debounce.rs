//! Settling a value that changes on every keystroke.

use chrono::{DateTime, TimeDelta, Utc};

/// Delay before a search box value is acted on.
pub const SEARCH_DEBOUNCE_MS: i64 = 500;

/// Holds the latest value and releases it once it has stopped changing for
/// the configured delay. Time is passed in by the caller.
#[derive(Debug, Clone)]
pub struct Debounced<T> {
    delay: TimeDelta,
    pending: Option<(T, DateTime<Utc>)>,
    settled: Option<T>,
}

impl<T: Clone + PartialEq> Debounced<T> {
    pub fn new(delay: TimeDelta) -> Self {
        Self {
            delay,
            pending: None,
            settled: None,
        }
    }

    /// Debouncer for search inputs.
    pub fn search() -> Self {
        Self::new(TimeDelta::milliseconds(SEARCH_DEBOUNCE_MS))
    }

    /// Records `value` as of `now`. Repeating the current value does not
    /// restart the delay.
    pub fn set(&mut self, value: T, now: DateTime<Utc>) {
        let unchanged = match &self.pending {
            Some((pending, _)) => *pending == value,
            None => self.settled.as_ref() == Some(&value),
        };
        if !unchanged {
            self.pending = Some((value, now));
        }
    }

    /// Yields the value once, when it has been stable for the delay.
    pub fn poll(&mut self, now: DateTime<Utc>) -> Option<T> {
        let (_, changed_at) = self.pending.as_ref()?;
        if now - *changed_at < self.delay {
            return None;
        }
        let (value, _) = self.pending.take()?;
        self.settled = Some(value.clone());
        Some(value)
    }

    /// Time left before the pending value settles, for scheduling a repaint.
    pub fn remaining(&self, now: DateTime<Utc>) -> Option<TimeDelta> {
        let (_, changed_at) = self.pending.as_ref()?;
        Some((*changed_at + self.delay - now).max(TimeDelta::zero()))
    }

    pub fn settled(&self) -> Option<&T> {
        self.settled.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_700_000_000_000 + ms).unwrap()
    }

    #[test]
    fn value_settles_after_delay() {
        let mut search = Debounced::search();
        search.set("as".to_owned(), at(0));

        assert_eq!(search.poll(at(499)), None);
        assert_eq!(search.poll(at(500)), Some("as".to_owned()));
        assert_eq!(search.poll(at(900)), None);
        assert_eq!(search.settled().map(String::as_str), Some("as"));
    }

    #[test]
    fn typing_restarts_the_delay() {
        let mut search = Debounced::search();
        search.set("a".to_owned(), at(0));
        search.set("as".to_owned(), at(300));

        assert_eq!(search.poll(at(600)), None);
        assert_eq!(search.remaining(at(600)), Some(TimeDelta::milliseconds(200)));
        assert_eq!(search.poll(at(800)), Some("as".to_owned()));
    }

    #[test]
    fn setting_settled_value_again_is_ignored() {
        let mut search = Debounced::search();
        search.set("asha".to_owned(), at(0));
        search.poll(at(500));

        search.set("asha".to_owned(), at(700));
        assert_eq!(search.poll(at(2000)), None);
    }
}
