//! Result shaping shared by every message lookup
//!
//! A lookup is either capped at a number of records (no recency bound, no
//! ordering) or restricted to a recent window (no count bound). There is no
//! combined mode and no unrestricted mode.

use crate::fields::MessageField;
use crate::timestamp;
use chrono::{DateTime, Duration, Utc};
use parley_storage::{Criteria, Query};

/// Default number of records returned in [`SelectionMode::Capped`]
pub const DEFAULT_RESULT_CAP: u32 = 100;

/// Default length of the window in [`SelectionMode::RecentWindow`]
pub const DEFAULT_RECENT_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectionMode {
    /// At most `result_cap` records, in store order, of any age
    Capped,
    /// Every record sent within the last `recent_window`
    RecentWindow,
}

/// `use_limit == true` selects [`SelectionMode::Capped`].
impl From<bool> for SelectionMode {
    fn from(use_limit: bool) -> Self {
        if use_limit {
            SelectionMode::Capped
        } else {
            SelectionMode::RecentWindow
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionPolicy {
    pub result_cap: u32,
    pub recent_window: Duration,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self {
            result_cap: DEFAULT_RESULT_CAP,
            recent_window: Duration::days(DEFAULT_RECENT_WINDOW_DAYS),
        }
    }
}

impl SelectionPolicy {
    pub fn new(result_cap: u32, recent_window: Duration) -> Self {
        Self {
            result_cap,
            recent_window,
        }
    }

    /// Oldest `sent_at` admitted by [`SelectionMode::RecentWindow`]
    ///
    /// A window reaching past the earliest representable instant admits everything.
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_sub_signed(self.recent_window)
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Combine a lookup's filter with the restriction `mode` calls for
    pub fn shape(&self, mode: SelectionMode, criteria: Criteria, now: DateTime<Utc>) -> Query {
        match mode {
            SelectionMode::Capped => Query::new(criteria).with_limit(self.result_cap),
            SelectionMode::RecentWindow => Query::new(criteria.gte(
                MessageField::SentAt.name(),
                timestamp::encode(self.cutoff(now)),
            )),
        }
    }
}
