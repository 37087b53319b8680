//! Id assignment for new to-do items.
//!
//! Ids come from the wall clock in milliseconds, bumped forward whenever the
//! clock has not advanced since the previous id so that every id handed out
//! by one generator is strictly greater than the last. The sequence stops
//! growing at `i64::MAX`.

use chrono::Utc;

fn wall_clock_millis() -> i64 {
    Utc::now().timestamp_millis()
}

fn frozen_clock() -> i64 {
    i64::MIN
}

#[derive(Debug, Clone)]
pub struct IdGenerator {
    clock: fn() -> i64,
    last: Option<i64>,
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator {
    /// Generator backed by the system clock.
    pub fn new() -> Self {
        Self::with_clock(wall_clock_millis)
    }

    /// Generator backed by a custom millisecond clock.
    pub fn with_clock(clock: fn() -> i64) -> Self {
        Self { clock, last: None }
    }

    /// Generator that ignores the clock and counts up from `first`.
    pub fn starting_at(first: i64) -> Self {
        Self {
            clock: frozen_clock,
            last: first.checked_sub(1),
        }
    }

    pub fn next_id(&mut self) -> i64 {
        let now = (self.clock)();
        let id = match self.last {
            Some(last) if now <= last => last.saturating_add(1),
            _ => now,
        };
        self.last = Some(id);
        id
    }
}
