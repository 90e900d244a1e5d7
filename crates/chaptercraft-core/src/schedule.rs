//! Timers, modelled as plain state machines over Unix-millisecond clocks.
//!
//! The host owns the real clock and calls in with the current time; nothing
//! here sleeps or spawns.

/// Auto-backup period.
pub const AUTO_BACKUP_MS: i64 = 2 * 60 * 1000;

/// Quiet period before a burst of edits is written.
pub const DEFAULT_DEBOUNCE_MS: i64 = 400;

/// Debounced write buffer: every qualifying mutation re-arms the deadline,
/// so only the final state of a burst is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteBuffer {
    debounce_ms: i64,
    deadline: Option<i64>,
}

impl Default for WriteBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE_MS)
    }
}

impl WriteBuffer {
    pub fn new(debounce_ms: i64) -> Self {
        Self {
            debounce_ms: debounce_ms.max(0),
            deadline: None,
        }
    }

    /// Cancel any pending deadline and restart the quiet period.
    pub fn schedule(&mut self, now_ms: i64) {
        self.deadline = Some(now_ms + self.debounce_ms);
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn is_due(&self, now_ms: i64) -> bool {
        matches!(self.deadline, Some(deadline) if now_ms >= deadline)
    }

    pub fn deadline(&self) -> Option<i64> {
        self.deadline
    }

    /// Called once the buffered state has been written.
    pub fn disarm(&mut self) {
        self.deadline = None;
    }
}

/// Recurring auto-backup trigger. Missed periods collapse into one firing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoBackupTimer {
    period_ms: i64,
    next_due: i64,
}

impl AutoBackupTimer {
    pub fn new(period_ms: i64, now_ms: i64) -> Self {
        let period_ms = period_ms.max(1);
        Self {
            period_ms,
            next_due: now_ms + period_ms,
        }
    }

    pub fn period_ms(&self) -> i64 {
        self.period_ms
    }

    pub fn next_due(&self) -> i64 {
        self.next_due
    }

    /// Returns true (and re-arms for one period later) when the timer fires.
    pub fn poll(&mut self, now_ms: i64) -> bool {
        if now_ms < self.next_due {
            return false;
        }
        self.next_due = now_ms + self.period_ms;
        true
    }

    /// Restart the period from `now_ms`.
    pub fn reset(&mut self, now_ms: i64) {
        self.next_due = now_ms + self.period_ms;
    }
}
