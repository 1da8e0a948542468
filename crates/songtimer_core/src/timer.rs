use chrono::{DateTime, Utc};

/// The in-memory foreground timer. It only fires while the process is alive
/// and the event loop keeps calling [`crate::ScheduleController::poll`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArmedTimer {
    pub id: u64,
    pub fires_at: DateTime<Utc>,
    pub uri: String,
}

impl ArmedTimer {
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        now >= self.fires_at
    }

    pub fn remaining(&self, now: DateTime<Utc>) -> std::time::Duration {
        self.fires_at
            .signed_duration_since(now)
            .to_std()
            .unwrap_or(std::time::Duration::ZERO)
    }
}

/// Single-slot timer handle. Arming replaces whatever was armed before.
#[derive(Debug, Default)]
pub struct TimerSlot {
    current: Option<ArmedTimer>,
    next_id: u64,
}

impl TimerSlot {
    pub fn arm(&mut self, fires_at: DateTime<Utc>, uri: impl Into<String>) -> &ArmedTimer {
        self.next_id += 1;
        if let Some(previous) = self.current.take() {
            tracing::debug!(timer_id = previous.id, "invalidating armed timer");
        }
        self.current.insert(ArmedTimer {
            id: self.next_id,
            fires_at,
            uri: uri.into(),
        })
    }

    pub fn clear(&mut self) -> Option<ArmedTimer> {
        self.current.take()
    }

    pub fn current(&self) -> Option<&ArmedTimer> {
        self.current.as_ref()
    }

    /// Takes the timer out of the slot if its deadline has been reached.
    pub fn take_due(&mut self, now: DateTime<Utc>) -> Option<ArmedTimer> {
        if self.current.as_ref().is_some_and(|timer| timer.is_due(now)) {
            return self.current.take();
        }
        None
    }
}
