use std::time::Instant;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::{
    storage::{entities::SessionRecord, error::StorageError, log_store::LogStore},
    utils::{clock::Clock, time::seconds_since_midnight},
};

/// Measures how long the user spends on one activity at a time and
/// turns finished sessions into [SessionRecord]s for a [LogStore].
///
/// The machine has two states, idle and tracking. `start` arms it,
/// `stop` computes the elapsed duration and disarms it, and only a
/// disarmed machine will persist anything. All state is in memory and
/// scoped to the single date the tracker was created for.
pub struct Tracker<S: LogStore> {
    date: NaiveDate,
    store: S,
    clock: Box<dyn Clock>,
    current_activity: Option<usize>,
    is_tracking: bool,
    session_start: Option<Instant>,
    offset_secs: u64,
    duration_secs: u64,
}

impl<S: LogStore> Tracker<S> {
    pub fn new(date: NaiveDate, store: S, clock: Box<dyn Clock>) -> Self {
        Self {
            date,
            store,
            clock,
            current_activity: None,
            is_tracking: false,
            session_start: None,
            offset_secs: 0,
            duration_secs: 0,
        }
    }

    /// Starts measuring the given activity. The wall clock anchors the
    /// session to its time of day, while the elapsed time runs on a
    /// monotonic instant so a clock adjustment mid-session cannot skew
    /// the duration. Starting over an unfinished session discards it.
    pub fn start(&mut self, activity: usize) {
        if self.is_tracking {
            warn!(
                "Already tracking activity {:?}, discarding the unfinished session",
                self.current_activity
            );
        }
        self.current_activity = Some(activity);
        self.offset_secs = u64::from(seconds_since_midnight(self.clock.time()));
        self.session_start = Some(self.clock.instant());
        self.is_tracking = true;
    }

    /// Ends the running measurement. Stopping an idle tracker is
    /// tolerated and yields a zero-length session.
    pub fn stop(&mut self) {
        self.duration_secs = match self.session_start.take() {
            Some(started) if self.is_tracking => {
                self.clock.instant().duration_since(started).as_secs()
            }
            _ => 0,
        };
        self.is_tracking = false;
    }

    /// Persists the most recently stopped session. Returns `Ok(false)`
    /// without touching storage while a measurement is still running or
    /// when no session was ever started; a record must never be written
    /// mid-measurement. Storage failures propagate.
    pub async fn add_record(&mut self) -> Result<bool, StorageError> {
        if self.is_tracking {
            warn!("Refusing to add a record while still tracking");
            return Ok(false);
        }
        let Some(activity) = self.current_activity else {
            return Ok(false);
        };

        let record = SessionRecord {
            activity,
            duration_secs: self.duration_secs,
            offset_secs: self.offset_secs,
        };
        debug!("Appending record {record:?} for {}", self.date);
        self.store.append_log(self.date, record).await?;
        Ok(true)
    }

    pub fn is_tracking(&self) -> bool {
        self.is_tracking
    }

    pub fn current_activity(&self) -> Option<usize> {
        self.current_activity
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
