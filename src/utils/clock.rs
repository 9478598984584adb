use std::time::Instant;

use chrono::{DateTime, Local};

/// Represents an entity responsible for providing time across the
/// application. This allows it to be swapped out for testing.
///
/// `time` is the wall clock and is only used to anchor a session to the
/// day it started on. Elapsed time is always measured through `instant`,
/// so a wall clock adjustment mid-session cannot corrupt a duration.
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Sync + Send + 'static {
    fn time(&self) -> DateTime<Local>;

    fn instant(&self) -> Instant;
}

pub struct DefaultClock;

impl Clock for DefaultClock {
    fn time(&self) -> DateTime<Local> {
        Local::now()
    }

    fn instant(&self) -> Instant {
        Instant::now()
    }
}
