use serde::{Deserialize, Serialize};

/// One completed tracking session as stored on disk. `activity` is the
/// position of the activity inside the database catalog, `offset_secs`
/// the number of seconds after local midnight at which the session
/// started. A day's log file is the ordered append sequence of these.
///
/// Note that `activity` is deliberately not checked against the catalog
/// here. The storage layer treats rows as opaque, the menu layer only
/// offers valid positions.
#[derive(PartialEq, Eq, Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub activity: usize,
    pub duration_secs: u64,
    pub offset_secs: u64,
}
