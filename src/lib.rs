//! Records how much time you spend on your daily activities and answers
//! time-range queries over the recorded sessions. Everything lives in
//! plain files under a per-database directory, so there is no service to
//! run and nothing to install besides the binary.
//!

pub mod cli;
pub mod report;
pub mod storage;
pub mod tracker;
pub mod utils;
