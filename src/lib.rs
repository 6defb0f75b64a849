//! Day by day task tracker. A goal, a list of days with todos on them, and a pointer to the
//! current day. Advancing a day carries unfinished todos forward, so nothing gets lost.
//!

pub mod cli;
pub mod storage;
pub mod timeline;
pub mod utils;
