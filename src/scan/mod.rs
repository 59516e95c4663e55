//! Streaming scan of a byte source for delimiter-separated records.
//!
//! A [`window::SlidingWindow`] feeds bytes with a small amount of context to
//! the [`state::DetectState`] machine, whose [`verdict::ScanSummary`] decides
//! whether the records line up.

pub mod state;
pub mod verdict;
pub mod window;
