//! Utility modules: retry policy, cancellable waits, atomic file writes.

pub mod fs;
pub mod retry;
pub mod wait;
