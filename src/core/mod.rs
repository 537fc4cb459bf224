//! Core scroll-sync logic: tracking, throttling, visibility, selection.
//!
//! Nothing in this module depends on any TUI or rendering crate.  Time is
//! always passed in by the caller, so every type here is deterministic under
//! test.

pub mod document;
pub mod gallery;
pub mod preload;
pub mod scroll;
pub mod section;
pub mod selector;
pub mod throttle;
pub mod visibility;
