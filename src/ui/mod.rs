//! UI / rendering layer: everything that touches Ratatui widgets.
//!
//! This layer takes the *core* data structures and turns them into cells on
//! the terminal.  No I/O happens here.

pub mod backdrop;
pub mod chrome;
pub mod dots;
pub mod layout;
pub mod panels;
pub mod smooth_scroll;
pub mod spinner;
pub mod theme;
