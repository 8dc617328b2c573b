//! UI primitives for the Diary CLI.
//!
//! - **Context**: environment detection (TTY, width, color, unicode)
//! - **Mode**: output mode resolution (json, plain, pretty)
//! - **Theme**: badge tokens and their colors
//! - **Render**: tables, headers, key/value lines, hints
//! - **Progress**: spinners around network round trips
//! - **Format**: string and timestamp utilities

mod context;
pub mod format;
mod mode;
pub mod progress;
pub mod render;
pub mod theme;

pub use context::UiContext;
pub use mode::OutputMode;
pub use theme::Badge;

pub use render::{
    badge, blank_line, divider, header, hint, kv, print, print_error, simple_table, Column,
};
