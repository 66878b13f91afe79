//! Code generation infrastructure.
//!
//! Renders request descriptors as copyable shell commands.

mod curl;

pub use curl::{DEFAULT_FILE_PLACEHOLDER, render_curl};
