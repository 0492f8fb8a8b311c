//! Library application
//!
//! Domain modules for authors and their books, plus the bootstrap that wires
//! them into the kernel registry, the SQLite store, and the HTTP server.

pub mod app;
pub mod modules;

#[cfg(test)]
pub(crate) mod test_support;

/// Re-export commonly used types
pub use modules::*;
