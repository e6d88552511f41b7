//! gridwalk CLI library.
//!
//! Argument types and command handlers behind the `gridwalk-cli` binary.
//! Handlers return the rendered output so integration tests and the binary
//! share one code path.

pub mod args;
pub mod commands;
