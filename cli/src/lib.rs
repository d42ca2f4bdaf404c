//! shellgate-cli library: modules exposed for the binary and unit tests.

pub mod commands;
pub mod logging;
pub mod render;
pub mod shell;
