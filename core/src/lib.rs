//! Navigation guard state machine for the shellgate app shell.
//!
//! Session changes drive the app lifecycle, lifecycle changes drive the
//! navigator, and the navigator runs every request through a pure redirect
//! policy before anything is rendered.

pub mod api;
pub mod config;
pub mod context;
pub mod error;
pub mod router;
pub mod settings;
pub mod state;
