//! Concrete identity, workspace and settings backends selected from config.

pub mod factory;
pub mod identity;
pub mod services;
pub mod settings;
pub mod workspace;
