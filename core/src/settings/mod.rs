//! Persisted display preferences.

pub mod kv;
pub mod store;

pub use kv::{KeyValueStore, MemoryStore};
pub use store::{SettingsStore, ThemeMode, THEME_MODE_KEY};
