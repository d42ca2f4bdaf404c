//! # State
//!
//! Session, lifecycle and their shared notification plumbing.
//!
//! Control flow: user intents mutate [`SessionState`]; every session change
//! makes [`AppLifecycle`] re-derive its [`Phase`] (possibly starting an async
//! workspace resolution); lifecycle notifications drive the navigator.
//! State mutation and notification for a transition always happen before
//! any awaited step of that transition.

pub mod lifecycle;
pub mod notify;
pub mod providers;
pub mod session;
pub mod snapshot;
pub mod transitions;
pub mod types;

pub use lifecycle::AppLifecycle;
pub use notify::{ListenerId, Notifier};
pub use providers::{IdentityProvider, WorkspaceProvider};
pub use session::SessionState;
pub use snapshot::StateSnapshot;
pub use transitions::{StateTransition, TransitionError};
pub use types::{Identity, LifecycleSnapshot, Phase, Workspace};
