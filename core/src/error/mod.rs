#[allow(clippy::module_inception)]
pub mod error;
pub mod nav;
pub mod session;

pub use error::{CliError, ServiceError};
pub use nav::NavError;
pub use session::SessionError;
