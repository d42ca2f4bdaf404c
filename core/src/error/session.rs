use thiserror::Error;

/// Errors rejected at the session boundary.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("already logged in as '{current}', refusing login as '{requested}'")]
    AlreadyLoggedIn { current: String, requested: String },

    #[error("identity provider sign-in failed: {0}")]
    SignIn(#[source] anyhow::Error),
}
