use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavError {
    #[error("no route named '{0}'")]
    UnknownRoute(String),

    #[error("no route matches '{0}'")]
    UnmatchedPath(String),

    #[error("invalid location '{0}': paths must start with '/'")]
    InvalidLocation(String),

    #[error("redirect limit of {limit} exceeded while resolving '{location}'")]
    RedirectLimit { limit: usize, location: String },
}
