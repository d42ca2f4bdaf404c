use thiserror::Error;

use super::nav::NavError;
use super::session::SessionError;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("service error: {0}")]
    Service(#[from] ServiceError),
    #[error("session error: {0}")]
    Session(#[from] SessionError),
    #[error("navigation error: {0}")]
    Nav(#[from] NavError),
    #[error("command failed: {0}")]
    Command(String),
    #[error("config error: {0}")]
    Config(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("config error: {0}")]
    Config(String),
    #[error("plugin error: {0}")]
    Plugin(#[from] anyhow::Error),
}
