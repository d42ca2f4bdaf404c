pub mod cli;
pub mod redirect;
pub mod theme;
