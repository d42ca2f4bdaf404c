pub mod stub;

pub use stub::StubWorkspaceProvider;
