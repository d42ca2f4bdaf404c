pub mod stub;

pub use stub::StubIdentityProvider;
