//! Repository implementations module.
//!
//! - `local`: In-memory implementation for tests and local development
//! - `remote`: HTTP client for the hosted availability service
pub mod local;
#[cfg(feature = "remote-repo")]
pub mod remote;

pub use local::LocalRepository;
#[cfg(feature = "remote-repo")]
pub use remote::RemoteRepository;
