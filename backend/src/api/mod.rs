//! # API Module
//!
//! Wire format of the availability service and the mapping between that
//! format and the in-memory editing profile.
//!
//! ## Architecture
//!
//! - [`types`]: JSON records exactly as exchanged with the service
//! - [`conversions`]: load/save transforms (`ProfileMapper`)

pub mod conversions;
pub mod types;

pub use conversions::ProfileMapper;
pub use types::*;
