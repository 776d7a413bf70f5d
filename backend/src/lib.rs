//! # Availability Engine
//!
//! Weekly availability windows for bookable service providers.
//!
//! A provider defines, per weekday, the time windows during which they can be
//! booked. The engine turns those windows into a duration-quantized grid of
//! selectable start/end times, keeps the per-day interval model consistent
//! while it is edited, and maps it to and from the per-day record format
//! consumed by the booking engine.
//!
//! ## Architecture
//!
//! - [`models`]: Clock times, weekdays, intervals and the availability profile
//! - [`services`]: Time grid, candidate selection, validation and the edit session
//! - [`api`]: Wire records and the profile mapper
//! - [`db`]: Repository pattern over the availability service
//! - [`config`]: `availability.toml` settings
//! - [`http`]: Axum-based development server (feature `http-server`)
//!
//! ## Example
//!
//! ```
//! use availability_engine::models::SlotDuration;
//! use availability_engine::services::TimeGrid;
//!
//! let grid = TimeGrid::for_duration(SlotDuration::new(15).unwrap());
//! assert_eq!(grid.len(), 96);
//! assert_eq!(grid.times().last().unwrap().to_string(), "23:45");
//! ```

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;

pub use error::{EngineError, EngineResult};
