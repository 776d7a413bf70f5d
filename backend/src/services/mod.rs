//! Service layer for grid generation, candidate derivation, validation and
//! the editing session.
//!
//! These sit between the plain data model in [`crate::models`] and the
//! persistence boundary in [`crate::db`].

pub mod candidates;
pub mod editor;
pub mod time_grid;
pub mod validation;

pub use candidates::{CandidateSelector, Candidates};
pub use editor::EditSession;
pub use time_grid::TimeGrid;
pub use validation::{
    validate_profile, Criticality, IssueKind, OverlapPolicy, ValidationIssue, ValidationReport,
};
