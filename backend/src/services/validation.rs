//! Save-time validation of an availability profile.
//!
//! Selection filtering only prevents inverted picks inside one interval. This
//! module checks the whole profile before it is persisted:
//! - Inverted intervals (`start >= end`) always block the save
//! - Overlapping intervals on one day block or warn, per [`OverlapPolicy`]
//! - A date-range limit ending before it starts blocks the save
//! - Enabled days without intervals, and endpoints off the current grid, warn
//!
//! Every day is checked, disabled ones included, because their intervals are
//! persisted too.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::time_grid::TimeGrid;
use crate::error::{EngineError, EngineResult};
use crate::models::{AvailabilityProfile, ClockTime, Endpoint, Weekday};

/// What to do with overlapping intervals on the same day at save time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlapPolicy {
    /// Refuse to save.
    #[default]
    Reject,
    /// Save as-is and report a warning.
    Accept,
}

impl FromStr for OverlapPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "accept" => Ok(Self::Accept),
            _ => Err(format!("Unknown overlap policy: {}", s)),
        }
    }
}

/// Whether an issue stops the save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Criticality {
    Warning,
    Blocking,
}

/// A single problem found in a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IssueKind {
    InvertedInterval {
        day: Weekday,
        index: usize,
        start: ClockTime,
        end: ClockTime,
    },
    Overlap {
        day: Weekday,
        first: usize,
        second: usize,
    },
    InvalidDateRange {
        from: chrono::NaiveDate,
        to: chrono::NaiveDate,
    },
    EnabledWithoutIntervals {
        day: Weekday,
    },
    OffGrid {
        day: Weekday,
        index: usize,
        endpoint: Endpoint,
        value: ClockTime,
    },
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueKind::InvertedInterval {
                day,
                index,
                start,
                end,
            } => write!(f, "{day} interval {index}: start {start} is not before end {end}"),
            IssueKind::Overlap { day, first, second } => {
                write!(f, "{day} intervals {first} and {second} overlap")
            }
            IssueKind::InvalidDateRange { from, to } => {
                write!(f, "date range starts {from} after it ends {to}")
            }
            IssueKind::EnabledWithoutIntervals { day } => {
                write!(f, "{day} is enabled but has no intervals and will be saved unavailable")
            }
            IssueKind::OffGrid {
                day,
                index,
                endpoint,
                value,
            } => write!(
                f,
                "{day} interval {index}: {} {value} is not on the current slot grid",
                match endpoint {
                    Endpoint::Start => "start",
                    Endpoint::End => "end",
                }
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub criticality: Criticality,
    #[serde(flatten)]
    pub kind: IssueKind,
}

impl ValidationIssue {
    fn blocking(kind: IssueKind) -> Self {
        Self {
            criticality: Criticality::Blocking,
            kind,
        }
    }

    fn warning(kind: IssueKind) -> Self {
        Self {
            criticality: Criticality::Warning,
            kind,
        }
    }

    pub fn is_blocking(&self) -> bool {
        self.criticality == Criticality::Blocking
    }

    /// The engine error matching a blocking issue.
    pub fn to_error(&self) -> Option<EngineError> {
        if !self.is_blocking() {
            return None;
        }
        match self.kind {
            IssueKind::InvertedInterval {
                day,
                index,
                start,
                end,
            } => Some(EngineError::InvertedInterval {
                day,
                index,
                start,
                end,
            }),
            IssueKind::Overlap { day, first, second } => {
                Some(EngineError::OverlapOnSave { day, first, second })
            }
            IssueKind::InvalidDateRange { from, to } => {
                Some(EngineError::InvalidDateRange { from, to })
            }
            IssueKind::EnabledWithoutIntervals { .. } | IssueKind::OffGrid { .. } => None,
        }
    }
}

/// All issues found in a profile, in Sunday-first day order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// True when nothing blocks the save. Warnings are allowed.
    pub fn is_valid(&self) -> bool {
        !self.issues.iter().any(ValidationIssue::is_blocking)
    }

    pub fn blocking(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.is_blocking())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| !i.is_blocking())
    }

    /// `Ok` when valid, otherwise the first blocking issue as an error.
    pub fn into_result(self) -> EngineResult<Vec<ValidationIssue>> {
        match self.issues.iter().find_map(ValidationIssue::to_error) {
            Some(err) => Err(err),
            None => Ok(self.issues),
        }
    }
}

/// Check a profile before it is persisted.
pub fn validate_profile(profile: &AvailabilityProfile, policy: OverlapPolicy) -> ValidationReport {
    let grid = TimeGrid::for_duration(profile.slot_duration);
    let mut issues = Vec::new();

    if let Some(range) = profile.date_range {
        if !range.is_ordered() {
            issues.push(ValidationIssue::blocking(IssueKind::InvalidDateRange {
                from: range.from,
                to: range.to,
            }));
        }
    }

    for day in profile.days() {
        let weekday = day.weekday;

        if day.enabled && day.intervals.is_empty() {
            issues.push(ValidationIssue::warning(IssueKind::EnabledWithoutIntervals {
                day: weekday,
            }));
        }

        for (index, interval) in day.intervals.iter().enumerate() {
            if interval.is_inverted() {
                issues.push(ValidationIssue::blocking(IssueKind::InvertedInterval {
                    day: weekday,
                    index,
                    start: interval.start,
                    end: interval.end,
                }));
            }
            for (endpoint, value) in [(Endpoint::Start, interval.start), (Endpoint::End, interval.end)] {
                if !grid.is_aligned(value) {
                    issues.push(ValidationIssue::warning(IssueKind::OffGrid {
                        day: weekday,
                        index,
                        endpoint,
                        value,
                    }));
                }
            }
        }

        for (first, second) in day.intervals.overlapping_pairs() {
            let kind = IssueKind::Overlap {
                day: weekday,
                first,
                second,
            };
            issues.push(match policy {
                OverlapPolicy::Reject => ValidationIssue::blocking(kind),
                OverlapPolicy::Accept => ValidationIssue::warning(kind),
            });
        }
    }

    ValidationReport { issues }
}
