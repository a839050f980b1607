//! Core type definitions with validation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Unrecognized review state.
    #[error("invalid review state: {value}")]
    InvalidReviewState { value: String },

    /// Activity source tag that does not belong to the record.
    #[error("invalid activity source: expected {expected}, got {value}")]
    InvalidSource {
        expected: &'static str,
        value: String,
    },
}

/// What happened to a pull request on the summarized day.
///
/// Variants are listed in precedence order: a pull request created on the
/// day is `Created` even if it was also merged that day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PullRequestActivityType {
    Created,
    Merged,
    Updated,
}

impl PullRequestActivityType {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Merged => "merged",
            Self::Updated => "updated",
        }
    }
}

impl fmt::Display for PullRequestActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source tag carried by every pull request activity.
///
/// Always serializes as `"pull request"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct PullRequestSource;

impl PullRequestSource {
    pub const TAG: &'static str = "pull request";
}

impl From<PullRequestSource> for String {
    fn from(_: PullRequestSource) -> Self {
        PullRequestSource::TAG.to_string()
    }
}

impl TryFrom<String> for PullRequestSource {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value == Self::TAG {
            Ok(Self)
        } else {
            Err(ValidationError::InvalidSource {
                expected: Self::TAG,
                value,
            })
        }
    }
}

/// Lifecycle state of a pull request, lowercased from the source.
///
/// Serialized as a plain string so unknown states survive a round trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PullRequestStatus {
    Open,
    Merged,
    Closed,
    /// Any state the source reports that has no dedicated variant.
    Other(String),
}

impl PullRequestStatus {
    /// Parses a source state case-insensitively.
    pub fn from_state(state: &str) -> Self {
        let state = state.to_lowercase();
        match state.as_str() {
            "open" => Self::Open,
            "merged" => Self::Merged,
            "closed" => Self::Closed,
            _ => Self::Other(state),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Open => "open",
            Self::Merged => "merged",
            Self::Closed => "closed",
            Self::Other(state) => state,
        }
    }
}

impl From<String> for PullRequestStatus {
    fn from(value: String) -> Self {
        Self::from_state(&value)
    }
}

impl From<PullRequestStatus> for String {
    fn from(status: PullRequestStatus) -> Self {
        match status {
            PullRequestStatus::Other(state) => state,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for PullRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of the latest review left by someone other than the author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    Approved,
    ChangesRequested,
    Commented,
}

impl ReviewStatus {
    /// Maps a source review state, ignoring case.
    ///
    /// States without a summary meaning (`PENDING`, `DISMISSED`, ...) map to
    /// `None`.
    pub fn from_review_state(state: &str) -> Option<Self> {
        state.parse().ok()
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::ChangesRequested => "changes_requested",
            Self::Commented => "commented",
        }
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ReviewStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "approved" => Ok(Self::Approved),
            "changes_requested" => Ok(Self::ChangesRequested),
            "commented" => Ok(Self::Commented),
            _ => Err(ValidationError::InvalidReviewState {
                value: s.to_string(),
            }),
        }
    }
}

/// Kind of ticket-system event surfaced in a summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinearActivityType {
    /// The user created the issue.
    Created,
    /// The user left a substantial comment.
    Commented,
}

impl LinearActivityType {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Commented => "commented",
        }
    }
}

impl fmt::Display for LinearActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source tag carried by every issue-tracker activity.
///
/// Always serializes as `"linear"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct LinearSource;

impl LinearSource {
    pub const TAG: &'static str = "linear";
}

impl From<LinearSource> for String {
    fn from(_: LinearSource) -> Self {
        LinearSource::TAG.to_string()
    }
}

impl TryFrom<String> for LinearSource {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value == Self::TAG {
            Ok(Self)
        } else {
            Err(ValidationError::InvalidSource {
                expected: Self::TAG,
                value,
            })
        }
    }
}
