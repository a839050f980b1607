//! Extracted activities and the grouped result handed to summarization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{
    LinearActivityType, LinearSource, PullRequestActivityType, PullRequestSource, PullRequestStatus,
    ReviewStatus,
};

/// A ticket resolved from the issue tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinearTicket {
    /// Human-readable identifier (e.g. `ENG-1234`).
    pub identifier: String,
    pub title: String,
    pub url: String,
}

/// A commit attributed to the acting user on the summarized day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitActivity {
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// One pull request's activity on the summarized day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestActivity {
    pub source: PullRequestSource,
    #[serde(rename = "type")]
    pub kind: PullRequestActivityType,
    pub url: String,
    pub title: String,
    pub number: u64,
    /// `owner/name` of the repository.
    pub repo: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Never empty.
    pub commits: Vec<CommitActivity>,
    pub status: PullRequestStatus,
    /// Omitted when no other user has reviewed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_status: Option<ReviewStatus>,
    /// Correlated ticket. Only meaningful between correlation and grouping;
    /// never serialized.
    #[serde(skip)]
    pub linear_issue: Option<LinearTicket>,
    pub last_updated: DateTime<Utc>,
}

/// One issue-tracker event on the summarized day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinearActivity {
    pub source: LinearSource,
    #[serde(rename = "type")]
    pub kind: LinearActivityType,
    pub url: String,
    pub ticket_id: String,
    pub title: String,
    /// Ordering key.
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The final, deduplicated activity set for a day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupedActivities {
    #[serde(rename = "openedPRs")]
    pub opened_prs: Vec<PullRequestActivity>,
    #[serde(rename = "mergedPRs")]
    pub merged_prs: Vec<PullRequestActivity>,
    #[serde(rename = "linearIssues")]
    pub linear_issues: Vec<LinearActivity>,
}
