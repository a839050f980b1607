//! Issue tracker activity for the summarized day.

use chrono::{DateTime, Utc};

use crate::activity::LinearActivity;
use crate::types::{LinearActivityType, LinearSource};

/// Comments at or below this many characters are not worth summarizing.
pub const MIN_COMMENT_CHARS: usize = 100;

/// Identifying fields of an issue referenced by a comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueRef {
    pub identifier: String,
    pub title: String,
    pub url: String,
}

/// An issue created by the actor on the day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawIssue {
    pub identifier: String,
    pub title: String,
    pub url: String,
    pub updated_at: DateTime<Utc>,
}

/// A comment written by the actor on the day, with its parent resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawComment {
    pub body: String,
    pub created_at: DateTime<Utc>,
    /// `None` if the parent could not be resolved.
    pub issue: Option<IssueRef>,
}

/// Builds the day's issue activities, oldest first.
///
/// Inputs are trusted to already be restricted to the actor and the day.
/// Created issues are dated by their last update so the summary reflects
/// their current state.
pub fn collect_issue_activities(issues: &[RawIssue], comments: &[RawComment]) -> Vec<LinearActivity> {
    let commented = comments
        .iter()
        .filter(|comment| comment.body.chars().count() > MIN_COMMENT_CHARS)
        .map(|comment| {
            let (url, ticket_id, title) = comment.issue.as_ref().map_or_else(
                || (String::new(), String::new(), String::new()),
                |issue| (issue.url.clone(), issue.identifier.clone(), issue.title.clone()),
            );
            LinearActivity {
                source: LinearSource,
                kind: LinearActivityType::Commented,
                url,
                ticket_id,
                title,
                date: comment.created_at,
                description: Some(comment.body.clone()),
            }
        });

    let created = issues.iter().map(|issue| LinearActivity {
        source: LinearSource,
        kind: LinearActivityType::Created,
        url: issue.url.clone(),
        ticket_id: issue.identifier.clone(),
        title: issue.title.clone(),
        date: issue.updated_at,
        description: None,
    });

    let mut activities: Vec<_> = commented.chain(created).collect();
    activities.sort_by_key(|activity| activity.date);
    activities
}
