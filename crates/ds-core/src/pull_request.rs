//! Pull request classification.
//!
//! Turns one raw pull request record into at most one
//! [`PullRequestActivity`] for the summarized day:
//! - in-scope check (created, updated or merged)
//! - commit attribution (authored by the actor, on the day)
//! - activity type, review status, description and ticket reference

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::activity::{CommitActivity, PullRequestActivity};
use crate::day::DayWindow;
use crate::ticket::{
    TicketLookup, correlate_tickets, extract_ticket_reference, pull_request_ticket_sources,
};
use crate::types::{PullRequestActivityType, PullRequestSource, PullRequestStatus, ReviewStatus};

const HEADING_MARKER: &str = "##";
const CHECKLIST_MARKER: &str = "<!-- BEGIN_FRONTEND_CHECKLIST_CONTENT -->";
const TEST_PLAN_MARKER: &str = "Test plan";

/// The user whose activity is being summarized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Code-hosting login.
    pub login: String,
    /// Display name, if the user set one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Public email, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Actor {
    /// Returns `true` if a commit author with this email/name is the actor.
    ///
    /// Matches on email (against the actor's email or login), or on author
    /// name equal to the login or the non-empty display name.
    pub fn is_commit_author(&self, email: Option<&str>, name: Option<&str>) -> bool {
        let email_matches = email.is_some_and(|email| {
            email == self.login || self.email.as_deref().is_some_and(|own| own == email)
        });
        let name_matches = name.is_some_and(|name| {
            name == self.login
                || self
                    .name
                    .as_deref()
                    .is_some_and(|own| !own.is_empty() && own == name)
        });
        email_matches || name_matches
    }
}

/// A commit as reported by the code-hosting platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCommit {
    pub oid: String,
    pub message: String,
    pub authored_at: DateTime<Utc>,
    pub author_email: Option<String>,
    pub author_name: Option<String>,
}

/// A pull request review as reported by the code-hosting platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawReview {
    /// Source state, e.g. `APPROVED`.
    pub state: String,
    /// `None` for deleted accounts.
    pub author_login: Option<String>,
    /// `None` for reviews that were never submitted.
    pub submitted_at: Option<DateTime<Utc>>,
}

/// A pull request as reported by the code-hosting platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPullRequest {
    pub title: String,
    pub number: u64,
    pub url: String,
    pub body: String,
    pub repo_owner: String,
    pub repo_name: String,
    pub head_ref_name: String,
    /// Most recent commits, oldest first.
    pub commits: Vec<RawCommit>,
    /// Source state, e.g. `OPEN`.
    pub state: String,
    /// Most recent reviews, oldest first.
    pub reviews: Vec<RawReview>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub merged_at: Option<DateTime<Utc>>,
}

impl RawPullRequest {
    /// `owner/name` identifier of the repository.
    pub fn repo(&self) -> String {
        format!("{}/{}", self.repo_owner, self.repo_name)
    }
}

/// A classified pull request awaiting ticket correlation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedPullRequest {
    pub activity: PullRequestActivity,
    /// Ticket identifier found in the branch, title or commits.
    pub ticket_reference: Option<String>,
}

/// Classifies a pull request for the day.
///
/// Returns `None` if the pull request saw no activity on the day, or if the
/// actor authored none of its commits on the day.
pub fn classify_pull_request<Tz: TimeZone>(
    pr: &RawPullRequest,
    actor: &Actor,
    window: &DayWindow<Tz>,
) -> Option<ClassifiedPullRequest> {
    // Any merged pull request passes; its merge date is checked later.
    let in_scope = window.contains(&pr.created_at)
        || window.contains(&pr.updated_at)
        || pr.merged_at.is_some();
    if !in_scope {
        tracing::debug!(title = %pr.title, "skipping pull request without activity on the day");
        return None;
    }

    let commits = attributed_commits(pr, actor, window);
    if commits.is_empty() {
        tracing::debug!(title = %pr.title, "skipping pull request without attributed commits");
        return None;
    }

    let activity = PullRequestActivity {
        source: PullRequestSource,
        kind: activity_type(pr, window),
        url: pr.url.clone(),
        title: pr.title.clone(),
        number: pr.number,
        repo: pr.repo(),
        description: derive_description(&pr.body),
        commits,
        status: PullRequestStatus::from_state(&pr.state),
        review_status: latest_review_status(&pr.reviews, actor),
        linear_issue: None,
        last_updated: pr.updated_at,
    };

    Some(ClassifiedPullRequest {
        activity,
        ticket_reference: extract_ticket_reference(pull_request_ticket_sources(pr)),
    })
}

/// Classifies every pull request and correlates the survivors with tickets.
///
/// Input order is preserved.
pub async fn extract_pull_request_activities<Tz: TimeZone, L: TicketLookup>(
    pull_requests: &[RawPullRequest],
    actor: &Actor,
    window: &DayWindow<Tz>,
    lookup: &L,
) -> Vec<PullRequestActivity> {
    let classified: Vec<_> = pull_requests
        .iter()
        .filter_map(|pr| classify_pull_request(pr, actor, window))
        .collect();
    tracing::debug!(
        fetched = pull_requests.len(),
        classified = classified.len(),
        "classified pull requests"
    );
    correlate_tickets(classified, lookup).await
}

/// Commits authored by the actor on the day, in source order.
fn attributed_commits<Tz: TimeZone>(
    pr: &RawPullRequest,
    actor: &Actor,
    window: &DayWindow<Tz>,
) -> Vec<CommitActivity> {
    pr.commits
        .iter()
        .filter(|commit| {
            actor.is_commit_author(commit.author_email.as_deref(), commit.author_name.as_deref())
                && window.contains(&commit.authored_at)
        })
        .map(|commit| CommitActivity {
            message: commit.message.clone(),
            timestamp: commit.authored_at,
        })
        .collect()
}

/// Created beats merged beats updated.
fn activity_type<Tz: TimeZone>(
    pr: &RawPullRequest,
    window: &DayWindow<Tz>,
) -> PullRequestActivityType {
    if window.contains(&pr.created_at) {
        PullRequestActivityType::Created
    } else if pr.merged_at.is_some_and(|merged| window.contains(&merged)) {
        PullRequestActivityType::Merged
    } else {
        PullRequestActivityType::Updated
    }
}

/// Status of the most recently submitted review by someone else.
///
/// Unsubmitted reviews rank oldest; on equal timestamps the later entry in
/// the list wins.
fn latest_review_status(reviews: &[RawReview], actor: &Actor) -> Option<ReviewStatus> {
    reviews
        .iter()
        .filter(|review| review.author_login.as_deref() != Some(actor.login.as_str()))
        .max_by_key(|review| review.submitted_at)
        .and_then(|review| ReviewStatus::from_review_state(&review.state))
}

/// Description text for templated bodies.
///
/// Only bodies starting with a markdown heading are used; checklist and test
/// plan sections are cut off.
fn derive_description(body: &str) -> Option<String> {
    let body = body.trim();
    if !body.starts_with(HEADING_MARKER) {
        return None;
    }
    let before_checklist = body.split(CHECKLIST_MARKER).next().unwrap_or(body);
    let description = before_checklist
        .split(TEST_PLAN_MARKER)
        .next()
        .unwrap_or(before_checklist);
    Some(description.to_string())
}
