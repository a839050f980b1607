//! Core domain logic for daily summaries.
//!
//! This crate contains the activity engine:
//! - Day windows: deciding which timestamps belong to the summarized day
//! - Pull request classification and ticket correlation
//! - Issue tracker activity collection
//! - Grouping: deduplicating and bucketing the day's activities

mod activity;
pub mod day;
mod grouping;
pub mod issue;
pub mod pull_request;
pub mod ticket;
mod types;

pub use activity::{
    CommitActivity, GroupedActivities, LinearActivity, LinearTicket, PullRequestActivity,
};
pub use day::DayWindow;
pub use grouping::group_activities;
pub use issue::{IssueRef, RawComment, RawIssue, collect_issue_activities};
pub use pull_request::{
    Actor, ClassifiedPullRequest, RawCommit, RawPullRequest, RawReview, classify_pull_request,
    extract_pull_request_activities,
};
pub use ticket::{TicketLookup, correlate_tickets, extract_ticket_reference};
pub use types::{
    LinearActivityType, LinearSource, PullRequestActivityType, PullRequestSource,
    PullRequestStatus, ReviewStatus, ValidationError,
};
