//! Whole-day runs through classification, correlation and grouping.
//!
//! Raw records go in exactly as the sources report them; assertions are made
//! on the final buckets only.

use chrono::{DateTime, NaiveDate, Utc};
use ds_core::{
    Actor, DayWindow, GroupedActivities, IssueRef, LinearActivityType, LinearTicket,
    PullRequestActivityType, RawComment, RawCommit, RawIssue, RawPullRequest, TicketLookup,
    collect_issue_activities, extract_pull_request_activities, group_activities,
};

/// Tracker that only knows `ENG-9`.
struct Tracker;

impl TicketLookup for Tracker {
    type Error = String;

    async fn lookup(&self, identifier: &str) -> Result<LinearTicket, String> {
        if identifier == "ENG-9" {
            Ok(LinearTicket {
                identifier: "ENG-9".to_string(),
                title: "Rate limiting".to_string(),
                url: "https://linear.app/acme/issue/ENG-9".to_string(),
            })
        } else {
            Err(format!("{identifier} not found"))
        }
    }
}

fn ts(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

fn window() -> DayWindow<Utc> {
    DayWindow::with_timezone(NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(), Utc)
}

fn actor() -> Actor {
    Actor {
        login: "octocat".to_string(),
        name: Some("Mona Lisa".to_string()),
        email: Some("mona@example.com".to_string()),
    }
}

fn pull_request(number: u64, branch: &str, title: &str) -> RawPullRequest {
    RawPullRequest {
        title: title.to_string(),
        number,
        url: format!("https://github.com/acme/api/pull/{number}"),
        body: String::new(),
        repo_owner: "acme".to_string(),
        repo_name: "api".to_string(),
        head_ref_name: branch.to_string(),
        commits: vec![RawCommit {
            oid: format!("oid-{number}"),
            message: "Tidy up".to_string(),
            authored_at: ts("2025-03-14T10:00:00Z"),
            author_email: Some("mona@example.com".to_string()),
            author_name: Some("Mona Lisa".to_string()),
        }],
        state: "OPEN".to_string(),
        reviews: vec![],
        created_at: ts("2025-03-14T09:00:00Z"),
        updated_at: ts("2025-03-14T10:30:00Z"),
        merged_at: None,
    }
}

fn issue(identifier: &str, updated_at: &str) -> RawIssue {
    RawIssue {
        identifier: identifier.to_string(),
        title: format!("Issue {identifier}"),
        url: format!("https://linear.app/acme/issue/{identifier}"),
        updated_at: ts(updated_at),
    }
}

fn comment(len: usize, created_at: &str, parent: &str) -> RawComment {
    RawComment {
        body: "c".repeat(len),
        created_at: ts(created_at),
        issue: Some(IssueRef {
            identifier: parent.to_string(),
            title: format!("Issue {parent}"),
            url: format!("https://linear.app/acme/issue/{parent}"),
        }),
    }
}

async fn run_day(
    pull_requests: &[RawPullRequest],
    issues: &[RawIssue],
    comments: &[RawComment],
) -> GroupedActivities {
    let pr_activities =
        extract_pull_request_activities(pull_requests, &actor(), &window(), &Tracker).await;
    let issue_activities = collect_issue_activities(issues, comments);
    group_activities(pr_activities, issue_activities)
}

#[tokio::test]
async fn created_open_pull_request_lands_in_opened_bucket() {
    let grouped = run_day(&[pull_request(7, "tidy-up", "Tidy up handlers")], &[], &[]).await;

    assert_eq!(grouped.opened_prs.len(), 1);
    assert!(grouped.merged_prs.is_empty());
    assert!(grouped.linear_issues.is_empty());

    let pr = &grouped.opened_prs[0];
    assert_eq!(pr.kind, PullRequestActivityType::Created);
    assert_eq!(pr.linear_issue, None);

    let json = serde_json::to_value(pr).unwrap();
    let fields = json.as_object().unwrap();
    assert_eq!(json["source"], "pull request");
    assert!(!fields.contains_key("linearIssue"));
    assert!(!fields.contains_key("reviewStatus"));
}

#[tokio::test]
async fn pull_request_merged_today_lands_in_merged_bucket() {
    let mut pr = pull_request(8, "fix-retries", "Fix retries");
    pr.state = "MERGED".to_string();
    pr.created_at = ts("2025-03-13T15:00:00Z");
    pr.merged_at = Some(ts("2025-03-14T11:00:00Z"));

    let grouped = run_day(&[pr], &[], &[]).await;

    assert!(grouped.opened_prs.is_empty());
    assert_eq!(grouped.merged_prs.len(), 1);
    assert_eq!(grouped.merged_prs[0].kind, PullRequestActivityType::Merged);
}

#[tokio::test]
async fn created_issue_and_long_comment_are_both_listed_by_date() {
    let grouped = run_day(
        &[],
        &[issue("ENG-7", "2025-03-14T16:00:00Z")],
        &[comment(250, "2025-03-14T09:15:00Z", "ENG-3")],
    )
    .await;

    let entries: Vec<_> = grouped
        .linear_issues
        .iter()
        .map(|activity| (activity.ticket_id.as_str(), activity.kind))
        .collect();
    assert_eq!(
        entries,
        [
            ("ENG-3", LinearActivityType::Commented),
            ("ENG-7", LinearActivityType::Created),
        ]
    );
    assert!(grouped.linear_issues[0].date < grouped.linear_issues[1].date);
}

#[tokio::test]
async fn correlated_ticket_activity_is_folded_into_pull_request() {
    let pull_requests = [
        pull_request(9, "ENG-9-rate-limit", "Add rate limiting"),
        pull_request(10, "misc", "OPS-4 Unknown ticket"),
    ];
    let issues = [issue("ENG-9", "2025-03-14T08:00:00Z"), issue("ENG-11", "2025-03-14T12:00:00Z")];
    let comments = [
        comment(180, "2025-03-14T13:00:00Z", "ENG-9"),
        comment(180, "2025-03-14T14:00:00Z", "OPS-4"),
    ];

    let grouped = run_day(&pull_requests, &issues, &comments).await;

    let opened: Vec<_> = grouped.opened_prs.iter().map(|pr| pr.number).collect();
    assert_eq!(opened, [9, 10]);
    assert!(grouped.opened_prs.iter().all(|pr| pr.linear_issue.is_none()));

    // OPS-4 failed to resolve, so its comment stays.
    let tickets: Vec<_> = grouped
        .linear_issues
        .iter()
        .map(|activity| activity.ticket_id.as_str())
        .collect();
    assert_eq!(tickets, ["ENG-11", "OPS-4"]);
}
