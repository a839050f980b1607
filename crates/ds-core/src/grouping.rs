//! Correlation and bucketing of the day's activities.

use crate::activity::{GroupedActivities, LinearActivity, PullRequestActivity};
use crate::types::PullRequestStatus;

/// Candidate entry before bucketing.
enum Activity {
    PullRequest(PullRequestActivity),
    Linear(LinearActivity),
}

/// Merges pull request and issue activities into summary buckets.
///
/// Issue activities whose ticket is already correlated to a pull request
/// are dropped, since the pull request represents them. Correlation is
/// cleared from every pull request before bucketing. Pull requests that are
/// neither open nor merged end up in no bucket.
pub fn group_activities(
    pull_requests: Vec<PullRequestActivity>,
    issues: Vec<LinearActivity>,
) -> GroupedActivities {
    let standalone: Vec<_> = issues
        .into_iter()
        .filter(|issue| {
            let correlated = pull_requests.iter().find(|pr| {
                pr.linear_issue
                    .as_ref()
                    .is_some_and(|ticket| ticket.identifier == issue.ticket_id)
            });
            if let Some(pr) = correlated {
                tracing::debug!(
                    ticket = %issue.ticket_id,
                    pull_request = %pr.url,
                    "issue activity represented by pull request"
                );
            }
            correlated.is_none()
        })
        .collect();

    let candidates = pull_requests
        .into_iter()
        .map(|mut pr| {
            pr.linear_issue = None;
            Activity::PullRequest(pr)
        })
        .chain(standalone.into_iter().map(Activity::Linear));

    let mut grouped = GroupedActivities::default();
    for activity in candidates {
        match activity {
            Activity::PullRequest(pr) => match pr.status {
                PullRequestStatus::Open => grouped.opened_prs.push(pr),
                PullRequestStatus::Merged => grouped.merged_prs.push(pr),
                PullRequestStatus::Closed | PullRequestStatus::Other(_) => {
                    tracing::debug!(
                        pull_request = %pr.url,
                        status = %pr.status,
                        "dropping pull request that is neither open nor merged"
                    );
                }
            },
            Activity::Linear(issue) => grouped.linear_issues.push(issue),
        }
    }
    grouped
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};

    use super::*;
    use crate::activity::{CommitActivity, LinearTicket};
    use crate::types::{LinearActivityType, LinearSource, PullRequestActivityType, PullRequestSource};

    fn ts(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn pr(number: u64, status: PullRequestStatus, ticket: Option<&str>) -> PullRequestActivity {
        PullRequestActivity {
            source: PullRequestSource,
            kind: PullRequestActivityType::Updated,
            url: format!("https://github.com/acme/api/pull/{number}"),
            title: format!("PR {number}"),
            number,
            repo: "acme/api".to_string(),
            description: None,
            commits: vec![CommitActivity {
                message: "work".to_string(),
                timestamp: ts("2025-03-14T10:00:00Z"),
            }],
            status,
            review_status: None,
            linear_issue: ticket.map(|identifier| LinearTicket {
                identifier: identifier.to_string(),
                title: format!("Ticket {identifier}"),
                url: format!("https://linear.app/acme/issue/{identifier}"),
            }),
            last_updated: ts("2025-03-14T11:00:00Z"),
        }
    }

    fn issue(ticket_id: &str, kind: LinearActivityType) -> LinearActivity {
        LinearActivity {
            source: LinearSource,
            kind,
            url: format!("https://linear.app/acme/issue/{ticket_id}"),
            ticket_id: ticket_id.to_string(),
            title: format!("Ticket {ticket_id}"),
            date: ts("2025-03-14T12:00:00Z"),
            description: None,
        }
    }

    #[test]
    fn correlated_issue_activity_is_suppressed() {
        let grouped = group_activities(
            vec![pr(1, PullRequestStatus::Open, Some("ENG-9"))],
            vec![
                issue("ENG-9", LinearActivityType::Created),
                issue("ENG-9", LinearActivityType::Commented),
                issue("ENG-10", LinearActivityType::Created),
            ],
        );

        assert_eq!(grouped.opened_prs.len(), 1);
        let ids: Vec<_> = grouped.linear_issues.iter().map(|a| a.ticket_id.as_str()).collect();
        assert_eq!(ids, ["ENG-10"]);
    }

    #[test]
    fn correlation_is_cleared_from_output() {
        let grouped = group_activities(
            vec![
                pr(1, PullRequestStatus::Open, Some("ENG-1")),
                pr(2, PullRequestStatus::Merged, Some("ENG-2")),
            ],
            vec![],
        );

        assert!(grouped.opened_prs.iter().all(|pr| pr.linear_issue.is_none()));
        assert!(grouped.merged_prs.iter().all(|pr| pr.linear_issue.is_none()));
    }

    #[test]
    fn pull_requests_are_bucketed_by_status() {
        let grouped = group_activities(
            vec![
                pr(1, PullRequestStatus::Open, None),
                pr(2, PullRequestStatus::Merged, None),
                pr(3, PullRequestStatus::Closed, None),
                pr(4, PullRequestStatus::Other("draft".to_string()), None),
                pr(5, PullRequestStatus::Open, None),
            ],
            vec![],
        );

        let opened: Vec<_> = grouped.opened_prs.iter().map(|pr| pr.number).collect();
        let merged: Vec<_> = grouped.merged_prs.iter().map(|pr| pr.number).collect();
        assert_eq!(opened, [1, 5]);
        assert_eq!(merged, [2]);
        assert!(grouped.linear_issues.is_empty());
    }

    #[test]
    fn closed_pull_request_still_suppresses_its_ticket() {
        let grouped = group_activities(
            vec![pr(3, PullRequestStatus::Closed, Some("ENG-4"))],
            vec![issue("ENG-4", LinearActivityType::Created)],
        );

        assert_eq!(grouped, GroupedActivities::default());
    }

    #[test]
    fn uncorrelated_issue_with_empty_ticket_id_is_kept() {
        let grouped = group_activities(
            vec![pr(1, PullRequestStatus::Open, None)],
            vec![issue("", LinearActivityType::Commented)],
        );

        assert_eq!(grouped.linear_issues.len(), 1);
    }

    #[test]
    fn grouping_is_idempotent() {
        let prs = vec![
            pr(1, PullRequestStatus::Open, Some("ENG-9")),
            pr(2, PullRequestStatus::Merged, None),
        ];
        let issues = vec![
            issue("ENG-9", LinearActivityType::Created),
            issue("ENG-11", LinearActivityType::Commented),
        ];

        let first = group_activities(prs.clone(), issues.clone());
        let second = group_activities(prs, issues);
        assert_eq!(first, second);
    }

    #[test]
    fn linear_issues_keep_input_order() {
        let grouped = group_activities(
            vec![],
            vec![
                issue("ENG-2", LinearActivityType::Commented),
                issue("ENG-1", LinearActivityType::Created),
            ],
        );

        let ids: Vec<_> = grouped.linear_issues.iter().map(|a| a.ticket_id.as_str()).collect();
        assert_eq!(ids, ["ENG-2", "ENG-1"]);
    }
}
