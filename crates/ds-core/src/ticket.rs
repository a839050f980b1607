//! Ticket references: finding them in pull request text and resolving them.

use std::fmt;
use std::future::Future;
use std::sync::LazyLock;

use futures::future::join_all;
use regex::Regex;

use crate::activity::{LinearTicket, PullRequestActivity};
use crate::pull_request::{ClassifiedPullRequest, RawPullRequest};

/// Ticket identifiers look like `ENG-1234`.
static TICKET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z]+-\d+").expect("ticket pattern is valid"));

/// Returns the first ticket reference found, scanning `sources` in order.
///
/// Earlier sources always win over later ones, even if a later source
/// contains a "better" match.
pub fn extract_ticket_reference<I, S>(sources: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    sources
        .into_iter()
        .find_map(|source| TICKET_RE.find(source.as_ref()).map(|m| m.as_str().to_string()))
}

/// Text sources of a pull request in ticket precedence order: branch name,
/// title, then every commit message of the full commit list.
pub fn pull_request_ticket_sources(pr: &RawPullRequest) -> impl Iterator<Item = &str> {
    [pr.head_ref_name.as_str(), pr.title.as_str()]
        .into_iter()
        .chain(pr.commits.iter().map(|commit| commit.message.as_str()))
}

/// Resolves ticket identifiers against the issue tracker.
pub trait TicketLookup {
    type Error: fmt::Display;

    /// Fetches the ticket with the given identifier.
    fn lookup(&self, identifier: &str) -> impl Future<Output = Result<LinearTicket, Self::Error>>;
}

/// Attaches resolved tickets to classified pull requests.
///
/// Lookups run concurrently and each one is best-effort: a failure is
/// logged and leaves that pull request uncorrelated.
pub async fn correlate_tickets<L: TicketLookup>(
    classified: Vec<ClassifiedPullRequest>,
    lookup: &L,
) -> Vec<PullRequestActivity> {
    let lookups = classified.iter().map(|pr| async move {
        let reference = pr.ticket_reference.as_deref()?;
        match lookup.lookup(reference).await {
            Ok(ticket) => Some(ticket),
            Err(err) => {
                tracing::warn!(
                    ticket = reference,
                    pull_request = %pr.activity.url,
                    error = %err,
                    "failed to fetch ticket, continuing without correlation"
                );
                None
            }
        }
    });
    let tickets = join_all(lookups).await;

    classified
        .into_iter()
        .zip(tickets)
        .map(|(pr, ticket)| {
            let mut activity = pr.activity;
            activity.linear_issue = ticket;
            activity
        })
        .collect()
}
