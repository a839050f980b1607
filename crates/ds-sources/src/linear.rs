//! Linear client: ticket lookups and the actor's issue activity for a day.
//!
//! Comments are fetched in two phases: first the raw comments with only the
//! id of their parent issue, then every distinct parent in one batched
//! query.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use chrono::{DateTime, TimeZone, Utc};
use ds_core::{DayWindow, IssueRef, LinearTicket, RawComment, RawIssue, TicketLookup};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::error::{Service, SourceError, validate_token};
use crate::{DEFAULT_TIMEOUT, USER_AGENT, graphql};

const LINEAR_API_URL: &str = "https://api.linear.app/graphql";

const VIEWER_QUERY: &str = "query { viewer { id } }";

const ISSUE_QUERY: &str = r"
query($id: String!) {
  issue(id: $id) { identifier title url }
}
";

const CREATED_ISSUES_QUERY: &str = r"
query($viewer: ID!, $start: DateTimeOrDuration!, $end: DateTimeOrDuration!) {
  issues(first: 100, filter: {
    creator: { id: { eq: $viewer } }
    createdAt: { gte: $start, lt: $end }
  }) {
    nodes { identifier title url updatedAt }
  }
}
";

const COMMENTS_QUERY: &str = r"
query($viewer: ID!, $start: DateTimeOrDuration!, $end: DateTimeOrDuration!) {
  comments(first: 100, filter: {
    user: { id: { eq: $viewer } }
    createdAt: { gte: $start, lt: $end }
  }) {
    nodes { body createdAt issue { id } }
  }
}
";

const ISSUES_BY_ID_QUERY: &str = r"
query($ids: [ID!]!) {
  issues(first: 100, filter: { id: { in: $ids } }) {
    nodes { id identifier title url }
  }
}
";

/// Linear API client.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Clone)]
pub struct LinearClient {
    http: reqwest::Client,
    api_key: String,
}

impl fmt::Debug for LinearClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinearClient")
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl LinearClient {
    /// Creates a new client with the given personal API key.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is empty or whitespace-only, or if the
    /// HTTP client fails to build.
    pub fn new(api_key: impl Into<String>) -> Result<Self, SourceError> {
        let api_key = api_key.into();
        validate_token(Service::Linear, &api_key)?;

        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(SourceError::ClientBuild)?;

        Ok(Self { http, api_key })
    }

    async fn query<T: DeserializeOwned>(&self, query: &str, variables: Value) -> Result<T, SourceError> {
        // Personal API keys go in the header as-is, without a scheme.
        let request = self
            .http
            .post(LINEAR_API_URL)
            .header("Authorization", &self.api_key);
        graphql::execute(Service::Linear, request, query, variables).await
    }

    /// Id of the user the key belongs to.
    pub async fn viewer_id(&self) -> Result<String, SourceError> {
        #[derive(Deserialize)]
        struct Data {
            viewer: IdNode,
        }

        let data: Data = self.query(VIEWER_QUERY, json!({})).await?;
        Ok(data.viewer.id)
    }

    /// Looks up a ticket by its human-readable identifier (e.g. `ENG-12`).
    pub async fn issue(&self, identifier: &str) -> Result<LinearTicket, SourceError> {
        #[derive(Deserialize)]
        struct Data {
            issue: TicketNode,
        }

        let data: Data = self.query(ISSUE_QUERY, json!({ "id": identifier })).await?;
        Ok(LinearTicket {
            identifier: data.issue.identifier,
            title: data.issue.title,
            url: data.issue.url,
        })
    }

    /// Issues created by `viewer_id` within the day.
    pub async fn created_issues<Tz: TimeZone>(
        &self,
        viewer_id: &str,
        window: &DayWindow<Tz>,
    ) -> Result<Vec<RawIssue>, SourceError> {
        #[derive(Deserialize)]
        struct Data {
            issues: Nodes<CreatedIssueNode>,
        }

        let data: Data = self
            .query(CREATED_ISSUES_QUERY, day_variables(viewer_id, window))
            .await?;
        Ok(data
            .issues
            .nodes
            .into_iter()
            .map(|issue| RawIssue {
                identifier: issue.identifier,
                title: issue.title,
                url: issue.url,
                updated_at: issue.updated_at,
            })
            .collect())
    }

    /// Comments written by `viewer_id` within the day, parents resolved.
    pub async fn comments<Tz: TimeZone>(
        &self,
        viewer_id: &str,
        window: &DayWindow<Tz>,
    ) -> Result<Vec<RawComment>, SourceError> {
        #[derive(Deserialize)]
        struct Data {
            comments: Nodes<CommentNode>,
        }

        let data: Data = self
            .query(COMMENTS_QUERY, day_variables(viewer_id, window))
            .await?;
        let comments = data.comments.nodes;

        let parent_ids: BTreeSet<&str> = comments
            .iter()
            .filter_map(|comment| comment.issue.as_ref().map(|issue| issue.id.as_str()))
            .collect();
        let parents = if parent_ids.is_empty() {
            Vec::new()
        } else {
            self.issues_by_id(&parent_ids).await?
        };

        tracing::debug!(
            comments = comments.len(),
            parents = parents.len(),
            "fetched comments"
        );
        Ok(resolve_parents(comments, parents))
    }

    /// The actor's created issues and comments for the day.
    pub async fn day_activity<Tz: TimeZone>(
        &self,
        window: &DayWindow<Tz>,
    ) -> Result<(Vec<RawIssue>, Vec<RawComment>), SourceError> {
        let viewer_id = self.viewer_id().await?;
        futures::try_join!(
            self.created_issues(&viewer_id, window),
            self.comments(&viewer_id, window)
        )
    }

    async fn issues_by_id(&self, ids: &BTreeSet<&str>) -> Result<Vec<ParentNode>, SourceError> {
        #[derive(Deserialize)]
        struct Data {
            issues: Nodes<ParentNode>,
        }

        let data: Data = self
            .query(ISSUES_BY_ID_QUERY, json!({ "ids": ids }))
            .await?;
        Ok(data.issues.nodes)
    }
}

impl TicketLookup for LinearClient {
    type Error = SourceError;

    async fn lookup(&self, identifier: &str) -> Result<LinearTicket, SourceError> {
        self.issue(identifier).await
    }
}

fn day_variables<Tz: TimeZone>(viewer_id: &str, window: &DayWindow<Tz>) -> Value {
    let (start, end) = window.bounds();
    json!({
        "viewer": viewer_id,
        "start": start.to_rfc3339(),
        "end": end.to_rfc3339(),
    })
}

/// Joins comments with their parent issues; unknown parents become `None`.
fn resolve_parents(comments: Vec<CommentNode>, parents: Vec<ParentNode>) -> Vec<RawComment> {
    let parents: HashMap<String, IssueRef> = parents
        .into_iter()
        .map(|parent| {
            (
                parent.id,
                IssueRef {
                    identifier: parent.identifier,
                    title: parent.title,
                    url: parent.url,
                },
            )
        })
        .collect();

    comments
        .into_iter()
        .map(|comment| RawComment {
            issue: comment
                .issue
                .and_then(|issue| parents.get(&issue.id).cloned()),
            body: comment.body,
            created_at: comment.created_at,
        })
        .collect()
}

#[derive(Debug, Deserialize)]
struct Nodes<T> {
    nodes: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct IdNode {
    id: String,
}

#[derive(Debug, Deserialize)]
struct TicketNode {
    identifier: String,
    title: String,
    url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatedIssueNode {
    identifier: String,
    title: String,
    url: String,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentNode {
    body: String,
    created_at: DateTime<Utc>,
    issue: Option<IdNode>,
}

#[derive(Debug, Deserialize)]
struct ParentNode {
    id: String,
    identifier: String,
    title: String,
    url: String,
}
