//! GitHub client: the acting user and their recently updated pull requests.

use std::fmt;

use chrono::{DateTime, Utc};
use ds_core::{Actor, RawCommit, RawPullRequest, RawReview};
use serde::Deserialize;
use serde_json::json;

use crate::error::{Service, SourceError, validate_token};
use crate::{DEFAULT_TIMEOUT, USER_AGENT, graphql};

const GITHUB_API_URL: &str = "https://api.github.com";

/// How many recently updated pull requests to inspect.
const PULL_REQUEST_LIMIT: u32 = 20;

const PULL_REQUESTS_QUERY: &str = r"
query($searchQuery: String!, $first: Int!) {
  search(query: $searchQuery, type: ISSUE, first: $first) {
    nodes {
      __typename
      ... on PullRequest {
        title
        number
        url
        body
        repository {
          name
          owner { login }
        }
        headRefName
        commits(last: 100) {
          nodes {
            commit {
              oid
              message
              authoredDate
              author { email name }
            }
          }
        }
        state
        reviews(last: 10) {
          nodes {
            state
            submittedAt
            author { login }
          }
        }
        createdAt
        updatedAt
        mergedAt
      }
    }
  }
}
";

/// GitHub API client.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    token: String,
}

impl fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubClient")
            .field("token", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl GitHubClient {
    /// Creates a new client with the given personal access token.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is empty or whitespace-only, or if the
    /// HTTP client fails to build.
    pub fn new(token: impl Into<String>) -> Result<Self, SourceError> {
        let token = token.into();
        validate_token(Service::GitHub, &token)?;

        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(SourceError::ClientBuild)?;

        Ok(Self { http, token })
    }

    /// The user the token belongs to.
    pub async fn current_user(&self) -> Result<Actor, SourceError> {
        let response = self
            .http
            .get(format!("{GITHUB_API_URL}/user"))
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(SourceError::Api {
                service: Service::GitHub,
                message: format!("status {status}: {body}"),
            });
        }

        parse_user(&body)
    }

    /// Pull requests authored by `actor`, most recently updated first.
    pub async fn recent_pull_requests(
        &self,
        actor: &Actor,
    ) -> Result<Vec<RawPullRequest>, SourceError> {
        let request = self
            .http
            .post(format!("{GITHUB_API_URL}/graphql"))
            .bearer_auth(&self.token);
        let variables = json!({
            "searchQuery": format!("author:{} type:pr sort:updated-desc", actor.login),
            "first": PULL_REQUEST_LIMIT,
        });

        let data: SearchData =
            graphql::execute(Service::GitHub, request, PULL_REQUESTS_QUERY, variables).await?;
        let pull_requests = data.into_raw_pull_requests();
        tracing::debug!(count = pull_requests.len(), "fetched pull requests");
        Ok(pull_requests)
    }
}

fn parse_user(body: &str) -> Result<Actor, SourceError> {
    #[derive(Deserialize)]
    struct User {
        login: String,
        name: Option<String>,
        email: Option<String>,
    }

    let user: User = serde_json::from_str(body).map_err(|err| SourceError::InvalidResponse {
        service: Service::GitHub,
        message: err.to_string(),
    })?;
    Ok(Actor {
        login: user.login,
        name: user.name,
        email: user.email,
    })
}

#[derive(Debug, Deserialize)]
struct SearchData {
    search: Nodes<SearchNode>,
}

#[derive(Debug, Deserialize)]
struct Nodes<T> {
    nodes: Vec<T>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "__typename")]
enum SearchNode {
    PullRequest(Box<PullRequestNode>),
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PullRequestNode {
    title: String,
    number: u64,
    url: String,
    #[serde(default)]
    body: String,
    repository: RepositoryNode,
    head_ref_name: String,
    commits: Nodes<CommitNode>,
    state: String,
    reviews: Nodes<ReviewNode>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    merged_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct RepositoryNode {
    name: String,
    owner: LoginNode,
}

#[derive(Debug, Deserialize)]
struct LoginNode {
    login: String,
}

#[derive(Debug, Deserialize)]
struct CommitNode {
    commit: CommitDetails,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommitDetails {
    oid: String,
    message: String,
    authored_date: DateTime<Utc>,
    author: Option<GitActor>,
}

#[derive(Debug, Deserialize)]
struct GitActor {
    email: Option<String>,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReviewNode {
    state: String,
    submitted_at: Option<DateTime<Utc>>,
    author: Option<LoginNode>,
}

impl SearchData {
    /// Drops non pull request search hits.
    fn into_raw_pull_requests(self) -> Vec<RawPullRequest> {
        self.search
            .nodes
            .into_iter()
            .filter_map(|node| match node {
                SearchNode::PullRequest(pr) => Some(pr.into_raw()),
                SearchNode::Other => None,
            })
            .collect()
    }
}

impl PullRequestNode {
    fn into_raw(self) -> RawPullRequest {
        let commits = self
            .commits
            .nodes
            .into_iter()
            .map(|node| {
                let commit = node.commit;
                let (author_email, author_name) = commit
                    .author
                    .map_or((None, None), |author| (author.email, author.name));
                RawCommit {
                    oid: commit.oid,
                    message: commit.message,
                    authored_at: commit.authored_date,
                    author_email,
                    author_name,
                }
            })
            .collect();

        let reviews = self
            .reviews
            .nodes
            .into_iter()
            .map(|review| RawReview {
                state: review.state,
                author_login: review.author.map(|author| author.login),
                submitted_at: review.submitted_at,
            })
            .collect();

        RawPullRequest {
            title: self.title,
            number: self.number,
            url: self.url,
            body: self.body,
            repo_owner: self.repository.owner.login,
            repo_name: self.repository.name,
            head_ref_name: self.head_ref_name,
            commits,
            state: self.state,
            reviews,
            created_at: self.created_at,
            updated_at: self.updated_at,
            merged_at: self.merged_at,
        }
    }
}
