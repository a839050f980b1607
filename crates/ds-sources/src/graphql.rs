//! Minimal GraphQL-over-HTTP plumbing shared by both clients.

use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};

use crate::error::{Service, SourceError};

#[derive(Debug, Serialize)]
struct Request<'a, V> {
    query: &'a str,
    variables: V,
}

#[derive(Debug, Deserialize)]
struct Response<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<ErrorEntry>,
}

#[derive(Debug, Deserialize)]
struct ErrorEntry {
    message: String,
}

/// Sends a GraphQL query and decodes its `data`.
///
/// `request` must already carry the endpoint and authentication.
pub(crate) async fn execute<T, V>(
    service: Service,
    request: reqwest::RequestBuilder,
    query: &str,
    variables: V,
) -> Result<T, SourceError>
where
    T: DeserializeOwned,
    V: Serialize,
{
    let response = request.json(&Request { query, variables }).send().await?;

    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(parse_errors(service, &body).unwrap_or_else(|| SourceError::Api {
            service,
            message: format!("status {status}: {body}"),
        }));
    }

    parse_response(service, &body)
}

/// Decodes a GraphQL response body, treating any reported error as fatal.
pub(crate) fn parse_response<T: DeserializeOwned>(
    service: Service,
    body: &str,
) -> Result<T, SourceError> {
    let payload: Response<T> =
        serde_json::from_str(body).map_err(|err| SourceError::InvalidResponse {
            service,
            message: err.to_string(),
        })?;

    if let Some(err) = join_errors(service, payload.errors) {
        return Err(err);
    }

    payload.data.ok_or_else(|| SourceError::InvalidResponse {
        service,
        message: "missing data".to_string(),
    })
}

/// GraphQL errors carried by an error-status body, if it has any.
fn parse_errors(service: Service, body: &str) -> Option<SourceError> {
    let payload: Response<IgnoredAny> = serde_json::from_str(body).ok()?;
    join_errors(service, payload.errors)
}

fn join_errors(service: Service, errors: Vec<ErrorEntry>) -> Option<SourceError> {
    if errors.is_empty() {
        return None;
    }
    let message = errors
        .into_iter()
        .map(|error| error.message)
        .collect::<Vec<_>>()
        .join("; ");
    Some(SourceError::Api { service, message })
}
