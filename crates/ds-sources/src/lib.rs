//! Source clients for daily summaries.
//!
//! Provides explicit, reusable client handles for:
//! - GitHub: the acting user and their recent pull requests
//! - Linear: ticket lookups, created issues and comments for a day

use std::time::Duration;

mod error;
mod github;
mod graphql;
mod linear;

pub use error::{Service, SourceError};
pub use github::GitHubClient;
pub use linear::LinearClient;

/// Default request timeout for API calls.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

const USER_AGENT: &str = concat!("ds/", env!("CARGO_PKG_VERSION"));
