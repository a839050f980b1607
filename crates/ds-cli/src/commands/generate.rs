//! Generate the end-of-day summary.

use std::io::Write;

use anyhow::{Context, Result, anyhow};
use chrono::Local;
use ds_core::{DayWindow, collect_issue_activities, extract_pull_request_activities, group_activities};
use ds_llm::SKIPPED_SUMMARY;
use ds_sources::{GitHubClient, LinearClient};

use crate::cli::GenerateArgs;
use crate::output::{self, Summary};
use crate::Config;

pub fn run<W: Write>(writer: &mut W, args: &GenerateArgs, config: &Config) -> Result<()> {
    let github_token = required(
        config.github_token.as_deref(),
        "missing GitHub token (set GITHUB_TOKEN, DS_GITHUB_TOKEN or config.toml)",
    )?;
    let linear_api_key = required(
        config.linear_api_key.as_deref(),
        "missing Linear API key (set LINEAR_API_KEY, DS_LINEAR_API_KEY or config.toml)",
    )?;
    let llm = if args.skip_llm {
        None
    } else {
        let api_key = required(
            config.anthropic_api_key.as_deref(),
            "missing Anthropic API key (set ANTHROPIC_API_KEY, DS_ANTHROPIC_API_KEY or config.toml, or pass --skip-llm)",
        )?;
        Some(ds_llm::Client::new(api_key).context("failed to create LLM client")?)
    };

    let github = GitHubClient::new(github_token).context("failed to create GitHub client")?;
    let linear = LinearClient::new(linear_api_key).context("failed to create Linear client")?;

    let date = args.day(Local::now().date_naive());
    let window = DayWindow::new(date);
    tracing::info!(%date, "generating summary");

    let runtime = tokio::runtime::Runtime::new().context("failed to initialize tokio runtime")?;
    let summary = runtime.block_on(summarize_day(
        &github,
        &linear,
        llm.as_ref(),
        &config.model,
        &window,
    ))?;

    let paths = output::write_summary(&config.output_dir, date, &summary)?;
    eprintln!("Wrote {}", paths.json.display());
    eprintln!("Wrote {}", paths.markdown.display());

    if args.print {
        writeln!(writer, "{}", summary.response.trim())?;
    }
    Ok(())
}

fn required<'a>(value: Option<&'a str>, missing: &str) -> Result<&'a str> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| anyhow!("{missing}"))
}

async fn summarize_day(
    github: &GitHubClient,
    linear: &LinearClient,
    llm: Option<&ds_llm::Client>,
    model: &str,
    window: &DayWindow,
) -> Result<Summary> {
    let pull_requests = async {
        let actor = github
            .current_user()
            .await
            .context("failed to fetch GitHub user")?;
        let raw = github
            .recent_pull_requests(&actor)
            .await
            .context("failed to fetch pull requests")?;
        Ok::<_, anyhow::Error>(extract_pull_request_activities(&raw, &actor, window, linear).await)
    };
    let issues = async {
        let (issues, comments) = linear
            .day_activity(window)
            .await
            .context("failed to fetch Linear activity")?;
        Ok::<_, anyhow::Error>(collect_issue_activities(&issues, &comments))
    };

    let (pull_requests, issues) = tokio::try_join!(pull_requests, issues)?;
    let activities = group_activities(pull_requests, issues);
    tracing::info!(
        opened = activities.opened_prs.len(),
        merged = activities.merged_prs.len(),
        linear = activities.linear_issues.len(),
        "collected activities"
    );

    let response = match llm {
        Some(client) => client
            .summarize(model, &activities)
            .await
            .context("failed to generate summary")?,
        None => SKIPPED_SUMMARY.to_string(),
    };

    Ok(Summary {
        activities,
        response,
    })
}
