//! Command-line argument definitions.

use std::path::PathBuf;

use chrono::{Days, NaiveDate};
use clap::{Args, Parser, Subcommand};

/// End-of-day work summary.
///
/// Collects the day's pull requests and Linear activity, deduplicates them,
/// and asks an LLM to write a short narrative.
#[derive(Debug, Parser)]
#[command(name = "ds", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate the summary for a day and write it to the output directory.
    Generate(GenerateArgs),
}

/// Options for `ds generate`.
#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Day to summarize in local time (YYYY-MM-DD). Defaults to today.
    #[arg(long, conflicts_with = "yesterday")]
    pub date: Option<NaiveDate>,

    /// Summarize yesterday.
    #[arg(long)]
    pub yesterday: bool,

    /// Only collect activities; do not call the LLM.
    #[arg(long)]
    pub skip_llm: bool,

    /// Also print the summary to stdout.
    #[arg(long)]
    pub print: bool,
}

impl GenerateArgs {
    /// The day to summarize, relative to `today`.
    pub fn day(&self, today: NaiveDate) -> NaiveDate {
        if let Some(date) = self.date {
            date
        } else if self.yesterday {
            today.checked_sub_days(Days::new(1)).unwrap_or(today)
        } else {
            today
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("ds").chain(args.iter().copied()))
    }

    fn generate_args(args: &[&str]) -> GenerateArgs {
        match parse(args).unwrap().command {
            Some(Commands::Generate(args)) => args,
            None => panic!("expected generate subcommand"),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn day_defaults_to_today() {
        let args = generate_args(&["generate"]);
        assert_eq!(args.day(date(2025, 3, 14)), date(2025, 3, 14));
    }

    #[test]
    fn yesterday_crosses_month_boundary() {
        let args = generate_args(&["generate", "--yesterday"]);
        assert_eq!(args.day(date(2025, 3, 1)), date(2025, 2, 28));
    }

    #[test]
    fn explicit_date_is_parsed() {
        let args = generate_args(&["generate", "--date", "2024-12-31", "--skip-llm"]);
        assert_eq!(args.day(date(2025, 3, 14)), date(2024, 12, 31));
        assert!(args.skip_llm);
        assert!(!args.print);
    }

    #[test]
    fn date_and_yesterday_conflict() {
        assert!(parse(&["generate", "--date", "2024-12-31", "--yesterday"]).is_err());
    }

    #[test]
    fn invalid_date_is_rejected() {
        assert!(parse(&["generate", "--date", "14/03/2025"]).is_err());
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let cli = parse(&["generate", "-v", "--config", "/tmp/ds.toml"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/ds.toml")));
    }
}
