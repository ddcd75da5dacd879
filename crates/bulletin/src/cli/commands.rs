//! CLI argument definitions.

use bulletin_pipeline::StepKind;
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

/// Bulletin - produce a narrated event bulletin from local calendars
///
/// Name the steps to run, or pass --resume to run every unfinished step.
/// Steps always run in pipeline order.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "bulletin")]
#[command(version)]
pub struct Cli {
    /// Research events, optionally only from the named targets
    #[arg(short, long, num_args = 0.., value_name = "TARGET")]
    pub research: Option<Vec<String>>,

    /// Write the script with N stories
    #[arg(short, long, num_args = 0..=1, value_name = "N")]
    pub write: Option<Option<usize>>,

    /// Generate frames and the storyboard
    #[arg(short, long)]
    pub storyboard: bool,

    /// Film clips, optionally only the listed take ids
    #[arg(short, long, num_args = 0.., value_name = "TAKE")]
    pub film: Option<Vec<u32>>,

    /// Compose the final video
    #[arg(short, long)]
    pub produce: bool,

    /// Write the social media post
    #[arg(short, long)]
    pub create_post: bool,

    /// Also run every step whose output is not complete
    #[arg(long)]
    pub resume: bool,

    /// Skip the service setup check
    #[arg(short = 'k', long)]
    pub skip_check: bool,

    /// Working directory; defaults to <gen_dir>/<date>
    #[arg(long)]
    pub working_dir: Option<PathBuf>,

    /// Run date as YYYY-MM-DD; defaults to today
    #[arg(long)]
    pub today: Option<NaiveDate>,

    /// Extra configuration file, applied last
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Whether `kind` was named on the command line.
    pub fn names(&self, kind: StepKind) -> bool {
        match kind {
            StepKind::Research => self.research.is_some(),
            StepKind::WriteScript => self.write.is_some(),
            StepKind::Storyboard => self.storyboard,
            StepKind::Film => self.film.is_some(),
            StepKind::Produce => self.produce,
            StepKind::WritePost => self.create_post,
        }
    }

    /// Whether this invocation asks for any step to run.
    pub fn requests_work(&self) -> bool {
        self.resume
            || [
                StepKind::Research,
                StepKind::WriteScript,
                StepKind::Storyboard,
                StepKind::Film,
                StepKind::Produce,
                StepKind::WritePost,
            ]
            .into_iter()
            .any(|kind| self.names(kind))
    }

    /// Story count from `-w N`, or `default`.
    pub fn story_count(&self, default: usize) -> usize {
        self.write.flatten().unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("bulletin").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_no_arguments_requests_nothing() {
        let cli = parse(&[]);
        assert!(!cli.requests_work());
        assert!(cli.research.is_none());
        assert!(cli.film.is_none());
    }

    #[test]
    fn test_research_with_and_without_targets() {
        assert_eq!(parse(&["-r"]).research, Some(vec![]));
        assert_eq!(
            parse(&["-r", "library", "fair"]).research,
            Some(vec!["library".to_string(), "fair".to_string()])
        );
    }

    #[test]
    fn test_write_story_count() {
        assert_eq!(parse(&["-w"]).story_count(4), 4);
        assert_eq!(parse(&["-w", "6"]).story_count(4), 6);
        assert!(parse(&["-w"]).names(StepKind::WriteScript));
        assert!(!parse(&["-s"]).names(StepKind::WriteScript));
    }

    #[test]
    fn test_film_takes() {
        assert_eq!(parse(&["-f"]).film, Some(vec![]));
        assert_eq!(parse(&["-f", "2", "5"]).film, Some(vec![2, 5]));
        assert!(Cli::try_parse_from(["bulletin", "-f", "two"]).is_err());
    }

    #[test]
    fn test_combined_flags() {
        let cli = parse(&["-k", "-s", "-p", "-c", "--today", "2026-10-16", "--resume"]);
        assert!(cli.skip_check);
        assert!(cli.names(StepKind::Storyboard));
        assert!(cli.names(StepKind::Produce));
        assert!(cli.names(StepKind::WritePost));
        assert!(!cli.names(StepKind::Film));
        assert_eq!(cli.today, NaiveDate::from_ymd_opt(2026, 10, 16));
        assert!(cli.requests_work());
    }

    #[test]
    fn test_bad_date_rejected() {
        assert!(Cli::try_parse_from(["bulletin", "--today", "10/16/2026"]).is_err());
    }
}
