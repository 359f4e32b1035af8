//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tablado")]
#[command(about = "Archive the best performance of every carnival group, every year", long_about = None)]
pub(crate) struct Cli {
    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write log output to a file (ANSI codes stripped)
    #[arg(long, global = true)]
    pub logfile: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Locations that override the settings file.
#[derive(Args, Clone, Default)]
pub(crate) struct PathArgs {
    /// Group catalog (YAML mapping of category to group names)
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Directory holding archive.txt and the tracking files
    #[arg(long)]
    pub state_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// List a channel, pick the best round per group and year, download it
    Sync {
        /// Channel or playlist URL (default: [sync] channel_url)
        #[arg(long)]
        channel: Option<String>,

        /// Treat every title as belonging to this year
        #[arg(long)]
        year: Option<String>,

        /// Show what would be downloaded without downloading or recording anything
        #[arg(short = 'n', long)]
        dry_run: bool,

        #[command(flatten)]
        paths: PathArgs,

        /// Directory downloads are written under
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Winners shorter than this many seconds wait for review
        #[arg(long)]
        min_duration: Option<u64>,

        /// Minimum similarity for a catalog match (0.0 - 1.0)
        #[arg(long)]
        threshold: Option<f64>,

        /// Disable the sync log file
        #[arg(long)]
        no_log: bool,
    },

    /// Parse titles against the catalog and show the result
    Parse {
        /// Titles to parse
        #[arg(required = true)]
        titles: Vec<String>,

        /// Year to apply to titles without one
        #[arg(long)]
        year: Option<String>,

        /// Group catalog (default: [paths] catalog)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Minimum similarity for a catalog match (0.0 - 1.0)
        #[arg(long)]
        threshold: Option<f64>,
    },

    /// Review winners held back for being too short
    Deferred {
        #[command(subcommand)]
        action: DeferredAction,

        /// Directory holding the tracking files (default: [paths] state_dir)
        #[arg(long, global = true)]
        state_dir: Option<PathBuf>,
    },

    /// Manage the settings file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum DeferredAction {
    /// Show the review queue
    List,

    /// Approve entries so the next sync downloads them
    Accept {
        /// Video ids to approve
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show the resolved settings
    Show,

    /// Print the settings file path
    Path,

    /// Write a default settings file if none exists
    Init,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sync_flags() {
        let cli = Cli::try_parse_from([
            "tablado",
            "--quiet",
            "sync",
            "--channel",
            "https://example.test/@carnaval",
            "--year",
            "2023",
            "-n",
            "--state-dir",
            "/tmp/state",
            "--min-duration",
            "600",
        ])
        .unwrap();
        assert!(cli.quiet);
        match cli.command {
            Commands::Sync {
                channel,
                year,
                dry_run,
                paths,
                min_duration,
                no_log,
                ..
            } => {
                assert_eq!(channel.as_deref(), Some("https://example.test/@carnaval"));
                assert_eq!(year.as_deref(), Some("2023"));
                assert!(dry_run);
                assert_eq!(paths.state_dir, Some(PathBuf::from("/tmp/state")));
                assert_eq!(min_duration, Some(600));
                assert!(!no_log);
            }
            _ => panic!("expected sync"),
        }
    }

    #[test]
    fn deferred_accept_takes_ids() {
        let cli = Cli::try_parse_from(["tablado", "deferred", "accept", "abc", "def"]).unwrap();
        match cli.command {
            Commands::Deferred {
                action: DeferredAction::Accept { ids },
                state_dir,
            } => {
                assert_eq!(ids, vec!["abc", "def"]);
                assert!(state_dir.is_none());
            }
            _ => panic!("expected deferred accept"),
        }
        assert!(Cli::try_parse_from(["tablado", "deferred", "accept"]).is_err());
    }

    #[test]
    fn parse_requires_a_title() {
        assert!(Cli::try_parse_from(["tablado", "parse"]).is_err());
        let cli = Cli::try_parse_from(["tablado", "-v", "parse", "Agarrate Catalina 2019"]).unwrap();
        assert!(cli.verbose);
    }
}
