pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Overrides;

#[derive(Parser)]
#[command(name = "feed-digest")]
#[command(about = "Archive an RSS feed and render weekly Markdown digests", long_about = None)]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// URL of the RSS feed
    #[arg(long, env = "RSS_URL", global = true)]
    pub url: Option<String>,

    /// Name shown in generated documents
    #[arg(long, env = "USERNAME", global = true)]
    pub user: Option<String>,

    /// Hours added to published times before picking the ISO week
    #[arg(long, env = "WEEK_OFFSET", global = true, allow_hyphen_values = true)]
    pub week_offset: Option<i64>,

    /// Path of the JSON archive
    #[arg(long, env = "ARCHIVE_PATH", global = true)]
    pub archive: Option<PathBuf>,

    /// Base directory for generated documents
    #[arg(long, env = "OUTPUT_DIR", global = true)]
    pub output: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            url: self.url.clone(),
            user_name: self.user.clone(),
            week_offset_hours: self.week_offset,
            archive_path: self.archive.clone(),
            output_dir: self.output.clone(),
        }
    }
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Update the archive, then regenerate all documents (default)
    Run,
    /// Fetch the feed and merge new items into the archive
    Update,
    /// Regenerate documents from the archive without fetching
    Render,
    /// Print the default configuration file
    Config,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_no_subcommand() {
        let cli = Cli::try_parse_from(["feed-digest"]).unwrap();
        assert_eq!(cli.command, None);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "feed-digest",
            "render",
            "--week-offset",
            "-24",
            "--output",
            "site",
        ])
        .unwrap();

        assert_eq!(cli.command, Some(Commands::Render));
        let overrides = cli.overrides();
        assert_eq!(overrides.week_offset_hours, Some(-24));
        assert_eq!(overrides.output_dir, Some(PathBuf::from("site")));
    }

    #[test]
    fn test_rejects_non_numeric_offset() {
        assert!(Cli::try_parse_from(["feed-digest", "--week-offset", "soon"]).is_err());
    }
}
