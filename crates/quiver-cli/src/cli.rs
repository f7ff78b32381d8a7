use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Quiver - keyboard launcher that learns your abbreviations
#[derive(Parser)]
#[command(name = "quiver")]
#[command(version, about)]
#[command(after_help = "\
Examples:
  quiver                  Open the interactive prompt
  quiver search fire      Show ranked matches with scores
  quiver run term         Run the best match for \"term\"
  quiver run run htop     Run the \"run\" command with argument \"htop\"
  quiver list             List every active action
  quiver stats            Show index statistics
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Use this config file instead of the default one
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Stay open after launching something from the prompt
    #[arg(long)]
    pub keep_open: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print ranked matches for a query
    Search {
        /// Query text; words are joined with spaces
        #[arg(required = true)]
        query: Vec<String>,
    },

    /// Run the top match for a query and remember the choice
    Run {
        #[arg(required = true)]
        query: Vec<String>,
    },

    /// List all active actions
    List,

    /// Show index statistics
    Stats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_prompt() {
        let cli = Cli::try_parse_from(["quiver"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.keep_open);
    }

    #[test]
    fn test_run_collects_words() {
        let cli = Cli::try_parse_from(["quiver", "run", "run", "htop"]).unwrap();
        let Some(Commands::Run { query }) = cli.command else {
            panic!("Expected run");
        };
        assert_eq!(query.join(" "), "run htop");
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::try_parse_from(["quiver", "stats", "--config", "/tmp/q.json"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/q.json")));
    }

    #[test]
    fn test_search_requires_query() {
        assert!(Cli::try_parse_from(["quiver", "search"]).is_err());
    }
}
