use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cropwise", version, about = "Crop recommendation TUI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to config.yaml
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Base URL of the auto-data and recommendation services
    #[arg(long)]
    pub api_base: Option<String>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run interactive setup
    Init,
    /// Show resolved config and probe both services
    Check,
}

impl Cli {
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags_and_subcommand() {
        let cli = Cli::parse_from(["cropwise", "--api-base", "http://x", "-vv", "check"]);
        assert_eq!(cli.api_base.as_deref(), Some("http://x"));
        assert_eq!(cli.log_filter(), "trace");
        assert!(matches!(cli.command, Some(Commands::Check)));
    }

    #[test]
    fn defaults_to_tui() {
        let cli = Cli::parse_from(["cropwise"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.log_filter(), "warn");
    }
}
