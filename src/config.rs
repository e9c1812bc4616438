//! Configuration and CLI argument handling

use clap::Parser;

use crate::catalog::{PatternKey, SessionKey};

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "breath-coach")]
#[command(about = "A guided breathing timer for the terminal")]
#[command(version)]
pub struct Config {
    /// Breathing pattern selected at launch
    #[arg(short, long, value_enum, default_value = "box")]
    pub pattern: PatternKey,

    /// Session length in seconds, or "continuous"
    #[arg(short, long, value_enum, default_value = "60")]
    pub session: SessionKey,

    /// Start a session immediately
    #[arg(long)]
    pub start: bool,

    /// Print the available patterns and session lengths as JSON and exit
    #[arg(long)]
    pub list: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }

    /// Tracing filter directive for this crate
    pub fn log_filter(&self) -> String {
        format!("breath_coach={}", self.log_level())
    }
}
