//! Configuration and CLI argument handling

use clap::Parser;

use crate::state::ModeDurations;

/// CLI argument parsing structure
#[derive(Parser)]
#[command(name = "luplup")]
#[command(about = "A state-managed focus timer with AI-assisted session planning")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "7979")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Deep work session length in seconds
    #[arg(long, default_value = "1500", value_parser = clap::value_parser!(u64).range(1..))]
    pub focus_secs: u64,

    /// Short break length in seconds
    #[arg(long, default_value = "300", value_parser = clap::value_parser!(u64).range(1..))]
    pub short_break_secs: u64,

    /// Long break length in seconds
    #[arg(long, default_value = "900", value_parser = clap::value_parser!(u64).range(1..))]
    pub long_break_secs: u64,

    /// Gemini model used for subtask generation
    #[arg(long, default_value = "gemini-2.5-flash")]
    pub model: String,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Mode durations from the configured session lengths
    pub fn durations(&self) -> ModeDurations {
        ModeDurations {
            focus: self.focus_secs,
            short_break: self.short_break_secs,
            long_break: self.long_break_secs,
        }
    }

    /// Gemini API key; a configuration concern, never a CLI flag
    pub fn api_key(&self) -> Option<String> {
        std::env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty())
    }
}
