//! Configuration and CLI argument handling

use clap::{error::ErrorKind, CommandFactory, Parser};

/// CLI argument parsing structure
#[derive(Parser, Debug, Clone)]
#[command(name = "exam-clock")]
#[command(about = "A multi-timer countdown server for supervising timed examinations")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Initial single countdown duration in minutes
    #[arg(short, long, default_value = "60", value_parser = clap::value_parser!(u32).range(1..=480))]
    pub minutes: u32,

    /// Countdown turns amber at or below this many minutes
    #[arg(long, default_value = "10", value_parser = clap::value_parser!(u32).range(0..=480))]
    pub warning_minutes: u32,

    /// Countdown turns red at or below this many minutes
    #[arg(long, default_value = "5", value_parser = clap::value_parser!(u32).range(0..=480))]
    pub danger_minutes: u32,

    /// Length of the warning window at the end of each exam's working time
    #[arg(long, default_value = "10", value_parser = clap::value_parser!(u32).range(0..=120))]
    pub exam_warning_minutes: u32,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        let config: Self = Parser::parse();
        if let Err(err) = config.validate() {
            err.exit();
        }
        config
    }

    /// Cross-field checks clap cannot express per argument
    pub fn validate(&self) -> Result<(), clap::Error> {
        if self.danger_minutes > self.warning_minutes {
            return Err(Self::command().error(
                ErrorKind::ArgumentConflict,
                format!(
                    "--danger-minutes ({}) must not exceed --warning-minutes ({})",
                    self.danger_minutes, self.warning_minutes
                ),
            ));
        }
        Ok(())
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Exam warning window in seconds
    pub fn exam_warning_seconds(&self) -> u32 {
        self.exam_warning_minutes * 60
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 20554,
            host: "0.0.0.0".to_string(),
            minutes: 60,
            warning_minutes: 10,
            danger_minutes: 5,
            exam_warning_minutes: 10,
            verbose: false,
        }
    }
}
