//! Configuration for the explorer service
//!
//! CLI arguments and environment variable handling using clap.

use clap::{Parser, ValueEnum};
use std::net::SocketAddr;

use crate::auth::PasswordMode;

/// Output format for log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Solar System Explorer - REST backend for the learning app
#[derive(Parser, Debug, Clone)]
#[command(name = "solar-explorer")]
#[command(about = "REST API for planets, quizzes, missions, worksheets and badges")]
pub struct Args {
    /// Address to listen on
    #[arg(long, env = "LISTEN", default_value = "0.0.0.0:5000")]
    pub listen: SocketAddr,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Log line format
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value = "pretty")]
    pub log_format: LogFormat,

    /// Load the bundled sample catalogue at startup
    #[arg(long, env = "SEED", default_value = "true", action = clap::ArgAction::Set)]
    pub seed: bool,

    /// Maximum accepted request body size in bytes
    #[arg(long, env = "MAX_BODY_BYTES", default_value = "65536")]
    pub max_body_bytes: usize,

    /// How passwords are stored and compared
    #[arg(long, env = "PASSWORD_HASHING", value_enum, default_value = "argon2")]
    pub password_hashing: PasswordMode,
}

impl Args {
    /// Defaults without reading the command line or environment
    pub fn for_tests() -> Self {
        Self {
            listen: SocketAddr::from(([127, 0, 0, 1], 0)),
            log_level: "debug".to_string(),
            log_format: LogFormat::Pretty,
            seed: true,
            max_body_bytes: 65536,
            password_hashing: PasswordMode::Argon2,
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_body_bytes == 0 {
            return Err("MAX_BODY_BYTES must be greater than zero".to_string());
        }
        Ok(())
    }
}
