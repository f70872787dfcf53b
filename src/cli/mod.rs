//! CLI module for the user registry
//!
//! Provides subcommands:
//! - `serve`: run the HTTP API
//! - `token`: print a random alphanumeric token
//! - `password-strength`: check a password against the strength rules

pub mod serve;
pub mod token;

use clap::{Parser, Subcommand};

/// User registry - registration, lookup and account management
#[derive(Parser)]
#[command(name = "user-registry")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve,

    /// Generate a random alphanumeric token
    Token {
        /// Number of characters
        #[arg(long, short, default_value_t = 32)]
        length: usize,
    },

    /// Report whether a password is strong or weak
    PasswordStrength {
        password: String,
    },
}
