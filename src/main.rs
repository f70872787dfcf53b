use clap::Parser;
use user_registry::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve => cli::serve::run().await,
        Command::Token { length } => cli::token::run_token(length),
        Command::PasswordStrength { password } => cli::token::run_password_strength(&password),
    }
}
