//! Bakeledger CLI - Database migrations and user management.
//!
//! # Usage
//!
//! ```bash
//! # Create tables and the session store
//! bl-cli migrate
//!
//! # Create a user
//! bl-cli user create -u baker -p 'correct horse'
//!
//! # Reset a password
//! bl-cli user set-password -u baker -p 'battery staple'
//! ```
//!
//! All commands read `BAKELEDGER_DATABASE_URL` (or `DATABASE_URL`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "bl-cli")]
#[command(author, version, about = "Bakeledger CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations, including the session table
    Migrate,
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new user
    Create {
        /// Login name
        #[arg(short, long)]
        username: String,

        /// Initial password
        #[arg(short, long)]
        password: String,
    },
    /// Replace an existing user's password
    SetPassword {
        /// Login name
        #[arg(short, long)]
        username: String,

        /// New password
        #[arg(short, long)]
        password: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::User { action } => match action {
            UserAction::Create { username, password } => {
                commands::user::create(&username, &password).await?;
            }
            UserAction::SetPassword { username, password } => {
                commands::user::set_password(&username, &password).await?;
            }
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_user_create() {
        let cli = Cli::try_parse_from(["bl-cli", "user", "create", "-u", "baker", "-p", "secret123"]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::User {
                action: UserAction::Create { .. }
            })
        ));
    }
}
