//! Taskboard CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! taskboard-cli migrate
//!
//! # Create a user and print its ID
//! taskboard-cli user create --name "Ana"
//!
//! # Seed the default lists of a project
//! taskboard-cli seed --user 1 --project 1 --scope project
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `user create` - Create board users
//! - `seed` - Run the default-list seed routine for a project

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

use taskboard_api::services::SeedScope;
use taskboard_core::{ProjectId, UserId};

mod commands;

#[derive(Parser)]
#[command(name = "taskboard-cli")]
#[command(author, version, about = "Taskboard CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage board users
    User {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Seed the default lists of a project
    Seed {
        /// Owner of the seeded lists
        #[arg(short, long)]
        user: UserId,

        /// Project the seeded lists belong to
        #[arg(short, long)]
        project: ProjectId,

        /// Which existing lists skip seeding (`global` or `project`)
        #[arg(short, long, default_value = "global")]
        scope: SeedScope,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new user
    Create {
        /// Display name
        #[arg(short, long)]
        name: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::User { action } => match action {
            UserAction::Create { name } => {
                let id = commands::user::create_user(name).await?;
                #[allow(clippy::print_stdout)]
                {
                    println!("{id}");
                }
            }
        },
        Commands::Seed {
            user,
            project,
            scope,
        } => commands::seed::run(user, project, scope).await?,
    }
    Ok(())
}
