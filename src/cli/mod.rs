// CLI module for operations requiring server access

pub mod migrate;
pub mod user_management;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::app_data::AppData;

/// ProjectHub backend
#[derive(Parser)]
#[command(name = "projecthub")]
#[command(about = "Project tracking backend and administration CLI", long_about = None)]
pub struct Cli {
    /// Defaults to `serve`
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server
    Serve,

    /// Apply pending migrations to the main and audit databases
    Migrate,

    /// Create an account holding one role
    CreateUser {
        #[arg(long)]
        email: String,

        #[arg(long)]
        name: String,

        /// student, mentor or admin
        #[arg(long, default_value = "student")]
        role: String,

        /// Generated and printed when omitted
        #[arg(long)]
        password: Option<String>,
    },

    /// Grant a role to an existing account
    GrantRole {
        #[arg(long)]
        email: String,

        #[arg(long)]
        role: String,
    },

    /// Remove a role grant from an existing account
    RevokeRole {
        #[arg(long)]
        email: String,

        #[arg(long)]
        role: String,
    },
}

/// Execute a management command against initialized application data
///
/// `Serve` and `Migrate` are handled by main before AppData exists.
pub async fn execute_command(command: Commands, app_data: &Arc<AppData>) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Serve | Commands::Migrate => {
            return Err("serve and migrate are not management commands".into());
        }
        Commands::CreateUser {
            email,
            name,
            role,
            password,
        } => {
            user_management::create_user(app_data, &email, &name, role.parse()?, password).await?;
        }
        Commands::GrantRole { email, role } => {
            user_management::change_role(app_data, &email, role.parse()?, true).await?;
        }
        Commands::RevokeRole { email, role } => {
            user_management::change_role(app_data, &email, role.parse()?, false).await?;
        }
    }

    Ok(())
}
