//! CLI argument definitions.
//!
//! Uses clap derive macros for type-safe argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Door Elite - Home-services marketplace API
#[derive(Parser, Debug)]
#[command(name = "door-elite")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve(ServeArgs),

    /// Run database migrations
    Migrate(MigrateArgs),

    /// Load demo or bootstrap data
    Seed(SeedArgs),
}

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Host to bind to
    #[arg(short = 'H', long, default_value = "0.0.0.0", env = "SERVER_HOST")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "4000", env = "SERVER_PORT")]
    pub port: u16,
}

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub action: MigrateAction,
}

/// Migration actions
#[derive(Subcommand, Debug)]
pub enum MigrateAction {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset and re-run all migrations
    Fresh,
}

/// Arguments for the seed command
#[derive(Parser, Debug)]
pub struct SeedArgs {
    #[command(subcommand)]
    pub target: SeedTarget,
}

/// What to seed
#[derive(Subcommand, Debug)]
pub enum SeedTarget {
    /// Load catalog entries from a JSON file
    Services {
        /// JSON array of services; the bundled demo catalog when omitted
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Append to the existing catalog instead of replacing it
        #[arg(long)]
        keep: bool,
    },
    /// Create an account if the email is free
    User {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,

        #[arg(long)]
        name: String,

        /// Grant the admin role
        #[arg(long)]
        admin: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seed_services() {
        let cli = Cli::parse_from(["door-elite", "seed", "services", "--keep"]);
        match cli.command {
            Commands::Seed(SeedArgs {
                target: SeedTarget::Services { file, keep },
            }) => {
                assert!(file.is_none());
                assert!(keep);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_seed_admin_user() {
        let cli = Cli::parse_from([
            "door-elite",
            "-v",
            "seed",
            "user",
            "--email",
            "admin@example.com",
            "--password",
            "secret123",
            "--name",
            "Admin",
            "--admin",
        ]);
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Seed(SeedArgs {
                target: SeedTarget::User { admin: true, .. }
            })
        ));
    }
}
