//! Maintenance tool: create or reset the demo database.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use dialoguer::Confirm;

use typo_db::seed::USERS;
use typo_db::{BatchOutcome, Database, SeedReport};
use typo_server::config::Config;

/// Typo Payments database maintenance.
#[derive(Parser)]
#[command(name = "typo-admin")]
#[command(version, about, long_about = None)]
#[command(arg_required_else_help = true)]
struct Cli {
    /// Database file (defaults to TYPO_DB_PATH, then typo_payments.db)
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the schema and insert demo data that is not there yet
    Init,

    /// Drop every table and recreate the demo dataset
    Reset {
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    typo_server::init_tracing("typo=info");

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let db_path = cli.db_path.unwrap_or(config.db_path);

    match cli.command {
        Commands::Init => {
            let db = Database::open(&db_path, 1)
                .with_context(|| format!("Failed to open {}", db_path.display()))?;
            let report = db.initialize().context("Failed to initialize database")?;
            print_report(&report);
            println!("Database initialized successfully!");
        }
        Commands::Reset { yes } => {
            if db_path.exists() && !yes {
                let confirmed = Confirm::new()
                    .with_prompt(format!("Delete existing database '{}'?", db_path.display()))
                    .default(false)
                    .interact()
                    .context("Failed to get user confirmation")?;
                if !confirmed {
                    println!("Database reset cancelled");
                    return Ok(());
                }
            }

            let db = Database::open(&db_path, 1)
                .with_context(|| format!("Failed to open {}", db_path.display()))?;
            let report = db.reset().context("Database reset failed")?;
            print_report(&report);
            println!("Database reset complete!");
            print_demo_accounts();
        }
    }

    Ok(())
}

fn print_report(report: &SeedReport) {
    for (table, outcome) in [
        ("users", report.users),
        ("payments", report.payments),
        ("feedback", report.feedback),
    ] {
        match outcome {
            BatchOutcome::Inserted(rows) => println!("  {table}: inserted {rows} sample rows"),
            BatchOutcome::AlreadyPresent => println!("  {table}: sample rows already exist"),
        }
    }
}

fn print_demo_accounts() {
    println!();
    println!("Demo accounts available:");
    for user in USERS {
        let role = if user.is_admin { "Admin" } else { "User" };
        println!("  {} / {} ({})", user.username, user.password, role);
    }
}
