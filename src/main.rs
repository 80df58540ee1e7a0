mod add;
mod config;
mod db;
mod error;
mod import;
mod models;
mod query;
mod search;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use config::Config;
use db::Database;
use models::ApplicationData;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "jobtrack")]
#[command(about = "Job application manager - record, import and search job applications")]
struct Cli {
    /// Path to the SQLite database file
    #[arg(long, global = true, env = "JOBTRACK_DB")]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a job application
    Add(add::AddArgs),

    /// Search job applications
    Get(search::GetArgs),

    /// Import applications from a CSV file
    Import {
        /// Path to the CSV file
        file: PathBuf,

        /// Parse and report without saving
        #[arg(long)]
        dry_run: bool,
    },
}

fn init_logging(config: &Config) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.log_level))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.db.clone());
    init_logging(&config);

    match Database::open(&config.db_path) {
        Ok(mut db) => {
            if let Err(e) = run(&mut db, &config, cli.command) {
                error!(error = %e, "command failed");
                eprintln!("Error: {:#}", e);
            }
            if let Err(e) = db.close() {
                error!(error = %e, "failed to close database");
            }
        }
        Err(e) => {
            error!(error = %e, "could not open database");
            eprintln!("Error: {:#}", e);
        }
    }

    info!("leaving");
    Ok(())
}

fn run(db: &mut Database, config: &Config, command: Commands) -> Result<()> {
    let now = Local::now().naive_local();

    match command {
        Commands::Add(args) => {
            let app = args
                .to_application(config, now)
                .context("Failed to parse input")?;

            if args.dry_run {
                println!("Would save:\n{}", to_json(&app)?);
                println!("\n(Dry run - nothing was saved)");
            } else {
                db.save(&app)?;
                println!("Saved application to {} at {}", app.company, db.path().display());
                println!("{}", to_json(&app)?);
            }
        }

        Commands::Get(args) => {
            let filter = args.to_search_data(config, now);
            let apps = db.search(&filter).unwrap_or_else(|e| {
                error!(error = %e, "search failed");
                Vec::new()
            });

            if args.json {
                for app in &apps {
                    println!("{}", to_json(app)?);
                }
            } else if apps.is_empty() {
                println!("No applications found.");
            } else {
                print_table(&apps);
            }
            if !filter.work_type.is_empty() {
                println!("\nWork type: {}", filter.work_type.join(", "));
            }
        }

        Commands::Import { file, dry_run } => {
            let outcome = import::read_file(&file, config)?;
            if !outcome.reached_end {
                info!(file = %file.display(), "no end marker, read the whole file");
            }

            println!("Results:");
            println!("  Lines read:     {}", outcome.stats.lines_read);
            println!("  Records parsed: {}", outcome.stats.records_parsed);
            if outcome.stats.lines_skipped > 0 {
                println!("  Lines skipped:  {}", outcome.stats.lines_skipped);
            }

            if outcome.records.is_empty() {
                println!("\nNothing to save.");
            } else if dry_run {
                print_table(&outcome.records);
                println!("\n(Dry run - no applications were saved)");
            } else {
                let saved = db.save_all(&outcome.records)?;
                println!("  Saved:          {}", saved);
            }
        }
    }

    Ok(())
}

fn to_json(app: &ApplicationData) -> Result<String> {
    serde_json::to_string_pretty(app).context("Failed to serialize application")
}

fn print_table(apps: &[ApplicationData]) {
    println!(
        "{:<20} {:<24} {:<16} {:<22} {:<19} {:<16}",
        "COMPANY", "ROLE", "LOCATION", "WORK TYPE", "APPLIED", "RESPONSE"
    );
    println!("{}", "-".repeat(122));
    for app in apps {
        println!(
            "{:<20} {:<24} {:<16} {:<22} {:<19} {:<16}",
            truncate(&app.company, 18),
            truncate(&app.role, 22),
            truncate(&app.location, 14),
            truncate(&app.work_type, 22),
            app.application_date,
            truncate(&app.response, 16)
        );
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_add_positionals_and_flags() {
        let cli = Cli::try_parse_from([
            "jobtrack", "add", "Acme", "Engineer", "Berlin", "-b", "--comment", "referral",
        ])
        .unwrap();
        match cli.command {
            Commands::Add(args) => {
                assert_eq!(args.company.as_deref(), Some("Acme"));
                assert_eq!(args.location.as_deref(), Some("Berlin"));
                assert!(args.hybrid);
                assert_eq!(args.comment.as_deref(), Some("referral"));
            }
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn test_cli_parses_get_and_global_db() {
        let cli = Cli::try_parse_from(["jobtrack", "get", "-l", "Berlin", "-o", "30", "--db", "/tmp/x.db"]).unwrap();
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/x.db")));
        match cli.command {
            Commands::Get(args) => {
                assert_eq!(args.location.as_deref(), Some("Berlin"));
                assert_eq!(args.older, 30);
            }
            _ => panic!("expected get"),
        }
    }

    #[test]
    fn test_cli_import_requires_file() {
        assert!(Cli::try_parse_from(["jobtrack", "import"]).is_err());
        assert!(Cli::try_parse_from(["jobtrack", "import", "apps.csv"]).is_ok());
    }

    #[test]
    fn test_run_add_then_get_round_trip() {
        let mut db = Database::open_in_memory().unwrap();
        let config = Config::default();

        let cli = Cli::try_parse_from(["jobtrack", "add", "Acme", "Engineer", "Berlin", "-r"]).unwrap();
        run(&mut db, &config, cli.command).unwrap();

        let filter = search::GetArgs {
            company: None,
            role: None,
            location: None,
            remote: false,
            hybrid: false,
            older: 0,
            response: None,
            json: false,
        }
        .to_search_data(&config, Local::now().naive_local());
        let found = db.search(&filter).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].company, "Acme");
        assert!(found[0].is_remote);
    }

    #[test]
    fn test_run_add_missing_role_saves_nothing() {
        let mut db = Database::open_in_memory().unwrap();
        let config = Config::default();

        let cli = Cli::try_parse_from(["jobtrack", "add", "Acme"]).unwrap();
        assert!(run(&mut db, &config, cli.command).is_err());

        let filter = models::SearchData {
            older_than_date: "9999-12-31 23:59:59".to_string(),
            ..models::SearchData::default()
        };
        assert!(db.search(&filter).unwrap().is_empty());
    }

    #[test]
    fn test_run_add_dry_run_saves_nothing() {
        let mut db = Database::open_in_memory().unwrap();
        let config = Config::default();

        let cli = Cli::try_parse_from(["jobtrack", "add", "Acme", "Engineer", "--dry-run"]).unwrap();
        run(&mut db, &config, cli.command).unwrap();

        let filter = models::SearchData {
            older_than_date: "9999-12-31 23:59:59".to_string(),
            ..models::SearchData::default()
        };
        assert!(db.search(&filter).unwrap().is_empty());
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Acme", 10), "Acme");
        assert_eq!(truncate("Very Long Company Name", 10), "Very Lo...");
    }
}
