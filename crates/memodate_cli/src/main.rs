//! Console entry point.
//!
//! # Responsibility
//! - Parse startup flags, load configuration, initialize logging.
//! - Wire the selected storage backend into the services and hand over
//!   to the interactive menu.

mod menu;

use clap::Parser;
use log::info;
use memodate_core::db::open_db;
use memodate_core::{
    default_log_level, init_logging, CelebrationService, Config, EventService,
    MemoryCelebrationRepository, MemoryEventRepository, MemoryStore, SqliteCelebrationRepository,
    SqliteEventRepository, StorageMode,
};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(version, about = "Console record keeper for memorable dates and their celebrations")]
struct Args {
    /// Configuration file path.
    #[arg(short, long, default_value_t = String::from("memodate.toml"))]
    config: String,
    /// Overrides the configured storage backend (memory|database).
    #[arg(short, long)]
    storage: Option<StorageMode>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let config = if Path::new(&args.config).exists() {
        match Config::load(&args.config) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("{err}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        Config::default()
    };

    if let Some(dir) = config.logging.dir.as_deref() {
        let level = config
            .logging
            .level
            .as_deref()
            .unwrap_or_else(|| default_log_level());
        // File logging is best-effort; the menu stays usable without it.
        if let Err(err) = init_logging(level, &absolute_log_dir(dir)) {
            eprintln!("{err}");
        }
    }

    let storage = args.storage.unwrap_or(config.storage);
    match storage {
        StorageMode::Memory => {
            info!("event=cli_start module=cli storage=memory");
            let store = MemoryStore::shared();
            let event_repo = MemoryEventRepository::new(Arc::clone(&store));
            let celebration_repo = MemoryCelebrationRepository::new(store);
            run_menu(event_repo, celebration_repo)
        }
        StorageMode::Database => {
            info!(
                "event=cli_start module=cli storage=database path={}",
                config.database.path
            );
            let conn = match open_db(&config.database.path) {
                Ok(conn) => conn,
                Err(err) => {
                    eprintln!("cannot open database `{}`: {err}", config.database.path);
                    return ExitCode::FAILURE;
                }
            };
            let event_repo = match SqliteEventRepository::try_new(&conn) {
                Ok(repo) => repo,
                Err(err) => {
                    eprintln!("{err}");
                    return ExitCode::FAILURE;
                }
            };
            let celebration_repo = match SqliteCelebrationRepository::try_new(&conn) {
                Ok(repo) => repo,
                Err(err) => {
                    eprintln!("{err}");
                    return ExitCode::FAILURE;
                }
            };
            run_menu(event_repo, celebration_repo)
        }
    }
}

fn run_menu<E, C>(event_repo: E, celebration_repo: C) -> ExitCode
where
    E: memodate_core::EventRepository + Clone,
    C: memodate_core::CelebrationRepository + Clone,
{
    let event_service = EventService::new(event_repo.clone(), celebration_repo.clone());
    let celebration_service = CelebrationService::new(event_repo, celebration_repo);
    menu::run(&event_service, &celebration_service);
    ExitCode::SUCCESS
}

fn absolute_log_dir(dir: &str) -> String {
    let path = Path::new(dir);
    if path.is_absolute() {
        dir.to_string()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path).display().to_string())
            .unwrap_or_else(|_| dir.to_string())
    }
}
