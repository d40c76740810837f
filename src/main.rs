//! Duewatch - due-task reconciliation for markdown TODOs.
//!
//! Thin command-line host around the library: each subcommand maps onto
//! one core operation.

use chrono::Local;
use clap::{Parser, Subcommand};
use colored::Colorize;
use duewatch::backend::TaskWarriorBackend;
use duewatch::check::DueChecker;
use duewatch::config::DuewatchConfig;
use duewatch::notify::{DesktopNotifier, Notifier, Urgency};
use duewatch::scheduler::Scheduler;
use duewatch::store::{DocumentStore, FsDocumentStore};
use duewatch::sync::{ReapSummary, SyncEngine, SyncOutcome, SyncSummary};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

#[derive(Parser)]
#[command(name = "duewatch")]
#[command(version = "0.1.0")]
#[command(about = "Markdown TODO reconciliation with TaskWarrior sync and desktop reminders", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Config file (defaults to <config_dir>/duewatch/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directories to scan, overriding the configured watch_dirs
    #[arg(short = 'd', long = "dir", global = true, value_name = "DIR")]
    dirs: Vec<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one due check and notify about due/overdue TODOs
    Check,

    /// Reconcile unsynced TODO markers into TaskWarrior
    Sync,

    /// Remove identifier comments whose TaskWarrior records vanished
    Reap,

    /// Run periodic due checks until interrupted
    Watch {
        /// Check interval in seconds (overrides the configured value)
        #[arg(short, long, value_name = "SECS")]
        interval: Option<u64>,
    },

    /// Report configuration and collaborator availability
    Doctor {
        /// Output a JSON report instead of text
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "duewatch=debug,info"
    } else {
        "duewatch=info,warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(DuewatchConfig::default_path);

    let mut config = match DuewatchConfig::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            std::process::exit(e.exit_code());
        }
    };
    if !cli.dirs.is_empty() {
        config.watch_dirs = cli.dirs.clone();
    }

    let result = match cli.command {
        Commands::Check => run_check(&config),
        Commands::Sync => run_sync(&config),
        Commands::Reap => run_reap(&config),
        Commands::Watch { interval } => run_watch(&config, interval).await,
        Commands::Doctor { json } => run_doctor(&config, &config_path, json),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(e.exit_code());
    }
    Ok(())
}

fn run_check(config: &DuewatchConfig) -> duewatch::Result<()> {
    let store = FsDocumentStore::discover(&config.watch_dirs, &config.extensions);
    let notifier = DesktopNotifier::new();
    let checker = DueChecker::new(&store, &notifier, config);

    let summary = checker.run(Local::now())?;
    if summary.urgent() == 0 {
        println!(
            "{} nothing urgent ({} TODOs across {} documents)",
            "✓".green(),
            summary.candidates,
            summary.documents
        );
    } else {
        println!(
            "{} {} overdue, {} due soon ({} TODOs across {} documents)",
            "!".yellow().bold(),
            summary.overdue,
            summary.due_soon,
            summary.candidates,
            summary.documents
        );
    }
    Ok(())
}

fn sync_pass(
    config: &DuewatchConfig,
    backend: &TaskWarriorBackend,
) -> duewatch::Result<(SyncSummary, usize)> {
    let mut store = FsDocumentStore::discover(&config.watch_dirs, &config.extensions);
    let documents = store.list_documents()?;
    let count = documents.len();
    let mut totals = SyncSummary::default();

    let mut engine = SyncEngine::new(&mut store, backend);
    for doc in documents {
        if let SyncOutcome::Completed(summary) = engine.sync(doc)? {
            totals.synced += summary.synced;
            totals.skipped += summary.skipped;
            totals.failed += summary.failed;
        }
    }
    Ok((totals, count))
}

fn run_sync(config: &DuewatchConfig) -> duewatch::Result<()> {
    let backend = TaskWarriorBackend::new(&config.task_bin, &config.task_project);
    let (totals, documents) = sync_pass(config, &backend)?;

    if totals.synced == 0 && totals.skipped == 0 && totals.failed == 0 {
        println!("{} nothing to sync in {} documents", "✓".green(), documents);
        return Ok(());
    }

    let mut line = format!("Synced {} new TODOs", totals.synced);
    if totals.failed > 0 {
        line.push_str(&format!(", {} failed", totals.failed));
    }
    println!(
        "{} {} ({} already tracked)",
        "✓".green(),
        line,
        totals.skipped
    );

    if totals.synced > 0 || totals.failed > 0 {
        DesktopNotifier::new().notify("TaskWarrior", &line, Urgency::Normal);
    }
    Ok(())
}

fn run_reap(config: &DuewatchConfig) -> duewatch::Result<()> {
    let mut store = FsDocumentStore::discover(&config.watch_dirs, &config.extensions);
    let backend = TaskWarriorBackend::new(&config.task_bin, &config.task_project);
    let documents = store.list_documents()?;

    let mut totals = ReapSummary::default();
    let mut engine = SyncEngine::new(&mut store, &backend);
    for doc in documents {
        let summary = engine.reap_orphans(doc)?;
        totals.scanned += summary.scanned;
        totals.removed += summary.removed;
        totals.failed += summary.failed;
    }

    if totals.is_clean() {
        println!(
            "{} no orphaned identifiers ({} checked)",
            "✓".green(),
            totals.scanned
        );
    } else {
        println!(
            "{} removed {} orphaned identifiers ({} checked, {} checks failed)",
            "✓".green(),
            totals.removed,
            totals.scanned,
            totals.failed
        );
    }
    Ok(())
}

async fn run_watch(config: &DuewatchConfig, interval: Option<u64>) -> duewatch::Result<()> {
    let period = Duration::from_secs(interval.unwrap_or(config.check_interval_secs));
    let debounce = Duration::from_millis(config.debounce_ms);
    let backend = TaskWarriorBackend::new(&config.task_bin, &config.task_project);

    info!(
        "watching {:?} every {}s",
        config.watch_dirs,
        period.as_secs()
    );

    let mut scheduler = Scheduler::spawn(period, debounce);
    loop {
        tokio::select! {
            tick = scheduler.next_tick() => {
                if tick.is_none() {
                    break;
                }
                if let Err(e) = run_check(config) {
                    eprintln!("{} {}", "Error:".red().bold(), e);
                }
                // Mirror the due check with a sync pass when the backend
                // responds; keep watching either way.
                if backend.available() {
                    if let Err(e) = sync_pass(config, &backend) {
                        eprintln!("{} {}", "Error:".red().bold(), e);
                    }
                } else {
                    info!("task backend not available, skipping sync");
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("stopping watch");
                break;
            }
        }
    }
    scheduler.shutdown();
    Ok(())
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    config_path: String,
    config_found: bool,
    watch_dirs: Vec<String>,
    documents: usize,
    todos: usize,
    tracked: usize,
    task_bin: String,
    task_bin_found: bool,
    backend_responds: bool,
}

fn run_doctor(
    config: &DuewatchConfig,
    config_path: &std::path::Path,
    json: bool,
) -> duewatch::Result<()> {
    let store = FsDocumentStore::discover(&config.watch_dirs, &config.extensions);
    let backend = TaskWarriorBackend::new(&config.task_bin, &config.task_project);

    let documents = store.list_documents()?;
    let mut todos = 0;
    let mut tracked = 0;
    for doc in &documents {
        let lines = store.lines(*doc)?;
        let mut candidates = duewatch::marker::parse_document(&lines, *doc);
        duewatch::tracker::attach(&lines, &mut candidates);
        todos += candidates.len();
        tracked += candidates.iter().filter(|c| c.is_tracked()).count();
    }

    let report = DoctorReport {
        config_path: config_path.display().to_string(),
        config_found: config_path.exists(),
        watch_dirs: config
            .watch_dirs
            .iter()
            .map(|d| d.display().to_string())
            .collect(),
        documents: documents.len(),
        todos,
        tracked,
        task_bin: config.task_bin.clone(),
        task_bin_found: which::which(&config.task_bin).is_ok(),
        backend_responds: backend.available(),
    };

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).map_err(anyhow::Error::from)?
        );
        return Ok(());
    }

    let mark = |ok: bool| {
        if ok {
            "✓".green()
        } else {
            "✗".red()
        }
    };
    println!(
        "{} config: {} ({})",
        mark(true),
        report.config_path,
        if report.config_found {
            "loaded"
        } else {
            "defaults"
        }
    );
    println!(
        "{} documents: {} under {:?}",
        mark(report.documents > 0),
        report.documents,
        report.watch_dirs
    );
    println!(
        "{} TODOs: {} ({} tracked)",
        mark(true),
        report.todos,
        report.tracked
    );
    println!(
        "{} task binary '{}' {}",
        mark(report.task_bin_found),
        report.task_bin,
        if report.task_bin_found {
            "found"
        } else {
            "not found"
        }
    );
    println!(
        "{} backend {}",
        mark(report.backend_responds),
        if report.backend_responds {
            "responds"
        } else {
            "not responding"
        }
    );
    Ok(())
}
