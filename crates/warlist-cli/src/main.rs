//! Warlist - command-line war list manager for DDNet TaterClient.
//!
//! Adds enemy and team entries to a TaterClient warlist config or a DDNet
//! SQLite database, with duplicate detection, pre-write backups, and undo.

mod config;

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::time::Duration;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use warlist_core::backup::{self, Session};
use warlist_core::gather::{gather, Submission};
use warlist_core::store::{self, AppendOutcome, WarStore};
use warlist_core::update::{self, CheckOutcome, Release};
use warlist_core::{Error, Group};

use config::{Backend, Config};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// How long the exit path waits for the startup release check.
const UPDATE_WAIT: Duration = Duration::from_millis(200);

/// Warlist - a war list manager for DDNet TaterClient
#[derive(Parser, Debug)]
#[command(name = "warlist")]
#[command(version, about = "Manage the TaterClient war list")]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Path to the war list store, overriding the config file
    #[arg(short, long, value_name = "FILE")]
    store: Option<PathBuf>,

    /// Store variant to open, overriding the config file
    #[arg(short, long, value_enum)]
    backend: Option<Backend>,

    /// Skip the pre-write backup for this run
    #[arg(long)]
    no_backup: bool,

    /// Assume yes on every confirmation prompt
    #[arg(short = 'y', long)]
    yes: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add a single entry
    Add {
        /// Player nickname; may be omitted when --clan is given
        nick: Option<String>,

        /// Clan tag for the entry
        #[arg(short, long)]
        clan: Option<String>,

        /// Reason shown next to the war marker
        #[arg(short, long)]
        reason: Option<String>,

        /// Target group
        #[arg(short, long, value_parser = parse_group, default_value = "enemy")]
        group: Group,

        /// Show what would be written without writing it
        #[arg(long)]
        dry_run: bool,
    },
    /// Add several nicks at once
    Multi {
        /// Nick list; quote nicks that contain spaces
        nicks: Option<String>,

        /// Shared clan tag, instead of a nick list
        #[arg(short, long, conflicts_with = "nicks")]
        clan: Option<String>,

        /// Reason applied to every entry
        #[arg(short, long)]
        reason: Option<String>,

        /// Target group
        #[arg(short, long, value_parser = parse_group, default_value = "enemy")]
        group: Group,

        /// Show what would be written without writing it
        #[arg(long)]
        dry_run: bool,
    },
    /// Restore the store from its most recent backup
    Undo,
    /// Check for a newer release
    CheckUpdate,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("warlist_cli=info".parse()?)
                .add_directive("warlist_core=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = Config::load(args.config.clone())?;
    if let Some(path) = args.store.clone() {
        config.store_path = path;
    }
    if let Some(backend) = args.backend {
        config.backend = backend;
    }
    if args.no_backup {
        config.backup = false;
    }

    // Fire the startup release check early so it overlaps the real work.
    let update_rx = (config.check_updates && !matches!(args.command, Command::CheckUpdate))
        .then(|| update::spawn_check(VERSION));

    let store = store::open(config.backend.kind(), config.store_path.clone());
    let mut session = Session::new();

    let result = match &args.command {
        Command::Add {
            nick,
            clan,
            reason,
            group,
            dry_run,
        } => {
            let submission = Submission::Single {
                nick: nick.clone().unwrap_or_default(),
                clan: clan.clone().unwrap_or_default(),
                reason: reason.clone().unwrap_or_default(),
            };
            cmd_add(
                store.as_ref(),
                *group,
                &submission,
                &mut session,
                &config,
                args.yes,
                *dry_run,
            )
        }
        Command::Multi {
            nicks,
            clan,
            reason,
            group,
            dry_run,
        } => {
            let submission = Submission::Multi {
                nicks: nicks.clone().unwrap_or_default(),
                clan: clan.clone().unwrap_or_default(),
                reason: reason.clone().unwrap_or_default(),
            };
            run_submission(
                store.as_ref(),
                *group,
                &submission,
                &mut session,
                &config,
                args.yes,
                *dry_run,
            )
            .map(|_| ())
        }
        Command::Undo => cmd_undo(store.as_ref(), &session, args.yes),
        Command::CheckUpdate => cmd_check_update(),
    };

    if let Some(rx) = update_rx {
        report_background_check(&rx);
    }
    result
}

/// Single-entry flow. An invalid nick aborts instead of being skipped.
fn cmd_add(
    store: &dyn WarStore,
    group: Group,
    submission: &Submission,
    session: &mut Session,
    config: &Config,
    yes: bool,
    dry_run: bool,
) -> Result<()> {
    let outcome = run_submission(store, group, submission, session, config, yes, dry_run)?;
    if let Some(outcome) = outcome {
        if outcome.written == 0 {
            if let Some(nick) = outcome.invalid.first() {
                return Err(Error::InvalidNick(nick.clone()).into());
            }
        }
    }
    Ok(())
}

/// Gather, preview or confirm, then append. Returns `None` on a dry run.
fn run_submission(
    store: &dyn WarStore,
    group: Group,
    submission: &Submission,
    session: &mut Session,
    config: &Config,
    yes: bool,
    dry_run: bool,
) -> Result<Option<AppendOutcome>> {
    let clan_given = match submission {
        Submission::Single { clan, .. } | Submission::Multi { clan, .. } => !clan.trim().is_empty(),
    };
    if clan_given && !store.supports_clan() {
        warn!("this store has no clan field; clan input is ignored");
    }

    let entries = gather(submission, store.supports_clan())?;

    if dry_run {
        let preview = store.preview(group, &entries)?;
        for line in &preview.lines {
            println!("{line}");
        }
        for dup in &preview.duplicates {
            println!("{dup}");
        }
        for nick in &preview.invalid {
            println!("SKIP (invalid): {nick}");
        }
        return Ok(None);
    }

    println!("Target store: {}", store.path().display());
    if !confirm("The game client must be closed before writing. Continue?", yes)? {
        bail!("cancelled");
    }
    if !store.path().exists() {
        let prompt = format!("{} does not exist. Create it?", store.path().display());
        if !confirm(&prompt, yes)? {
            bail!("cancelled");
        }
    }

    let outcome = store.append(group, &entries, session, config.backup)?;
    report_outcome(&outcome);
    Ok(Some(outcome))
}

fn cmd_undo(store: &dyn WarStore, session: &Session, yes: bool) -> Result<()> {
    let backup_path = backup::find_backup(session, store.path())?;
    let prompt = format!(
        "Restore {} from {}?",
        store.path().display(),
        backup_path.display()
    );
    if !confirm(&prompt, yes)? {
        bail!("cancelled");
    }
    let used = backup::undo(session, store.path())?;
    println!("Restored from {}", used.display());
    Ok(())
}

fn cmd_check_update() -> Result<()> {
    match update::check(VERSION) {
        CheckOutcome::Newer(release) => {
            println!("Version {} is available (you have v{VERSION})", release.tag);
            println!("Download: {}", release.page);
            if !release.notes.is_empty() {
                println!();
                println!("{}", release.notes);
            }
        }
        CheckOutcome::Current => {
            println!("You are running the latest version (v{VERSION}).");
        }
        CheckOutcome::Failed(reason) => {
            println!("Update check failed: {reason}");
        }
    }
    Ok(())
}

fn report_outcome(outcome: &AppendOutcome) {
    println!("Written: {}", outcome.written);
    if !outcome.skipped.is_empty() {
        println!("Skipped duplicates:");
        for (nick, clan) in &outcome.skipped {
            println!("  {nick} ({clan})");
        }
    }
    if !outcome.invalid.is_empty() {
        println!("Invalid nicks skipped:");
        for nick in &outcome.invalid {
            println!("  {nick}");
        }
    }
    if let Some(backup) = &outcome.backup {
        println!("Backup: {}", backup.display());
    }
}

/// Print the startup check verdict, waiting briefly for one still in
/// flight.
fn report_background_check(rx: &Receiver<CheckOutcome>) {
    if let Some(release) = drain_update_check(rx, UPDATE_WAIT) {
        println!();
        println!("Update available: {} ({})", release.tag, release.page);
    }
}

/// Wait up to `wait` for the background check and keep a newer-release
/// verdict. Failures are logged at debug level; anything else is dropped.
fn drain_update_check(rx: &Receiver<CheckOutcome>, wait: Duration) -> Option<Release> {
    match rx.recv_timeout(wait) {
        Ok(CheckOutcome::Newer(release)) => Some(release),
        Ok(CheckOutcome::Failed(reason)) => {
            debug!(%reason, "background update check failed");
            None
        }
        _ => None,
    }
}

fn confirm(prompt: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes" | "Yes" | "YES"))
}

fn parse_group(s: &str) -> Result<Group, String> {
    s.parse().map_err(|err: Error| err.to_string())
}
