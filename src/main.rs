use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use edit_trail::audit::{commit_changes, CommitOutcome, TIMESTAMP_FORMAT};
use edit_trail::config::{LogOutput, Settings, TrailPaths};
use edit_trail::crypto::{split_envelopes, HybridCipher};
use edit_trail::storage::try_read;

#[derive(Parser)]
#[command(
    name = "edit-trail",
    version,
    about = "Encrypted, append-only change tracking for a source file",
    long_about = "edit-trail records every committed version of a monitored file. \
                  The first commit stores the full content; later commits store a \
                  unified diff. Entries are encrypted for a single verifier key."
)]
struct Cli {
    /// Project root containing the monitored file [default: $EDIT_TRAIL_ROOT or cwd]
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Record the monitored file's changes (default)
    Commit {
        /// Monitored file, relative to the project root
        #[arg(short, long)]
        target: Option<String>,
        /// Write entries unencrypted to history.log
        #[arg(long)]
        plaintext: bool,
    },

    /// List the envelopes in the encrypted history log
    Inspect,

    /// Show resolved paths and settings
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_env("EDIT_TRAIL_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("edit_trail=debug")
        } else {
            EnvFilter::new("edit_trail=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).without_time())
        .init();

    let paths = TrailPaths::resolve(cli.root)?;
    let mut settings = Settings::load_or_default(&paths)?;

    match cli.command.unwrap_or(Commands::Commit {
        target: None,
        plaintext: false,
    }) {
        Commands::Commit { target, plaintext } => {
            if let Some(target) = target {
                settings.target_file = target;
            }
            if plaintext {
                settings.output = LogOutput::Plaintext;
            }
            handle_commit(&paths, &settings)?;
        }
        Commands::Inspect => handle_inspect(&paths, &settings)?,
        Commands::Config => {
            let log_paths = paths.relocate_log_dir(settings.log_dir.as_str());
            println!("edit-trail Configuration");
            println!("========================");
            println!("Project root:   {}", paths.project_root().display());
            println!("Settings file:  {}", paths.settings_file().display());
            println!("Log directory:  {}", log_paths.log_dir().display());
            println!();
            println!("Settings:");
            println!("  Monitored file: {}", settings.target_file);
            println!("  Output:         {:?}", settings.output);
        }
    }

    Ok(())
}

fn handle_commit(paths: &TrailPaths, settings: &Settings) -> Result<()> {
    let outcome = commit_changes(paths, settings).with_context(|| {
        format!(
            "Failed to record changes to {}",
            paths.target_file(&settings.target_file).display()
        )
    })?;

    let timestamp = Local::now().format(TIMESTAMP_FORMAT);
    match outcome {
        CommitOutcome::Unchanged => println!("No changes since the last commit ({})", timestamp),
        _ if settings.is_encrypted() => {
            println!("\nCode changes successfully encrypted and logged at {}\n", timestamp)
        }
        _ => println!("\nCode changes logged in plaintext at {}\n", timestamp),
    }

    Ok(())
}

fn handle_inspect(paths: &TrailPaths, settings: &Settings) -> Result<()> {
    let log_path = paths
        .relocate_log_dir(settings.log_dir.as_str())
        .encrypted_log();

    if !log_path.exists() {
        println!("No history log at {}", log_path.display());
        return Ok(());
    }

    let log = try_read(&log_path, true)?.into_bytes();
    let key_block_len = HybridCipher::embedded()?.key_block_len();
    let envelopes = split_envelopes(&log, key_block_len)
        .with_context(|| format!("{} is not a valid history log", log_path.display()))?;

    let mut offset = 0;
    for (index, envelope) in envelopes.iter().enumerate() {
        println!(
            "#{:<4} offset {:>8}  payload {:>8} bytes",
            index + 1,
            offset,
            envelope.payload.len()
        );
        offset += envelope.encoded_len();
    }
    println!("{} envelope(s), {} bytes", envelopes.len(), log.len());

    Ok(())
}
