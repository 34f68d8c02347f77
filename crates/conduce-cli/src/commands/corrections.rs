//! Corrections command - manage the learned model-name corrections.

use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use console::style;

use conduce_core::normalize::{CorrectionStore, ModelNormalizer};

/// Arguments for the corrections command.
#[derive(Args)]
pub struct CorrectionsArgs {
    #[command(subcommand)]
    command: CorrectionsCommand,
}

#[derive(Subcommand)]
enum CorrectionsCommand {
    /// List learned corrections
    List,

    /// Add or update a correction
    Add {
        /// Model name as the extractor produces it
        original: String,
        /// Name to use instead
        corrected: String,
    },

    /// Remove a correction
    Remove {
        /// Model name the correction was stored under
        original: String,
    },

    /// Remove every learned correction
    Clear {
        /// Skip confirmation
        #[arg(long)]
        force: bool,
    },
}

pub fn run(args: CorrectionsArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let normalizer = ModelNormalizer::from_config(&config.cleaning)?;
    let store_path = config.corrections.path;

    match args.command {
        CorrectionsCommand::List => list_corrections(&store_path),
        CorrectionsCommand::Add { original, corrected } => {
            add_correction(&store_path, &normalizer, &original, corrected)
        }
        CorrectionsCommand::Remove { original } => {
            remove_correction(&store_path, &normalizer.clean(&original))
        }
        CorrectionsCommand::Clear { force } => clear_corrections(&store_path, force),
    }
}

/// Default location of the correction store when no config file names one.
pub(crate) fn default_store_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("conduce")
        .join("corrections.json")
}

fn list_corrections(path: &Path) -> anyhow::Result<()> {
    let store = CorrectionStore::open_file(path);

    if store.is_empty() {
        println!("{} No learned corrections.", style("ℹ").blue());
        return Ok(());
    }

    println!("{}", style("Learned corrections:").bold());
    for (original, corrected) in store.entries() {
        println!("  {} {} {}", original, style("->").dim(), corrected);
    }

    println!();
    println!("{} corrections stored at {}", store.len(), path.display());

    Ok(())
}

fn add_correction(
    path: &Path,
    normalizer: &ModelNormalizer,
    original: &str,
    corrected: String,
) -> anyhow::Result<()> {
    // Corrections are keyed by cleaned model name.
    let canonical = normalizer.clean(original);
    if canonical.is_empty() {
        anyhow::bail!("Nothing left of \"{}\" after cleaning", original);
    }

    let mut store = CorrectionStore::open_file(path);
    store.remember(canonical.clone(), corrected.clone())?;

    println!(
        "{} Remembered \"{}\" -> \"{}\"",
        style("✓").green(),
        canonical,
        corrected
    );

    Ok(())
}

fn remove_correction(path: &Path, original: &str) -> anyhow::Result<()> {
    let mut store = CorrectionStore::open_file(path);

    if store.forget(original)? {
        println!(
            "{} Removed correction for \"{}\"",
            style("✓").green(),
            original
        );
    } else {
        println!(
            "{} No correction found for \"{}\"",
            style("ℹ").blue(),
            original
        );
    }

    Ok(())
}

fn clear_corrections(path: &Path, force: bool) -> anyhow::Result<()> {
    let mut store = CorrectionStore::open_file(path);

    if store.is_empty() {
        println!("{} No learned corrections.", style("ℹ").blue());
        return Ok(());
    }

    if !force {
        anyhow::bail!(
            "This removes all {} learned corrections. Use --force to confirm.",
            store.len()
        );
    }

    let removed = store.clear()?;
    println!("{} Removed {} corrections", style("✓").green(), removed);

    Ok(())
}
