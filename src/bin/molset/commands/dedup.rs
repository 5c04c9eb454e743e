use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use tracing::{debug, info};

use molset::{CanonicalSet, CopyOptions, Molecule, PropertyKey, copy_properties};

use crate::cli::DedupArgs;
use crate::config::Settings;
use crate::display::{Context as DisplayContext, Progress, SetSummary, print_summary};
use crate::io::{read_molecules, resolve_path, stdin_is_tty, write_molecules};

const TOTAL_STEPS: u8 = 3;

#[derive(Debug, Default, PartialEq, Eq)]
struct DedupStats {
    read: usize,
    duplicates: usize,
    merged: usize,
}

pub fn run_dedup(args: DedupArgs, ctx: DisplayContext) -> Result<()> {
    if args.input.is_empty() && stdin_is_tty() {
        bail!(
            "No input file specified and stdin is a terminal.\n\nUsage: molset dedup -i <INPUT> or pipe SDF data via stdin."
        );
    }

    let settings = Settings::load(args.common.config.as_deref(), &args.key, Some(&args.merge))?;
    let inputs = args
        .input
        .iter()
        .map(|arg| resolve_path(arg, settings.data_dir.as_ref()).map(Some))
        .collect::<Result<Vec<Option<PathBuf>>>>()?;
    let inputs = if inputs.is_empty() { vec![None] } else { inputs };

    let mut progress = Progress::new(ctx.interactive, TOTAL_STEPS);

    progress.step("Reading molecules");
    let mut batches = Vec::with_capacity(inputs.len());
    for path in &inputs {
        batches.push(read_molecules(path.as_deref())?);
    }
    let read_details = inputs
        .iter()
        .zip(&batches)
        .map(|(path, batch)| {
            let label = path
                .as_deref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<stdin>".to_string());
            format!("{label}: {} records", batch.len())
        })
        .collect::<Vec<_>>();
    progress.complete_step("Reading molecules", &read_details);

    progress.step("Removing duplicates");
    let mut set = CanonicalSet::with_config(settings.key.clone(), settings.set);
    let stats = deduplicate(&mut set, batches.into_iter().flatten(), settings.merge.as_ref())?;
    info!(
        read = stats.read,
        unique = set.len(),
        duplicates = stats.duplicates,
        "deduplicated molecules"
    );
    let mut dedup_details = vec![format!(
        "Keyed on '{}'",
        settings.key.property_for(settings.set.preserve_chirality)
    )];
    if settings.merge.is_some() {
        dedup_details.push(format!("Merged data items from {} duplicates", stats.merged));
    }
    progress.complete_step("Removing duplicates", &dedup_details);

    progress.step("Writing output");
    let written = write_molecules(args.output.as_deref(), set.iter().map(|m| &**m))?;
    progress.complete_step("Writing output", &[format!("{written} records")]);

    progress.finish("Dedup complete");

    if ctx.interactive {
        print_summary(&SetSummary {
            title: "Deduplication Summary",
            rows: vec![
                ("Records read", stats.read.to_string()),
                ("Unique molecules", set.len().to_string()),
                ("Duplicates removed", stats.duplicates.to_string()),
            ],
            keys: set.iter_keys().collect(),
        });
    }

    Ok(())
}

/// Adds `molecules` to `set`, keeping the first record seen for each key.
///
/// With `merge`, the data items of every later duplicate are copied onto the
/// kept record, which stays at its original position.
fn deduplicate<I>(
    set: &mut CanonicalSet<PropertyKey>,
    molecules: I,
    merge: Option<&CopyOptions>,
) -> Result<DedupStats>
where
    I: IntoIterator<Item = Molecule>,
{
    let mut stats = DedupStats::default();

    for molecule in molecules {
        stats.read += 1;
        let molecule = Arc::new(molecule);
        let (key, added) = set
            .add_keyed(Arc::clone(&molecule))
            .with_context(|| format!("Failed to key record {}", stats.read))?;
        if added {
            continue;
        }
        let Some(kept) = set.get(&key) else {
            continue;
        };

        stats.duplicates += 1;
        debug!(%key, duplicate = molecule.display_name(), "dropping duplicate");
        if let Some(options) = merge {
            let mut merged = Molecule::clone(kept);
            copy_properties(&molecule, &mut merged, options);
            set.add_replacing(merged)?;
            stats.merged += 1;
        }
    }

    Ok(stats)
}
