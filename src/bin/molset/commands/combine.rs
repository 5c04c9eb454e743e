use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use molset::{CanonicalSet, KeyError, PropertyKey, SetConfig, SetError};

use crate::cli::{CombineArgs, SetOp};
use crate::config::Settings;
use crate::display::{Context as DisplayContext, Progress, SetSummary, print_summary};
use crate::io::{read_molecules, resolve_path, write_molecules};

const TOTAL_STEPS: u8 = 3;

pub fn run_combine(args: CombineArgs, ctx: DisplayContext) -> Result<()> {
    let settings = Settings::load(args.common.config.as_deref(), &args.key, None)?;
    let left_path = resolve_path(&args.left, settings.data_dir.as_ref())?;
    let right_path = resolve_path(&args.right, settings.data_dir.as_ref())?;

    let mut progress = Progress::new(ctx.interactive, TOTAL_STEPS);

    progress.step("Reading libraries");
    let left = load_library(&left_path, &settings.key, settings.set)?;
    let right = load_library(&right_path, &settings.key, settings.set)?;
    progress.complete_step(
        "Reading libraries",
        &[
            format!("{}: {} unique", left_path.display(), left.len()),
            format!("{}: {} unique", right_path.display(), right.len()),
        ],
    );

    progress.step("Combining");
    let combined = combine(&left, &right, args.op)
        .with_context(|| format!("Failed to compute the {} of both libraries", args.op.label()))?;
    info!(
        op = args.op.label(),
        left = left.len(),
        right = right.len(),
        result = combined.len(),
        "combined libraries"
    );
    progress.complete_step(
        "Combining",
        &[format!("{} of both libraries", args.op.label())],
    );

    progress.step("Writing output");
    let written = write_molecules(args.output.as_deref(), combined.iter().map(|m| &**m))?;
    progress.complete_step("Writing output", &[format!("{written} records")]);

    progress.finish("Combine complete");

    if ctx.interactive {
        print_summary(&SetSummary {
            title: "Combination Summary",
            rows: vec![
                ("Left library", left.len().to_string()),
                ("Right library", right.len().to_string()),
                ("Operation", args.op.label().to_string()),
                ("Result", combined.len().to_string()),
            ],
            keys: combined.iter_keys().collect(),
        });
    }

    Ok(())
}

fn load_library(
    path: &Path,
    key: &PropertyKey,
    config: SetConfig,
) -> Result<CanonicalSet<PropertyKey>> {
    let molecules = read_molecules(Some(path))?;
    CanonicalSet::from_records(key.clone(), config, molecules)
        .with_context(|| format!("Failed to build library from {}", path.display()))
}

fn combine(
    left: &CanonicalSet<PropertyKey>,
    right: &CanonicalSet<PropertyKey>,
    op: SetOp,
) -> Result<CanonicalSet<PropertyKey>, SetError<KeyError>> {
    match op {
        SetOp::Union => Ok(left + right),
        SetOp::Intersection => left & right,
        SetOp::Difference => left - right,
    }
}
