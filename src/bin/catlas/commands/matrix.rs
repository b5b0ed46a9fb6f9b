use std::io::Write;

use anyhow::{Context, Result};

use compound_atlas::io::{read_neighbor_map, read_order, write_matrix};
use compound_atlas::{Compound, SimilarityIndex};

use super::{check_streams, load_compounds};
use crate::cli::MatrixArgs;
use crate::display::{Context as DisplayContext, Progress};
use crate::io::{create_output, open_file, target_name};

const TOTAL_STEPS: u8 = 3;

pub fn run_matrix(args: MatrixArgs, ctx: DisplayContext) -> Result<()> {
    check_streams(&args.io, "matrix")?;

    let mut progress = Progress::new(ctx.interactive, TOTAL_STEPS);

    progress.begin("Reading input");
    let compounds = load_compounds(&args.io)?;
    let order = resolve_order(&args, &compounds)?;
    progress.done([
        format!("Parse {} compound records", compounds.len()),
        format!("Order {} rows", order.len()),
    ]);

    progress.begin("Building similarity index");
    let index = build_index(&args, &compounds)?;
    progress.done([format!(
        "{} compounds indexed, {} excluded",
        index.len(),
        index.excluded().len()
    )]);

    progress.begin("Writing matrix");
    let matrix = index
        .matrix(&order, args.similarity.reconcile.into())
        .context("Failed to align similarity matrix")?;
    let mut writer = create_output(args.io.output.as_deref())?;
    write_matrix(&mut writer, &matrix).context("Failed to write matrix")?;
    writer.flush().context("Failed to flush output")?;
    progress.done([format!(
        "Write {n} × {n} JSON → {}",
        target_name(args.io.output.as_deref()),
        n = matrix.len()
    )]);

    progress.finish();

    Ok(())
}

fn resolve_order(args: &MatrixArgs, compounds: &[Compound]) -> Result<Vec<String>> {
    match &args.order {
        Some(path) => read_order(open_file(path, "ordering")?)
            .with_context(|| format!("Failed to read ordering: {}", path.display())),
        None => Ok(compounds.iter().map(|c| c.id.clone()).collect()),
    }
}

fn build_index(args: &MatrixArgs, compounds: &[Compound]) -> Result<SimilarityIndex> {
    let index = match &args.similarity.similarities {
        Some(path) => {
            let map = read_neighbor_map(open_file(path, "neighbor map")?)
                .with_context(|| format!("Failed to read neighbor map: {}", path.display()))?;
            SimilarityIndex::from_neighbor_map(compounds, &map)
        }
        None => SimilarityIndex::from_fingerprints(compounds),
    };
    index.context("Similarity indexing failed")
}
