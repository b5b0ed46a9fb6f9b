use std::io::Write;

use anyhow::{Context, Result};

use compound_atlas::SimilarityIndex;
use compound_atlas::io::write_neighbor_map;

use super::{check_streams, load_compounds};
use crate::cli::SimilarityArgs;
use crate::display::{Context as DisplayContext, Progress, print_compound_summary};
use crate::io::{create_output, target_name};

const TOTAL_STEPS: u8 = 3;

pub fn run_similarity(args: SimilarityArgs, ctx: DisplayContext) -> Result<()> {
    check_streams(&args.io, "similarity")?;

    let mut progress = Progress::new(ctx.interactive, TOTAL_STEPS);

    progress.begin("Reading compounds");
    let compounds = load_compounds(&args.io)?;
    progress.done([format!("Parse {} records", compounds.len())]);

    if ctx.interactive {
        print_compound_summary(&compounds);
    }

    progress.begin("Computing Tanimoto similarities");
    let index =
        SimilarityIndex::from_fingerprints(&compounds).context("Similarity computation failed")?;
    let n = index.len();
    let pairs = n * n.saturating_sub(1) / 2;
    let mut details = vec![format!("{pairs} pairs over {n} fingerprints")];
    if !index.excluded().is_empty() {
        details.push(format!("Skip {} without fingerprint", index.excluded().len()));
    }
    progress.done(details);

    progress.begin("Writing neighbor map");
    let mut writer = create_output(args.io.output.as_deref())?;
    write_neighbor_map(&mut writer, &index.to_neighbor_map())
        .context("Failed to write neighbor map")?;
    writer.flush().context("Failed to flush output")?;
    progress.done([format!(
        "Write JSON → {}",
        target_name(args.io.output.as_deref())
    )]);

    progress.finish();

    Ok(())
}
