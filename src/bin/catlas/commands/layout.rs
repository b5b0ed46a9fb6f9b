use std::io::Write;

use anyhow::{Context, Result};

use compound_atlas::io::{read_neighbor_map, write_analysis};
use compound_atlas::{AnalysisConfig, NeighborMap, analyze};

use super::{check_streams, load_compounds};
use crate::cli::LayoutArgs;
use crate::config::build_analysis_config;
use crate::display::{
    Context as DisplayContext, Progress, print_cluster_sizes, print_compound_summary,
    print_layout_summary,
};
use crate::io::{create_output, open_file, target_name};

const TOTAL_STEPS: u8 = 3;

pub fn run_layout(args: LayoutArgs, ctx: DisplayContext) -> Result<()> {
    check_streams(&args.io, "layout")?;
    let config = build_analysis_config(&args)?;

    let mut progress = Progress::new(ctx.interactive, TOTAL_STEPS);

    progress.begin("Reading input");
    let compounds = load_compounds(&args.io)?;
    let neighbors = read_neighbors(&args)?;
    let mut read_details = vec![format!("Parse {} compound records", compounds.len())];
    if let Some(map) = &neighbors {
        read_details.push(format!("Load {} precomputed neighbor lists", map.len()));
    }
    progress.done(read_details);

    if ctx.interactive {
        print_compound_summary(&compounds);
    }

    progress.begin("Running analysis");
    let analysis = analyze(&compounds, neighbors.as_ref(), &config).context("Analysis failed")?;
    progress.done(analysis_details(&config, neighbors.is_some()));

    if ctx.interactive {
        print_layout_summary(&analysis);
        if let Some(clustering) = &analysis.clustering {
            print_cluster_sizes(clustering);
        }
    }

    progress.begin("Writing output");
    let mut writer = create_output(args.io.output.as_deref())?;
    write_analysis(&mut writer, &analysis).context("Failed to write analysis")?;
    writer.flush().context("Failed to flush output")?;
    progress.done([format!(
        "Write JSON → {}",
        target_name(args.io.output.as_deref())
    )]);

    progress.finish();

    Ok(())
}

fn read_neighbors(args: &LayoutArgs) -> Result<Option<NeighborMap>> {
    let Some(path) = &args.similarity.similarities else {
        return Ok(None);
    };
    let map = read_neighbor_map(open_file(path, "neighbor map")?)
        .with_context(|| format!("Failed to read neighbor map: {}", path.display()))?;
    Ok(Some(map))
}

fn analysis_details(config: &AnalysisConfig, precomputed: bool) -> Vec<String> {
    let mut steps = Vec::new();

    steps.push(if precomputed {
        "Index precomputed neighbor lists".to_string()
    } else {
        "Compute Tanimoto similarities".to_string()
    });
    steps.push(format!(
        "Build similarity graph (threshold {:.2})",
        config.similarity.threshold
    ));
    match &config.clustering {
        Some(c) => steps.push(format!("Cluster on {} (k = {})", c.feature.label(), c.k)),
        None => steps.push("Skip clustering".to_string()),
    }
    steps.push(format!(
        "Simulate layout ({} × {} px)",
        config.layout.width, config.layout.height
    ));
    if config.layout.params.is_some() {
        steps.push("Apply custom force parameters".to_string());
    }
    if config.clustering.is_some() {
        steps.push("Trace cluster hulls".to_string());
    }

    steps
}
