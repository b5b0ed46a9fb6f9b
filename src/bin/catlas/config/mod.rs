use std::fs;

use anyhow::{Context, Result};

use compound_atlas::{AnalysisConfig, ClusterConfig, LayoutConfig, SimilarityConfig};

use crate::cli::{ClusterOptions, GraphOptions, LayoutArgs, LayoutOptions, SimilarityOptions};

pub fn build_analysis_config(args: &LayoutArgs) -> Result<AnalysisConfig> {
    Ok(AnalysisConfig {
        similarity: build_similarity_config(&args.similarity, &args.graph),
        clustering: build_cluster_config(&args.cluster)?,
        layout: build_layout_config(&args.layout)?,
    })
}

fn build_similarity_config(opts: &SimilarityOptions, graph: &GraphOptions) -> SimilarityConfig {
    SimilarityConfig {
        threshold: graph.threshold,
        reconcile: opts.reconcile.into(),
    }
}

fn build_cluster_config(opts: &ClusterOptions) -> Result<Option<ClusterConfig>> {
    if opts.no_clusters {
        return Ok(None);
    }
    let config = ClusterConfig {
        max_iterations: opts.max_iterations,
        ..ClusterConfig::new(&opts.feature, opts.k)?
    };
    Ok(Some(config))
}

fn build_layout_config(opts: &LayoutOptions) -> Result<LayoutConfig> {
    let params = opts
        .params
        .as_ref()
        .map(|path| {
            fs::read_to_string(path)
                .with_context(|| format!("Failed to read force parameters: {}", path.display()))
        })
        .transpose()?;

    Ok(LayoutConfig {
        width: opts.width,
        height: opts.height,
        max_ticks: opts.ticks,
        params,
        ..Default::default()
    })
}
