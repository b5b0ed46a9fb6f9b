use std::io::{self, Write};

use compound_atlas::{Analysis, Clustering, Compound, Feature, compare};

use super::text::truncate;

const INDENT: &str = "      ";

const BOX_INNER_WIDTH: usize = 62;
const SAFE_TABLE_WIDTH: usize = BOX_INNER_WIDTH - INDENT.len();

pub fn print_compound_summary(compounds: &[Compound]) {
    let stderr = io::stderr();
    let mut out = stderr.lock();

    let fingerprinted = compounds.iter().filter(|c| c.has_fingerprint()).count();
    let mut rows = vec![
        ("Compounds", compounds.len().to_string()),
        ("Fingerprinted", format!("{fingerprinted} / {}", compounds.len())),
    ];
    for feature in Feature::ALL {
        let present = compounds
            .iter()
            .filter(|c| c.descriptor(feature).is_some())
            .count();
        rows.push((feature.label(), format!("{present} / {}", compounds.len())));
    }
    if let Some(best) = compare::most_potent(compounds) {
        rows.push(("Most potent", best.id.clone()));
    }

    print_kv_table(&mut out, "Compound Set", &rows);
}

pub fn print_layout_summary(analysis: &Analysis) {
    let stderr = io::stderr();
    let mut out = stderr.lock();

    let mut rows = vec![
        ("Nodes", analysis.nodes.len().to_string()),
        ("Edges", analysis.edges.len().to_string()),
        ("Hulls", analysis.hulls.len().to_string()),
        (
            "Ticks",
            format!(
                "{} ({})",
                analysis.ticks,
                if analysis.settled { "settled" } else { "tick cap" }
            ),
        ),
    ];
    if !analysis.unfingerprinted.is_empty() {
        rows.push((
            "No similarity",
            analysis.unfingerprinted.len().to_string(),
        ));
    }
    if let Some(c) = analysis.clustering.as_ref().filter(|c| !c.excluded.is_empty()) {
        rows.push(("Unclustered", c.excluded.len().to_string()));
    }

    print_kv_table(&mut out, "Similarity Network", &rows);
}

pub fn print_cluster_sizes(clustering: &Clustering) {
    let stderr = io::stderr();
    let mut out = stderr.lock();

    let total: usize = clustering.sizes().iter().sum();
    let data: Vec<(String, usize)> = clustering
        .clusters
        .iter()
        .map(|c| (format!("Cluster {}", c.id), c.members.len()))
        .collect();
    let title = format!("Clusters by {}", clustering.feature.label());

    print_distribution_table(&mut out, &title, &data, total);
}

fn print_distribution_table(
    out: &mut impl Write,
    title: &str,
    data: &[(String, usize)],
    total: usize,
) {
    let name_w = 10usize;
    let count_w = 8usize;
    let dist_w = SAFE_TABLE_WIDTH.saturating_sub(name_w + count_w + 6);
    let bar_w = dist_w.saturating_sub(8).min(20);
    let rule = |l: &str, m: &str, r: &str| {
        format!(
            "{INDENT}{l}{}{m}{}{m}{}{r}",
            "─".repeat(name_w + 2),
            "─".repeat(count_w + 2),
            "─".repeat(dist_w + 2)
        )
    };

    let _ = writeln!(out, "{INDENT}┌─ {} ─┐", truncate(title, SAFE_TABLE_WIDTH - 6));
    let _ = writeln!(out, "{}", rule("┌", "┬", "┐"));
    let _ = writeln!(
        out,
        "{INDENT}│ {:<name_w$} │ {:>count_w$} │ {:<dist_w$} │",
        "Cluster", "Members", "Share"
    );
    let _ = writeln!(out, "{}", rule("├", "┼", "┤"));

    for (name, count) in data {
        let pct = if total == 0 {
            0.0
        } else {
            *count as f64 / total as f64 * 100.0
        };
        let cell = format!("{}  {:>5.1}%", make_bar(pct, bar_w), pct);
        let _ = writeln!(
            out,
            "{INDENT}│ {:<name_w$} │ {:>count_w$} │ {:<dist_w$} │",
            truncate(name, name_w),
            count,
            cell
        );
    }

    let _ = writeln!(out, "{}", rule("└", "┴", "┘"));
}

fn print_kv_table(out: &mut impl Write, title: &str, rows: &[(&str, String)]) {
    let key_w = 16usize;
    let val_w = SAFE_TABLE_WIDTH.saturating_sub(key_w + 6);
    let rule = |l: &str, m: &str, r: &str| {
        format!(
            "{INDENT}{l}{}{m}{}{r}",
            "─".repeat(key_w + 2),
            "─".repeat(val_w + 2)
        )
    };

    let _ = writeln!(out, "{INDENT}┌─ {} ─┐", truncate(title, SAFE_TABLE_WIDTH - 6));
    let _ = writeln!(out, "{}", rule("┌", "┬", "┐"));
    let _ = writeln!(out, "{INDENT}│ {:<key_w$} │ {:>val_w$} │", "Metric", "Value");
    let _ = writeln!(out, "{}", rule("├", "┼", "┤"));
    for (key, val) in rows {
        let _ = writeln!(
            out,
            "{INDENT}│ {:<key_w$} │ {:>val_w$} │",
            truncate(key, key_w),
            truncate(val, val_w)
        );
    }
    let _ = writeln!(out, "{}", rule("└", "┴", "┘"));
}

fn make_bar(pct: f64, width: usize) -> String {
    let filled = ((pct / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}
