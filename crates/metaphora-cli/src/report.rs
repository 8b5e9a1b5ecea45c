//! Persistence of batch results: the JSON dump, the text summary, and the
//! input table merged with the verdicts.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::ingest::Record;
use metaphora_adjudicator::{ClassifiedItem, ItemStatus};
use metaphora_core::{truncate_chars, Theory};

pub const RESULTS_FILE: &str = "enhanced_classification_results.json";
pub const SUMMARY_FILE: &str = "enhanced_analysis_summary.txt";
pub const MERGED_FILE: &str = "enhanced_classified_data.csv";

/// Verdict columns appended to every input row of the merged table.
pub const RESULT_COLUMNS: [&str; 12] = [
    "index",
    "title",
    "status",
    "description_length",
    "primary_class",
    "confidence",
    "secondary_class",
    "is_hybrid",
    "meta_metaphor_detected",
    "scores",
    "evidence",
    "error",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedResults {
    pub results: PathBuf,
    pub summary: PathBuf,
    /// Absent when the inputs and results do not line up row for row.
    pub merged: Option<PathBuf>,
}

const EVIDENCE_IN_SUMMARY: usize = 5;
const SPAN_CHARS: usize = 100;
const REASONING_CHARS: usize = 150;

/// `enhanced_analysis_results_<YYYYMMDD_HHMMSS>` for the given instant.
pub fn default_output_dir(now: DateTime<Local>) -> PathBuf {
    PathBuf::from(format!(
        "enhanced_analysis_results_{}",
        now.format("%Y%m%d_%H%M%S")
    ))
}

/// Write the result files into `dir`, creating it if needed.
pub fn save_results(
    dir: &Path,
    records: &[Record],
    items: &[ClassifiedItem],
    model: &str,
    now: DateTime<Local>,
) -> Result<SavedResults> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    let results_path = dir.join(RESULTS_FILE);
    fs::write(&results_path, serde_json::to_string_pretty(items)?)
        .with_context(|| format!("writing {}", results_path.display()))?;

    let summary_path = dir.join(SUMMARY_FILE);
    fs::write(&summary_path, render_summary(items, model, now))
        .with_context(|| format!("writing {}", summary_path.display()))?;

    let merged = if records.len() == items.len() {
        let path = dir.join(MERGED_FILE);
        write_merged(&path, records, items)?;
        Some(path)
    } else {
        warn!(
            records = records.len(),
            results = items.len(),
            "row counts differ, skipping {}",
            MERGED_FILE
        );
        None
    };

    info!(dir = %dir.display(), items = items.len(), "results saved");
    Ok(SavedResults {
        results: results_path,
        summary: summary_path,
        merged,
    })
}

/// Header and rows of the merged table: input columns in first-seen order,
/// then [`RESULT_COLUMNS`]. An input column sharing a result column's name
/// is replaced by the result.
pub fn merged_table(records: &[Record], items: &[ClassifiedItem]) -> Result<Vec<Vec<String>>> {
    let mut input_columns: Vec<&str> = Vec::new();
    for record in records {
        for (name, _) in &record.columns {
            if !RESULT_COLUMNS.contains(&name.as_str()) && !input_columns.contains(&name.as_str()) {
                input_columns.push(name);
            }
        }
    }

    let mut table = Vec::with_capacity(items.len() + 1);
    table.push(
        input_columns
            .iter()
            .chain(RESULT_COLUMNS.iter())
            .map(|c| c.to_string())
            .collect(),
    );

    for (record, item) in records.iter().zip(items) {
        let mut row: Vec<String> = input_columns
            .iter()
            .map(|name| {
                record
                    .columns
                    .iter()
                    .find(|(k, _)| k == name)
                    .map(|(_, v)| v.clone())
                    .unwrap_or_default()
            })
            .collect();
        row.extend(result_cells(item)?);
        table.push(row);
    }
    Ok(table)
}

fn result_cells(item: &ClassifiedItem) -> Result<Vec<String>> {
    let c = &item.classification;
    let scores = if c.scores.is_empty() {
        String::new()
    } else {
        serde_json::to_string(&c.scores)?
    };
    let evidence = if c.evidence.is_empty() {
        String::new()
    } else {
        serde_json::to_string(&c.evidence)?
    };
    Ok(vec![
        item.index.to_string(),
        item.title.clone(),
        item.status.as_str().to_string(),
        item.description_length.to_string(),
        c.primary_class.to_string(),
        c.confidence.map(|x| x.as_str().to_string()).unwrap_or_default(),
        c.secondary_class.map(|t| t.to_string()).unwrap_or_default(),
        c.is_hybrid.to_string(),
        c.meta_metaphor_detected().to_string(),
        scores,
        evidence,
        item.error.clone().unwrap_or_default(),
    ])
}

fn write_merged(path: &Path, records: &[Record], items: &[ClassifiedItem]) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    for row in merged_table(records, items)? {
        writer.write_record(&row)?;
    }
    writer
        .flush()
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Primary-class counts, most common first; ties keep first-seen order.
pub fn class_distribution<'a, I>(items: I) -> Vec<(Theory, usize)>
where
    I: IntoIterator<Item = &'a ClassifiedItem>,
{
    let mut counts: Vec<(Theory, usize)> = Vec::new();
    for item in items {
        let class = item.primary_class();
        match counts.iter_mut().find(|(t, _)| *t == class) {
            Some((_, n)) => *n += 1,
            None => counts.push((class, 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

pub fn render_summary(items: &[ClassifiedItem], model: &str, now: DateTime<Local>) -> String {
    let successful: Vec<&ClassifiedItem> = items.iter().filter(|i| i.is_success()).collect();
    let errors = items.iter().filter(|i| i.status == ItemStatus::Error).count();
    let skipped = items.iter().filter(|i| i.status == ItemStatus::Skipped).count();
    let meta_count = successful
        .iter()
        .filter(|i| i.classification.meta_metaphor_detected())
        .count();

    let rule = "=".repeat(70);
    let thin = "-".repeat(70);
    let mut out = String::new();

    out.push_str("ENHANCED CONSCIOUSNESS THEORY CLASSIFICATION ANALYSIS\n");
    out.push_str("WITH MULTI-LEVEL METAPHOR ANALYSIS\n");
    let _ = writeln!(out, "{rule}\n");
    let _ = writeln!(out, "Analysis Date: {}", now.format("%Y-%m-%d %H:%M:%S"));
    let _ = writeln!(out, "Total Items Processed: {}", items.len());
    let _ = writeln!(out, "Model Used: {model}\n");

    let _ = writeln!(
        out,
        "Successful Classifications: {} (skipped items not counted)",
        successful.len()
    );
    let _ = writeln!(out, "Errors: {errors}");
    let _ = writeln!(out, "Skipped: {skipped}");
    let _ = writeln!(
        out,
        "Meta-Metaphors Detected: {} ({:.1}%)\n",
        meta_count,
        percent(meta_count, successful.len())
    );

    out.push_str("CLASS DISTRIBUTION:\n");
    let _ = writeln!(out, "{}", "-".repeat(30));
    for (class, count) in class_distribution(successful.iter().copied()) {
        let _ = writeln!(
            out,
            "{}: {} ({:.1}%)",
            class,
            count,
            percent(count, successful.len())
        );
    }
    out.push('\n');

    out.push_str("DETAILED RESULTS WITH METAPHOR ANALYSIS:\n");
    let _ = writeln!(out, "{thin}");
    for item in &successful {
        write_item(&mut out, item);
        let _ = writeln!(out, "{thin}");
    }

    out
}

fn write_item(out: &mut String, item: &ClassifiedItem) {
    let c = &item.classification;
    let _ = writeln!(out, "\nTitle: {}", item.title);
    let _ = writeln!(out, "Primary Class: {}", c.primary_class);
    let _ = writeln!(
        out,
        "Confidence: {}",
        c.confidence.map(|c| c.as_str()).unwrap_or("N/A")
    );

    if c.is_hybrid {
        let secondary = c
            .secondary_class
            .map(|t| t.to_string())
            .unwrap_or_else(|| "N/A".to_string());
        let _ = writeln!(out, "Secondary Class: {secondary}");
        out.push_str("⚠️  HYBRID THEORY DETECTED\n");
    }

    if let Some(analysis) = c.metaphor_analysis.as_ref().filter(|m| m.meta_metaphor_detected) {
        out.push_str("\n🎨 META-METAPHOR DETECTED!\n");
        let _ = writeln!(
            out,
            "   Semantic Field: {}",
            analysis.dominant_semantic_field.as_deref().unwrap_or("N/A")
        );
        let _ = writeln!(
            out,
            "   Transformation: {}",
            analysis.artistic_transformation.as_deref().unwrap_or("N/A")
        );
    }

    if !c.evidence.is_empty() {
        out.push_str("\nEvidence:\n");
        for e in c.evidence.iter().take(EVIDENCE_IN_SUMMARY) {
            let _ = writeln!(out, "  - Class: {}", e.class.as_deref().unwrap_or("N/A"));
            let _ = writeln!(out, "    Level: {}", e.metaphor_level.as_deref().unwrap_or("N/A"));
            let _ = writeln!(out, "    Type: {}", e.metaphor_type.as_deref().unwrap_or("N/A"));
            let _ = writeln!(out, "    Weight: {:.2}", e.weight.unwrap_or(0.0));
            let _ = writeln!(
                out,
                "    Span: {}...",
                truncate_chars(e.span.as_deref().unwrap_or("N/A"), SPAN_CHARS)
            );
            let _ = writeln!(
                out,
                "    Reasoning: {}...",
                truncate_chars(e.reasoning.as_deref().unwrap_or("N/A"), REASONING_CHARS)
            );
            out.push('\n');
        }
    }
}
