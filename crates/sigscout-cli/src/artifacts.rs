//! Report artifacts: per-collector JSON, the combined report, and a
//! rendered markdown summary.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use sigscout_core::{CollectorResult, OrchestrationReport};

/// Write all artifacts for one run into `out_dir`, creating it if needed.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or a file cannot
/// be written.
pub fn write_artifacts(report: &OrchestrationReport, out_dir: &Path) -> anyhow::Result<()> {
    fs::create_dir_all(out_dir)?;

    write_json(out_dir, "market.json", &report.market)?;
    write_json(out_dir, "docs.json", &report.docs)?;
    write_json(out_dir, "metrics.json", &report.metrics)?;
    write_json(out_dir, "report.json", report)?;
    fs::write(out_dir.join("summary.md"), render_markdown(report))?;

    tracing::info!(dir = %out_dir.display(), "artifacts written");
    Ok(())
}

fn write_json<T: serde::Serialize>(out_dir: &Path, name: &str, value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(out_dir.join(name), json)?;
    Ok(())
}

/// How many top signals each collector section shows in the summary.
const SUMMARY_SIGNALS_PER_COLLECTOR: usize = 5;

#[must_use]
pub fn render_markdown(report: &OrchestrationReport) -> String {
    let mut md = String::new();

    let _ = writeln!(md, "# Signal scouting report: {}", report.topic);
    if let Some(focus) = &report.focus {
        let _ = writeln!(md, "\nFocus: {focus}");
    }
    let _ = writeln!(
        md,
        "\nRun `{}` generated at {} in {} ms.",
        report.run_id,
        report.generated_at.to_rfc3339(),
        report.execution_time_ms
    );
    let _ = writeln!(
        md,
        "{} of 3 collectors succeeded with {} total signals.",
        report.successful_collector_count, report.total_signal_count
    );

    let summary = &report.synthesis.summary;
    let _ = writeln!(md, "\n## Executive summary\n");
    let _ = writeln!(md, "- Coverage: {:.0}%", summary.coverage_percent);
    let _ = writeln!(md, "- Market strength: {:?}", summary.market_strength);
    let _ = writeln!(md, "- Docs strength: {:?}", summary.docs_strength);
    let _ = writeln!(md, "- Metrics strength: {:?}", summary.metrics_strength);
    let _ = writeln!(md, "- Reliability: {:?}", summary.reliability);

    for result in report.results() {
        render_collector(&mut md, result);
    }

    if !report.synthesis.cross_references.is_empty() {
        let _ = writeln!(md, "\n## Cross-references\n");
        for xref in &report.synthesis.cross_references {
            let _ = writeln!(md, "- ({:?}) {}", xref.priority, xref.description);
        }
    }

    let _ = writeln!(md, "\n## Synthesis\n");
    match (&report.synthesis.llm, &report.synthesis.llm_note) {
        (Some(llm), _) => {
            let _ = writeln!(md, "{}\n", llm.text);
            let _ = writeln!(md, "_Generated by {} in {} ms._", llm.model, llm.elapsed_ms);
        }
        (None, Some(note)) => {
            let _ = writeln!(md, "_{note}. The enriched prompt is in `report.json`._");
        }
        (None, None) => {}
    }

    md
}

fn render_collector(md: &mut String, result: &CollectorResult) {
    let _ = writeln!(md, "\n## {} collector\n", result.collector);
    if result.is_success() {
        let _ = writeln!(
            md,
            "Success: {} signals in {} ms.",
            result.signals.len(),
            result.execution_time_ms
        );
        if let Some(note) = &result.note {
            let _ = writeln!(md, "\nNote: {note}");
        }
        if !result.signals.is_empty() {
            let _ = writeln!(md);
            for signal in result.signals.iter().take(SUMMARY_SIGNALS_PER_COLLECTOR) {
                let title = signal.title.as_deref().unwrap_or(&signal.source_label);
                let _ = writeln!(
                    md,
                    "- **{title}** ({}, score {:.2}): {}",
                    signal.source_label, signal.combined_score, signal.content
                );
            }
        }
    } else {
        let _ = writeln!(
            md,
            "Failed after {} ms: {}",
            result.execution_time_ms,
            result.error.as_deref().unwrap_or("unknown error")
        );
    }
}
