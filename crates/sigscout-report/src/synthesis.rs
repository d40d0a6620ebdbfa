//! Synthesis: the enriched analyst prompt, executive summary,
//! cross-reference rules, and the optional text-generation call.

use std::path::Path;
use std::time::Instant;

use sigscout_core::{
    CollectorResult, CrossReference, ExecutiveSummary, LlmSynthesis, Priority, Reliability,
    Signal, SignalStrength, Synthesis,
};

use crate::llm::TextGenClient;

const SYSTEM_PROMPT: &str = "You are a product analyst. Synthesize the \
gathered signals into a concise brief: what is happening, what it means, \
and what to do next. Be specific and cite the signal sources you use.";

const DEFAULT_TEMPLATE: &str = "\
Topic: {topic}
Focus: {focus}

A scouting run gathered {total_signals} signals from {successful_collectors} \
of 3 collectors in {elapsed_ms} ms. Review the strongest signals below and \
synthesize what they mean for this topic.
";

/// How many top signals each successful collector contributes to the prompt.
const PROMPT_SIGNALS_PER_COLLECTOR: usize = 5;

/// Longest signal excerpt included in the prompt, in characters.
const PROMPT_EXCERPT_CHARS: usize = 160;

/// Builds the synthesis section of a report. Failure of the
/// text-generation call never fails a run; the reason lands in `llm_note`.
pub struct Synthesizer {
    template: String,
    llm: Option<TextGenClient>,
}

impl Synthesizer {
    #[must_use]
    pub fn new(llm: Option<TextGenClient>) -> Self {
        Self {
            template: DEFAULT_TEMPLATE.to_string(),
            llm,
        }
    }

    /// Use an external prompt template. An unreadable file logs a warning
    /// and falls back to the built-in template.
    #[must_use]
    pub fn with_template_file(path: &Path, llm: Option<TextGenClient>) -> Self {
        let template = match std::fs::read_to_string(path) {
            Ok(template) => template,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "template unreadable, using built-in");
                DEFAULT_TEMPLATE.to_string()
            }
        };
        Self { template, llm }
    }

    #[cfg(test)]
    fn with_template(template: &str, llm: Option<TextGenClient>) -> Self {
        Self {
            template: template.to_string(),
            llm,
        }
    }

    /// Substitute template placeholders and append the strongest signals
    /// from each successful collector.
    #[must_use]
    pub fn build_prompt(
        &self,
        topic: &str,
        focus: Option<&str>,
        results: [&CollectorResult; 3],
        elapsed_ms: u64,
    ) -> String {
        let total: usize = results.iter().map(|r| r.item_count()).sum();
        let successful = results.iter().filter(|r| r.is_success()).count();

        let mut prompt = self
            .template
            .replace("{topic}", topic)
            .replace("{focus}", focus.unwrap_or("(none)"))
            .replace("{total_signals}", &total.to_string())
            .replace("{successful_collectors}", &successful.to_string())
            .replace("{elapsed_ms}", &elapsed_ms.to_string());

        for result in results {
            if !result.has_data() {
                continue;
            }
            prompt.push_str(&format!("\nTop {} signals:\n", result.collector));
            for signal in result.signals.iter().take(PROMPT_SIGNALS_PER_COLLECTOR) {
                prompt.push_str(&bullet(signal));
                prompt.push('\n');
            }
        }
        prompt
    }

    /// Run the synthesis step over the three settled collector results.
    pub async fn synthesize(
        &self,
        topic: &str,
        focus: Option<&str>,
        results: [&CollectorResult; 3],
        elapsed_ms: u64,
    ) -> Synthesis {
        let prompt = self.build_prompt(topic, focus, results, elapsed_ms);
        let summary = executive_summary(results);
        let [market, docs, metrics] = results;
        let cross = cross_references(market.has_data(), docs.has_data(), metrics.has_data());

        let (llm, llm_note) = match &self.llm {
            None => (None, Some("text generation not configured".to_string())),
            Some(client) => {
                let started = Instant::now();
                match client.generate(SYSTEM_PROMPT, &prompt).await {
                    Ok(generated) => {
                        let elapsed =
                            u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
                        tracing::info!(model = %generated.model, elapsed_ms = elapsed, "text generation complete");
                        (
                            Some(LlmSynthesis {
                                text: generated.text,
                                model: generated.model,
                                prompt_tokens: generated.prompt_tokens,
                                completion_tokens: generated.completion_tokens,
                                elapsed_ms: elapsed,
                            }),
                            None,
                        )
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "text generation failed");
                        (None, Some(format!("text generation failed: {e}")))
                    }
                }
            }
        };

        Synthesis {
            prompt,
            summary,
            cross_references: cross,
            llm,
            llm_note,
        }
    }
}

fn bullet(signal: &Signal) -> String {
    let excerpt: String = signal.content.chars().take(PROMPT_EXCERPT_CHARS).collect();
    let suffix = if signal.content.chars().count() > PROMPT_EXCERPT_CHARS {
        "..."
    } else {
        ""
    };
    match &signal.title {
        Some(title) => format!("- [{}] {title}: {excerpt}{suffix}", signal.source_label),
        None => format!("- [{}] {excerpt}{suffix}", signal.source_label),
    }
}

fn strength(count: usize, strong: usize, medium: usize) -> SignalStrength {
    if count >= strong {
        SignalStrength::Strong
    } else if count >= medium {
        SignalStrength::Medium
    } else {
        SignalStrength::Weak
    }
}

/// Coverage, per-collector strength, and overall reliability.
#[must_use]
pub fn executive_summary(results: [&CollectorResult; 3]) -> ExecutiveSummary {
    let [market, docs, metrics] = results;
    let successful = results.iter().filter(|r| r.is_success()).count();
    let total: usize = results.iter().map(|r| r.item_count()).sum();

    #[allow(clippy::cast_precision_loss)]
    let coverage_percent = successful as f64 / 3.0 * 100.0;

    let reliability = if total >= 30 {
        Reliability::High
    } else if total >= 10 {
        Reliability::Medium
    } else {
        Reliability::Low
    };

    ExecutiveSummary {
        coverage_percent,
        market_strength: strength(market.item_count(), 15, 5),
        docs_strength: strength(docs.item_count(), 10, 3),
        metrics_strength: strength(metrics.item_count(), 12, 4),
        reliability,
    }
}

/// Pure rule table over which collectors produced data.
#[must_use]
pub fn cross_references(
    market_has: bool,
    docs_has: bool,
    metrics_has: bool,
) -> Vec<CrossReference> {
    let mut refs = Vec::new();
    if market_has && docs_has && metrics_has {
        refs.push(CrossReference {
            description: "All three sources produced signals; cross-validate the top findings \
                          against each other before acting"
                .to_string(),
            priority: Priority::High,
        });
    }
    if market_has && docs_has {
        refs.push(CrossReference {
            description: "Compare market coverage against internal research notes for \
                          alignment or contradiction"
                .to_string(),
            priority: Priority::Medium,
        });
    }
    if docs_has && metrics_has {
        refs.push(CrossReference {
            description: "Check whether product metrics corroborate what internal documents \
                          claim"
                .to_string(),
            priority: Priority::Medium,
        });
    }
    if market_has && metrics_has {
        refs.push(CrossReference {
            description: "Correlate market developments with product metric movements over \
                          the same window"
                .to_string(),
            priority: Priority::Medium,
        });
    }
    refs
}
