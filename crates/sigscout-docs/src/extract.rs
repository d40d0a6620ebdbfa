//! Per-format plain-text extraction.

use std::sync::LazyLock;

use regex::Regex;

/// Supported document formats, derived from file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Markdown,
    PlainText,
    /// Caption/transcript formats (`.vtt`, `.srt`).
    Transcript,
    Json,
    Csv,
}

impl DocumentFormat {
    /// Map a (lowercased) file extension to a format.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "md" | "markdown" => Some(Self::Markdown),
            "txt" => Some(Self::PlainText),
            "vtt" | "srt" => Some(Self::Transcript),
            "json" => Some(Self::Json),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Markdown => "markdown",
            Self::PlainText => "text",
            Self::Transcript => "transcript",
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }
}

/// Plain searchable text extracted from one document, plus structure
/// captured along the way.
#[derive(Debug, Clone, Default)]
pub struct ExtractedDoc {
    pub text: String,
    pub headings: Vec<String>,
    pub speakers: Vec<String>,
}

static MD_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]*)\]\([^)]*\)").expect("static pattern"));
// "00:01:23.456 --> 00:01:25.000" cue lines and inline "[00:01:23]" stamps.
static CUE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[\d:.,]+\s*-->\s*[\d:.,]+").expect("static pattern"));
static INLINE_STAMP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\[(]\d{1,2}:\d{2}(:\d{2})?([.,]\d{1,3})?[\])]").expect("static pattern"));
static SPEAKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Z][A-Za-z .'\-]{0,40}):\s*(.*)$").expect("static pattern"));

/// Extract searchable plain text from raw file content.
#[must_use]
pub fn extract(format: DocumentFormat, raw: &str) -> ExtractedDoc {
    match format {
        DocumentFormat::Markdown => extract_markdown(raw),
        DocumentFormat::PlainText => ExtractedDoc {
            text: raw.trim().to_string(),
            ..ExtractedDoc::default()
        },
        DocumentFormat::Transcript => extract_transcript(raw),
        DocumentFormat::Json => extract_json(raw),
        DocumentFormat::Csv => extract_csv(raw),
    }
}

fn extract_markdown(raw: &str) -> ExtractedDoc {
    let mut headings = Vec::new();
    let mut lines = Vec::new();

    for line in raw.lines() {
        let trimmed = line.trim();
        if let Some(rest) = trimmed.strip_prefix('#') {
            let heading = rest.trim_start_matches('#').trim();
            if !heading.is_empty() {
                headings.push(heading.to_string());
                lines.push(heading.to_string());
            }
            continue;
        }
        let without_links = MD_LINK.replace_all(trimmed, "$1");
        let cleaned: String = without_links
            .chars()
            .filter(|&c| c != '*' && c != '`' && c != '>')
            .collect();
        let cleaned = cleaned.trim();
        if !cleaned.is_empty() {
            lines.push(cleaned.to_string());
        }
    }

    ExtractedDoc {
        text: lines.join("\n"),
        headings,
        speakers: Vec::new(),
    }
}

fn extract_transcript(raw: &str) -> ExtractedDoc {
    let mut speakers: Vec<String> = Vec::new();
    let mut lines = Vec::new();

    for line in raw.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty()
            || trimmed.eq_ignore_ascii_case("webvtt")
            || trimmed.chars().all(|c| c.is_ascii_digit())
            || CUE_LINE.is_match(trimmed)
        {
            continue;
        }
        let destamped = INLINE_STAMP.replace_all(trimmed, "");
        let destamped = destamped.trim();
        if destamped.is_empty() {
            continue;
        }
        if let Some(caps) = SPEAKER.captures(destamped) {
            let speaker = caps[1].trim().to_string();
            if !speakers.contains(&speaker) {
                speakers.push(speaker);
            }
            let rest = caps[2].trim();
            if !rest.is_empty() {
                lines.push(rest.to_string());
            }
        } else {
            lines.push(destamped.to_string());
        }
    }

    ExtractedDoc {
        text: lines.join("\n"),
        headings: Vec::new(),
        speakers,
    }
}

fn extract_json(raw: &str) -> ExtractedDoc {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(raw) else {
        // Unparseable JSON is still searchable as raw text.
        return ExtractedDoc {
            text: raw.trim().to_string(),
            ..ExtractedDoc::default()
        };
    };
    let mut parts = Vec::new();
    flatten_json(&value, &mut parts);
    ExtractedDoc {
        text: parts.join(" "),
        headings: Vec::new(),
        speakers: Vec::new(),
    }
}

fn flatten_json(value: &serde_json::Value, out: &mut Vec<String>) {
    match value {
        serde_json::Value::String(s) => out.push(s.clone()),
        serde_json::Value::Number(n) => out.push(n.to_string()),
        serde_json::Value::Bool(b) => out.push(b.to_string()),
        serde_json::Value::Array(items) => {
            for item in items {
                flatten_json(item, out);
            }
        }
        serde_json::Value::Object(map) => {
            for (key, item) in map {
                out.push(key.clone());
                flatten_json(item, out);
            }
        }
        serde_json::Value::Null => {}
    }
}

fn extract_csv(raw: &str) -> ExtractedDoc {
    let rows: Vec<String> = raw
        .lines()
        .map(|line| {
            line.split(',')
                .map(|cell| cell.trim().trim_matches('"'))
                .filter(|cell| !cell.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|row| !row.is_empty())
        .collect();
    ExtractedDoc {
        text: rows.join("\n"),
        headings: Vec::new(),
        speakers: Vec::new(),
    }
}

/// Split extracted text into sentences. Terminators are `.`, `!`, `?`,
/// and line breaks; the terminator stays attached to its sentence.
#[must_use]
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    for ch in text.chars() {
        match ch {
            '.' | '!' | '?' => {
                current.push(ch);
                push_sentence(&mut sentences, &mut current);
            }
            '\n' => push_sentence(&mut sentences, &mut current),
            _ => current.push(ch),
        }
    }
    push_sentence(&mut sentences, &mut current);
    sentences
}

fn push_sentence(sentences: &mut Vec<String>, current: &mut String) {
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed.to_string());
    }
    current.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_from_extension() {
        assert_eq!(DocumentFormat::from_extension("md"), Some(DocumentFormat::Markdown));
        assert_eq!(DocumentFormat::from_extension("vtt"), Some(DocumentFormat::Transcript));
        assert_eq!(DocumentFormat::from_extension("exe"), None);
    }

    #[test]
    fn markdown_extracts_headings_and_strips_syntax() {
        let raw = "# Research Notes\n\nUsers **loved** the `new` [checkout](https://x.y) page.\n## Details\n* bullet one";
        let doc = extract(DocumentFormat::Markdown, raw);
        assert_eq!(doc.headings, vec!["Research Notes", "Details"]);
        assert!(doc.text.contains("Users loved the new checkout page."));
        assert!(!doc.text.contains("**"));
        assert!(!doc.text.contains("https://x.y"));
    }

    #[test]
    fn transcript_strips_cues_and_collects_speakers() {
        let raw = "WEBVTT\n\n1\n00:00:01.000 --> 00:00:04.000\nAlice: The checkout flow confused me at first.\n2\n00:00:05.000 --> 00:00:08.000\nBob: Same here [00:05], especially the payment step.";
        let doc = extract(DocumentFormat::Transcript, raw);
        assert_eq!(doc.speakers, vec!["Alice", "Bob"]);
        assert!(doc.text.contains("The checkout flow confused me at first."));
        assert!(!doc.text.contains("-->"));
        assert!(!doc.text.contains("[00:05]"));
    }

    #[test]
    fn json_flattens_keys_and_values() {
        let raw = r#"{"survey": {"responses": ["great checkout", "slow search"], "count": 2}}"#;
        let doc = extract(DocumentFormat::Json, raw);
        assert!(doc.text.contains("survey"));
        assert!(doc.text.contains("great checkout"));
        assert!(doc.text.contains('2'));
    }

    #[test]
    fn invalid_json_falls_back_to_raw_text() {
        let raw = "{not valid json but mentions checkout";
        let doc = extract(DocumentFormat::Json, raw);
        assert!(doc.text.contains("checkout"));
    }

    #[test]
    fn csv_joins_rows_and_cells() {
        let raw = "metric,value\n\"checkout conversion\",0.42\nsearch latency,120";
        let doc = extract(DocumentFormat::Csv, raw);
        assert!(doc.text.contains("checkout conversion 0.42"));
        assert!(doc.text.contains("metric value"));
    }

    #[test]
    fn sentences_split_on_terminators_and_newlines() {
        let sentences = split_sentences("First point. Second point!\nThird line without period");
        assert_eq!(
            sentences,
            vec!["First point.", "Second point!", "Third line without period"]
        );
    }

    #[test]
    fn empty_text_yields_no_sentences() {
        assert!(split_sentences("").is_empty());
        assert!(split_sentences("  \n ").is_empty());
    }
}
