//! Plain-text rendering of an analysis for the terminal.

use std::fmt::Write;

use crate::analysis::AnalysisResult;

/// Coarse bucket used to label a confidence value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceBand {
    High,
    Medium,
    Low,
}

impl ConfidenceBand {
    pub fn of(confidence: u8) -> Self {
        if confidence >= 80 {
            ConfidenceBand::High
        } else if confidence >= 60 {
            ConfidenceBand::Medium
        } else {
            ConfidenceBand::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ConfidenceBand::High => "high",
            ConfidenceBand::Medium => "medium",
            ConfidenceBand::Low => "low",
        }
    }
}

pub fn verdict_label(is_reliable: bool) -> &'static str {
    if is_reliable {
        "Likely Reliable"
    } else {
        "Potentially Unreliable"
    }
}

fn bar(value: u8) -> String {
    let filled = ((value as usize + 5) / 10).min(10);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(10 - filled))
}

/// Multi-line report for `result`.
pub fn render(result: &AnalysisResult) -> String {
    let mut out = String::new();
    let band = ConfidenceBand::of(result.confidence);

    // writing into a String cannot fail
    let _ = writeln!(out, "{}", verdict_label(result.is_reliable));
    let _ = writeln!(
        out,
        "Confidence: {:>3}% {} ({})",
        result.confidence,
        bar(result.confidence),
        band.label()
    );
    let _ = writeln!(out);
    for (name, value) in [
        ("Source credibility", result.source_credibility),
        ("Factual accuracy", result.factual_accuracy),
        ("Bias score", result.bias_score),
    ] {
        let _ = writeln!(out, "{:<19} {:>3}% {}", name, value, bar(value));
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Reasoning:");
    for (i, reason) in result.reasoning.iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", i + 1, reason);
    }

    let details = &result.analysis_details;
    let _ = writeln!(out);
    let _ = writeln!(out, "Domain:     {}", details.domain);
    if let Some(date) = &details.publish_date {
        let _ = writeln!(out, "Published:  {}", date);
    }
    if let Some(author) = &details.author {
        let _ = writeln!(out, "Author:     {}", author);
    }
    let _ = writeln!(out, "Word count: {}", details.word_count);
    out
}
