//! Simulated credibility scoring.
//!
//! Nothing here looks at article content. The domain is classified against
//! the configured lists and every score is noise layered on that class. The
//! random generator and the clock are passed in so a seeded run is fully
//! reproducible.

use chrono::{DateTime, Duration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domains::{DomainClass, DomainLists};

/// Names attributed to the fabricated article metadata.
pub const AUTHORS: [&str; 4] = ["John Smith", "Jane Doe", "Alex Johnson", "Sarah Wilson"];

/// Confidence at or above which an article is declared reliable.
pub const RELIABLE_THRESHOLD: u8 = 60;

const CONFIDENCE_BOUNDS: (f64, f64) = (10.0, 95.0);
const BIAS_BOUNDS: (f64, f64) = (5.0, 90.0);

const RELIABLE_REASONS: [&str; 3] = [
    "Source is from a well-established, credible news organization",
    "Domain has a strong track record of factual reporting",
    "Content structure follows journalistic standards",
];

const UNRELIABLE_REASONS: [&str; 3] = [
    "Source domain has been flagged for spreading misinformation",
    "Content shows signs of sensationalism and bias",
    "Lacks proper citations and fact-checking",
];

const NEUTRAL_REASONS: [&str; 3] = [
    "Source credibility is moderate - requires additional verification",
    "Content analysis shows mixed reliability indicators",
    "Recommend cross-referencing with established news sources",
];

pub const HIGH_CONFIDENCE_REASON: &str = "High confidence in analysis based on multiple factors";
pub const LOW_CONFIDENCE_REASON: &str = "Low confidence - multiple red flags detected";

/// Metadata attached to an analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisDetails {
    pub domain: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub word_count: u32,
}

/// Response body of a successful detection request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub is_reliable: bool,
    pub confidence: u8,
    pub reasoning: Vec<String>,
    pub source_credibility: u8,
    pub factual_accuracy: u8,
    pub bias_score: u8,
    pub analysis_details: AnalysisDetails,
}

/// Canned reasoning for a domain class: three branch sentences, plus a
/// confidence remark when the score is above 80 or below 40.
pub fn reasoning_for(class: DomainClass, confidence: u8) -> Vec<String> {
    let branch = match class {
        DomainClass::Reliable => &RELIABLE_REASONS,
        DomainClass::Unreliable => &UNRELIABLE_REASONS,
        DomainClass::Unknown => &NEUTRAL_REASONS,
    };

    let mut reasoning: Vec<String> = branch.iter().map(|s| s.to_string()).collect();
    if confidence > 80 {
        reasoning.push(HIGH_CONFIDENCE_REASON.to_string());
    } else if confidence < 40 {
        reasoning.push(LOW_CONFIDENCE_REASON.to_string());
    }
    reasoning
}

/// Add uniform noise in `[-spread, +spread]` to `center`, clamp to `bounds`.
fn jitter<R: Rng + ?Sized>(rng: &mut R, center: f64, spread: f64, bounds: (f64, f64)) -> f64 {
    let noise = rng.gen_range(-spread..=spread);
    (center + noise).clamp(bounds.0, bounds.1)
}

fn to_score(value: f64) -> u8 {
    value.round() as u8
}

/// Build a simulated analysis for an already-extracted `domain`.
pub fn generate_analysis<R: Rng + ?Sized>(
    domain: &str,
    lists: &DomainLists,
    now: DateTime<Utc>,
    rng: &mut R,
) -> AnalysisResult {
    let class = lists.classify(domain);

    let raw_confidence = jitter(rng, class.base_score(), 10.0, CONFIDENCE_BOUNDS);
    let confidence = to_score(raw_confidence);

    let source_credibility = to_score(jitter(rng, raw_confidence, 5.0, CONFIDENCE_BOUNDS));
    let factual_accuracy = to_score(jitter(rng, raw_confidence, 5.0, CONFIDENCE_BOUNDS));
    let bias_score = to_score(jitter(rng, 50.0, 15.0, BIAS_BOUNDS));

    // up to 30 days back, at second granularity
    let age = Duration::seconds(rng.gen_range(0..30 * 24 * 60 * 60));
    let publish_date = (now - age).format("%Y-%m-%d").to_string();
    let author = AUTHORS.choose(rng).map(|a| a.to_string());
    let word_count = rng.gen_range(500..2500);

    AnalysisResult {
        is_reliable: confidence >= RELIABLE_THRESHOLD,
        confidence,
        reasoning: reasoning_for(class, confidence),
        source_credibility,
        factual_accuracy,
        bias_score,
        analysis_details: AnalysisDetails {
            domain: domain.to_string(),
            publish_date: Some(publish_date),
            author,
            word_count,
        },
    }
}
