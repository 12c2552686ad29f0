use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Inputs
// ────────────────────────────────────────────────────────────────────────────

/// An atomic, taggable fragment of biographical or professional content.
///
/// `title` doubles as the block's identity key in scores and reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrativeBlock {
    pub title: String,
    pub body: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    /// Author-assigned importance, nominally 0 – 100. Values ≤ 0 count as unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

impl NarrativeBlock {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            tags: Vec::new(),
            template_id: None,
            weight: None,
        }
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags.extend(tags.iter().map(|t| t.to_string()));
        self
    }

    pub fn with_template(mut self, template_id: impl Into<String>) -> Self {
        self.template_id = Some(template_id.into());
        self
    }

    pub fn with_weight(mut self, weight: impl Into<f64>) -> Self {
        self.weight = Some(weight.into());
        self
    }

    /// Lowercased, de-duplicated tag set.
    pub fn normalized_tags(&self) -> BTreeSet<String> {
        normalize_tags(&self.tags)
    }
}

/// Tag-based include/exclude filters of a mask.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaskFilters {
    #[serde(default)]
    pub include_tags: Vec<String>,
    /// Takes precedence over `include_tags` when the two overlap.
    #[serde(default)]
    pub exclude_tags: Vec<String>,
    /// Informational only; not read by any scorer.
    #[serde(default)]
    pub priority_weights: HashMap<String, f64>,
}

/// An activation persona supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mask {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub filters: MaskFilters,
}

impl Mask {
    pub fn new(include_tags: &[&str], exclude_tags: &[&str]) -> Self {
        Self {
            name: None,
            filters: MaskFilters {
                include_tags: include_tags.iter().map(|t| t.to_string()).collect(),
                exclude_tags: exclude_tags.iter().map(|t| t.to_string()).collect(),
                priority_weights: HashMap::new(),
            },
        }
    }
}

/// Per-call activation state.
///
/// `activeContexts`, `activeEpoch`, `activeStage` and `contextArc` are accepted
/// and carried but no scorer reads them yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrativeContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mask: Option<Mask>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub active_contexts: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub active_tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_epoch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_stage: Option<String>,
    /// ISO-8601 timestamp treated as the effective creation time of every block
    /// scored in this call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub context_arc: Vec<String>,
}

/// Factor weights and knobs for the aggregator.
///
/// Deserializes field-by-field onto `Default`, so a partial JSON object
/// resolves every unset field to its documented default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WeightingConfig {
    pub base_weight_factor: f64,
    pub recency_factor: f64,
    pub relevance_factor: f64,
    pub coherence_factor: f64,
    pub confidence_factor: f64,
    pub recency_window_days: u32,
    pub priority_keywords: Vec<String>,
}

/// Allowed drift of the factor sum away from 1.0 before a warning is logged.
pub const FACTOR_SUM_TOLERANCE: f64 = 0.01;

impl Default for WeightingConfig {
    fn default() -> Self {
        Self {
            base_weight_factor: 0.25,
            recency_factor: 0.15,
            relevance_factor: 0.35,
            coherence_factor: 0.15,
            confidence_factor: 0.10,
            recency_window_days: 365,
            priority_keywords: Vec::new(),
        }
    }
}

impl WeightingConfig {
    pub fn factor_sum(&self) -> f64 {
        self.base_weight_factor
            + self.recency_factor
            + self.relevance_factor
            + self.coherence_factor
            + self.confidence_factor
    }

    pub fn is_balanced(&self) -> bool {
        (self.factor_sum() - 1.0).abs() <= FACTOR_SUM_TOLERANCE
    }

    /// Logs a warning when the factors do not sum to ~1.0. Never alters scoring.
    pub fn warn_if_unbalanced(&self) {
        if !self.is_balanced() {
            tracing::warn!(
                factor_sum = self.factor_sum(),
                "Weighting factors do not sum to 1.0; total scores may saturate or compress"
            );
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Outputs
// ────────────────────────────────────────────────────────────────────────────

/// Sub-scores already multiplied by their factor weight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub base_weight: f64,
    pub recency: f64,
    pub relevance: f64,
    pub coherence: f64,
    pub confidence: f64,
}

impl ScoreBreakdown {
    pub fn sum(&self) -> f64 {
        self.base_weight + self.recency + self.relevance + self.coherence + self.confidence
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreFactors {
    pub is_recent: bool,
    pub has_relevant_tags: bool,
    pub has_keyword_boost: bool,
    pub tag_count: usize,
}

/// The computed score of one block for one call. Never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockScore {
    pub block_id: String,
    pub total_score: f64,
    pub breakdown: ScoreBreakdown,
    pub factors: ScoreFactors,
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

/// Trims and lowercases tags, dropping empties and duplicates.
pub fn normalize_tags<I, S>(tags: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tags.into_iter()
        .map(|t| t.as_ref().trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}
