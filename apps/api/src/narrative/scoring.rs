//! Weighted aggregator — combines base weight, recency, relevance, coherence
//! and confidence into one normalized `BlockScore`.
//!
//! ```text
//! total = base_weight × baseWeightFactor
//!       + recency     × recencyFactor
//!       + relevance   × relevanceFactor
//!       + coherence   × coherenceFactor
//!       + confidence  × confidenceFactor          (clamped to [0, 1])
//! ```
//!
//! Activation-side inputs (tag sets, mask filters, reference time) are resolved
//! once per call in [`Activation`] and shared by every block scored in that call.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::narrative::coherence::{coherence_in_pool, PoolTags};
use crate::narrative::confidence::compute_confidence_score;
use crate::narrative::models::{
    normalize_tags, BlockScore, NarrativeBlock, NarrativeContext, ScoreBreakdown, ScoreFactors,
    WeightingConfig,
};
use crate::narrative::recency::compute_recency_score;
use crate::narrative::relevance::{compute_relevance_score, MaskTags};

/// Base weight used when a block carries no author weight, or one ≤ 0.
pub const NEUTRAL_BASE_WEIGHT: f64 = 0.5;

/// Author weight treated as maximum typical importance.
const MAX_TYPICAL_WEIGHT: f64 = 5.0;

const RECENT_THRESHOLD: f64 = 0.7;
const RELEVANT_THRESHOLD: f64 = 0.5;

/// Normalizes the author-assigned weight into [0, 1].
pub fn compute_base_weight(weight: Option<f64>) -> f64 {
    match weight {
        Some(w) if w > 0.0 => (w / MAX_TYPICAL_WEIGHT).min(1.0),
        _ => NEUTRAL_BASE_WEIGHT,
    }
}

/// Scores one block against `pool` using the current time.
pub fn score_narrative_block(
    block: &NarrativeBlock,
    context: &NarrativeContext,
    pool: &[NarrativeBlock],
    config: &WeightingConfig,
) -> BlockScore {
    score_narrative_block_at(block, context, pool, config, Utc::now())
}

/// Scores one block against `pool` as of `now`.
pub fn score_narrative_block_at(
    block: &NarrativeBlock,
    context: &NarrativeContext,
    pool: &[NarrativeBlock],
    config: &WeightingConfig,
    now: DateTime<Utc>,
) -> BlockScore {
    config.warn_if_unbalanced();
    let pool_tags = PoolTags::new(pool);
    Activation::resolve(context, config, now).score(block, &block.normalized_tags(), &pool_tags)
}

/// Per-call activation state, resolved once and reused for every block.
pub(crate) struct Activation<'a> {
    context: &'a NarrativeContext,
    config: &'a WeightingConfig,
    mask: Option<MaskTags>,
    active_tags: BTreeSet<String>,
    priority_keywords: BTreeSet<String>,
    recency: f64,
}

impl<'a> Activation<'a> {
    pub(crate) fn resolve(
        context: &'a NarrativeContext,
        config: &'a WeightingConfig,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            context,
            config,
            mask: context.mask.as_ref().map(MaskTags::from_mask),
            active_tags: normalize_tags(&context.active_tags),
            priority_keywords: normalize_tags(&config.priority_keywords),
            // The context's creation time is the effective age of every block.
            recency: compute_recency_score(
                context.created_at.as_deref(),
                config.recency_window_days,
                now,
            ),
        }
    }

    /// `block_tags` must be `block.normalized_tags()`; callers that already
    /// hold them (the ranker, via `PoolTags`) pass them in.
    pub(crate) fn score(
        &self,
        block: &NarrativeBlock,
        block_tags: &BTreeSet<String>,
        pool: &PoolTags<'_>,
    ) -> BlockScore {
        let config = self.config;

        let base_weight = compute_base_weight(block.weight);
        let recency = self.recency;
        let relevance = compute_relevance_score(
            block_tags,
            self.mask.as_ref(),
            &self.active_tags,
            &self.priority_keywords,
        );
        let coherence = coherence_in_pool(block, block_tags, pool, &self.context.context_arc);
        let confidence = compute_confidence_score(block, self.context.mask.as_ref());

        let breakdown = ScoreBreakdown {
            base_weight: base_weight * config.base_weight_factor,
            recency: recency * config.recency_factor,
            relevance: relevance * config.relevance_factor,
            coherence: coherence * config.coherence_factor,
            confidence: confidence * config.confidence_factor,
        };

        BlockScore {
            block_id: block.title.clone(),
            total_score: breakdown.sum().clamp(0.0, 1.0),
            breakdown,
            factors: ScoreFactors {
                is_recent: recency > RECENT_THRESHOLD,
                has_relevant_tags: relevance > RELEVANT_THRESHOLD,
                has_keyword_boost: !block_tags.is_disjoint(&self.priority_keywords),
                tag_count: block.tags.len(),
            },
        }
    }
}
