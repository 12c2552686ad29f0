// Narrative Block Weighting & Selection Engine.
// Pure, synchronous scoring over in-memory blocks: no I/O, no caching.
// Sub-scorers are leaf modules; `scoring` aggregates them and `ranking` orders pools.

pub mod coherence;
pub mod confidence;
pub mod handlers;
pub mod models;
pub mod ranking;
pub mod recency;
pub mod relevance;
pub mod scoring;
pub mod templates;

pub use models::{
    BlockScore, Mask, MaskFilters, NarrativeBlock, NarrativeContext, ScoreBreakdown, ScoreFactors,
    WeightingConfig,
};
pub use ranking::{build_report, rank_blocks, select_top, RankedBlock};
pub use scoring::score_narrative_block;
