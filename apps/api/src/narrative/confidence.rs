use crate::narrative::models::{Mask, NarrativeBlock};
use crate::narrative::templates::is_official;

const OFFICIAL_TEMPLATE_CONFIDENCE: f64 = 0.95;

/// Trust in a block: official templates score 0.95, otherwise by tag richness
/// (≥2 tags → 0.8, 1 tag → 0.6, none → 0.5).
///
/// `mask` is reserved for per-mask trust calibration and is not read.
pub fn compute_confidence_score(block: &NarrativeBlock, _mask: Option<&Mask>) -> f64 {
    if block.template_id.as_deref().map(is_official).unwrap_or(false) {
        return OFFICIAL_TEMPLATE_CONFIDENCE;
    }

    match block.tags.len() {
        0 => 0.5,
        1 => 0.6,
        _ => 0.8,
    }
}
