use serde::{Deserialize, Serialize};

/// Templates that produce narrative blocks, identified on the wire by kebab-case ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NarrativeTemplate {
    IdentityMode,
    StageContext,
    Sequence,
    StageArc,
    EpochArc,
    SettingArc,
    Evidence,
    NextMove,
}

/// Narrative arc order used by coherence. Later positions score higher.
pub const CANONICAL_SEQUENCE: [NarrativeTemplate; 7] = [
    NarrativeTemplate::IdentityMode,
    NarrativeTemplate::StageContext,
    NarrativeTemplate::Sequence,
    NarrativeTemplate::StageArc,
    NarrativeTemplate::EpochArc,
    NarrativeTemplate::Evidence,
    NarrativeTemplate::NextMove,
];

/// Templates whose output is trusted by confidence.
pub const OFFICIAL_TEMPLATES: [NarrativeTemplate; 7] = [
    NarrativeTemplate::IdentityMode,
    NarrativeTemplate::StageContext,
    NarrativeTemplate::Sequence,
    NarrativeTemplate::StageArc,
    NarrativeTemplate::EpochArc,
    NarrativeTemplate::SettingArc,
    NarrativeTemplate::NextMove,
];

impl NarrativeTemplate {
    pub fn as_str(&self) -> &'static str {
        match self {
            NarrativeTemplate::IdentityMode => "identity-mode",
            NarrativeTemplate::StageContext => "stage-context",
            NarrativeTemplate::Sequence => "sequence",
            NarrativeTemplate::StageArc => "stage-arc",
            NarrativeTemplate::EpochArc => "epoch-arc",
            NarrativeTemplate::SettingArc => "setting-arc",
            NarrativeTemplate::Evidence => "evidence",
            NarrativeTemplate::NextMove => "next-move",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        match id.trim() {
            "identity-mode" => Some(NarrativeTemplate::IdentityMode),
            "stage-context" => Some(NarrativeTemplate::StageContext),
            "sequence" => Some(NarrativeTemplate::Sequence),
            "stage-arc" => Some(NarrativeTemplate::StageArc),
            "epoch-arc" => Some(NarrativeTemplate::EpochArc),
            "setting-arc" => Some(NarrativeTemplate::SettingArc),
            "evidence" => Some(NarrativeTemplate::Evidence),
            "next-move" => Some(NarrativeTemplate::NextMove),
            _ => None,
        }
    }
}

/// Zero-based position of a template id in [`CANONICAL_SEQUENCE`].
pub fn sequence_position(template_id: &str) -> Option<usize> {
    let template = NarrativeTemplate::from_id(template_id)?;
    CANONICAL_SEQUENCE.iter().position(|t| *t == template)
}

pub fn is_official(template_id: &str) -> bool {
    NarrativeTemplate::from_id(template_id)
        .map(|t| OFFICIAL_TEMPLATES.contains(&t))
        .unwrap_or(false)
}
