use serde::{Deserialize, Serialize};

/// Qualitative quality bucket assigned by the photo-insight provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QualityTier {
    Excellent,
    AboveAverage,
    Average,
    BelowAverage,
}

impl QualityTier {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::AboveAverage => "Above Average",
            Self::Average => "Average",
            Self::BelowAverage => "Below Average",
        }
    }
}

/// One photo under consideration. Classification, confidence (0-1 or 0-100
/// scale), and quality signals are all optional; absent metadata degrades to
/// mid-range defaults during scoring rather than erroring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoCandidate {
    pub url: String,
    #[serde(default)]
    pub classification: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub quality_tier: Option<QualityTier>,
    #[serde(default)]
    pub quality_score: Option<f64>,
    pub index: usize,
}

impl PhotoCandidate {
    pub fn bare(url: impl Into<String>, index: usize) -> Self {
        Self {
            url: url.into(),
            classification: None,
            confidence: None,
            quality_tier: None,
            quality_score: None,
            index,
        }
    }
}

/// Semantic photo role in a generated report or marketing asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportSlot {
    Main,
    Kitchen,
    Room,
}

impl ReportSlot {
    pub const fn ordered() -> [Self; 3] {
        [Self::Main, Self::Kitchen, Self::Room]
    }

    /// Category name recorded in `missing_categories` when the slot cannot
    /// be confidently filled.
    pub const fn category_label(self) -> &'static str {
        match self {
            Self::Main => "Exterior",
            Self::Kitchen => "Kitchen",
            Self::Room => "Living Room",
        }
    }
}

/// Outcome for one slot. `ai_selected` marks confidence-driven picks as
/// opposed to positional fallbacks; `category_mismatch` flags fills whose
/// classification or confidence falls outside the slot's expectations.
#[derive(Debug, Clone, Serialize)]
pub struct SlotSelection {
    pub slot: ReportSlot,
    pub url: Option<String>,
    pub ai_selected: bool,
    pub category_mismatch: bool,
    pub reason: String,
}

/// Full selection result across the three report slots. No URL ever appears
/// in more than one slot.
#[derive(Debug, Clone, Serialize)]
pub struct SlotPlan {
    pub main: SlotSelection,
    pub kitchen: SlotSelection,
    pub room: SlotSelection,
    pub missing_categories: Vec<&'static str>,
}

impl SlotPlan {
    pub fn selections(&self) -> [&SlotSelection; 3] {
        [&self.main, &self.kitchen, &self.room]
    }
}
