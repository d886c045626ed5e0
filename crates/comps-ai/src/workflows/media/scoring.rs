use super::domain::{PhotoCandidate, QualityTier};

/// Priority-ordered keyword lists per slot category. Earlier entries earn a
/// larger bonus; a "front of structure" classification outranks a generic
/// "exterior" shot.
pub(crate) const EXTERIOR_KEYWORDS: &[&str] = &[
    "front of structure",
    "front view",
    "exterior",
    "aerial",
    "back of structure",
    "yard",
];

pub(crate) const KITCHEN_KEYWORDS: &[&str] = &["kitchen", "breakfast"];

pub(crate) const ROOM_KEYWORDS: &[&str] = &[
    "living room",
    "family room",
    "great room",
    "dining room",
    "bedroom",
];

const TIER_BONUS_EXCELLENT: f64 = 30.0;
const TIER_BONUS_ABOVE_AVERAGE: f64 = 22.0;
const TIER_BONUS_AVERAGE: f64 = 15.0;
const TIER_BONUS_BELOW_AVERAGE: f64 = 5.0;

const QUALITY_BONUS_MAX: f64 = 25.0;
const DEFAULT_QUALITY_SCORE: f64 = 50.0;

const KEYWORD_BONUS_BASE: f64 = 20.0;
const KEYWORD_BONUS_STEP: f64 = 3.0;
const KEYWORD_BONUS_FLOOR: f64 = 6.0;

const CONFIDENCE_BONUS_MAX: f64 = 10.0;

/// Confidence arrives on either a 0-1 or a 0-100 scale depending on the
/// provider vintage; normalize everything to percent.
pub(crate) fn confidence_percent(candidate: &PhotoCandidate) -> Option<f64> {
    candidate.confidence.map(|raw| {
        let percent = if raw <= 1.0 { raw * 100.0 } else { raw };
        percent.clamp(0.0, 100.0)
    })
}

/// Rank of the first keyword the classification matches, if any. First match
/// only; case-insensitive substring.
pub(crate) fn keyword_rank(classification: Option<&str>, keywords: &[&str]) -> Option<usize> {
    let lowered = classification?.trim().to_ascii_lowercase();
    if lowered.is_empty() {
        return None;
    }
    keywords
        .iter()
        .position(|keyword| lowered.contains(keyword))
}

/// Composite ranking score: quality tier bonus, rescaled quantitative
/// quality, rank-decaying keyword bonus, and a bounded confidence bonus.
/// Absent metadata contributes the mid-range defaults, so an unannotated
/// photo still ranks rather than erroring.
pub(crate) fn score(candidate: &PhotoCandidate, keywords: &[&str]) -> f64 {
    let tier_bonus = match candidate.quality_tier {
        Some(QualityTier::Excellent) => TIER_BONUS_EXCELLENT,
        Some(QualityTier::AboveAverage) => TIER_BONUS_ABOVE_AVERAGE,
        Some(QualityTier::Average) | None => TIER_BONUS_AVERAGE,
        Some(QualityTier::BelowAverage) => TIER_BONUS_BELOW_AVERAGE,
    };

    let quality = candidate
        .quality_score
        .unwrap_or(DEFAULT_QUALITY_SCORE)
        .clamp(0.0, 100.0);
    let quality_bonus = (quality / 100.0) * QUALITY_BONUS_MAX;

    let keyword_bonus = keyword_rank(candidate.classification.as_deref(), keywords)
        .map(|rank| (KEYWORD_BONUS_BASE - rank as f64 * KEYWORD_BONUS_STEP).max(KEYWORD_BONUS_FLOOR))
        .unwrap_or(0.0);

    let confidence_bonus = confidence_percent(candidate)
        .map(|percent| (percent / 100.0) * CONFIDENCE_BONUS_MAX)
        .unwrap_or(0.0);

    tier_bonus + quality_bonus + keyword_bonus + confidence_bonus
}
