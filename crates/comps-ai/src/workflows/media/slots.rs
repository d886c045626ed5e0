use std::collections::HashSet;

use super::domain::{PhotoCandidate, ReportSlot, SlotPlan, SlotSelection};
use super::scoring::{
    confidence_percent, keyword_rank, score, EXTERIOR_KEYWORDS, KITCHEN_KEYWORDS, ROOM_KEYWORDS,
};

/// Minimum classification confidence (percent) for an AI-driven main-slot
/// pick; below it the selector falls back.
pub const HIGH_CONFIDENCE_THRESHOLD: f64 = 70.0;

/// A filled slot below this confidence (or outside its keyword set) carries
/// the mismatch flag even when it was the best available fallback.
pub const MISMATCH_CONFIDENCE_FLOOR: f64 = 50.0;

/// Resolve a provider-relative URL against the fixed CDN base. Absolute URLs
/// pass through untouched.
pub fn resolve_url(url: &str, cdn_base: &str) -> String {
    let trimmed = url.trim();
    if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!(
            "{}/{}",
            cdn_base.trim_end_matches('/'),
            trimmed.trim_start_matches('/')
        )
    }
}

/// Positional default used when insights are unavailable: the first `count`
/// photos, resolved, in provider order.
pub fn default_selection(photos: &[String], count: usize, cdn_base: &str) -> Vec<String> {
    photos
        .iter()
        .take(count)
        .map(|url| resolve_url(url, cdn_base))
        .collect()
}

/// Assign photos to the three report slots. Slots fill in a fixed order and
/// each claims its URL, so later slots never reuse an earlier pick.
pub fn select_slots(photos: &[PhotoCandidate], cdn_base: &str) -> SlotPlan {
    let candidates: Vec<PhotoCandidate> = photos
        .iter()
        .map(|photo| {
            let mut resolved = photo.clone();
            resolved.url = resolve_url(&photo.url, cdn_base);
            resolved
        })
        .collect();

    let mut claimed: HashSet<String> = HashSet::new();
    let mut missing: Vec<&'static str> = Vec::new();

    let main = select_main(&candidates, &mut claimed, &mut missing);
    let kitchen = select_kitchen(&candidates, &mut claimed, &mut missing);
    let room = select_room(&candidates, &mut claimed, &mut missing);

    SlotPlan {
        main,
        kitchen,
        room,
        missing_categories: missing,
    }
}

fn select_main(
    candidates: &[PhotoCandidate],
    claimed: &mut HashSet<String>,
    missing: &mut Vec<&'static str>,
) -> SlotSelection {
    if candidates.is_empty() {
        missing.push(ReportSlot::Main.category_label());
        return empty_slot(ReportSlot::Main, "no photo candidates supplied");
    }

    // Confident exterior pick first.
    let confident = best_by_score(candidates.iter().filter(|candidate| {
        keyword_rank(candidate.classification.as_deref(), EXTERIOR_KEYWORDS).is_some()
            && confidence_percent(candidate).is_some_and(|pct| pct >= HIGH_CONFIDENCE_THRESHOLD)
    }));
    if let Some(pick) = confident {
        return fill_slot(
            ReportSlot::Main,
            pick,
            claimed,
            true,
            format!(
                "exterior photo selected at {:.0}% classification confidence",
                confidence_percent(pick).unwrap_or(0.0)
            ),
        );
    }

    // Any exterior-classified photo, confidence notwithstanding.
    let any_exterior = best_by_score(candidates.iter().filter(|candidate| {
        keyword_rank(candidate.classification.as_deref(), EXTERIOR_KEYWORDS).is_some()
    }));
    if let Some(pick) = any_exterior {
        missing.push(ReportSlot::Main.category_label());
        return fill_slot(
            ReportSlot::Main,
            pick,
            claimed,
            false,
            format!(
                "no exterior photo met the {:.0}% confidence threshold; using best available exterior",
                HIGH_CONFIDENCE_THRESHOLD
            ),
        );
    }

    // Last resort: the strongest photo of any kind still fills the cover.
    missing.push(ReportSlot::Main.category_label());
    let pick = best_by_score(candidates.iter()).expect("candidates are non-empty");
    fill_slot(
        ReportSlot::Main,
        pick,
        claimed,
        false,
        "no exterior-classified photo; using highest-scoring photo".to_string(),
    )
}

fn select_kitchen(
    candidates: &[PhotoCandidate],
    claimed: &mut HashSet<String>,
    missing: &mut Vec<&'static str>,
) -> SlotSelection {
    let mut best: Option<&PhotoCandidate> = None;
    for candidate in candidates {
        if claimed.contains(&candidate.url)
            || keyword_rank(candidate.classification.as_deref(), KITCHEN_KEYWORDS).is_none()
        {
            continue;
        }
        let confidence = confidence_percent(candidate).unwrap_or(-1.0);
        let beats = match best {
            Some(current) => confidence > confidence_percent(current).unwrap_or(-1.0),
            None => true,
        };
        if beats {
            best = Some(candidate);
        }
    }

    match best {
        Some(pick) => fill_slot(
            ReportSlot::Kitchen,
            pick,
            claimed,
            true,
            format!(
                "kitchen photo selected at {:.0}% classification confidence",
                confidence_percent(pick).unwrap_or(0.0)
            ),
        ),
        // Unlike the main slot there is no arbitrary-photo fallback here; a
        // wrong kitchen shot is worse than an empty slot.
        None => {
            missing.push(ReportSlot::Kitchen.category_label());
            empty_slot(ReportSlot::Kitchen, "no kitchen-classified photo available")
        }
    }
}

fn select_room(
    candidates: &[PhotoCandidate],
    claimed: &mut HashSet<String>,
    missing: &mut Vec<&'static str>,
) -> SlotSelection {
    let mut best: Option<(&PhotoCandidate, usize, f64)> = None;
    for candidate in candidates {
        if claimed.contains(&candidate.url) {
            continue;
        }
        let Some(rank) = keyword_rank(candidate.classification.as_deref(), ROOM_KEYWORDS) else {
            continue;
        };
        let confidence = confidence_percent(candidate).unwrap_or(-1.0);
        let beats = match best {
            Some((_, best_rank, best_confidence)) => {
                rank < best_rank || (rank == best_rank && confidence > best_confidence)
            }
            None => true,
        };
        if beats {
            best = Some((candidate, rank, confidence));
        }
    }

    match best {
        Some((pick, rank, _)) => fill_slot(
            ReportSlot::Room,
            pick,
            claimed,
            true,
            format!("matched \"{}\" for the living-area slot", ROOM_KEYWORDS[rank]),
        ),
        None => {
            missing.push(ReportSlot::Room.category_label());
            empty_slot(ReportSlot::Room, "no living-area photo available")
        }
    }
}

/// Highest composite score wins; the strictly-greater comparison keeps the
/// earliest candidate on ties, matching provider photo order.
fn best_by_score<'a>(
    candidates: impl Iterator<Item = &'a PhotoCandidate>,
) -> Option<&'a PhotoCandidate> {
    let mut best: Option<(&PhotoCandidate, f64)> = None;
    for candidate in candidates {
        let candidate_score = score(candidate, EXTERIOR_KEYWORDS);
        let beats = match best {
            Some((_, best_score)) => candidate_score > best_score,
            None => true,
        };
        if beats {
            best = Some((candidate, candidate_score));
        }
    }
    best.map(|(candidate, _)| candidate)
}

fn fill_slot(
    slot: ReportSlot,
    pick: &PhotoCandidate,
    claimed: &mut HashSet<String>,
    ai_selected: bool,
    reason: String,
) -> SlotSelection {
    claimed.insert(pick.url.clone());
    SlotSelection {
        slot,
        url: Some(pick.url.clone()),
        ai_selected,
        category_mismatch: is_mismatch(slot, pick),
        reason,
    }
}

fn empty_slot(slot: ReportSlot, reason: &str) -> SlotSelection {
    SlotSelection {
        slot,
        url: None,
        ai_selected: false,
        category_mismatch: false,
        reason: reason.to_string(),
    }
}

fn is_mismatch(slot: ReportSlot, candidate: &PhotoCandidate) -> bool {
    let keywords = match slot {
        ReportSlot::Main => EXTERIOR_KEYWORDS,
        ReportSlot::Kitchen => KITCHEN_KEYWORDS,
        ReportSlot::Room => ROOM_KEYWORDS,
    };
    let outside_category = keyword_rank(candidate.classification.as_deref(), keywords).is_none();
    let low_confidence = confidence_percent(candidate)
        .map(|pct| pct < MISMATCH_CONFIDENCE_FLOOR)
        .unwrap_or(true);
    outside_category || low_confidence
}
