pub mod domain;
mod insights;
mod scoring;
mod slots;

pub use domain::{PhotoCandidate, QualityTier, ReportSlot, SlotPlan, SlotSelection};
pub use insights::{
    annotate_photos, FetchSuperseded, FetchTicket, InsightError, InsightFetcher, InsightGateway,
    InsightPayload, ListingAnnotations, PhotoAnnotation,
};
pub use slots::{
    default_selection, resolve_url, select_slots, HIGH_CONFIDENCE_THRESHOLD,
    MISMATCH_CONFIDENCE_FLOOR,
};
