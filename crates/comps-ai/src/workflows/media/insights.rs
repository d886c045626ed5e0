use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::domain::{PhotoCandidate, QualityTier};
use super::slots::resolve_url;

/// Per-photo annotation returned by the external insight provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoAnnotation {
    pub url: String,
    #[serde(default)]
    pub classification: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub quality_tier: Option<QualityTier>,
    #[serde(default)]
    pub quality_score: Option<f64>,
}

/// Provider response for one listing: either annotations or an explicit
/// "nothing available" marker.
#[derive(Debug, Clone, PartialEq)]
pub enum InsightPayload {
    Unavailable,
    Annotations(Vec<PhotoAnnotation>),
}

#[derive(Debug, thiserror::Error)]
pub enum InsightError {
    #[error("insight backend unavailable: {0}")]
    Backend(String),
    #[error("insight request failed with status {0}")]
    Status(u16),
}

/// Seam to the external photo-insight service so the selector can be
/// exercised without network access.
pub trait InsightGateway: Send + Sync + Debug {
    fn fetch_annotations(&self, listing_id: &str) -> Result<InsightPayload, InsightError>;
}

/// Annotations (or the lack of them) for one listing after a fetch pass.
/// `available == false` signals the degrade path: positional default
/// selection with the "insights unavailable" flag surfaced to callers.
#[derive(Debug, Clone)]
pub struct ListingAnnotations {
    pub listing_id: String,
    pub annotations: Vec<PhotoAnnotation>,
    pub available: bool,
}

/// Raised when a newer invocation supersedes an in-flight fetch sequence;
/// the stale sequence's results are discarded, never written back.
#[derive(Debug, thiserror::Error)]
#[error("insight fetch sequence superseded by a newer invocation")]
pub struct FetchSuperseded;

/// Ticket identifying one fetch invocation. Only the most recently issued
/// ticket may complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

/// Sequences per-listing insight fetches with an inter-request delay for the
/// provider's rate limits, and a generation counter so a changed input set
/// aborts the stale sequence.
#[derive(Debug, Clone)]
pub struct InsightFetcher {
    generation: Arc<AtomicU64>,
    delay: Duration,
}

impl InsightFetcher {
    pub fn new(delay: Duration) -> Self {
        Self {
            generation: Arc::new(AtomicU64::new(0)),
            delay,
        }
    }

    /// Start a new invocation, invalidating any sequence already in flight.
    pub fn begin(&self) -> FetchTicket {
        FetchTicket(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Invalidate in-flight sequences without starting a new one.
    pub fn cancel_all(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    fn is_current(&self, ticket: FetchTicket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.0
    }

    /// Fetch annotations for each listing in order. Individual provider
    /// failures degrade that listing to `available: false`; only
    /// supersession aborts the sequence.
    pub async fn run(
        &self,
        ticket: FetchTicket,
        gateway: &dyn InsightGateway,
        listing_ids: &[String],
    ) -> Result<Vec<ListingAnnotations>, FetchSuperseded> {
        let mut results = Vec::with_capacity(listing_ids.len());

        for (position, listing_id) in listing_ids.iter().enumerate() {
            if !self.is_current(ticket) {
                return Err(FetchSuperseded);
            }

            if position > 0 && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
                if !self.is_current(ticket) {
                    return Err(FetchSuperseded);
                }
            }

            let result = match gateway.fetch_annotations(listing_id) {
                Ok(InsightPayload::Annotations(annotations)) => ListingAnnotations {
                    listing_id: listing_id.clone(),
                    annotations,
                    available: true,
                },
                Ok(InsightPayload::Unavailable) => unavailable(listing_id),
                Err(err) => {
                    tracing::warn!(listing_id = %listing_id, error = %err, "photo insight fetch degraded");
                    unavailable(listing_id)
                }
            };
            results.push(result);
        }

        // Final check: the most recently initiated invocation always wins.
        if self.is_current(ticket) {
            Ok(results)
        } else {
            Err(FetchSuperseded)
        }
    }
}

fn unavailable(listing_id: &str) -> ListingAnnotations {
    ListingAnnotations {
        listing_id: listing_id.to_string(),
        annotations: Vec::new(),
        available: false,
    }
}

/// Join a property's photo array with provider annotations into scoreable
/// candidates. URLs are compared after resolution so relative and absolute
/// spellings of the same photo line up; photos without a matching annotation
/// stay bare and score at the mid-range defaults.
pub fn annotate_photos(
    photos: &[String],
    annotations: &[PhotoAnnotation],
    cdn_base: &str,
) -> Vec<PhotoCandidate> {
    photos
        .iter()
        .enumerate()
        .map(|(index, url)| {
            let resolved = resolve_url(url, cdn_base);
            let matched = annotations
                .iter()
                .find(|annotation| resolve_url(&annotation.url, cdn_base) == resolved);
            match matched {
                Some(annotation) => PhotoCandidate {
                    url: url.clone(),
                    classification: annotation.classification.clone(),
                    confidence: annotation.confidence,
                    quality_tier: annotation.quality_tier,
                    quality_score: annotation.quality_score,
                    index,
                },
                None => PhotoCandidate::bare(url.clone(), index),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn annotate_photos_matches_relative_and_absolute_urls() {
        let base = "https://cdn.listingphotos.example.com";
        let photos = vec!["listings/1.jpg".to_string(), "listings/2.jpg".to_string()];
        let annotations = vec![PhotoAnnotation {
            url: format!("{base}/listings/1.jpg"),
            classification: Some("Exterior".to_string()),
            confidence: Some(0.9),
            quality_tier: None,
            quality_score: None,
        }];

        let candidates = annotate_photos(&photos, &annotations, base);
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].classification.as_deref(), Some("Exterior"));
        assert_eq!(candidates[0].index, 0);
        assert!(candidates[1].classification.is_none());
    }
}
