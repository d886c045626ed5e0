use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use comps_ai::config::MediaConfig;
use comps_ai::workflows::media::{
    InsightError, InsightFetcher, InsightGateway, InsightPayload, PhotoAnnotation,
};
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) media: MediaConfig,
    pub(crate) insights: Arc<dyn InsightGateway>,
    pub(crate) fetcher: InsightFetcher,
}

/// Insight gateway backed by a seeded map, standing in for the external
/// provider in the demo CLI, the default server wiring, and tests.
#[derive(Debug, Default, Clone)]
pub(crate) struct InMemoryInsightGateway {
    payloads: Arc<Mutex<HashMap<String, Vec<PhotoAnnotation>>>>,
}

impl InMemoryInsightGateway {
    pub(crate) fn seed(&self, listing_id: &str, annotations: Vec<PhotoAnnotation>) {
        self.payloads
            .lock()
            .expect("insight gateway mutex poisoned")
            .insert(listing_id.to_string(), annotations);
    }
}

impl InsightGateway for InMemoryInsightGateway {
    fn fetch_annotations(&self, listing_id: &str) -> Result<InsightPayload, InsightError> {
        let guard = self
            .payloads
            .lock()
            .expect("insight gateway mutex poisoned");
        Ok(match guard.get(listing_id) {
            Some(annotations) => InsightPayload::Annotations(annotations.clone()),
            None => InsightPayload::Unavailable,
        })
    }
}
