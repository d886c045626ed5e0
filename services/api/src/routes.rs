use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Extension;
use axum::Json;
use comps_ai::workflows::comps::domain::Comparable;
use comps_ai::workflows::comps::{export, ComparablePipeline, MarketSummary};
use comps_ai::workflows::media::{annotate_photos, default_selection, select_slots, SlotPlan};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Photos surfaced when insights are unavailable and the caller falls back
/// to provider order.
const DEFAULT_PHOTO_COUNT: usize = 3;

#[derive(Debug, Deserialize)]
pub(crate) struct CompsReportRequest {
    pub(crate) records: Vec<serde_json::Value>,
    #[serde(default)]
    pub(crate) include_comparables: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct CompsReportResponse {
    pub(crate) comparable_count: usize,
    pub(crate) excluded: usize,
    pub(crate) summary: MarketSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) comparables: Option<Vec<Comparable>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PhotoPlanRequest {
    pub(crate) properties: Vec<PhotoPlanProperty>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PhotoPlanProperty {
    pub(crate) mls_number: String,
    pub(crate) photos: Vec<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct PhotoPlanResponse {
    pub(crate) properties: Vec<PropertyPlan>,
}

#[derive(Debug, Serialize)]
pub(crate) struct PropertyPlan {
    pub(crate) mls_number: String,
    pub(crate) insights_available: bool,
    pub(crate) plan: SlotPlan,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) default_photos: Option<Vec<String>>,
}

pub(crate) fn app_router(state: AppState) -> axum::Router {
    axum::Router::new()
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/comps/report",
            axum::routing::post(comps_report_endpoint),
        )
        .route(
            "/api/v1/comps/export",
            axum::routing::post(comps_export_endpoint),
        )
        .route(
            "/api/v1/photos/plan",
            axum::routing::post(photo_plan_endpoint),
        )
        .layer(Extension(state))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn comps_report_endpoint(
    Json(payload): Json<CompsReportRequest>,
) -> Json<CompsReportResponse> {
    let CompsReportRequest {
        records,
        include_comparables,
    } = payload;

    let set = ComparablePipeline::from_values(records);
    let summary = set.summary();
    let comparable_count = set.comparables.len();
    let comparables = include_comparables.then_some(set.comparables);

    Json(CompsReportResponse {
        comparable_count,
        excluded: set.excluded,
        summary,
        comparables,
    })
}

pub(crate) async fn comps_export_endpoint(
    Json(payload): Json<CompsReportRequest>,
) -> Response {
    let set = ComparablePipeline::from_values(payload.records);

    let mut buffer = Vec::new();
    if let Err(err) = export::write_csv(&set.comparables, &mut buffer) {
        let body = Json(json!({ "error": format!("csv export failed: {err}") }));
        return (StatusCode::INTERNAL_SERVER_ERROR, body).into_response();
    }

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"comparables.csv\"",
            ),
        ],
        buffer,
    )
        .into_response()
}

pub(crate) async fn photo_plan_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<PhotoPlanRequest>,
) -> Response {
    let listing_ids: Vec<String> = payload
        .properties
        .iter()
        .map(|property| property.mls_number.clone())
        .collect();

    let ticket = state.fetcher.begin();
    let fetched = match state
        .fetcher
        .run(ticket, state.insights.as_ref(), &listing_ids)
        .await
    {
        Ok(fetched) => fetched,
        Err(superseded) => {
            // A newer request owns the sequence now; this caller retries.
            let body = Json(json!({ "error": superseded.to_string() }));
            return (StatusCode::CONFLICT, body).into_response();
        }
    };

    let properties = payload
        .properties
        .into_iter()
        .zip(fetched)
        .map(|(property, listing)| {
            let candidates =
                annotate_photos(&property.photos, &listing.annotations, &state.media.cdn_base);
            let plan = select_slots(&candidates, &state.media.cdn_base);
            let default_photos = (!listing.available).then(|| {
                default_selection(&property.photos, DEFAULT_PHOTO_COUNT, &state.media.cdn_base)
            });

            PropertyPlan {
                mls_number: property.mls_number,
                insights_available: listing.available,
                plan,
                default_photos,
            }
        })
        .collect();

    Json(PhotoPlanResponse { properties }).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::InMemoryInsightGateway;
    use axum::body::Body;
    use axum::http::Request;
    use comps_ai::config::MediaConfig;
    use comps_ai::workflows::media::{InsightFetcher, PhotoAnnotation};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::json;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;

    fn test_state(gateway: InMemoryInsightGateway) -> AppState {
        let metrics = PrometheusBuilder::new()
            .build_recorder()
            .handle();
        AppState {
            readiness: Arc::new(AtomicBool::new(true)),
            metrics: Arc::new(metrics),
            media: MediaConfig::default(),
            insights: Arc::new(gateway),
            fetcher: InsightFetcher::new(Duration::ZERO),
        }
    }

    #[tokio::test]
    async fn comps_report_endpoint_summarizes_and_excludes() {
        let request = CompsReportRequest {
            records: vec![
                json!({ "type": "Sale", "status": "Sld", "soldPrice": "$250,000" }),
                json!({ "type": "Lease", "listPrice": 1500 }),
            ],
            include_comparables: true,
        };

        let Json(body) = comps_report_endpoint(Json(request)).await;

        assert_eq!(body.comparable_count, 1);
        assert_eq!(body.excluded, 1);
        let comparables = body.comparables.expect("comparables included");
        assert_eq!(comparables[0].sold_price, Some(250_000.0));
    }

    #[tokio::test]
    async fn export_endpoint_serves_csv_attachment() {
        let state = test_state(InMemoryInsightGateway::default());
        let app = app_router(state);

        let payload = json!({
            "records": [
                { "type": "Sale", "status": "Active", "listPrice": 325000 }
            ]
        });
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/comps/export")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(payload.to_string()))
                    .expect("request builds"),
            )
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .expect("content type set");
        assert_eq!(content_type, "text/csv");
    }

    #[tokio::test]
    async fn photo_plan_endpoint_degrades_when_insights_missing() {
        let gateway = InMemoryInsightGateway::default();
        gateway.seed(
            "DM1",
            vec![PhotoAnnotation {
                url: "listings/dm1/1.jpg".to_string(),
                classification: Some("Front of Structure".to_string()),
                confidence: Some(0.9),
                quality_tier: None,
                quality_score: None,
            }],
        );
        let state = test_state(gateway);

        let request = PhotoPlanRequest {
            properties: vec![
                PhotoPlanProperty {
                    mls_number: "DM1".to_string(),
                    photos: vec!["listings/dm1/1.jpg".to_string()],
                },
                PhotoPlanProperty {
                    mls_number: "DM2".to_string(),
                    photos: vec!["listings/dm2/1.jpg".to_string()],
                },
            ],
        };

        let response = photo_plan_endpoint(Extension(state), Json(request)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body reads");
        let body: serde_json::Value = serde_json::from_slice(&bytes).expect("json body");
        let properties = body["properties"].as_array().expect("properties array");

        assert_eq!(properties[0]["insights_available"], json!(true));
        assert!(properties[0]["plan"]["main"]["ai_selected"].as_bool().unwrap());
        assert_eq!(properties[1]["insights_available"], json!(false));
        assert!(properties[1]["default_photos"].is_array());
    }
}
