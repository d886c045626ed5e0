use comps_ai::workflows::comps::domain::{CanonicalStatus, MetricKind, ADDRESS_UNAVAILABLE};
use comps_ai::workflows::comps::{export, market_statistic, ComparablePipeline};
use serde_json::json;
use std::io::Cursor;

fn provider_payload() -> serde_json::Value {
    json!([
        {
            "mlsNumber": "DM55011",
            "type": "Sale",
            "status": "Active",
            "lastStatus": "Sld",
            "listPrice": "\"415,000\"",
            "soldPrice": "$402,500",
            "details": { "sqft": "1,850", "numBedrooms": 3, "numBathrooms": "2" },
            "lot": { "squareFeet": 15246 },
            "daysOnMarket": 21,
            "address": {
                "streetNumber": "4117",
                "streetName": "Urbandale",
                "streetSuffix": "Ave",
                "city": "Des Moines",
                "state": "IA",
                "zip": "50310"
            },
            "map": { "latitude": 41.6195, "longitude": -93.6713 },
            "images": ["listings/dm55011/1.jpg", "listings/dm55011/2.jpg"]
        },
        {
            "mlsNumber": "DM55300",
            "type": "Sale",
            "status": "Active Under Contract",
            "listPrice": 389_900,
            "lotAcres": 0.02,
            "fullAddress": "212 Main St SW, Ankeny, IA 50023"
        },
        {
            "mlsNumber": "DM55412",
            "type": "Lease",
            "status": "Active",
            "listPrice": 1_800
        },
        {
            "mlsNumber": "DM55413",
            "status": "Coming Soon-ish"
        }
    ])
}

#[test]
fn pipeline_filters_extracts_and_classifies() {
    let records = provider_payload();
    let set = ComparablePipeline::from_reader(Cursor::new(records.to_string()))
        .expect("payload parses");

    assert_eq!(set.excluded, 1, "lease record never becomes a comparable");
    assert_eq!(set.comparables.len(), 3);

    let closed = &set.comparables[0];
    assert_eq!(closed.status, CanonicalStatus::Closed, "last status outranks stale Active");
    assert_eq!(closed.sold_price, Some(402_500.0));
    assert_eq!(closed.list_price, Some(415_000.0));
    assert_eq!(closed.sqft, Some(1_850.0));
    assert_eq!(closed.beds, Some(3.0));
    let acres = closed.lot_acres.expect("nested lot sqft converts");
    assert!((acres - 15_246.0 / 43_560.0).abs() < 1e-9);
    assert_eq!(closed.address, "4117 Urbandale Ave, Des Moines, IA 50310");
    assert_eq!(closed.photos.len(), 2);

    let pending = &set.comparables[1];
    assert_eq!(pending.status, CanonicalStatus::Pending);
    assert_eq!(pending.address, "212 Main St SW, Ankeny, IA 50023");
    assert_eq!(pending.sold_price, None, "missing price stays None, not zero");

    let sparse = &set.comparables[2];
    assert_eq!(sparse.status, CanonicalStatus::Unknown);
    assert_eq!(sparse.address, ADDRESS_UNAVAILABLE);
    assert_eq!(sparse.list_price, None);
    assert_eq!(sparse.lot_acres, None);
}

#[test]
fn statistics_respect_filters_and_sanity_bounds() {
    let records = provider_payload();
    let set = ComparablePipeline::from_reader(Cursor::new(records.to_string()))
        .expect("payload parses");

    let list_price = market_statistic(&set.comparables, MetricKind::ListPrice);
    assert_eq!(list_price.min, 389_900.0);
    assert_eq!(list_price.max, 415_000.0);
    assert_eq!(list_price.median, (389_900.0 + 415_000.0) / 2.0);

    // The 0.02-acre lot is below the ratio floor and the sparse record has
    // no lot at all, so only the first comparable feeds price-per-acre.
    let per_acre = market_statistic(&set.comparables, MetricKind::PricePerAcre);
    let expected = 402_500.0 / (15_246.0 / 43_560.0);
    assert!((per_acre.median - expected).abs() < 1e-6);
    assert_eq!(per_acre.min, per_acre.max);

    let summary = set.summary();
    assert_eq!(summary.comparable_count, 3);
    let per_acre_entry = summary
        .metrics
        .iter()
        .find(|entry| entry.metric == MetricKind::PricePerAcre)
        .expect("per-acre entry present");
    assert_eq!(per_acre_entry.samples, 1);
}

#[test]
fn empty_payload_produces_zeroed_statistics() {
    let set = ComparablePipeline::from_reader(Cursor::new("[]")).expect("empty array parses");
    assert!(set.comparables.is_empty());

    let stat = market_statistic(&set.comparables, MetricKind::SoldPrice);
    assert_eq!(stat.average, 0.0);
    assert_eq!(stat.median, 0.0);
    assert!(stat.average.is_finite());
}

#[test]
fn non_array_payload_is_a_typed_error() {
    let error = ComparablePipeline::from_reader(Cursor::new("{\"listings\": []}"))
        .expect_err("object payload rejected");
    assert!(error.to_string().contains("JSON array"));
}

#[test]
fn csv_export_round_trips_through_a_buffer() {
    let records = provider_payload();
    let set = ComparablePipeline::from_reader(Cursor::new(records.to_string()))
        .expect("payload parses");

    let mut buffer = Vec::new();
    export::write_csv(&set.comparables, &mut buffer).expect("csv writes");
    let rendered = String::from_utf8(buffer).expect("valid utf8");

    assert_eq!(rendered.lines().count(), 1 + set.comparables.len());
    assert!(rendered.contains("4117 Urbandale Ave"));
    assert!(rendered.contains("Closed"));
}
