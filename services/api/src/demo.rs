use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use comps_ai::config::MediaConfig;
use comps_ai::error::AppError;
use comps_ai::workflows::comps::domain::Comparable;
use comps_ai::workflows::comps::{export, ComparablePipeline, ComparableSet};
use comps_ai::workflows::media::{
    annotate_photos, default_selection, select_slots, InsightFetcher, PhotoAnnotation,
};

use crate::infra::InMemoryInsightGateway;

#[derive(Args, Debug, Default)]
pub(crate) struct CompsReportArgs {
    /// Raw listing export (JSON array). Defaults to a built-in fixture.
    #[arg(long)]
    pub(crate) input: Option<PathBuf>,
    /// Write the canonical comparable set to this CSV path.
    #[arg(long)]
    pub(crate) csv_out: Option<PathBuf>,
    /// Print every canonical comparable, not just the summary.
    #[arg(long)]
    pub(crate) list_comparables: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Raw listing export (JSON array). Defaults to a built-in fixture.
    #[arg(long)]
    pub(crate) input: Option<PathBuf>,
    /// Print every canonical comparable in the comps portion of the demo.
    #[arg(long)]
    pub(crate) list_comparables: bool,
    /// Skip the photo-selection portion of the demo.
    #[arg(long)]
    pub(crate) skip_photos: bool,
}

pub(crate) fn run_comps_report(args: CompsReportArgs) -> Result<(), AppError> {
    let CompsReportArgs {
        input,
        csv_out,
        list_comparables,
    } = args;

    let (set, imported) = load_comparable_set(input)?;
    render_market_report(&set, imported, list_comparables);

    if let Some(path) = csv_out {
        let file = std::fs::File::create(&path)?;
        export::write_csv(&set.comparables, file)
            .map_err(|err| AppError::Io(std::io::Error::other(err)))?;
        println!("\nWrote {} comparables to {}", set.comparables.len(), path.display());
    }

    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        input,
        list_comparables,
        skip_photos,
    } = args;

    println!("Comparable market engine demo");
    let (set, imported) = load_comparable_set(input)?;
    render_market_report(&set, imported, list_comparables);

    if skip_photos {
        return Ok(());
    }

    println!("\nPhoto slot selection demo");
    let media = MediaConfig::default();
    let gateway = InMemoryInsightGateway::default();
    let subject = set
        .comparables
        .iter()
        .find(|comparable| !comparable.photos.is_empty());
    let Some(subject) = subject else {
        println!("- No comparable carries photos; skipping photo selection");
        return Ok(());
    };
    let mls_number = subject
        .mls_number
        .clone()
        .unwrap_or_else(|| "unknown-listing".to_string());
    gateway.seed(&mls_number, demo_annotations(&subject.photos));

    let fetcher = InsightFetcher::new(Duration::ZERO);
    let gateway: Arc<InMemoryInsightGateway> = Arc::new(gateway);
    let ticket = fetcher.begin();
    let fetched = fetcher
        .run(ticket, gateway.as_ref(), std::slice::from_ref(&mls_number))
        .await;
    let listing = match fetched {
        Ok(mut listings) => listings.remove(0),
        Err(superseded) => {
            println!("- Photo insight fetch aborted: {superseded}");
            return Ok(());
        }
    };

    println!("Subject: {} ({})", subject.address, mls_number);
    if !listing.available {
        let defaults = default_selection(&subject.photos, 3, &media.cdn_base);
        println!("- Insights unavailable; positional defaults:");
        for url in defaults {
            println!("  - {url}");
        }
        return Ok(());
    }

    let candidates = annotate_photos(&subject.photos, &listing.annotations, &media.cdn_base);
    let plan = select_slots(&candidates, &media.cdn_base);
    for selection in plan.selections() {
        let url = selection.url.as_deref().unwrap_or("(unfilled)");
        let mut notes = Vec::new();
        if selection.ai_selected {
            notes.push("AI-selected");
        }
        if selection.category_mismatch {
            notes.push("category mismatch");
        }
        let notes = if notes.is_empty() {
            String::new()
        } else {
            format!(" [{}]", notes.join(", "))
        };
        println!(
            "- {:?}: {url}{notes} ({})",
            selection.slot, selection.reason
        );
    }
    if !plan.missing_categories.is_empty() {
        println!("Missing categories: {}", plan.missing_categories.join(", "));
    }

    Ok(())
}

fn load_comparable_set(input: Option<PathBuf>) -> Result<(ComparableSet, bool), AppError> {
    match input {
        Some(path) => ComparablePipeline::from_path(path)
            .map(|set| (set, true))
            .map_err(AppError::from),
        None => {
            let set = ComparablePipeline::from_values(demo_records());
            Ok((set, false))
        }
    }
}

fn render_market_report(set: &ComparableSet, imported: bool, list_comparables: bool) {
    println!("Comparable market report");
    if imported {
        println!("Data source: provider export file");
    } else {
        println!("Data source: built-in demo fixture");
    }

    println!(
        "\n{} comparables ({} rental/lease records excluded)",
        set.comparables.len(),
        set.excluded
    );

    let summary = set.summary();
    println!("\nStatus breakdown");
    for entry in &summary.status_breakdown {
        println!("- {}: {}", entry.status_label, entry.count);
    }

    println!("\nMarket statistics");
    for entry in &summary.metrics {
        if entry.samples == 0 {
            println!("- {}: no usable samples", entry.metric_label);
            continue;
        }
        println!(
            "- {}: median {:.0} | avg {:.0} | range {:.0} - {:.0} ({} samples)",
            entry.metric_label,
            entry.statistic.median,
            entry.statistic.average,
            entry.statistic.min,
            entry.statistic.max,
            entry.samples
        );
    }

    if list_comparables {
        println!("\nCanonical comparables");
        for comparable in &set.comparables {
            println!("- {}", describe_comparable(comparable));
        }
    }
}

fn describe_comparable(comparable: &Comparable) -> String {
    let price = comparable
        .effective_price()
        .map(|price| format!("${price:.0}"))
        .unwrap_or_else(|| "price unknown".to_string());
    let sqft = comparable
        .sqft
        .map(|sqft| format!("{sqft:.0} sqft"))
        .unwrap_or_else(|| "sqft unknown".to_string());
    format!(
        "{} | {} | {} | {}",
        comparable.address,
        comparable.status.label(),
        price,
        sqft
    )
}

pub(crate) fn demo_records() -> Vec<serde_json::Value> {
    let payload = serde_json::json!([
        {
            "mlsNumber": "DM55011",
            "type": "Sale",
            "status": "Active",
            "lastStatus": "Sld",
            "listPrice": "$415,000",
            "soldPrice": "402500",
            "details": { "sqft": "1,850", "numBedrooms": 3, "numBathrooms": 2 },
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
            "images": [
                "listings/dm55011/1.jpg",
                "listings/dm55011/2.jpg",
                "listings/dm55011/3.jpg"
            ]
        },
        {
            "mlsNumber": "DM55300",
            "type": "Sale",
            "status": "Active Under Contract",
            "listPrice": 389900,
            "details": { "sqft": 1620, "numBedrooms": 3, "numBathrooms": 2 },
            "lotAcres": 0.28,
            "fullAddress": "212 Main St SW, Ankeny, IA 50023",
            "daysOnMarket": "14"
        },
        {
            "mlsNumber": "DM55412",
            "type": "Lease",
            "status": "Active",
            "listPrice": 1800,
            "fullAddress": "840 Walnut St Unit 2, Des Moines, IA 50309"
        },
        {
            "mlsNumber": "DM55498",
            "type": "Sale",
            "status": "Pnd",
            "listPrice": "\"352,900\"",
            "lotSize": "0.31 acres",
            "displayAddress": "1401 Grand Ave, West Des Moines, IA"
        }
    ]);

    match payload {
        serde_json::Value::Array(records) => records,
        _ => Vec::new(),
    }
}

pub(crate) fn demo_annotations(photos: &[String]) -> Vec<PhotoAnnotation> {
    let classifications = [
        ("Front of Structure", 0.93_f64),
        ("Kitchen", 0.88),
        ("Living Room", 0.81),
    ];

    photos
        .iter()
        .zip(classifications.iter())
        .map(|(url, (classification, confidence))| PhotoAnnotation {
            url: url.clone(),
            classification: Some((*classification).to_string()),
            confidence: Some(*confidence),
            quality_tier: None,
            quality_score: None,
        })
        .collect()
}
