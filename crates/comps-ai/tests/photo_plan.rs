use std::collections::HashSet;

use comps_ai::config::MediaConfig;
use comps_ai::workflows::media::{
    annotate_photos, default_selection, select_slots, PhotoAnnotation,
};

fn property_photos() -> Vec<String> {
    vec![
        "listings/dm55011/1.jpg".to_string(),
        "listings/dm55011/2.jpg".to_string(),
        "listings/dm55011/3.jpg".to_string(),
        "listings/dm55011/4.jpg".to_string(),
    ]
}

fn provider_annotations() -> Vec<PhotoAnnotation> {
    vec![
        PhotoAnnotation {
            url: "listings/dm55011/1.jpg".to_string(),
            classification: Some("Front of Structure".to_string()),
            confidence: Some(0.91),
            quality_tier: None,
            quality_score: Some(82.0),
        },
        PhotoAnnotation {
            url: "listings/dm55011/2.jpg".to_string(),
            classification: Some("Kitchen".to_string()),
            confidence: Some(88.0),
            quality_tier: None,
            quality_score: None,
        },
        PhotoAnnotation {
            url: "listings/dm55011/3.jpg".to_string(),
            classification: Some("Living Room".to_string()),
            confidence: Some(0.76),
            quality_tier: None,
            quality_score: None,
        },
    ]
}

#[test]
fn annotated_property_fills_all_three_slots() {
    let media = MediaConfig::default();
    let candidates = annotate_photos(&property_photos(), &provider_annotations(), &media.cdn_base);
    let plan = select_slots(&candidates, &media.cdn_base);

    assert!(plan.main.ai_selected);
    assert!(plan.main.url.as_deref().unwrap_or_default().ends_with("/1.jpg"));
    assert!(plan.kitchen.url.as_deref().unwrap_or_default().ends_with("/2.jpg"));
    assert!(plan.room.url.as_deref().unwrap_or_default().ends_with("/3.jpg"));
    assert!(plan.missing_categories.is_empty());

    let urls: Vec<&str> = plan
        .selections()
        .iter()
        .filter_map(|selection| selection.url.as_deref())
        .collect();
    let unique: HashSet<&str> = urls.iter().copied().collect();
    assert_eq!(urls.len(), unique.len(), "no URL serves two slots");

    for url in urls {
        assert!(url.starts_with(&media.cdn_base), "relative URLs resolved: {url}");
    }
}

#[test]
fn unannotated_property_degrades_to_positional_defaults() {
    let media = MediaConfig::default();
    let photos = property_photos();

    // Insights unavailable: callers fall back to the first N photos.
    let defaults = default_selection(&photos, 3, &media.cdn_base);
    assert_eq!(defaults.len(), 3);
    assert!(defaults[0].ends_with("/1.jpg"));

    // Running the selector on bare candidates still yields a cover photo.
    let candidates = annotate_photos(&photos, &[], &media.cdn_base);
    let plan = select_slots(&candidates, &media.cdn_base);
    assert!(plan.main.url.is_some());
    assert!(!plan.main.ai_selected);
    assert!(plan.kitchen.url.is_none());
    assert!(plan.room.url.is_none());
    assert_eq!(
        plan.missing_categories,
        vec!["Exterior", "Kitchen", "Living Room"]
    );
}
