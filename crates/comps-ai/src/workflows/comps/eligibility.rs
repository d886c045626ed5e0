use super::record::RawRecord;

// Fields that can carry a lease/rental signal. The exact-match check on the
// transaction `type` runs before the substring pass; free-text description
// fields are never consulted.
const EXACT_TYPE_PATHS: &[&str] = &["type"];
const EXACT_TYPE_VALUES: &[&str] = &["lease", "rental", "rent"];

const KEYWORD_PATHS: &[&str] = &[
    "transactionType",
    "listingCategory",
    "category",
    "propertyType",
    "propertySubType",
    "details.propertyType",
    "details.propertySubType",
    "class",
];
const KEYWORDS: &[&str] = &["lease", "rental", "rent"];

const LEASE_TYPE_PATHS: &[&str] = &["leaseType", "details.leaseType"];

/// Gate applied before a raw record is ever extracted into a comparable.
/// Pure and idempotent; a record it excludes never reaches the statistics
/// aggregator or any downstream report.
pub fn is_rental(record: &RawRecord) -> bool {
    for path in EXACT_TYPE_PATHS {
        if let Some(value) = record.string_field(path) {
            let normalized = value.trim().to_ascii_lowercase();
            if EXACT_TYPE_VALUES.contains(&normalized.as_str()) {
                return true;
            }
        }
    }

    for path in KEYWORD_PATHS {
        if let Some(value) = record.string_field(path) {
            let normalized = value.to_ascii_lowercase();
            if KEYWORDS.iter().any(|keyword| normalized.contains(keyword)) {
                return true;
            }
        }
    }

    // A dedicated lease-type field only exists on lease listings; its
    // presence is the signal regardless of what it holds.
    LEASE_TYPE_PATHS
        .iter()
        .any(|path| record.field(path).is_some())
}
