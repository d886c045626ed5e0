use chrono::{DateTime, NaiveDate};

use super::domain::{Comparable, Coordinates, ADDRESS_UNAVAILABLE};
use super::record::{numeric_value, parse_numeric_str, string_value, RawRecord};
use super::status::normalize_status;

pub(crate) const SQFT_PER_ACRE: f64 = 43_560.0;

/// Magnitude cutoff for the combined "lot area" field: values above this are
/// assumed to be square feet, smaller values already acres.
const LOT_AREA_SQFT_CUTOFF: f64 = 100.0;

/// Declarative extraction rule for one numeric metric: ordered candidate
/// paths plus the domain-validity predicate. Keeping these as a table keeps
/// the precedence rules auditable in one place.
#[derive(Debug, Clone, Copy)]
pub(crate) struct NumericFieldSpec {
    pub(crate) paths: &'static [&'static str],
    pub(crate) validate: fn(f64) -> bool,
}

fn positive(value: f64) -> bool {
    value > 0.0
}

fn non_negative(value: f64) -> bool {
    value >= 0.0
}

pub(crate) const LIST_PRICE: NumericFieldSpec = NumericFieldSpec {
    paths: &["listPrice", "list_price", "listingPrice", "originalListPrice", "price"],
    validate: positive,
};

pub(crate) const SOLD_PRICE: NumericFieldSpec = NumericFieldSpec {
    paths: &["soldPrice", "sold_price", "closePrice", "salePrice", "salesPrice"],
    validate: positive,
};

pub(crate) const SQFT: NumericFieldSpec = NumericFieldSpec {
    paths: &["sqft", "squareFeet", "livingArea", "buildingAreaTotal", "details.sqft"],
    validate: positive,
};

pub(crate) const BEDS: NumericFieldSpec = NumericFieldSpec {
    paths: &["numBedrooms", "beds", "bedrooms", "bedroomsTotal", "details.numBedrooms"],
    validate: non_negative,
};

pub(crate) const BATHS: NumericFieldSpec = NumericFieldSpec {
    paths: &["numBathrooms", "baths", "bathrooms", "bathroomsTotal", "details.numBathrooms"],
    validate: non_negative,
};

pub(crate) const DAYS_ON_MARKET: NumericFieldSpec = NumericFieldSpec {
    paths: &["daysOnMarket", "dom", "daysOnMls", "cumulativeDaysOnMarket"],
    validate: non_negative,
};

/// Walk a spec's candidate paths and return the first value that parses and
/// validates. Exhausting the table yields `None`, never a placeholder zero.
pub(crate) fn extract_numeric(record: &RawRecord, spec: &NumericFieldSpec) -> Option<f64> {
    spec.paths
        .iter()
        .filter_map(|path| record.field(path))
        .filter_map(numeric_value)
        .find(|value| (spec.validate)(*value))
}

pub fn list_price(record: &RawRecord) -> Option<f64> {
    extract_numeric(record, &LIST_PRICE)
}

pub fn sold_price(record: &RawRecord) -> Option<f64> {
    extract_numeric(record, &SOLD_PRICE)
}

pub fn sqft(record: &RawRecord) -> Option<f64> {
    extract_numeric(record, &SQFT)
}

pub fn beds(record: &RawRecord) -> Option<f64> {
    extract_numeric(record, &BEDS)
}

pub fn baths(record: &RawRecord) -> Option<f64> {
    extract_numeric(record, &BATHS)
}

/// Days on market, with a date-span fallback: when every direct field is
/// missing, a closed listing's list and sold dates reconstruct it.
pub fn days_on_market(record: &RawRecord) -> Option<f64> {
    if let Some(direct) = extract_numeric(record, &DAYS_ON_MARKET) {
        return Some(direct);
    }

    let listed = date_field(record, &["listDate", "listingContractDate", "onMarketDate"])?;
    let sold = date_field(record, &["soldDate", "closeDate"])?;
    let span = (sold - listed).num_days();
    if span >= 0 {
        Some(span as f64)
    } else {
        None
    }
}

fn date_field(record: &RawRecord, paths: &[&str]) -> Option<NaiveDate> {
    paths
        .iter()
        .filter_map(|path| record.string_field(path))
        .find_map(|raw| parse_date(&raw))
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.date_naive());
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok()
}

/// Lot size in acres. The provider ships this in half a dozen shapes; each
/// step is tried in order and the first valid conversion wins.
pub fn lot_acres(record: &RawRecord) -> Option<f64> {
    // 1-2: explicit acre fields, flat then nested.
    if let Some(acres) = valid_lot(record.numeric_field("lotAcres")) {
        return Some(acres);
    }
    if let Some(acres) = valid_lot(record.numeric_field("lot.acres")) {
        return Some(acres);
    }

    // 3-4: explicit square-foot fields, flat then nested.
    if let Some(sqft) = valid_lot(record.numeric_field("lotSquareFeet")) {
        return Some(sqft / SQFT_PER_ACRE);
    }
    if let Some(sqft) = valid_lot(record.numeric_field("lot.squareFeet")) {
        return Some(sqft / SQFT_PER_ACRE);
    }

    // 5: combined area field with no declared unit; disambiguate by
    // magnitude, anything above the cutoff is square feet.
    if let Some(area) = valid_lot(record.numeric_field("lotSizeArea").or_else(|| record.numeric_field("lot.size"))) {
        return Some(area_to_acres(area));
    }

    // 6: free-form string, e.g. "0.35 acres" or "15246 sqft"; unit keyword
    // when present, magnitude heuristic otherwise.
    let raw = record
        .string_field("lotSize")
        .or_else(|| record.string_field("lotSizeDescription"))?;
    let number = valid_lot(leading_number(&raw))?;
    let lowered = raw.to_ascii_lowercase();
    if lowered.contains("acre") {
        Some(number)
    } else if lowered.contains("sqft") || lowered.contains("sq ft") || lowered.contains("square") {
        Some(number / SQFT_PER_ACRE)
    } else {
        Some(area_to_acres(number))
    }
}

fn valid_lot(value: Option<f64>) -> Option<f64> {
    value.filter(|parsed| *parsed > 0.0)
}

fn area_to_acres(area: f64) -> f64 {
    if area > LOT_AREA_SQFT_CUTOFF {
        area / SQFT_PER_ACRE
    } else {
        area
    }
}

/// First numeric token in a free-form measurement string.
fn leading_number(raw: &str) -> Option<f64> {
    let start = raw.find(|c: char| c.is_ascii_digit())?;
    let numeric: String = raw[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect();
    parse_numeric_str(&numeric)
}

const DIRECTIONALS: &[&str] = &["n", "s", "e", "w", "ne", "nw", "se", "sw"];

/// Assemble a display address: a pre-formatted field when the provider sent
/// one, otherwise street parts with normalized directionals, then city/state/
/// zip, then any transaction-level string. All inputs absent yields the
/// explicit sentinel so downstream rendering stays visually distinguishable.
pub fn assemble_address(record: &RawRecord) -> String {
    if let Some(full) = record
        .string_field("fullAddress")
        .or_else(|| record.string_field("address.fullAddress"))
        .or_else(|| record.string_field("unparsedAddress"))
    {
        return full;
    }

    let mut parts: Vec<String> = Vec::new();
    for path in [
        "address.streetNumber",
        "address.streetDirectionPrefix",
        "address.streetName",
        "address.streetSuffix",
        "address.streetDirection",
    ] {
        if let Some(part) = record.string_field(path) {
            parts.push(normalize_directional(&part));
        }
    }
    if let Some(unit) = record.string_field("address.unitNumber") {
        parts.push(format!("Unit {unit}"));
    }

    if !parts.is_empty() {
        let street = parts.join(" ");
        return match locality_suffix(record) {
            Some(suffix) => format!("{street}, {suffix}"),
            None => street,
        };
    }

    if let Some(transaction_level) = record
        .string_field("displayAddress")
        .or_else(|| record.string_field("transactionAddress"))
    {
        return transaction_level;
    }

    ADDRESS_UNAVAILABLE.to_string()
}

fn locality_suffix(record: &RawRecord) -> Option<String> {
    let city = city(record);
    let state = state(record);
    let zip = zip(record);

    let mut suffix = String::new();
    if let Some(city) = city {
        suffix.push_str(&city);
    }
    if let Some(state) = state {
        if !suffix.is_empty() {
            suffix.push_str(", ");
        }
        suffix.push_str(&state);
    }
    if let Some(zip) = zip {
        if !suffix.is_empty() {
            suffix.push(' ');
        }
        suffix.push_str(&zip);
    }

    if suffix.is_empty() {
        None
    } else {
        Some(suffix)
    }
}

/// Trailing periods stripped and short directionals upper-cased, so "n." and
/// "N" render identically.
fn normalize_directional(part: &str) -> String {
    let stripped = part.trim().trim_end_matches('.');
    if DIRECTIONALS.contains(&stripped.to_ascii_lowercase().as_str()) {
        stripped.to_ascii_uppercase()
    } else {
        stripped.to_string()
    }
}

pub fn city(record: &RawRecord) -> Option<String> {
    record
        .string_field("address.city")
        .or_else(|| record.string_field("city"))
}

pub fn state(record: &RawRecord) -> Option<String> {
    record
        .string_field("address.state")
        .or_else(|| record.string_field("state"))
}

pub fn zip(record: &RawRecord) -> Option<String> {
    record
        .string_field("address.zip")
        .or_else(|| record.string_field("zip"))
        .or_else(|| record.string_field("postalCode"))
}

pub fn mls_number(record: &RawRecord) -> Option<String> {
    record
        .string_field("mlsNumber")
        .or_else(|| record.string_field("mlsId"))
        .or_else(|| record.string_field("listingId"))
}

pub fn coordinates(record: &RawRecord) -> Option<Coordinates> {
    let latitude = record
        .numeric_field("map.latitude")
        .or_else(|| record.numeric_field("latitude"))?;
    let longitude = record
        .numeric_field("map.longitude")
        .or_else(|| record.numeric_field("longitude"))?;
    Some(Coordinates {
        latitude,
        longitude,
    })
}

pub fn photos(record: &RawRecord) -> Vec<String> {
    let Some(images) = record.field("images").or_else(|| record.field("photos")) else {
        return Vec::new();
    };
    let Some(entries) = images.as_array() else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| match entry {
            url @ serde_json::Value::String(_) => string_value(url),
            object => object.get("url").and_then(string_value),
        })
        .collect()
}

/// Reduce one raw record to the canonical schema. Pure and total: malformed
/// fields degrade to `None` rather than failing the record.
pub(crate) fn comparable_from_record(record: &RawRecord) -> Comparable {
    let status = normalize_status(
        record.string_field("status").as_deref(),
        record.string_field("lastStatus").as_deref(),
    );

    Comparable {
        address: assemble_address(record),
        city: city(record),
        state: state(record),
        zip: zip(record),
        mls_number: mls_number(record),
        list_price: list_price(record),
        sold_price: sold_price(record),
        sqft: sqft(record),
        lot_acres: lot_acres(record),
        beds: beds(record),
        baths: baths(record),
        days_on_market: days_on_market(record),
        status,
        coordinates: coordinates(record),
        photos: photos(record),
    }
}
