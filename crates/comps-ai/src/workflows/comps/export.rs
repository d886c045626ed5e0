use std::io::Write;

use super::domain::Comparable;

const HEADERS: &[&str] = &[
    "address",
    "city",
    "state",
    "zip",
    "mls_number",
    "status",
    "list_price",
    "sold_price",
    "sqft",
    "lot_acres",
    "beds",
    "baths",
    "days_on_market",
];

/// Write the comparable set as CSV for spreadsheet-bound consumers. Missing
/// values become empty cells, keeping "unknown" distinguishable from zero.
pub fn write_csv<W: Write>(comparables: &[Comparable], writer: W) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(HEADERS)?;

    for comparable in comparables {
        csv_writer.write_record([
            comparable.address.clone(),
            comparable.city.clone().unwrap_or_default(),
            comparable.state.clone().unwrap_or_default(),
            comparable.zip.clone().unwrap_or_default(),
            comparable.mls_number.clone().unwrap_or_default(),
            comparable.status.label().to_string(),
            optional_cell(comparable.list_price),
            optional_cell(comparable.sold_price),
            optional_cell(comparable.sqft),
            optional_cell(comparable.lot_acres),
            optional_cell(comparable.beds),
            optional_cell(comparable.baths),
            optional_cell(comparable.days_on_market),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

fn optional_cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::comps::domain::{CanonicalStatus, ADDRESS_UNAVAILABLE};

    #[test]
    fn csv_keeps_missing_values_as_empty_cells() {
        let comparable = Comparable {
            address: ADDRESS_UNAVAILABLE.to_string(),
            city: Some("Des Moines".to_string()),
            state: Some("IA".to_string()),
            zip: None,
            mls_number: Some("DM1234".to_string()),
            list_price: Some(250_000.0),
            sold_price: None,
            sqft: None,
            lot_acres: Some(0.25),
            beds: Some(3.0),
            baths: Some(2.0),
            days_on_market: None,
            status: CanonicalStatus::Active,
            coordinates: None,
            photos: Vec::new(),
        };

        let mut buffer = Vec::new();
        write_csv(&[comparable], &mut buffer).expect("csv writes");
        let rendered = String::from_utf8(buffer).expect("valid utf8");

        let mut lines = rendered.lines();
        assert!(lines.next().expect("header row").starts_with("address,city"));
        let row = lines.next().expect("data row");
        assert!(row.contains("Des Moines"));
        assert!(row.contains("Active"));
        assert!(row.contains(",,"), "missing sold price stays empty: {row}");
        assert!(!row.contains("NaN"));
    }
}
