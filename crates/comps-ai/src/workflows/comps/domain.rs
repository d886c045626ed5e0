use serde::{Deserialize, Serialize};

/// Normalized listing state, distinct from raw provider status strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalStatus {
    Active,
    Pending,
    Closed,
    Leasing,
    Withdrawn,
    Expired,
    Unknown,
}

impl CanonicalStatus {
    pub const fn ordered() -> [Self; 7] {
        [
            Self::Active,
            Self::Pending,
            Self::Closed,
            Self::Leasing,
            Self::Withdrawn,
            Self::Expired,
            Self::Unknown,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Pending => "Pending",
            Self::Closed => "Closed",
            Self::Leasing => "Leasing",
            Self::Withdrawn => "Withdrawn",
            Self::Expired => "Expired",
            Self::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Sentinel used when no address field of any shape could be recovered.
pub const ADDRESS_UNAVAILABLE: &str = "Address unavailable";

/// Canonical comparable record. Every numeric field is `None` when the raw
/// record carried nothing recoverable; `0` is never used to mean "missing."
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comparable {
    pub address: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub mls_number: Option<String>,
    pub list_price: Option<f64>,
    pub sold_price: Option<f64>,
    pub sqft: Option<f64>,
    pub lot_acres: Option<f64>,
    pub beds: Option<f64>,
    pub baths: Option<f64>,
    pub days_on_market: Option<f64>,
    pub status: CanonicalStatus,
    pub coordinates: Option<Coordinates>,
    pub photos: Vec<String>,
}

impl Comparable {
    /// Price basis for derived ratios: the sale price once a transaction has
    /// closed, otherwise the list price.
    pub fn effective_price(&self) -> Option<f64> {
        self.sold_price.or(self.list_price)
    }
}

/// Aggregate over one numeric metric; zero-filled when the input set is empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketStatistic {
    pub min: f64,
    pub max: f64,
    pub average: f64,
    pub median: f64,
}

/// Metrics the aggregator knows how to compute across a comparable set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    ListPrice,
    SoldPrice,
    Sqft,
    LotAcres,
    Beds,
    Baths,
    DaysOnMarket,
    PricePerSqft,
    PricePerAcre,
}

impl MetricKind {
    pub const fn ordered() -> [Self; 9] {
        [
            Self::ListPrice,
            Self::SoldPrice,
            Self::Sqft,
            Self::LotAcres,
            Self::Beds,
            Self::Baths,
            Self::DaysOnMarket,
            Self::PricePerSqft,
            Self::PricePerAcre,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::ListPrice => "List Price",
            Self::SoldPrice => "Sold Price",
            Self::Sqft => "Square Feet",
            Self::LotAcres => "Lot Acres",
            Self::Beds => "Bedrooms",
            Self::Baths => "Bathrooms",
            Self::DaysOnMarket => "Days on Market",
            Self::PricePerSqft => "Price per Sq Ft",
            Self::PricePerAcre => "Price per Acre",
        }
    }
}
