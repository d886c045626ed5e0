use serde::Serialize;

use super::domain::{CanonicalStatus, Comparable, MarketStatistic, MetricKind};

/// Lots below this size make per-acre ratios meaningless; bad lot-size data
/// frequently shows up as a few hundredths of an acre.
pub(crate) const MIN_RATIO_LOT_ACRES: f64 = 0.05;

/// Plausible band for price-per-acre. Values outside are excluded from that
/// statistic only; the comparable itself stays in the set.
pub(crate) const PRICE_PER_ACRE_MIN: f64 = 5_000.0;
pub(crate) const PRICE_PER_ACRE_MAX: f64 = 5_000_000.0;

/// Range, mean, and median over a raw value list. Empty input returns the
/// zero-filled statistic; no `NaN` ever escapes.
pub fn statistic_over(values: &[f64]) -> MarketStatistic {
    let mut finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return MarketStatistic::default();
    }

    finite.sort_by(f64::total_cmp);
    let count = finite.len();
    let sum: f64 = finite.iter().sum();
    let median = if count % 2 == 0 {
        (finite[count / 2 - 1] + finite[count / 2]) / 2.0
    } else {
        finite[count / 2]
    };

    MarketStatistic {
        min: finite[0],
        max: finite[count - 1],
        average: sum / count as f64,
        median,
    }
}

/// Per-comparable values for one metric. Derived ratios are computed per
/// comparable here, never as a ratio of pre-aggregated sums.
pub fn metric_values(comparables: &[Comparable], metric: MetricKind) -> Vec<f64> {
    comparables
        .iter()
        .filter_map(|comparable| metric_value(comparable, metric))
        .filter(|value| value.is_finite())
        .collect()
}

fn metric_value(comparable: &Comparable, metric: MetricKind) -> Option<f64> {
    match metric {
        MetricKind::ListPrice => comparable.list_price,
        MetricKind::SoldPrice => comparable.sold_price,
        MetricKind::Sqft => comparable.sqft,
        MetricKind::LotAcres => comparable.lot_acres,
        MetricKind::Beds => comparable.beds,
        MetricKind::Baths => comparable.baths,
        MetricKind::DaysOnMarket => comparable.days_on_market,
        MetricKind::PricePerSqft => {
            let price = comparable.effective_price()?;
            let sqft = comparable.sqft.filter(|area| *area > 0.0)?;
            Some(price / sqft)
        }
        MetricKind::PricePerAcre => {
            let price = comparable.effective_price()?;
            let acres = comparable
                .lot_acres
                .filter(|acres| *acres >= MIN_RATIO_LOT_ACRES)?;
            let ratio = price / acres;
            (PRICE_PER_ACRE_MIN..=PRICE_PER_ACRE_MAX)
                .contains(&ratio)
                .then_some(ratio)
        }
    }
}

pub fn market_statistic(comparables: &[Comparable], metric: MetricKind) -> MarketStatistic {
    statistic_over(&metric_values(comparables, metric))
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricStatisticEntry {
    pub metric: MetricKind,
    pub metric_label: &'static str,
    pub samples: usize,
    pub statistic: MarketStatistic,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusCountEntry {
    pub status: CanonicalStatus,
    pub status_label: &'static str,
    pub count: usize,
}

/// Labeled per-metric aggregates for report and flyer consumers.
#[derive(Debug, Clone, Serialize)]
pub struct MarketSummary {
    pub comparable_count: usize,
    pub status_breakdown: Vec<StatusCountEntry>,
    pub metrics: Vec<MetricStatisticEntry>,
}

impl MarketSummary {
    pub fn from_comparables(comparables: &[Comparable]) -> Self {
        let status_breakdown = CanonicalStatus::ordered()
            .into_iter()
            .filter_map(|status| {
                let count = comparables
                    .iter()
                    .filter(|comparable| comparable.status == status)
                    .count();
                (count > 0).then_some(StatusCountEntry {
                    status,
                    status_label: status.label(),
                    count,
                })
            })
            .collect();

        let metrics = MetricKind::ordered()
            .into_iter()
            .map(|metric| {
                let values = metric_values(comparables, metric);
                MetricStatisticEntry {
                    metric,
                    metric_label: metric.label(),
                    samples: values.len(),
                    statistic: statistic_over(&values),
                }
            })
            .collect();

        Self {
            comparable_count: comparables.len(),
            status_breakdown,
            metrics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::comps::domain::ADDRESS_UNAVAILABLE;

    fn comparable() -> Comparable {
        Comparable {
            address: ADDRESS_UNAVAILABLE.to_string(),
            city: None,
            state: None,
            zip: None,
            mls_number: None,
            list_price: None,
            sold_price: None,
            sqft: None,
            lot_acres: None,
            beds: None,
            baths: None,
            days_on_market: None,
            status: CanonicalStatus::Closed,
            coordinates: None,
            photos: Vec::new(),
        }
    }

    #[test]
    fn median_handles_odd_and_even_counts() {
        let odd = statistic_over(&[300_000.0, 200_000.0, 250_000.0]);
        assert_eq!(odd.median, 250_000.0);

        let even = statistic_over(&[200_000.0, 300_000.0]);
        assert_eq!(even.median, 250_000.0);
        assert_eq!(even.average, 250_000.0);
        assert_eq!(even.min, 200_000.0);
        assert_eq!(even.max, 300_000.0);
    }

    #[test]
    fn empty_input_returns_zeroed_statistic() {
        let stat = statistic_over(&[]);
        assert_eq!(stat, MarketStatistic::default());

        let all_nan = statistic_over(&[f64::NAN, f64::INFINITY]);
        assert_eq!(all_nan, MarketStatistic::default());
    }

    #[test]
    fn derived_ratio_is_per_comparable_not_ratio_of_sums() {
        let mut cheap = comparable();
        cheap.sold_price = Some(100_000.0);
        cheap.sqft = Some(1_000.0);
        let mut pricey = comparable();
        pricey.sold_price = Some(900_000.0);
        pricey.sqft = Some(3_000.0);

        let stat = market_statistic(&[cheap, pricey], MetricKind::PricePerSqft);
        // (100 + 300) / 2, not (100k + 900k) / (1k + 3k).
        assert_eq!(stat.average, 200.0);
    }

    #[test]
    fn price_per_acre_applies_sanity_bounds() {
        let mut sliver = comparable();
        sliver.sold_price = Some(250_000.0);
        sliver.lot_acres = Some(0.01);

        let mut typo = comparable();
        typo.sold_price = Some(250_000.0);
        typo.lot_acres = Some(4_000.0); // sqft mis-keyed as acres

        let mut sane = comparable();
        sane.sold_price = Some(250_000.0);
        sane.lot_acres = Some(0.5);

        let comps = [sliver, typo, sane];
        let values = metric_values(&comps, MetricKind::PricePerAcre);
        assert_eq!(values, vec![500_000.0]);

        // The rejected comparables still count toward every other metric.
        assert_eq!(metric_values(&comps, MetricKind::SoldPrice).len(), 3);
    }

    #[test]
    fn effective_price_prefers_sold_over_list() {
        let mut comp = comparable();
        comp.list_price = Some(300_000.0);
        comp.sold_price = Some(290_000.0);
        comp.lot_acres = Some(1.0);

        let values = metric_values(&[comp], MetricKind::PricePerAcre);
        assert_eq!(values, vec![290_000.0]);
    }

    #[test]
    fn summary_reports_samples_and_status_counts() {
        let mut closed = comparable();
        closed.sold_price = Some(250_000.0);
        let mut active = comparable();
        active.status = CanonicalStatus::Active;
        active.list_price = Some(275_000.0);

        let summary = MarketSummary::from_comparables(&[closed, active]);
        assert_eq!(summary.comparable_count, 2);
        assert_eq!(summary.status_breakdown.len(), 2);

        let sold = summary
            .metrics
            .iter()
            .find(|entry| entry.metric == MetricKind::SoldPrice)
            .expect("sold price entry");
        assert_eq!(sold.samples, 1);
        assert_eq!(sold.statistic.median, 250_000.0);

        let beds = summary
            .metrics
            .iter()
            .find(|entry| entry.metric == MetricKind::Beds)
            .expect("beds entry");
        assert_eq!(beds.samples, 0);
        assert_eq!(beds.statistic, MarketStatistic::default());
    }
}
