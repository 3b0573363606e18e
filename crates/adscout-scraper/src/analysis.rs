//! Descriptive statistics over a scraped result set.

use std::collections::HashSet;
use std::fmt;

use adscout_core::{ProductRecord, CURRENCY};

/// Number of cheapest products listed in a summary.
const CHEAPEST_COUNT: usize = 5;

/// Price and discount statistics for a non-empty set of records.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultsSummary {
    pub total: usize,
    pub unique_brands: usize,
    pub unique_merchants: usize,
    pub mean_price: f64,
    pub median_price: f64,
    pub min_price: f64,
    pub max_price: f64,
    /// Records with `discount_rate > 0`.
    pub discounted: usize,
    /// Mean discount rate over discounted records only.
    pub mean_discount: Option<f64>,
    pub best_discount: Option<f64>,
    /// Up to five cheapest records, ties kept in input order.
    pub cheapest: Vec<ProductRecord>,
}

impl ResultsSummary {
    /// Returns `None` for an empty slice.
    #[must_use]
    pub fn from_records(records: &[ProductRecord]) -> Option<Self> {
        if records.is_empty() {
            return None;
        }

        let unique_brands = records
            .iter()
            .map(ProductRecord::brand)
            .collect::<HashSet<_>>()
            .len();
        let unique_merchants = records
            .iter()
            .map(ProductRecord::merchant_name)
            .collect::<HashSet<_>>()
            .len();

        let mut prices: Vec<f64> = records.iter().map(ProductRecord::price).collect();
        prices.sort_by(f64::total_cmp);
        let min_price = prices[0];
        let max_price = prices[prices.len() - 1];
        let mean_price = mean(&prices);
        let median_price = median(&prices);

        let discounts: Vec<f64> = records
            .iter()
            .filter(|r| r.is_discounted())
            .map(ProductRecord::discount_rate)
            .collect();
        let mean_discount = (!discounts.is_empty()).then(|| mean(&discounts));
        let best_discount = discounts.iter().copied().max_by(f64::total_cmp);

        let mut cheapest: Vec<ProductRecord> = records.to_vec();
        cheapest.sort_by(|a, b| a.price().total_cmp(&b.price()));
        cheapest.truncate(CHEAPEST_COUNT);

        Some(Self {
            total: records.len(),
            unique_brands,
            unique_merchants,
            mean_price,
            median_price,
            min_price,
            max_price,
            discounted: discounts.len(),
            mean_discount,
            best_discount,
            cheapest,
        })
    }
}

#[allow(clippy::cast_precision_loss)]
fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// `sorted` must be ascending and non-empty.
fn median(sorted: &[f64]) -> f64 {
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

impl fmt::Display for ResultsSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total products: {}", self.total)?;
        writeln!(f, "Unique brands:  {}", self.unique_brands)?;
        writeln!(f, "Merchants:      {}", self.unique_merchants)?;
        writeln!(f)?;
        writeln!(f, "Price analysis:")?;
        writeln!(f, "  Average: {:.0} {CURRENCY}", self.mean_price)?;
        writeln!(f, "  Median:  {:.0} {CURRENCY}", self.median_price)?;
        writeln!(
            f,
            "  Range:   {:.0} - {:.0} {CURRENCY}",
            self.min_price, self.max_price
        )?;
        if let (Some(mean_discount), Some(best)) = (self.mean_discount, self.best_discount) {
            writeln!(f)?;
            writeln!(f, "Discount analysis:")?;
            writeln!(f, "  Products on sale: {}", self.discounted)?;
            writeln!(f, "  Average discount: {mean_discount:.1}%")?;
            writeln!(f, "  Best deal:        {best:.0}% off")?;
        }
        writeln!(f)?;
        writeln!(f, "Cheapest {}:", self.cheapest.len())?;
        for record in &self.cheapest {
            let name: String = record.name().chars().take(40).collect();
            writeln!(
                f,
                "  {}: {name} - {:.0} {CURRENCY}",
                record.brand(),
                record.price()
            )?;
        }
        Ok(())
    }
}
