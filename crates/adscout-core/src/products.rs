use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Currency every sponsored-product price is quoted in.
pub const CURRENCY: &str = "TRY";

/// Raw field values for a [`ProductRecord`], gathered by the extractor before
/// the derived fields are computed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFields {
    pub product_id: String,
    pub name: String,
    pub brand: String,
    pub price: f64,
    pub original_price: f64,
    pub discount_rate: f64,
    pub image_url: String,
    pub product_url: String,
    pub merchant_name: String,
    pub category: String,
    pub sku: String,
    pub main_category_id: String,
    pub listing_id: String,
    pub tags: Vec<String>,
}

/// One normalized sponsored product, stamped with where and when it was scraped.
///
/// Fields are read-only outside this module: `savings` is derived from the
/// two prices in [`ProductRecord::new`]. Deserialization goes through the same
/// constructor, so stored `savings` and `currency` values are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredRecord")]
pub struct ProductRecord {
    product_id: String,
    name: String,
    brand: String,
    price: f64,
    original_price: f64,
    discount_rate: f64,
    currency: String,
    image_url: String,
    product_url: String,
    merchant_name: String,
    category: String,
    sku: String,
    main_category_id: String,
    listing_id: String,
    tags: Vec<String>,
    savings: f64,
    /// 1-based page number the record was extracted from.
    scraped_page: u32,
    scraped_at: DateTime<Utc>,
}

/// Serialized shape of a [`ProductRecord`]. Derived fields are accepted but
/// recomputed.
#[derive(Deserialize)]
struct StoredRecord {
    product_id: String,
    name: String,
    brand: String,
    price: f64,
    original_price: f64,
    discount_rate: f64,
    image_url: String,
    product_url: String,
    merchant_name: String,
    category: String,
    sku: String,
    main_category_id: String,
    listing_id: String,
    tags: Vec<String>,
    scraped_page: u32,
    scraped_at: DateTime<Utc>,
}

impl From<StoredRecord> for ProductRecord {
    fn from(stored: StoredRecord) -> Self {
        let fields = ProductFields {
            product_id: stored.product_id,
            name: stored.name,
            brand: stored.brand,
            price: stored.price,
            original_price: stored.original_price,
            discount_rate: stored.discount_rate,
            image_url: stored.image_url,
            product_url: stored.product_url,
            merchant_name: stored.merchant_name,
            category: stored.category,
            sku: stored.sku,
            main_category_id: stored.main_category_id,
            listing_id: stored.listing_id,
            tags: stored.tags,
        };
        Self::new(fields, stored.scraped_page, stored.scraped_at)
    }
}

impl ProductRecord {
    #[must_use]
    pub fn new(fields: ProductFields, scraped_page: u32, scraped_at: DateTime<Utc>) -> Self {
        let savings = fields.original_price - fields.price;
        Self {
            product_id: fields.product_id,
            name: fields.name,
            brand: fields.brand,
            price: fields.price,
            original_price: fields.original_price,
            discount_rate: fields.discount_rate,
            currency: CURRENCY.to_string(),
            image_url: fields.image_url,
            product_url: fields.product_url,
            merchant_name: fields.merchant_name,
            category: fields.category,
            sku: fields.sku,
            main_category_id: fields.main_category_id,
            listing_id: fields.listing_id,
            tags: fields.tags,
            savings,
            scraped_page,
            scraped_at,
        }
    }

    #[must_use]
    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn brand(&self) -> &str {
        &self.brand
    }

    #[must_use]
    pub fn price(&self) -> f64 {
        self.price
    }

    #[must_use]
    pub fn original_price(&self) -> f64 {
        self.original_price
    }

    /// Discount as a percentage, e.g. `15.0` for 15 % off.
    #[must_use]
    pub fn discount_rate(&self) -> f64 {
        self.discount_rate
    }

    #[must_use]
    pub fn currency(&self) -> &str {
        &self.currency
    }

    #[must_use]
    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    #[must_use]
    pub fn product_url(&self) -> &str {
        &self.product_url
    }

    #[must_use]
    pub fn merchant_name(&self) -> &str {
        &self.merchant_name
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[must_use]
    pub fn sku(&self) -> &str {
        &self.sku
    }

    #[must_use]
    pub fn main_category_id(&self) -> &str {
        &self.main_category_id
    }

    #[must_use]
    pub fn listing_id(&self) -> &str {
        &self.listing_id
    }

    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// `original_price - price`, fixed at creation.
    #[must_use]
    pub fn savings(&self) -> f64 {
        self.savings
    }

    #[must_use]
    pub fn scraped_page(&self) -> u32 {
        self.scraped_page
    }

    #[must_use]
    pub fn scraped_at(&self) -> DateTime<Utc> {
        self.scraped_at
    }

    /// Returns `true` when the listing advertises a positive discount.
    #[must_use]
    pub fn is_discounted(&self) -> bool {
        self.discount_rate > 0.0
    }
}
