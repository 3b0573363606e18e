//! Response extraction: display-API JSON → [`ProductRecord`]s.
//!
//! ## Observed payload shape
//!
//! ```text
//! { "ads": [ { "products": [ { "productId": .., "price": { "value": .. }, .. } ] } ] }
//! ```
//!
//! Extraction is forgiving: a missing `ads` key, ad groups without
//! `products`, and missing product fields all degrade to "nothing" or to
//! empty/zero defaults. An empty result is the API's end-of-listing signal,
//! not an error.

use adscout_core::{ProductFields, ProductRecord};
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::ScraperError;
use crate::extract_helpers::{nested_number, number, string_list, text};

/// Extracts every product in `payload`, in payload order, stamping each with
/// `page` and `scraped_at`.
#[must_use]
pub fn extract_products(payload: &Value, page: u32, scraped_at: DateTime<Utc>) -> Vec<ProductRecord> {
    let Some(ads) = payload.get("ads").and_then(Value::as_array) else {
        return Vec::new();
    };
    tracing::debug!(page, ad_groups = ads.len(), "found ad groups");

    let mut records = Vec::new();
    for (ad_index, ad) in ads.iter().enumerate() {
        let Some(products) = ad.get("products").and_then(Value::as_array) else {
            continue;
        };
        tracing::debug!(page, ad = ad_index + 1, products = products.len(), "ad group");
        records.extend(
            products
                .iter()
                .map(|product| ProductRecord::new(product_fields(product), page, scraped_at)),
        );
    }
    records
}

/// Parses a response body and extracts its products, stamped with the
/// current time.
///
/// # Errors
///
/// Returns [`ScraperError::Deserialize`] if `body` is not JSON at all.
/// Well-formed JSON of the wrong shape is not an error; it yields no records.
pub fn extract_page(body: &str, page: u32) -> Result<Vec<ProductRecord>, ScraperError> {
    let payload: Value = serde_json::from_str(body).map_err(|e| ScraperError::Deserialize {
        context: format!("listing page {page}"),
        source: e,
    })?;
    Ok(extract_products(&payload, page, Utc::now()))
}

fn product_fields(product: &Value) -> ProductFields {
    ProductFields {
        product_id: text(product, "productId"),
        name: text(product, "name"),
        brand: text(product, "brand"),
        price: nested_number(product, "price", "value"),
        original_price: nested_number(product, "originalPrice", "value"),
        discount_rate: number(product, "discountRate"),
        image_url: text(product, "imageUrl"),
        product_url: text(product, "productUrl"),
        merchant_name: text(product, "merchantName"),
        category: text(product, "catalogName"),
        sku: text(product, "sku"),
        main_category_id: text(product, "mainCategoryId"),
        listing_id: text(product, "listingId"),
        tags: string_list(product, "tags"),
    }
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
