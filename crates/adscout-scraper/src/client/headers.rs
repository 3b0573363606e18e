//! Conversion of [`HeaderProfile`] values into wire headers.

use adscout_core::HeaderProfile;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::error::ScraperError;

/// Builds a `HeaderMap` from `profile`, preserving profile order.
///
/// # Errors
///
/// Returns [`ScraperError::InvalidHeader`] if a name is not a valid HTTP token
/// or a value contains bytes that cannot appear in a header.
pub fn header_map(profile: &HeaderProfile) -> Result<HeaderMap, ScraperError> {
    let mut map = HeaderMap::with_capacity(profile.headers().len());
    for (name, value) in profile.headers() {
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| ScraperError::InvalidHeader {
                name: name.clone(),
                reason: e.to_string(),
            })?;
        let header_value = HeaderValue::from_str(value).map_err(|e| ScraperError::InvalidHeader {
            name: name.clone(),
            reason: e.to_string(),
        })?;
        map.insert(header_name, header_value);
    }
    Ok(map)
}
