//! Delivery pricing by postcode zone
//!
//! A UK postcode splits into an outward code (`TA21`) and an inward code
//! (`9RH`). Zone prefixes that contain a digit name a whole outward code
//! (district); prefixes made only of letters name a postcode area. The
//! first zone in [`ZONES`] with a matching prefix wins.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::catalog::{find_size, DeliveryZone, ZONES};
use crate::models::FulfillmentType;
use crate::{Error, Result};

static UK_POSTCODE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[A-Z]{1,2}[0-9][A-Z0-9]? ?[0-9][A-Z]{2}$").expect("postcode regex is valid")
});

/// Trim, uppercase and collapse internal whitespace to single spaces
pub fn normalize_postcode(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

pub fn is_valid_uk_postcode(postcode: &str) -> bool {
    UK_POSTCODE.is_match(&normalize_postcode(postcode))
}

/// Outward code of a postcode, e.g. `TA21` for `TA21 9RH`
pub fn outward_code(postcode: &str) -> String {
    let compact: Vec<char> = normalize_postcode(postcode)
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    let end = if compact.len() > 3 { compact.len() - 3 } else { compact.len() };
    compact[..end].iter().collect()
}

/// Postcode area (leading letters), e.g. `TA` for `TA21 9RH`
pub fn postcode_area(postcode: &str) -> String {
    outward_code(postcode)
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect()
}

fn prefix_matches(prefix: &str, outward: &str, area: &str) -> bool {
    if prefix.chars().any(|c| c.is_ascii_digit()) {
        prefix == outward
    } else {
        prefix == area
    }
}

/// Resolve the delivery zone for a postcode
///
/// Falls through to the catch-all zone when no prefix matches.
pub fn resolve_zone(postcode: &str) -> &'static DeliveryZone {
    let outward = outward_code(postcode);
    let area = postcode_area(postcode);

    ZONES
        .iter()
        .find(|zone| {
            zone.postcodes.is_empty()
                || zone
                    .postcodes
                    .iter()
                    .any(|prefix| prefix_matches(prefix, &outward, &area))
        })
        .unwrap_or(&ZONES[ZONES.len() - 1])
}

/// Delivery fee in pence for the given fulfillment choice
///
/// Collection is always free. Delivery requires a valid UK postcode.
pub fn delivery_fee(fulfillment: FulfillmentType, postcode: Option<&str>) -> Result<i64> {
    match fulfillment {
        FulfillmentType::Collection => Ok(0),
        FulfillmentType::Delivery => {
            let postcode = postcode
                .filter(|p| !p.trim().is_empty())
                .ok_or_else(|| Error::InvalidInput("A postcode is required for delivery".to_string()))?;
            if !is_valid_uk_postcode(postcode) {
                return Err(Error::InvalidInput(format!("Invalid UK postcode: {}", postcode)));
            }
            Ok(resolve_zone(postcode).fee_pence)
        }
    }
}

/// Price breakdown for a prospective order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub size: String,
    pub base_price_pence: i64,
    pub delivery_fee_pence: i64,
    pub total_pence: i64,
    /// Zone name, absent for collection
    pub zone: Option<&'static str>,
    pub zone_locale: Option<&'static str>,
}

pub fn quote(fulfillment: FulfillmentType, postcode: Option<&str>, size_label: &str) -> Result<Quote> {
    let size = find_size(size_label)
        .ok_or_else(|| Error::InvalidInput(format!("Unknown cake size: {}", size_label)))?;
    let delivery_fee_pence = delivery_fee(fulfillment, postcode)?;

    let zone = match (fulfillment, postcode) {
        (FulfillmentType::Delivery, Some(pc)) => Some(resolve_zone(pc)),
        _ => None,
    };

    Ok(Quote {
        size: size.label.to_string(),
        base_price_pence: size.price_pence,
        delivery_fee_pence,
        total_pence: size.price_pence + delivery_fee_pence,
        zone: zone.map(|z| z.name),
        zone_locale: zone.map(|z| z.locale),
    })
}
