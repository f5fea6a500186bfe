//! Bakery catalog: flavors, sizes, delivery zones and collection slots
//!
//! All prices are integer pence.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Cake flavors offered in the order form, in display order
pub const FLAVORS: &[&str] = &[
    "Classic Vanilla & Raspberry",
    "Rich Belgian Chocolate",
    "Red Velvet & Cream Cheese",
    "Lemon Drizzle with Curd",
    "Salted Caramel & Lotus Biscoff",
    "Pistachio & Rose Water",
];

/// A cake size with its base price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CakeSize {
    pub label: &'static str,
    pub price_pence: i64,
}

pub const SIZES: &[CakeSize] = &[
    CakeSize { label: "Small (6\")", price_pence: 5_500 },
    CakeSize { label: "Medium (8\")", price_pence: 6_500 },
    CakeSize { label: "Large (10\")", price_pence: 8_500 },
    CakeSize { label: "Extra Large (12\")", price_pence: 11_000 },
];

/// A delivery zone with a flat fee
///
/// Zones are evaluated in table order. A zone with no prefixes is the
/// catch-all and must come last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeliveryZone {
    pub name: &'static str,
    pub postcodes: &'static [&'static str],
    pub fee_pence: i64,
    pub locale: &'static str,
}

pub const ZONES: &[DeliveryZone] = &[
    DeliveryZone {
        name: "Local",
        postcodes: &["TA21", "TA1", "TA2", "TA3"],
        fee_pence: 500,
        locale: "Wellington & Taunton",
    },
    DeliveryZone {
        name: "Somerset",
        postcodes: &["TA", "BA", "BS", "EX"],
        fee_pence: 1_500,
        locale: "Somerset, Bristol & Exeter",
    },
    DeliveryZone {
        name: "Rest of UK",
        postcodes: &[],
        fee_pence: 4_500,
        locale: "Nationwide (Mainland UK)",
    },
];

pub const PICKUP_ADDRESS: &str = "7 Singh street, Wellington, TA21 9RH";

pub const INSTAGRAM_URL: &str = "https://www.instagram.com/Christoscakes_events/";

/// Flavor preselected on a fresh order form
pub fn default_flavor() -> &'static str {
    FLAVORS[0]
}

/// Size preselected on a fresh order form
pub fn default_size() -> &'static CakeSize {
    &SIZES[0]
}

pub fn is_known_flavor(name: &str) -> bool {
    FLAVORS.contains(&name)
}

pub fn find_size(label: &str) -> Option<&'static CakeSize> {
    SIZES.iter().find(|s| s.label == label)
}

/// Delivery or collection window on the chosen date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeSlot {
    Morning,
    Afternoon,
    Night,
}

impl TimeSlot {
    pub const ALL: [TimeSlot; 3] = [TimeSlot::Morning, TimeSlot::Afternoon, TimeSlot::Night];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeSlot::Morning => "Morning",
            TimeSlot::Afternoon => "Afternoon",
            TimeSlot::Night => "Night",
        }
    }

    /// Human-readable window shown next to the slot
    pub fn window(&self) -> &'static str {
        match self {
            TimeSlot::Morning => "Morning (9am - 12pm)",
            TimeSlot::Afternoon => "Afternoon (1pm - 5pm)",
            TimeSlot::Night => "Evening (6pm - 8pm)",
        }
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeSlot {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimeSlot::ALL
            .into_iter()
            .find(|slot| slot.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::InvalidInput(format!("Unknown time slot: {}", s)))
    }
}

/// Format pence as pounds for display, e.g. `£65.00`
pub fn format_pence(pence: i64) -> String {
    let sign = if pence < 0 { "-" } else { "" };
    let abs = pence.abs();
    format!("{}£{}.{:02}", sign, abs / 100, abs % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_size_by_label() {
        let size = find_size("Large (10\")").expect("Large should exist");
        assert_eq!(size.price_pence, 8_500);
        assert!(find_size("Huge").is_none());
    }

    #[test]
    fn test_known_flavors() {
        assert!(is_known_flavor("Rich Belgian Chocolate"));
        assert!(!is_known_flavor("rich belgian chocolate"));
        assert_eq!(default_flavor(), "Classic Vanilla & Raspberry");
    }

    #[test]
    fn test_catch_all_zone_is_last() {
        let last = ZONES.last().unwrap();
        assert!(last.postcodes.is_empty());
        assert!(ZONES[..ZONES.len() - 1].iter().all(|z| !z.postcodes.is_empty()));
    }

    #[test]
    fn test_time_slot_parsing() {
        assert_eq!("morning".parse::<TimeSlot>().unwrap(), TimeSlot::Morning);
        assert_eq!(" Night ".parse::<TimeSlot>().unwrap(), TimeSlot::Night);
        assert!("Midnight".parse::<TimeSlot>().is_err());
    }

    #[test]
    fn test_format_pence() {
        assert_eq!(format_pence(6_500), "£65.00");
        assert_eq!(format_pence(505), "£5.05");
        assert_eq!(format_pence(0), "£0.00");
    }
}
