//! Order and gallery models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::catalog::TimeSlot;
use crate::Error;

/// How the customer receives the cake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FulfillmentType {
    #[default]
    Collection,
    Delivery,
}

impl FulfillmentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FulfillmentType::Collection => "Collection",
            FulfillmentType::Delivery => "Delivery",
        }
    }
}

impl fmt::Display for FulfillmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FulfillmentType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Collection" => Ok(FulfillmentType::Collection),
            "Delivery" => Ok(FulfillmentType::Delivery),
            other => Err(Error::InvalidInput(format!("Unknown fulfillment type: {}", other))),
        }
    }
}

/// Order lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OrderStatus {
    #[default]
    Pending,
    Baking,
    Ready,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Baking,
        OrderStatus::Ready,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Baking => "Baking",
            OrderStatus::Ready => "Ready",
            OrderStatus::Completed => "Completed",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    /// Orders the bakery still has to work on
    pub fn is_active(&self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Baking)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| Error::InvalidInput(format!("Unknown order status: {}", s)))
    }
}

/// A submitted, priced cake order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub customer_name: String,
    pub email: Option<String>,
    pub phone: String,
    pub fulfillment_type: FulfillmentType,
    pub postcode: Option<String>,
    pub address: Option<String>,
    pub delivery_fee_pence: i64,
    pub delivery_date: NaiveDate,
    pub delivery_time_slot: TimeSlot,
    pub flavor: String,
    pub size: String,
    pub message_on_cake: String,
    /// Inline image as a `data:image/...;base64,` URL
    pub inspiration_image: Option<String>,
    pub inspiration_link: Option<String>,
    pub total_price_pence: i64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// A photo shown in the storefront gallery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalleryPhoto {
    pub id: Uuid,
    pub url: String,
    pub caption: Option<String>,
    pub position: i64,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_through_str() {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
        assert!("Shipped".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_active_statuses() {
        assert!(OrderStatus::Pending.is_active());
        assert!(OrderStatus::Baking.is_active());
        assert!(!OrderStatus::Ready.is_active());
        assert!(!OrderStatus::Cancelled.is_active());
    }

    #[test]
    fn test_fulfillment_serializes_as_name() {
        let json = serde_json::to_string(&FulfillmentType::Delivery).unwrap();
        assert_eq!(json, "\"Delivery\"");
        assert_eq!(FulfillmentType::default(), FulfillmentType::Collection);
    }
}
