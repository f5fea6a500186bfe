//! # SweetTrack Common Library
//!
//! Shared code for the SweetTrack bakery service including:
//! - Catalog tables (flavors, sizes, delivery zones, time slots)
//! - Delivery pricing by postcode zone
//! - The three-step order wizard and its validation gating
//! - Revenue insights over stored orders
//! - Configuration loading and database initialization

pub mod auth;
pub mod catalog;
pub mod config;
#[cfg(feature = "sqlx")]
pub mod db;
pub mod error;
pub mod insights;
pub mod models;
pub mod pricing;
pub mod time;
pub mod wizard;

pub use error::{Error, Result};
pub use models::{FulfillmentType, Order, OrderStatus};
