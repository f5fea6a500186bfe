//! Database access layer for sweettrack-shop
//!
//! Schema creation lives in `sweettrack_common::db`; this module holds the
//! queries the HTTP handlers run.

pub mod gallery;
pub mod orders;
