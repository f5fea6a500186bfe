//! HTTP API handlers for sweettrack-shop

pub mod admin;
pub mod auth;
pub mod gallery;
pub mod health;
pub mod orders;
pub mod storefront;
pub mod suggestions;
pub mod ui;

pub use admin::admin_routes;
pub use auth::{auth_middleware, login_routes, AdminSession};
pub use gallery::gallery_routes;
pub use health::health_routes;
pub use orders::order_routes;
pub use storefront::storefront_routes;
pub use suggestions::suggestion_routes;
pub use ui::ui_routes;
