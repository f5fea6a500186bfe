//! Revenue and workload insights over stored orders

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::models::{FulfillmentType, Order, OrderStatus};

/// Number of orders for one flavor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlavorCount {
    pub flavor: String,
    pub orders: usize,
}

/// Summary shown on the admin dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Insights {
    /// Sum of total prices, cancelled orders excluded
    pub total_revenue_pence: i64,
    pub order_count: usize,
    /// Orders still pending or baking
    pub active_count: usize,
    pub collection_count: usize,
    pub delivery_count: usize,
    pub by_status: BTreeMap<OrderStatus, usize>,
    /// Most popular first, ties broken by name
    pub popular_flavors: Vec<FlavorCount>,
    /// Revenue keyed by delivery month (`YYYY-MM`)
    pub revenue_by_month: BTreeMap<String, i64>,
}

pub fn summarize(orders: &[Order]) -> Insights {
    let mut by_status: BTreeMap<OrderStatus, usize> =
        OrderStatus::ALL.into_iter().map(|s| (s, 0)).collect();
    let mut flavors: HashMap<&str, usize> = HashMap::new();
    let mut revenue_by_month: BTreeMap<String, i64> = BTreeMap::new();
    let mut total_revenue_pence = 0;

    for order in orders {
        *by_status.entry(order.status).or_default() += 1;
        *flavors.entry(order.flavor.as_str()).or_default() += 1;

        if order.status != OrderStatus::Cancelled {
            total_revenue_pence += order.total_price_pence;
            let month = order.delivery_date.format("%Y-%m").to_string();
            *revenue_by_month.entry(month).or_default() += order.total_price_pence;
        }
    }

    let mut popular_flavors: Vec<FlavorCount> = flavors
        .into_iter()
        .map(|(flavor, orders)| FlavorCount {
            flavor: flavor.to_string(),
            orders,
        })
        .collect();
    popular_flavors.sort_by(|a, b| b.orders.cmp(&a.orders).then_with(|| a.flavor.cmp(&b.flavor)));

    Insights {
        total_revenue_pence,
        order_count: orders.len(),
        active_count: orders.iter().filter(|o| o.status.is_active()).count(),
        collection_count: orders
            .iter()
            .filter(|o| o.fulfillment_type == FulfillmentType::Collection)
            .count(),
        delivery_count: orders
            .iter()
            .filter(|o| o.fulfillment_type == FulfillmentType::Delivery)
            .count(),
        by_status,
        popular_flavors,
        revenue_by_month,
    }
}
