//! Order persistence

use chrono::NaiveDate;
use sqlx::{FromRow, SqlitePool};
use sweettrack_common::{time::parse_timestamp, Error, Order, OrderStatus, Result};
use uuid::Uuid;

const ORDER_COLUMNS: &str = "id, customer_name, email, phone, fulfillment_type, postcode, address, \
     delivery_fee_pence, delivery_date, delivery_time_slot, flavor, size, message_on_cake, \
     inspiration_image, inspiration_link, total_price_pence, status, created_at";

#[derive(Debug, FromRow)]
struct OrderRow {
    id: String,
    customer_name: String,
    email: Option<String>,
    phone: String,
    fulfillment_type: String,
    postcode: Option<String>,
    address: Option<String>,
    delivery_fee_pence: i64,
    delivery_date: String,
    delivery_time_slot: String,
    flavor: String,
    size: String,
    message_on_cake: String,
    inspiration_image: Option<String>,
    inspiration_link: Option<String>,
    total_price_pence: i64,
    status: String,
    created_at: String,
}

impl TryFrom<OrderRow> for Order {
    type Error = Error;

    fn try_from(row: OrderRow) -> Result<Self> {
        let corrupt = |field: &str, value: &str| {
            Error::Internal(format!("Corrupt order {} field {}: {}", row.id, field, value))
        };

        Ok(Order {
            id: Uuid::parse_str(&row.id).map_err(|_| corrupt("id", &row.id))?,
            fulfillment_type: row.fulfillment_type.parse()?,
            delivery_date: NaiveDate::parse_from_str(&row.delivery_date, "%Y-%m-%d")
                .map_err(|_| corrupt("delivery_date", &row.delivery_date))?,
            delivery_time_slot: row.delivery_time_slot.parse()?,
            status: row.status.parse()?,
            created_at: parse_timestamp(&row.created_at)?,
            customer_name: row.customer_name,
            email: row.email,
            phone: row.phone,
            postcode: row.postcode,
            address: row.address,
            delivery_fee_pence: row.delivery_fee_pence,
            flavor: row.flavor,
            size: row.size,
            message_on_cake: row.message_on_cake,
            inspiration_image: row.inspiration_image,
            inspiration_link: row.inspiration_link,
            total_price_pence: row.total_price_pence,
        })
    }
}

pub async fn insert_order(pool: &SqlitePool, order: &Order) -> Result<()> {
    sqlx::query(&format!(
        "INSERT INTO orders ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        ORDER_COLUMNS
    ))
    .bind(order.id.to_string())
    .bind(&order.customer_name)
    .bind(&order.email)
    .bind(&order.phone)
    .bind(order.fulfillment_type.as_str())
    .bind(&order.postcode)
    .bind(&order.address)
    .bind(order.delivery_fee_pence)
    .bind(order.delivery_date.format("%Y-%m-%d").to_string())
    .bind(order.delivery_time_slot.as_str())
    .bind(&order.flavor)
    .bind(&order.size)
    .bind(&order.message_on_cake)
    .bind(&order.inspiration_image)
    .bind(&order.inspiration_link)
    .bind(order.total_price_pence)
    .bind(order.status.as_str())
    .bind(order.created_at.to_rfc3339())
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn get_order(pool: &SqlitePool, id: Uuid) -> Result<Order> {
    let row: Option<OrderRow> =
        sqlx::query_as(&format!("SELECT {} FROM orders WHERE id = ?", ORDER_COLUMNS))
            .bind(id.to_string())
            .fetch_optional(pool)
            .await?;

    row.ok_or_else(|| Error::NotFound(format!("Order {}", id)))?
        .try_into()
}

/// All orders, soonest delivery first, optionally limited to one status
pub async fn list_orders(pool: &SqlitePool, status: Option<OrderStatus>) -> Result<Vec<Order>> {
    let rows: Vec<OrderRow> = match status {
        Some(status) => {
            sqlx::query_as(&format!(
                "SELECT {} FROM orders WHERE status = ? ORDER BY delivery_date ASC, created_at ASC",
                ORDER_COLUMNS
            ))
            .bind(status.as_str())
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as(&format!(
                "SELECT {} FROM orders ORDER BY delivery_date ASC, created_at ASC",
                ORDER_COLUMNS
            ))
            .fetch_all(pool)
            .await?
        }
    };

    rows.into_iter().map(Order::try_from).collect()
}

pub async fn update_order_status(pool: &SqlitePool, id: Uuid, status: OrderStatus) -> Result<Order> {
    let result = sqlx::query("UPDATE orders SET status = ? WHERE id = ?")
        .bind(status.as_str())
        .bind(id.to_string())
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("Order {}", id)));
    }

    get_order(pool, id).await
}

pub async fn delete_order(pool: &SqlitePool, id: Uuid) -> Result<()> {
    let result = sqlx::query("DELETE FROM orders WHERE id = ?")
        .bind(id.to_string())
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("Order {}", id)));
    }

    Ok(())
}
