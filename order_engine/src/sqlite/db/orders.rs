use log::debug;
use sqlx::{QueryBuilder, SqliteConnection};

use crate::{
    db_types::{Order, OrderItem, OrderItemStatus, OrderStatus, PaymentStatus},
    order_objects::{CheckoutQuote, FulfillableItem, QuotedLine},
    traits::MarketplaceError,
};

/// Inserts the order header. Items and the payment row are inserted separately inside the same transaction.
pub async fn insert_order(
    quote: &CheckoutQuote,
    payment_intent_id: &str,
    conn: &mut SqliteConnection,
) -> Result<Order, MarketplaceError> {
    let order: Order = sqlx::query_as(
        r#"
            INSERT INTO orders (
                buyer_id,
                order_number,
                subtotal,
                shipping_total,
                tax_total,
                total,
                status,
                payment_status,
                shipping_address,
                billing_address,
                payment_intent_id
            ) VALUES ($1, $2, $3, $4, $5, $6, 'Pending', 'Pending', $7, $8, $9)
            RETURNING *;
        "#,
    )
    .bind(quote.buyer_id)
    .bind(quote.order_number.as_str())
    .bind(quote.subtotal)
    .bind(quote.shipping_total)
    .bind(quote.tax_total)
    .bind(quote.total)
    .bind(serde_json::to_string(&quote.shipping_address).map_err(|e| MarketplaceError::DatabaseError(e.to_string()))?)
    .bind(serde_json::to_string(&quote.billing_address).map_err(|e| MarketplaceError::DatabaseError(e.to_string()))?)
    .bind(payment_intent_id)
    .fetch_one(conn)
    .await?;
    debug!("📝️ Order [{}] inserted with id {}", order.order_number, order.id);
    Ok(order)
}

pub async fn insert_order_item(
    order_id: i64,
    line: &QuotedLine,
    conn: &mut SqliteConnection,
) -> Result<OrderItem, MarketplaceError> {
    let item = sqlx::query_as(
        r#"
            INSERT INTO order_items (
                order_id,
                part_id,
                seller_id,
                title,
                part_number,
                condition,
                image_url,
                unit_price,
                quantity,
                subtotal,
                shipping_cost,
                status
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, 'Pending')
            RETURNING *;
        "#,
    )
    .bind(order_id)
    .bind(line.part_id)
    .bind(line.seller_id)
    .bind(&line.title)
    .bind(&line.part_number)
    .bind(&line.condition)
    .bind(&line.image_url)
    .bind(line.unit_price)
    .bind(line.quantity)
    .bind(line.subtotal)
    .bind(line.shipping_cost)
    .fetch_one(conn)
    .await?;
    Ok(item)
}

pub async fn fetch_order(order_id: i64, conn: &mut SqliteConnection) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as("SELECT * FROM orders WHERE id = $1").bind(order_id).fetch_optional(conn).await?;
    Ok(order)
}

pub async fn fetch_orders_for_buyer(buyer_id: i64, conn: &mut SqliteConnection) -> Result<Vec<Order>, sqlx::Error> {
    let orders = sqlx::query_as("SELECT * FROM orders WHERE buyer_id = $1 ORDER BY created_at DESC")
        .bind(buyer_id)
        .fetch_all(conn)
        .await?;
    Ok(orders)
}

pub async fn fetch_order_items(order_id: i64, conn: &mut SqliteConnection) -> Result<Vec<OrderItem>, sqlx::Error> {
    let items = sqlx::query_as("SELECT * FROM order_items WHERE order_id = $1 ORDER BY id ASC")
        .bind(order_id)
        .fetch_all(conn)
        .await?;
    Ok(items)
}

pub async fn fetch_order_item(item_id: i64, conn: &mut SqliteConnection) -> Result<Option<OrderItem>, sqlx::Error> {
    let item = sqlx::query_as("SELECT * FROM order_items WHERE id = $1").bind(item_id).fetch_optional(conn).await?;
    Ok(item)
}

pub async fn fetch_order_items_by_ids(
    ids: &[i64],
    conn: &mut SqliteConnection,
) -> Result<Vec<OrderItem>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let mut builder = QueryBuilder::new("SELECT * FROM order_items WHERE id IN (");
    let mut list = builder.separated(", ");
    for id in ids {
        list.push_bind(*id);
    }
    builder.push(") ORDER BY id ASC");
    let items = builder.build_query_as::<OrderItem>().fetch_all(conn).await?;
    Ok(items)
}

pub(crate) async fn update_order_status(
    id: i64,
    status: OrderStatus,
    conn: &mut SqliteConnection,
) -> Result<Order, MarketplaceError> {
    let status = status.to_string();
    let result: Option<Order> =
        sqlx::query_as("UPDATE orders SET status = $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2 RETURNING *")
            .bind(status)
            .bind(id)
            .fetch_optional(conn)
            .await?;
    result.ok_or(MarketplaceError::OrderNotFound(id))
}

pub(crate) async fn set_order_payment_status(
    id: i64,
    status: PaymentStatus,
    conn: &mut SqliteConnection,
) -> Result<Order, MarketplaceError> {
    let result: Option<Order> = sqlx::query_as(
        "UPDATE orders SET payment_status = $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2 RETURNING *",
    )
    .bind(status.to_string())
    .bind(id)
    .fetch_optional(conn)
    .await?;
    result.ok_or(MarketplaceError::OrderNotFound(id))
}

/// Moves the order to `Paid`, stamping `paid_at` only on the first transition.
pub(crate) async fn mark_order_paid(id: i64, conn: &mut SqliteConnection) -> Result<Order, MarketplaceError> {
    let result: Option<Order> = sqlx::query_as(
        r#"
            UPDATE orders SET
                status = 'Paid',
                payment_status = 'Succeeded',
                paid_at = COALESCE(paid_at, CURRENT_TIMESTAMP),
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $1
            RETURNING *;
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;
    result.ok_or(MarketplaceError::OrderNotFound(id))
}

pub(crate) async fn cancel_order(id: i64, conn: &mut SqliteConnection) -> Result<Order, MarketplaceError> {
    let result: Option<Order> = sqlx::query_as(
        r#"
            UPDATE orders SET
                status = 'Cancelled',
                payment_status = 'Cancelled',
                cancelled_at = COALESCE(cancelled_at, CURRENT_TIMESTAMP),
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $1
            RETURNING *;
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;
    result.ok_or(MarketplaceError::OrderNotFound(id))
}

pub(crate) async fn update_item_status(
    item_id: i64,
    status: OrderItemStatus,
    conn: &mut SqliteConnection,
) -> Result<OrderItem, MarketplaceError> {
    let result: Option<OrderItem> = sqlx::query_as(
        "UPDATE order_items SET status = $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2 RETURNING *",
    )
    .bind(status.to_string())
    .bind(item_id)
    .fetch_optional(conn)
    .await?;
    result.ok_or(MarketplaceError::OrderItemNotFound(item_id))
}

pub(crate) async fn update_items_status_for_order(
    order_id: i64,
    status: OrderItemStatus,
    conn: &mut SqliteConnection,
) -> Result<Vec<OrderItem>, MarketplaceError> {
    let items = sqlx::query_as(
        "UPDATE order_items SET status = $1, updated_at = CURRENT_TIMESTAMP WHERE order_id = $2 RETURNING *",
    )
    .bind(status.to_string())
    .bind(order_id)
    .fetch_all(conn)
    .await?;
    Ok(items)
}

/// Count of order items that have not yet reached a shipped-or-later state. Zero means every surviving item has a
/// label, which is the trigger for advancing the order itself.
pub(crate) async fn unshipped_item_count(order_id: i64, conn: &mut SqliteConnection) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM order_items WHERE order_id = $1 AND status IN ('Pending', 'Processing')",
    )
    .bind(order_id)
    .fetch_one(conn)
    .await?;
    Ok(count)
}

/// Count of order items not yet delivered (excluding items removed from fulfillment by cancellation or refund).
pub(crate) async fn undelivered_item_count(order_id: i64, conn: &mut SqliteConnection) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM order_items WHERE order_id = $1 AND status IN ('Pending', 'Processing', 'Shipped')",
    )
    .bind(order_id)
    .fetch_one(conn)
    .await?;
    Ok(count)
}

#[derive(sqlx::FromRow)]
struct FulfillableRow {
    #[sqlx(flatten)]
    item: OrderItem,
    order_number: String,
    paid_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// The seller's paid, unshipped items with the order context a fulfillment screen needs.
pub async fn fetch_fulfillable_items(
    seller_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<FulfillableItem>, sqlx::Error> {
    let rows: Vec<FulfillableRow> = sqlx::query_as(
        r#"
            SELECT order_items.*, orders.order_number, orders.paid_at
            FROM order_items JOIN orders ON order_items.order_id = orders.id
            WHERE order_items.seller_id = $1
              AND order_items.status = 'Processing'
              AND orders.payment_status = 'Succeeded'
            ORDER BY orders.paid_at ASC, order_items.id ASC
        "#,
    )
    .bind(seller_id)
    .fetch_all(conn)
    .await?;
    let items = rows
        .into_iter()
        .map(|r| FulfillableItem { item: r.item, order_number: r.order_number.into(), paid_at: r.paid_at })
        .collect();
    Ok(items)
}
