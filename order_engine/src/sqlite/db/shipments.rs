use chrono::{DateTime, Utc};
use log::debug;
use sqlx::SqliteConnection;

use crate::{
    db_types::{Shipment, ShipmentStatus, TrackingEvent},
    order_objects::{LabelOrder, PurchasedLabel, TrackingUpdate},
    traits::MarketplaceError,
};

pub async fn insert_shipment(
    order: &LabelOrder,
    label: &PurchasedLabel,
    conn: &mut SqliteConnection,
) -> Result<Shipment, MarketplaceError> {
    let shipment: Shipment = sqlx::query_as(
        r#"
            INSERT INTO shipments (
                order_id,
                seller_id,
                rate_id,
                transaction_id,
                carrier,
                tracking_number,
                tracking_url,
                label_url,
                status,
                from_address,
                to_address,
                weight_grams,
                length_mm,
                width_mm,
                height_mm
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'LabelCreated', $9, $10, $11, $12, $13, $14)
            RETURNING *;
        "#,
    )
    .bind(order.order_id)
    .bind(order.seller_id)
    .bind(&order.rate_id)
    .bind(&label.transaction_id)
    .bind(&label.carrier)
    .bind(&label.tracking_number)
    .bind(&label.tracking_url)
    .bind(&label.label_url)
    .bind(serde_json::to_string(&order.from).map_err(|e| MarketplaceError::DatabaseError(e.to_string()))?)
    .bind(serde_json::to_string(&order.to).map_err(|e| MarketplaceError::DatabaseError(e.to_string()))?)
    .bind(order.parcel.weight_grams)
    .bind(order.parcel.length_mm)
    .bind(order.parcel.width_mm)
    .bind(order.parcel.height_mm)
    .fetch_one(conn)
    .await?;
    debug!(
        "🚚️ Shipment {} created for order {} ({} {})",
        shipment.id, shipment.order_id, shipment.carrier, shipment.tracking_number
    );
    Ok(shipment)
}

pub async fn insert_shipment_item(
    shipment_id: i64,
    order_item_id: i64,
    quantity: i64,
    conn: &mut SqliteConnection,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO shipment_items (shipment_id, order_item_id, quantity) VALUES ($1, $2, $3)")
        .bind(shipment_id)
        .bind(order_item_id)
        .bind(quantity)
        .execute(conn)
        .await?;
    Ok(())
}

pub async fn fetch_shipment(id: i64, conn: &mut SqliteConnection) -> Result<Option<Shipment>, sqlx::Error> {
    let shipment = sqlx::query_as("SELECT * FROM shipments WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(shipment)
}

pub async fn fetch_shipment_by_tracking(
    tracking_number: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Shipment>, sqlx::Error> {
    let shipment = sqlx::query_as("SELECT * FROM shipments WHERE tracking_number = $1")
        .bind(tracking_number)
        .fetch_optional(conn)
        .await?;
    Ok(shipment)
}

pub async fn fetch_tracking_events(
    shipment_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<TrackingEvent>, sqlx::Error> {
    let events = sqlx::query_as("SELECT * FROM tracking_events WHERE shipment_id = $1 ORDER BY occurred_at ASC")
        .bind(shipment_id)
        .fetch_all(conn)
        .await?;
    Ok(events)
}

/// Appends a tracking event. The unique index on `(shipment_id, status, occurred_at)` makes a webhook replay a
/// silent no-op; returns `false` when the event was already on file.
pub async fn append_tracking_event(
    shipment_id: i64,
    update: &TrackingUpdate,
    conn: &mut SqliteConnection,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
            INSERT INTO tracking_events (shipment_id, status, detail, location, occurred_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (shipment_id, status, occurred_at) DO NOTHING;
        "#,
    )
    .bind(shipment_id)
    .bind(update.status.to_string())
    .bind(&update.detail)
    .bind(&update.location)
    .bind(update.occurred_at)
    .execute(conn)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Applies a carrier status to the shipment. `shipped_at` and `delivered_at` are monotonic: COALESCE keeps the
/// first recorded timestamp when events replay or arrive out of order.
pub(crate) async fn apply_status(
    id: i64,
    status: ShipmentStatus,
    occurred_at: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<Shipment, MarketplaceError> {
    let result: Option<Shipment> = sqlx::query_as(
        r#"
            UPDATE shipments SET
                status = $2,
                shipped_at = CASE
                    WHEN $2 IN ('InTransit', 'Delivered') THEN COALESCE(shipped_at, $3)
                    ELSE shipped_at
                END,
                delivered_at = CASE
                    WHEN $2 = 'Delivered' THEN COALESCE(delivered_at, $3)
                    ELSE delivered_at
                END,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $1
            RETURNING *;
        "#,
    )
    .bind(id)
    .bind(status.to_string())
    .bind(occurred_at)
    .fetch_optional(conn)
    .await?;
    result.ok_or(MarketplaceError::ShipmentNotFound(id))
}

/// The order items linked to a shipment, via the shipment_items join table.
pub async fn shipment_order_item_ids(
    shipment_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<i64>, sqlx::Error> {
    let rows: Vec<(i64,)> = sqlx::query_as("SELECT order_item_id FROM shipment_items WHERE shipment_id = $1")
        .bind(shipment_id)
        .fetch_all(conn)
        .await?;
    Ok(rows.into_iter().map(|(id,)| id).collect())
}
