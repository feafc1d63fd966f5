use log::debug;
use sqlx::SqliteConnection;

use crate::{
    db_types::{Refund, RefundStatus},
    order_objects::RefundEligibility,
    traits::MarketplaceError,
};

pub async fn insert_refund(
    eligibility: &RefundEligibility,
    refund_id: &str,
    reason: &str,
    conn: &mut SqliteConnection,
) -> Result<Refund, MarketplaceError> {
    let refund: Refund = sqlx::query_as(
        r#"
            INSERT INTO refunds (payment_id, order_id, order_item_id, refund_id, amount, reason, status)
            VALUES ($1, $2, $3, $4, $5, $6, 'Pending')
            RETURNING *;
        "#,
    )
    .bind(eligibility.payment_id)
    .bind(eligibility.order_id)
    .bind(eligibility.order_item_id)
    .bind(refund_id)
    .bind(eligibility.amount)
    .bind(reason)
    .fetch_one(conn)
    .await?;
    debug!("💸️ Refund {} recorded against order item {}", refund.refund_id, refund.order_item_id);
    Ok(refund)
}

/// An existing refund that blocks a new one: anything pending or already paid out for the same item.
pub async fn fetch_active_refund_for_item(
    order_item_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<Refund>, sqlx::Error> {
    let refund = sqlx::query_as(
        "SELECT * FROM refunds WHERE order_item_id = $1 AND status IN ('Pending', 'Succeeded') LIMIT 1",
    )
    .bind(order_item_id)
    .fetch_optional(conn)
    .await?;
    Ok(refund)
}

/// Sets the refund state from a processor webhook, stamping `processed_at` on the first terminal transition.
pub(crate) async fn set_status(
    refund_id: &str,
    status: RefundStatus,
    conn: &mut SqliteConnection,
) -> Result<Option<Refund>, MarketplaceError> {
    let terminal = matches!(status, RefundStatus::Succeeded | RefundStatus::Failed);
    let refund: Option<Refund> = sqlx::query_as(
        r#"
            UPDATE refunds SET
                status = $2,
                processed_at = CASE WHEN $3 THEN COALESCE(processed_at, CURRENT_TIMESTAMP) ELSE processed_at END,
                updated_at = CURRENT_TIMESTAMP
            WHERE refund_id = $1
            RETURNING *;
        "#,
    )
    .bind(refund_id)
    .bind(status.to_string())
    .bind(terminal)
    .fetch_optional(conn)
    .await?;
    Ok(refund)
}
