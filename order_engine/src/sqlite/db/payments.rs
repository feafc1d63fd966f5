use apm_common::Cents;
use log::debug;
use sqlx::SqliteConnection;

use crate::{db_types::Payment, traits::MarketplaceError};

pub async fn insert_payment(
    order_id: i64,
    payment_intent_id: &str,
    amount: Cents,
    conn: &mut SqliteConnection,
) -> Result<Payment, MarketplaceError> {
    let payment: Payment = sqlx::query_as(
        r#"
            INSERT INTO payments (order_id, payment_intent_id, amount, status)
            VALUES ($1, $2, $3, 'Pending')
            RETURNING *;
        "#,
    )
    .bind(order_id)
    .bind(payment_intent_id)
    .bind(amount)
    .fetch_one(conn)
    .await?;
    debug!("💳️ Payment {} created for order {order_id}", payment.payment_intent_id);
    Ok(payment)
}

pub async fn fetch_payment_by_intent(
    payment_intent_id: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Payment>, sqlx::Error> {
    let payment = sqlx::query_as("SELECT * FROM payments WHERE payment_intent_id = $1")
        .bind(payment_intent_id)
        .fetch_optional(conn)
        .await?;
    Ok(payment)
}

pub async fn fetch_payment_by_charge(
    charge_id: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Payment>, sqlx::Error> {
    let payment =
        sqlx::query_as("SELECT * FROM payments WHERE charge_id = $1").bind(charge_id).fetch_optional(conn).await?;
    Ok(payment)
}

pub async fn fetch_payment_for_order(
    order_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<Payment>, sqlx::Error> {
    let payment = sqlx::query_as("SELECT * FROM payments WHERE order_id = $1 ORDER BY id DESC LIMIT 1")
        .bind(order_id)
        .fetch_optional(conn)
        .await?;
    Ok(payment)
}

/// Marks the payment succeeded. Absolute field set: replaying the same event produces the same row, and
/// `succeeded_at` is only stamped once.
pub(crate) async fn mark_succeeded(
    id: i64,
    charge_id: Option<&str>,
    conn: &mut SqliteConnection,
) -> Result<Payment, MarketplaceError> {
    let result: Option<Payment> = sqlx::query_as(
        r#"
            UPDATE payments SET
                status = 'Succeeded',
                charge_id = COALESCE($2, charge_id),
                failure_code = NULL,
                failure_message = NULL,
                succeeded_at = COALESCE(succeeded_at, CURRENT_TIMESTAMP),
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $1
            RETURNING *;
        "#,
    )
    .bind(id)
    .bind(charge_id)
    .fetch_optional(conn)
    .await?;
    result.ok_or(MarketplaceError::DatabaseError(format!("payment id {id} vanished mid-update")))
}

pub(crate) async fn mark_failed(
    id: i64,
    failure_code: Option<&str>,
    failure_message: Option<&str>,
    conn: &mut SqliteConnection,
) -> Result<Payment, MarketplaceError> {
    let result: Option<Payment> = sqlx::query_as(
        r#"
            UPDATE payments SET
                status = 'Failed',
                failure_code = $2,
                failure_message = $3,
                failed_at = COALESCE(failed_at, CURRENT_TIMESTAMP),
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $1
            RETURNING *;
        "#,
    )
    .bind(id)
    .bind(failure_code)
    .bind(failure_message)
    .fetch_optional(conn)
    .await?;
    result.ok_or(MarketplaceError::DatabaseError(format!("payment id {id} vanished mid-update")))
}

pub(crate) async fn mark_cancelled(id: i64, conn: &mut SqliteConnection) -> Result<Payment, MarketplaceError> {
    let result: Option<Payment> = sqlx::query_as(
        "UPDATE payments SET status = 'Cancelled', updated_at = CURRENT_TIMESTAMP WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;
    result.ok_or(MarketplaceError::DatabaseError(format!("payment id {id} vanished mid-update")))
}

pub(crate) async fn set_refund_state(
    id: i64,
    fully_refunded: bool,
    conn: &mut SqliteConnection,
) -> Result<Payment, MarketplaceError> {
    let status = if fully_refunded { "Refunded" } else { "PartiallyRefunded" };
    let result: Option<Payment> =
        sqlx::query_as("UPDATE payments SET status = $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2 RETURNING *")
            .bind(status)
            .bind(id)
            .fetch_optional(conn)
            .await?;
    result.ok_or(MarketplaceError::DatabaseError(format!("payment id {id} vanished mid-update")))
}
