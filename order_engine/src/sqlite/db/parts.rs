use log::debug;
use sqlx::SqliteConnection;

use crate::{db_types::Part, traits::MarketplaceError};

pub async fn fetch_part(part_id: i64, conn: &mut SqliteConnection) -> Result<Option<Part>, sqlx::Error> {
    let part = sqlx::query_as("SELECT * FROM parts WHERE id = $1").bind(part_id).fetch_optional(conn).await?;
    Ok(part)
}

/// Applies a stock adjustment as a single conditional update. There is deliberately no SELECT-then-UPDATE here:
/// the quantity arithmetic, the floor at zero and the status flip all happen inside one statement so that
/// concurrent webhook deliveries serialise on the row instead of racing.
///
/// A `Sold` part comes back to `Active` when stock rises above zero. An `Inactive` part never changes status.
pub async fn adjust_quantity(
    part_id: i64,
    delta: i64,
    conn: &mut SqliteConnection,
) -> Result<Part, MarketplaceError> {
    let part: Option<Part> = sqlx::query_as(
        r#"
            UPDATE parts SET
                quantity = MAX(0, quantity + $2),
                status = CASE
                    WHEN status = 'Inactive' THEN status
                    WHEN MAX(0, quantity + $2) = 0 THEN 'Sold'
                    ELSE 'Active'
                END,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $1
            RETURNING *;
        "#,
    )
    .bind(part_id)
    .bind(delta)
    .fetch_optional(conn)
    .await?;
    let part = part.ok_or(MarketplaceError::PartNotFound(part_id))?;
    debug!("📦️ Part {part_id} adjusted by {delta}. Quantity is now {} ({})", part.quantity, part.status);
    Ok(part)
}
