use sqlx::SqliteConnection;

use crate::db_types::Address;

pub async fn fetch_address(id: i64, conn: &mut SqliteConnection) -> Result<Option<Address>, sqlx::Error> {
    let address = sqlx::query_as("SELECT * FROM addresses WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(address)
}

/// The address explicitly flagged as the user's default. A user without a flagged default gets `None`; callers
/// surface that as a hard error rather than guessing at a ship-from address.
pub async fn fetch_default_address(
    user_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<Address>, sqlx::Error> {
    let address = sqlx::query_as(
        "SELECT * FROM addresses WHERE user_id = $1 AND is_default = 1 ORDER BY created_at DESC LIMIT 1",
    )
    .bind(user_id)
    .fetch_optional(conn)
    .await?;
    Ok(address)
}
