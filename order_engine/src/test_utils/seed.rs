//! Row-insertion helpers for tests. These write directly through the pool so that tests can stage users, parts and
//! addresses without going through the public API under test.

use apm_common::Cents;
use sqlx::SqlitePool;

use crate::db_types::{Address, Part};

pub async fn seed_user(pool: &SqlitePool, name: &str) -> i64 {
    let (id,): (i64,) = sqlx::query_as("INSERT INTO users (name, email) VALUES ($1, $2) RETURNING id")
        .bind(name)
        .bind(format!("{name}@example.com"))
        .fetch_one(pool)
        .await
        .expect("Error seeding user");
    id
}

pub async fn seed_address(pool: &SqlitePool, user_id: i64, is_default: bool) -> Address {
    sqlx::query_as(
        r#"
            INSERT INTO addresses (user_id, recipient, street1, city, state, postal_code, country, is_default)
            VALUES ($1, 'Test Recipient', '123 Main St', 'Springfield', 'IL', '62701', 'US', $2)
            RETURNING *;
        "#,
    )
    .bind(user_id)
    .bind(is_default)
    .fetch_one(pool)
    .await
    .expect("Error seeding address")
}

pub struct PartSpec {
    pub title: &'static str,
    pub price: Cents,
    pub quantity: i64,
    pub weight_grams: Option<i64>,
}

impl Default for PartSpec {
    fn default() -> Self {
        Self { title: "Alternator", price: Cents::from_dollars(50), quantity: 5, weight_grams: Some(4500) }
    }
}

pub async fn seed_part(pool: &SqlitePool, seller_id: i64, spec: PartSpec) -> Part {
    sqlx::query_as(
        r#"
            INSERT INTO parts (
                seller_id, title, part_number, condition, price, quantity, status,
                weight_grams, length_mm, width_mm, height_mm
            )
            VALUES ($1, $2, 'PN-1001', 'used', $3, $4, 'Active', $5, 300, 200, 200)
            RETURNING *;
        "#,
    )
    .bind(seller_id)
    .bind(spec.title)
    .bind(spec.price)
    .bind(spec.quantity)
    .bind(spec.weight_grams)
    .fetch_one(pool)
    .await
    .expect("Error seeding part")
}
