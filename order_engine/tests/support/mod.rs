//! Shared scaffolding for the engine integration tests: a fresh migrated database per test, seeded marketplace
//! actors, and shortcuts for driving a cart through checkout and payment.
#![allow(dead_code)]

use apm_common::Cents;
use order_engine::{
    db_types::{Address, Order, Part},
    order_objects::{CartLine, CheckoutRequest, PaymentAuthorization},
    test_utils::{
        prepare_env::{prepare_test_env, random_db_path},
        seed::{seed_address, seed_part, seed_user, PartSpec},
    },
    CheckoutApi,
    OrderManagement,
    PaymentEventApi,
    PaymentReconciliation,
    SqliteDatabase,
};

pub struct TestWorld {
    pub db: SqliteDatabase,
    pub buyer_id: i64,
    pub seller_id: i64,
    pub buyer_address: Address,
    pub seller_address: Address,
    pub part: Part,
}

/// A fresh database with one buyer, one seller (with a default address) and one $50 part with 5 in stock.
pub async fn setup() -> TestWorld {
    let url = random_db_path();
    prepare_test_env(&url).await;
    let db = SqliteDatabase::new_with_url(&url, 5).await.expect("Error creating database");
    let buyer_id = seed_user(db.pool(), "buyer").await;
    let seller_id = seed_user(db.pool(), "seller").await;
    let buyer_address = seed_address(db.pool(), buyer_id, true).await;
    let seller_address = seed_address(db.pool(), seller_id, true).await;
    let part = seed_part(db.pool(), seller_id, PartSpec::default()).await;
    TestWorld { db, buyer_id, seller_id, buyer_address, seller_address, part }
}

pub fn cart_line(part_id: i64, quantity: i64, shipping_dollars: i64) -> CartLine {
    CartLine {
        part_id,
        quantity,
        rate_id: "rate_test_1".into(),
        shipping_cost: Cents::from_dollars(shipping_dollars),
    }
}

/// Runs the two-phase checkout with a fabricated payment authorization, the way the server layer would after the
/// processor accepted the intent.
pub async fn checkout<B: OrderManagement>(db: &B, world: &TestWorld, lines: Vec<CartLine>, intent: &str) -> Order {
    let api = CheckoutApi::new(db.clone());
    let request = CheckoutRequest {
        buyer_id: world.buyer_id,
        items: lines,
        shipping_address_id: world.buyer_address.id,
        billing_address_id: None,
    };
    let quote = api.prepare_checkout(&request).await.expect("Error preparing checkout");
    let auth = PaymentAuthorization {
        payment_intent_id: intent.to_string(),
        client_secret: format!("{intent}_secret"),
        amount: quote.total,
    };
    api.commit_checkout(quote, auth).await.expect("Error committing checkout")
}

/// Settles the payment as the processor webhook would.
pub async fn settle_payment<B: PaymentReconciliation>(db: &B, intent: &str) {
    let api = PaymentEventApi::new(db.clone());
    let settled = api.payment_succeeded(intent, Some(&format!("ch_{intent}"))).await.expect("Error settling payment");
    assert!(settled.is_some(), "expected the payment to settle");
}
