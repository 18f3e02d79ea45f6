//! Database tests for seller fulfillment status writes.
//!
//! These run the real ownership-scoped `UPDATE` and read the row back.
//!
//! These tests require:
//! - A migrated `PostgreSQL` database (`tb-cli migrate`)
//!
//! Run with: cargo test -p thriftbox-integration-tests -- --ignored

use chrono::{DateTime, Duration, Utc};

use thriftbox_core::{Email, FulfillmentStatus, OrderId, UserId};
use thriftbox_integration_tests::TestContext;
use thriftbox_storefront::db::OrderRepository;
use thriftbox_storefront::models::{Order, Store};
use thriftbox_storefront::services::order_status::{self, StatusChange};
use thriftbox_storefront::services::OrderStatusError;

const SELLER: i32 = 41;
const OTHER_SELLER: i32 = 42;

/// Whole seconds, so values survive Postgres microsecond precision.
fn at(seconds_after_start: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(1_772_366_400, 0).expect("valid timestamp")
        + Duration::seconds(seconds_after_start)
}

fn buyer() -> Email {
    Email::parse("pot.collector@example.com").expect("valid email")
}

async fn seeded_order(ctx: &TestContext) -> (Store, OrderId) {
    let store = ctx.seed_store(SELLER).await;
    let order_id = ctx.seed_order(&store, &buyer()).await;
    (store, order_id)
}

async fn reload(ctx: &TestContext, store: &Store, order_id: OrderId) -> Order {
    OrderRepository::new(&ctx.pool)
        .get_for_customer(store.id, order_id, &buyer())
        .await
        .expect("reload failed")
        .expect("order vanished")
}

#[tokio::test]
#[ignore = "Requires database"]
async fn test_delivered_stamps_shipped_and_delivered() {
    let ctx = TestContext::new().await;
    let (_, order_id) = seeded_order(&ctx).await;

    let applied = OrderRepository::new(&ctx.pool)
        .apply_status(
            order_id,
            UserId::new(SELLER),
            StatusChange::new(FulfillmentStatus::Delivered, at(10)),
        )
        .await
        .expect("update failed")
        .expect("owner update matched no row");

    assert_eq!(applied.previous, FulfillmentStatus::Pending);
    assert_eq!(applied.order.fulfillment_status, FulfillmentStatus::Delivered);
    assert_eq!(applied.order.shipped_at, Some(at(10)));
    assert_eq!(applied.order.delivered_at, Some(at(10)));
    assert_eq!(applied.order.updated_at, at(10));
}

#[tokio::test]
#[ignore = "Requires database"]
async fn test_shipped_stamps_only_shipped_and_pending_keeps_stamps() {
    let ctx = TestContext::new().await;
    let (store, order_id) = seeded_order(&ctx).await;
    let repo = OrderRepository::new(&ctx.pool);
    let owner = UserId::new(SELLER);

    repo.apply_status(
        order_id,
        owner,
        StatusChange::new(FulfillmentStatus::Shipped, at(10)),
    )
    .await
    .expect("update failed");
    let shipped = reload(&ctx, &store, order_id).await;
    assert_eq!(shipped.shipped_at, Some(at(10)));
    assert_eq!(shipped.delivered_at, None);

    // Backward move is applied, timestamps are left alone
    let applied = repo
        .apply_status(
            order_id,
            owner,
            StatusChange::new(FulfillmentStatus::Pending, at(20)),
        )
        .await
        .expect("update failed")
        .expect("owner update matched no row");
    assert_eq!(applied.previous, FulfillmentStatus::Shipped);

    let pending = reload(&ctx, &store, order_id).await;
    assert_eq!(pending.fulfillment_status, FulfillmentStatus::Pending);
    assert_eq!(pending.shipped_at, Some(at(10)));
    assert_eq!(pending.delivered_at, None);
    assert_eq!(pending.updated_at, at(20));
}

#[tokio::test]
#[ignore = "Requires database"]
async fn test_shipping_again_restamps() {
    let ctx = TestContext::new().await;
    let (store, order_id) = seeded_order(&ctx).await;
    let repo = OrderRepository::new(&ctx.pool);
    let owner = UserId::new(SELLER);

    for seconds in [10, 30] {
        repo.apply_status(
            order_id,
            owner,
            StatusChange::new(FulfillmentStatus::Shipped, at(seconds)),
        )
        .await
        .expect("update failed");
    }

    assert_eq!(reload(&ctx, &store, order_id).await.shipped_at, Some(at(30)));
}

#[tokio::test]
#[ignore = "Requires database"]
async fn test_other_seller_cannot_touch_order() {
    let ctx = TestContext::new().await;
    let (store, order_id) = seeded_order(&ctx).await;
    let before = reload(&ctx, &store, order_id).await;
    let repo = OrderRepository::new(&ctx.pool);

    let applied = repo
        .apply_status(
            order_id,
            UserId::new(OTHER_SELLER),
            StatusChange::new(FulfillmentStatus::Delivered, at(10)),
        )
        .await
        .expect("update failed");
    assert!(applied.is_none());

    let err = order_status::update_status(
        &repo,
        UserId::new(OTHER_SELLER),
        Some(order_id),
        Some("shipped"),
        at(20),
    )
    .await
    .expect_err("foreign seller update succeeded");
    assert!(matches!(err, OrderStatusError::NotFound));

    assert_eq!(reload(&ctx, &store, order_id).await, before);
}

#[tokio::test]
#[ignore = "Requires database"]
async fn test_unknown_order_is_not_found() {
    let ctx = TestContext::new().await;

    let err = order_status::update_status(
        &OrderRepository::new(&ctx.pool),
        UserId::new(SELLER),
        Some(OrderId::new(i32::MAX)),
        Some("shipped"),
        at(0),
    )
    .await
    .expect_err("update of missing order succeeded");
    assert!(matches!(err, OrderStatusError::NotFound));
}
