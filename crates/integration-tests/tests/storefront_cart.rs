//! Integration tests for the cookie-backed cart.
//!
//! These tests require:
//! - A migrated `PostgreSQL` database (`tb-cli migrate`)
//! - The storefront server running against it
//!
//! Run with: cargo test -p thriftbox-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};

use thriftbox_integration_tests::{TestContext, fresh_client};

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_add_clamps_to_stock_and_persists_in_cookie() {
    let ctx = TestContext::new().await;
    let store = ctx.seed_store(1).await;
    let lamp = ctx.seed_product(&store, "Brass lamp", 4800, 2).await;

    let resp = ctx
        .client
        .post(ctx.store_url(&store.slug, "/cart/add"))
        .json(&json!({ "product_id": lamp, "quantity": 5 }))
        .send()
        .await
        .expect("add failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let set_cookie = resp
        .headers()
        .get("set-cookie")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(set_cookie.starts_with(&format!("tb_cart_{}=", store.slug)));
    assert!(set_cookie.contains(&format!("Path=/s/{}", store.slug)));
    assert!(set_cookie.contains("HttpOnly"));

    let cart: Value = resp.json().await.expect("cart json");
    assert_eq!(cart["items"][0]["quantity"], 2);
    assert_eq!(cart["items"][0]["max_quantity"], 2);

    // Cookie jar carries the cart to the next request
    let count: Value = ctx
        .client
        .get(ctx.store_url(&store.slug, "/cart/count"))
        .send()
        .await
        .expect("count failed")
        .json()
        .await
        .expect("count json");
    assert_eq!(count["count"], 2);
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_update_to_zero_removes_line() {
    let ctx = TestContext::new().await;
    let store = ctx.seed_store(1).await;
    let bowl = ctx.seed_product(&store, "Pyrex bowl", 2600, 3).await;

    ctx.client
        .post(ctx.store_url(&store.slug, "/cart/add"))
        .json(&json!({ "product_id": bowl }))
        .send()
        .await
        .expect("add failed");

    let cart: Value = ctx
        .client
        .post(ctx.store_url(&store.slug, "/cart/update"))
        .json(&json!({ "product_id": bowl, "quantity": 0 }))
        .send()
        .await
        .expect("update failed")
        .json()
        .await
        .expect("cart json");
    assert_eq!(cart["items"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_corrupt_cookie_is_an_empty_cart() {
    let ctx = TestContext::new().await;
    let store = ctx.seed_store(1).await;

    let resp = fresh_client()
        .get(ctx.store_url(&store.slug, "/cart"))
        .header("cookie", format!("tb_cart_{}=%%%garbage", store.slug))
        .send()
        .await
        .expect("cart failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let cart: Value = resp.json().await.expect("cart json");
    assert_eq!(cart["item_count"], 0);
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_carts_are_scoped_per_store() {
    let ctx = TestContext::new().await;
    let first = ctx.seed_store(1).await;
    let second = ctx.seed_store(1).await;
    let vase = ctx.seed_product(&first, "Glass vase", 1500, 4).await;

    ctx.client
        .post(ctx.store_url(&first.slug, "/cart/add"))
        .json(&json!({ "product_id": vase }))
        .send()
        .await
        .expect("add failed");

    let count: Value = ctx
        .client
        .get(ctx.store_url(&second.slug, "/cart/count"))
        .send()
        .await
        .expect("count failed")
        .json()
        .await
        .expect("count json");
    assert_eq!(count["count"], 0);
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_unknown_store_is_not_found() {
    let ctx = TestContext::new().await;
    let resp = ctx
        .client
        .get(ctx.store_url("no-such-store-here", "/cart"))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_full_cart_refuses_more_products_and_keeps_titles() {
    let ctx = TestContext::new().await;
    let store = ctx.seed_store(1).await;

    for n in 0..=30 {
        let title = format!("Hand-thrown stoneware mug, speckled glaze, no. {n}");
        let product = ctx.seed_product(&store, &title, 1450, 3).await;
        let resp = ctx
            .client
            .post(ctx.store_url(&store.slug, "/cart/add"))
            .json(&json!({ "product_id": product }))
            .send()
            .await
            .expect("add failed");

        if n < 30 {
            assert_eq!(resp.status(), StatusCode::OK, "add #{n}");
            let set_cookie = resp
                .headers()
                .get("set-cookie")
                .map(|v| v.as_bytes().len())
                .unwrap_or_default();
            assert!(set_cookie <= 4096, "cookie of {set_cookie} bytes");
        } else {
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
            let body: Value = resp.json().await.expect("error json");
            assert!(body["error"].as_str().is_some_and(|e| e.contains("30")));
        }
    }

    // The refused add left the stored cart as it was, titles re-read from the catalog
    let cart: Value = ctx
        .client
        .get(ctx.store_url(&store.slug, "/cart"))
        .send()
        .await
        .expect("cart failed")
        .json()
        .await
        .expect("cart json");
    assert_eq!(cart["item_count"], 30);
    assert_eq!(
        cart["items"][0]["title"],
        "Hand-thrown stoneware mug, speckled glaze, no. 0"
    );
}
