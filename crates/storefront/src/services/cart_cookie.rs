//! Cart persistence in the customer's browser.
//!
//! Each storefront gets its own cookie, `tb_cart_{slug}`, scoped to
//! `/s/{slug}` so carts never leak between stores. The value is a JSON array
//! of `{product_id, quantity, max_quantity, price}` records, base64url-encoded
//! without padding. Titles and images are not stored; routes fill them in from
//! the catalog before showing the cart.
//!
//! Browsers silently drop cookies over 4096 bytes, so a cart is capped at
//! [`MAX_CART_LINES`] products and a cookie that would still be too large is
//! refused instead of written.
//!
//! Reading never fails: a cookie that does not decode is logged and treated
//! as an empty cart, and one that decodes to inconsistent lines is
//! normalized by [`Cart`].

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower_sessions::cookie::time::Duration;
use tower_sessions::cookie::{Cookie, SameSite};

use thriftbox_core::{Cart, CartLine, ProductId};

/// Prefix of every cart cookie name.
pub const CART_COOKIE_PREFIX: &str = "tb_cart_";

/// Most distinct products a cart may hold.
///
/// At this size the worst-case cookie (longest slug, ten-digit ids and
/// quantities, largest price) still fits in [`MAX_COOKIE_BYTES`].
pub const MAX_CART_LINES: usize = 30;

/// Largest `Set-Cookie` value browsers are required to keep.
pub const MAX_COOKIE_BYTES: usize = 4096;

#[derive(Debug, Error)]
pub enum CartCookieError {
    #[error("invalid base64: {0}")]
    Encoding(#[from] base64::DecodeError),
    #[error("invalid cart json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("a cart can hold at most {max} different products")]
    TooManyLines { max: usize },
    #[error("cart is too large to save ({bytes} bytes, limit {max})")]
    TooLarge { bytes: usize, max: usize },
}

/// The part of a cart line that survives in the cookie.
#[derive(Debug, Serialize, Deserialize)]
struct StoredLine {
    product_id: ProductId,
    quantity: u32,
    max_quantity: u32,
    price: Decimal,
}

impl From<&CartLine> for StoredLine {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product_id,
            quantity: line.quantity,
            max_quantity: line.max_quantity,
            price: line.unit_price,
        }
    }
}

impl From<StoredLine> for CartLine {
    fn from(stored: StoredLine) -> Self {
        Self {
            product_id: stored.product_id,
            title: String::new(),
            unit_price: stored.price,
            quantity: stored.quantity,
            image_url: String::new(),
            max_quantity: stored.max_quantity,
        }
    }
}

/// Cookie name for the cart of store `slug`.
#[must_use]
pub fn cookie_name(slug: &str) -> String {
    format!("{CART_COOKIE_PREFIX}{slug}")
}

fn cookie_path(slug: &str) -> String {
    format!("/s/{slug}")
}

/// Serialize a cart to a cookie value.
///
/// # Errors
///
/// Returns `CartCookieError::Json` if serialization fails.
pub fn encode(cart: &Cart) -> Result<String, CartCookieError> {
    let lines: Vec<StoredLine> = cart.lines().iter().map(StoredLine::from).collect();
    Ok(URL_SAFE_NO_PAD.encode(serde_json::to_vec(&lines)?))
}

/// Parse a cookie value back into a cart without titles or images.
///
/// # Errors
///
/// Returns `CartCookieError` if the value is not base64url or not a JSON line
/// array.
pub fn decode(value: &str) -> Result<Cart, CartCookieError> {
    let bytes = URL_SAFE_NO_PAD.decode(value.trim())?;
    let lines: Vec<StoredLine> = serde_json::from_slice(&bytes)?;
    Ok(Cart::from(
        lines.into_iter().map(CartLine::from).collect::<Vec<_>>(),
    ))
}

/// Load a cart from an optional cookie value, discarding anything unreadable.
#[must_use]
pub fn load(value: Option<&str>) -> Cart {
    let Some(value) = value.filter(|v| !v.is_empty()) else {
        return Cart::new();
    };
    match decode(value) {
        Ok(cart) => cart,
        Err(e) => {
            tracing::warn!(error = %e, "Discarding unreadable cart cookie");
            Cart::new()
        }
    }
}

/// `Set-Cookie` for storing `cart` for store `slug`.
///
/// # Errors
///
/// Returns `CartCookieError::TooManyLines` or `CartCookieError::TooLarge`
/// when the browser would not keep the cookie, and `CartCookieError::Json`
/// if the cart cannot be serialized.
pub fn build_cookie(
    slug: &str,
    cart: &Cart,
    max_age_days: i64,
    secure: bool,
) -> Result<Cookie<'static>, CartCookieError> {
    if cart.len() > MAX_CART_LINES {
        return Err(CartCookieError::TooManyLines {
            max: MAX_CART_LINES,
        });
    }

    let cookie = Cookie::build((cookie_name(slug), encode(cart)?))
        .path(cookie_path(slug))
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::days(max_age_days))
        .build();

    let bytes = cookie.to_string().len();
    if bytes > MAX_COOKIE_BYTES {
        return Err(CartCookieError::TooLarge {
            bytes,
            max: MAX_COOKIE_BYTES,
        });
    }
    Ok(cookie)
}

/// `Set-Cookie` that deletes the cart cookie of store `slug`.
#[must_use]
pub fn removal_cookie(slug: &str, secure: bool) -> Cookie<'static> {
    Cookie::build((cookie_name(slug), ""))
        .path(cookie_path(slug))
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::ZERO)
        .build()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn line(id: i32, quantity: u32, max_quantity: u32) -> CartLine {
        CartLine {
            product_id: ProductId::new(id),
            title: format!("Lamp {id}"),
            unit_price: Decimal::new(1999, 2),
            quantity,
            image_url: format!("https://cdn.thriftbox.test/products/{id}/front-large.jpg"),
            max_quantity,
        }
    }

    /// A cart at the line cap with the longest values each field can hold.
    fn worst_case_cart(lines: usize) -> Cart {
        let lines = (0..lines)
            .map(|i| CartLine {
                product_id: ProductId::new(i32::MAX - i32::try_from(i).unwrap()),
                title: "Mid-century walnut sideboard with original brass pulls".repeat(3),
                unit_price: Decimal::new(9_999_999_999, 2),
                quantity: u32::MAX,
                image_url: "https://cdn.thriftbox.test/products/sideboard.jpg".repeat(4),
                max_quantity: u32::MAX,
            })
            .collect::<Vec<_>>();
        Cart::from(lines)
    }

    #[test]
    fn test_round_trip_preserves_quantities_and_prices() {
        let mut cart = Cart::new();
        cart.add_item(line(1, 2, 5));
        cart.add_item(line(2, 1, 1));

        let restored = decode(&encode(&cart).unwrap()).unwrap();

        assert_eq!(restored.product_ids(), cart.product_ids());
        assert_eq!(restored.lines()[0].quantity, 2);
        assert_eq!(restored.lines()[0].max_quantity, 5);
        assert_eq!(restored.lines()[1].unit_price, Decimal::new(1999, 2));
        // Display fields are filled in from the catalog, not the cookie
        assert!(restored.lines()[0].title.is_empty());
        assert!(restored.lines()[0].image_url.is_empty());
    }

    #[test]
    fn test_encoded_value_is_cookie_safe() {
        let mut cart = Cart::new();
        cart.add_item(line(1, 2, 5));
        let value = encode(&cart).unwrap();
        assert!(
            value
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn test_corrupt_payload_loads_empty() {
        assert!(load(Some("%%%not-base64")).is_empty());
        assert!(load(Some(&URL_SAFE_NO_PAD.encode(b"{\"not\":\"a cart\"}"))).is_empty());
        assert!(load(Some("")).is_empty());
        assert!(load(None).is_empty());
    }

    #[test]
    fn test_inconsistent_payload_is_normalized() {
        let json = r#"[
            {"product_id":1,"title":"Lamp","price":"5.00","quantity":9,"max_quantity":3},
            {"product_id":2,"title":"Vase","price":"2.00","quantity":0,"max_quantity":3},
            {"product_id":1,"title":"Lamp","price":"5.00","quantity":1,"max_quantity":3}
        ]"#;
        let cart = load(Some(&URL_SAFE_NO_PAD.encode(json)));

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.lines()[0].quantity, 3);
    }

    #[test]
    fn test_largest_allowed_cart_fits_in_one_cookie() {
        let slug = format!("a{}", "b".repeat(62));
        let cookie = build_cookie(&slug, &worst_case_cart(MAX_CART_LINES), 30, true).unwrap();

        assert!(cookie.to_string().len() <= MAX_COOKIE_BYTES);
        assert_eq!(decode(cookie.value()).unwrap().len(), MAX_CART_LINES);
    }

    #[test]
    fn test_cart_over_line_cap_is_refused() {
        let err = build_cookie("attic-finds", &worst_case_cart(MAX_CART_LINES + 1), 30, true)
            .unwrap_err();
        assert!(matches!(err, CartCookieError::TooManyLines { max: MAX_CART_LINES }));
    }

    #[test]
    fn test_oversized_cookie_is_refused() {
        let slug = "x".repeat(MAX_COOKIE_BYTES);
        let err = build_cookie(&slug, &worst_case_cart(1), 30, false).unwrap_err();
        assert!(matches!(err, CartCookieError::TooLarge { .. }));
    }

    #[test]
    fn test_cookie_attributes() {
        let cookie = build_cookie("attic-finds", &Cart::new(), 30, true).unwrap();
        assert_eq!(cookie.name(), "tb_cart_attic-finds");
        assert_eq!(cookie.path(), Some("/s/attic-finds"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.max_age(), Some(Duration::days(30)));

        let removal = removal_cookie("attic-finds", false);
        assert_eq!(removal.max_age(), Some(Duration::ZERO));
        assert_eq!(removal.value(), "");
    }
}
