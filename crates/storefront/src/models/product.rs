//! Product catalog snapshots.

use rust_decimal::Decimal;
use serde::Serialize;

use thriftbox_core::{CartLine, ProductId};

/// Current price and stock of a listed product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductSnapshot {
    pub product_id: ProductId,
    pub title: String,
    pub price: Decimal,
    pub image_url: Option<String>,
    /// 0 when the product has no inventory row.
    pub quantity_on_hand: i32,
}

impl ProductSnapshot {
    /// Units that can be put in a cart right now.
    #[must_use]
    pub fn available(&self) -> u32 {
        u32::try_from(self.quantity_on_hand).unwrap_or(0)
    }

    /// A cart line for `quantity` units, with this snapshot as the ceiling.
    #[must_use]
    pub fn to_cart_line(&self, quantity: u32) -> CartLine {
        CartLine {
            product_id: self.product_id,
            title: self.title.clone(),
            unit_price: self.price,
            quantity,
            image_url: self.image_url.clone().unwrap_or_default(),
            max_quantity: self.available(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_stock_is_unavailable() {
        let snapshot = ProductSnapshot {
            product_id: ProductId::new(1),
            title: "Denim vest".to_string(),
            price: Decimal::new(2200, 2),
            image_url: None,
            quantity_on_hand: -2,
        };
        assert_eq!(snapshot.available(), 0);
        assert_eq!(snapshot.to_cart_line(1).max_quantity, 0);
    }
}
