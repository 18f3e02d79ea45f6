//! Rebuilding cart lines from a past order.
//!
//! Order items are an immutable snapshot (title, price, quantity at purchase
//! time) plus a live link to the product's current inventory. Depending on
//! how the inventory was joined, that link arrives as a single record, a
//! list, or nothing at all; [`StockRef::normalize`] collapses the shapes so
//! the composer only ever sees `Option<StockRecord>`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::{Cart, CartLine};
use crate::types::ProductId;

/// Inventory row for one product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRecord {
    pub quantity_on_hand: i32,
}

/// Inventory as returned by a join: one record or a collection of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StockRef {
    One(StockRecord),
    Many(Vec<StockRecord>),
}

impl StockRef {
    /// First element of a collection, or the record itself.
    #[must_use]
    pub fn normalize(self) -> Option<StockRecord> {
        match self {
            Self::One(record) => Some(record),
            Self::Many(records) => records.into_iter().next(),
        }
    }
}

/// One line of a past order, as read back for a reorder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoricalLine {
    pub product_id: ProductId,
    pub title: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub image_url: Option<String>,
    /// Live inventory; `None` when the product or its stock row is gone.
    pub stock: Option<StockRef>,
}

impl HistoricalLine {
    /// Units currently available, 0 when unknown.
    #[must_use]
    pub fn live_stock(&self) -> u32 {
        self.stock
            .clone()
            .and_then(StockRef::normalize)
            .map_or(0, |record| u32::try_from(record.quantity_on_hand).unwrap_or(0))
    }

    /// Cart line for this historical line.
    ///
    /// The ceiling is the live stock when there is any. A product that has
    /// since sold out or been delisted falls back to the originally ordered
    /// quantity instead of zero, so the customer still sees it in the cart;
    /// checkout re-validates against real stock.
    #[must_use]
    pub fn to_cart_line(&self) -> CartLine {
        let live = self.live_stock();
        let max_quantity = if live > 0 { live } else { self.quantity };

        CartLine {
            product_id: self.product_id,
            title: self.title.clone(),
            unit_price: self.unit_price,
            quantity: self.quantity,
            image_url: self.image_url.clone().unwrap_or_default(),
            max_quantity,
        }
    }
}

/// Cart lines for a past order, in order-item order.
#[must_use]
pub fn compose(lines: &[HistoricalLine]) -> Vec<CartLine> {
    lines.iter().map(HistoricalLine::to_cart_line).collect()
}

/// Feed a past order's lines into `cart` through [`Cart::add_item`].
///
/// Returns the number of lines fed in. An order with no items leaves the cart
/// untouched and returns 0, which callers use to skip re-persisting it.
pub fn reorder_into(cart: &mut Cart, lines: &[HistoricalLine]) -> usize {
    let composed = compose(lines);
    let fed = composed.len();
    for line in composed {
        cart.add_item(line);
    }
    fed
}
