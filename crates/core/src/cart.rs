//! Customer cart.
//!
//! The cart is owned by the customer's browser, not by the server: it is
//! serialized into a cookie after every mutation and read back on the next
//! request. The server never trusts it for money (checkout re-reads prices and
//! stock), but the cart still keeps its own lines consistent so the customer
//! sees sensible quantities between syncs.
//!
//! # Invariants
//!
//! - At most one line per `product_id`, in insertion order.
//! - Every stored line satisfies `0 < quantity <= max_quantity`.
//!
//! Every mutation upholds both, and [`Cart::from`] re-establishes them for
//! lines read back from an untrusted cookie.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{ProductId, line_total};

/// One product selection in a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub title: String,
    /// Price per unit when the line was last synced with the catalog.
    #[serde(rename = "price")]
    pub unit_price: Decimal,
    pub quantity: u32,
    #[serde(default)]
    pub image_url: String,
    /// Stock ceiling when the line was last synced with the catalog.
    pub max_quantity: u32,
}

impl CartLine {
    /// Price of this line.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        line_total(self.unit_price, self.quantity)
    }
}

/// Ordered set of [`CartLine`]s for one storefront.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<CartLine>", into = "Vec<CartLine>")]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// The line for `product_id`, if present.
    #[must_use]
    pub fn line(&self, product_id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.product_id == product_id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Add a line, merging with an existing line for the same product.
    ///
    /// The incoming `max_quantity` is the freshest ceiling we know of, so it
    /// replaces the stored one and bounds the merged quantity:
    /// `min(existing + incoming, incoming.max_quantity)`. Title, price and
    /// image are refreshed from the incoming line as well. A merge that lands
    /// on zero (the product sold out since it was first added) drops the line;
    /// a new line that would start at zero is not inserted.
    pub fn add_item(&mut self, line: CartLine) {
        if let Some(pos) = self.position(line.product_id) {
            let existing_qty = self.lines.get(pos).map_or(0, |l| l.quantity);
            let quantity = existing_qty
                .saturating_add(line.quantity)
                .min(line.max_quantity);

            if quantity == 0 {
                self.lines.remove(pos);
                return;
            }

            if let Some(slot) = self.lines.get_mut(pos) {
                *slot = CartLine { quantity, ..line };
            }
            return;
        }

        let quantity = line.quantity.min(line.max_quantity);
        if quantity > 0 {
            self.lines.push(CartLine { quantity, ..line });
        }
    }

    /// Remove the line for `product_id`. Absent products are ignored.
    pub fn remove_item(&mut self, product_id: ProductId) {
        self.lines.retain(|l| l.product_id != product_id);
    }

    /// Set a line's quantity, clamped to its stored ceiling.
    ///
    /// Zero or negative removes the line. Absent products are ignored.
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: i64) {
        if quantity <= 0 {
            self.remove_item(product_id);
            return;
        }

        let Some(pos) = self.position(product_id) else {
            return;
        };

        let requested = u32::try_from(quantity).unwrap_or(u32::MAX);
        let ceiling = self.lines.get(pos).map_or(0, |l| l.max_quantity);
        let clamped = requested.min(ceiling);

        if clamped == 0 {
            self.lines.remove(pos);
        } else if let Some(line) = self.lines.get_mut(pos) {
            line.quantity = clamped;
        }
    }

    /// Set the display title and image of the line for `product_id`.
    ///
    /// Quantity, ceiling and price are left alone. Absent products are
    /// ignored.
    pub fn describe(&mut self, product_id: ProductId, title: &str, image_url: &str) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product_id) {
            title.clone_into(&mut line.title);
            image_url.clone_into(&mut line.image_url);
        }
    }

    /// Product IDs in line order.
    #[must_use]
    pub fn product_ids(&self) -> Vec<ProductId> {
        self.lines.iter().map(|l| l.product_id).collect()
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of line totals.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Amount due. Equal to [`Cart::subtotal`] until shipping, tax or
    /// discounts are modelled.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.subtotal()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0u32, |acc, l| acc.saturating_add(l.quantity))
    }

    fn position(&self, product_id: ProductId) -> Option<usize> {
        self.lines.iter().position(|l| l.product_id == product_id)
    }
}

impl From<Vec<CartLine>> for Cart {
    /// Build a cart from untrusted lines, merging duplicates and dropping or
    /// clamping lines that break the quantity invariant.
    fn from(lines: Vec<CartLine>) -> Self {
        let mut cart = Self::new();
        for line in lines {
            cart.add_item(line);
        }
        cart
    }
}

impl From<Cart> for Vec<CartLine> {
    fn from(cart: Cart) -> Self {
        cart.lines
    }
}
