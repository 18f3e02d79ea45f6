//! Decimal money helpers.
//!
//! Prices are stored as `NUMERIC(10, 2)` and carried as [`Decimal`] end to
//! end. Storefronts are single-currency (USD) for now, so there is no
//! currency type yet.

use rust_decimal::Decimal;

/// Price of `quantity` units at `unit_price`.
#[must_use]
pub fn line_total(unit_price: Decimal, quantity: u32) -> Decimal {
    unit_price * Decimal::from(quantity)
}

/// Format an amount for display, e.g. `$19.90`.
#[must_use]
pub fn format_usd(amount: Decimal) -> String {
    format!("${:.2}", amount.round_dp(2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_total() {
        assert_eq!(line_total(Decimal::new(1250, 2), 3), Decimal::new(3750, 2));
        assert_eq!(line_total(Decimal::new(1250, 2), 0), Decimal::ZERO);
    }

    #[test]
    fn test_format_usd_pads_cents() {
        assert_eq!(format_usd(Decimal::new(199, 1)), "$19.90");
        assert_eq!(format_usd(Decimal::ZERO), "$0.00");
    }
}
