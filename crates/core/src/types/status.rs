//! Order fulfillment status.
//!
//! ```text
//! pending ──▶ shipped ──▶ delivered
//!    │
//!    └──────────────────▶ fulfilled
//! ```
//!
//! `fulfilled` is a shortcut terminal state for orders handed over in person
//! or otherwise completed without a shipping leg.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a string is not one of the four status values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid fulfillment status '{0}', expected one of: pending, shipped, delivered, fulfilled")]
pub struct StatusParseError(pub String);

/// Seller-controlled lifecycle stage of a placed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "thriftbox.fulfillment_status", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum FulfillmentStatus {
    #[default]
    Pending,
    Shipped,
    Delivered,
    Fulfilled,
}

impl FulfillmentStatus {
    /// Every accepted status, in lifecycle order.
    pub const ALL: [Self; 4] = [
        Self::Pending,
        Self::Shipped,
        Self::Delivered,
        Self::Fulfilled,
    ];

    /// Wire and database spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Fulfilled => "fulfilled",
        }
    }

    /// Whether entering this status stamps `shipped_at`.
    #[must_use]
    pub const fn stamps_shipped_at(self) -> bool {
        matches!(self, Self::Shipped | Self::Delivered | Self::Fulfilled)
    }

    /// Whether entering this status stamps `delivered_at`.
    #[must_use]
    pub const fn stamps_delivered_at(self) -> bool {
        matches!(self, Self::Delivered | Self::Fulfilled)
    }

    /// Whether `next` moves the order forward along the lifecycle.
    ///
    /// Status writes are not gated on this; it exists for callers that want
    /// to warn about a backward edit.
    #[must_use]
    pub const fn is_forward_to(self, next: Self) -> bool {
        match (self, next) {
            (Self::Pending, Self::Shipped | Self::Delivered | Self::Fulfilled)
            | (Self::Shipped, Self::Delivered | Self::Fulfilled) => true,
            _ => false,
        }
    }
}

impl fmt::Display for FulfillmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FulfillmentStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            "fulfilled" => Ok(Self::Fulfilled),
            other => Err(StatusParseError(other.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_exactly_four_values() {
        for status in FulfillmentStatus::ALL {
            assert_eq!(status.as_str().parse::<FulfillmentStatus>().unwrap(), status);
        }
        assert!("cancelled".parse::<FulfillmentStatus>().is_err());
        assert!("Shipped".parse::<FulfillmentStatus>().is_err());
        assert!("".parse::<FulfillmentStatus>().is_err());
    }

    #[test]
    fn test_timestamp_rules() {
        assert!(!FulfillmentStatus::Pending.stamps_shipped_at());
        assert!(!FulfillmentStatus::Pending.stamps_delivered_at());

        assert!(FulfillmentStatus::Shipped.stamps_shipped_at());
        assert!(!FulfillmentStatus::Shipped.stamps_delivered_at());

        assert!(FulfillmentStatus::Delivered.stamps_shipped_at());
        assert!(FulfillmentStatus::Delivered.stamps_delivered_at());

        assert!(FulfillmentStatus::Fulfilled.stamps_shipped_at());
        assert!(FulfillmentStatus::Fulfilled.stamps_delivered_at());
    }

    #[test]
    fn test_forward_edges() {
        use FulfillmentStatus::{Delivered, Fulfilled, Pending, Shipped};

        assert!(Pending.is_forward_to(Shipped));
        assert!(Pending.is_forward_to(Fulfilled));
        assert!(Shipped.is_forward_to(Delivered));
        assert!(!Delivered.is_forward_to(Pending));
        assert!(!Fulfilled.is_forward_to(Shipped));
        assert!(!Shipped.is_forward_to(Shipped));
    }

    #[test]
    fn test_serde_is_lowercase() {
        let json = serde_json::to_string(&FulfillmentStatus::Delivered).unwrap();
        assert_eq!(json, "\"delivered\"");
        let parsed: FulfillmentStatus = serde_json::from_str("\"fulfilled\"").unwrap();
        assert_eq!(parsed, FulfillmentStatus::Fulfilled);
    }
}
