//! Checkout prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    checkout::{Checkout, CheckoutError, LineTotal},
    fixtures::{Fixture, FixtureError, load_pricing_file, parse_pricing_table},
    items::ItemCounts,
    pricing::{BulkDiscount, LineTotalError, MultiBuy, PricingRule, PricingTable},
};
