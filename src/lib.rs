//! Checkout
//!
//! Point-of-sale checkout pricing. Item codes are scanned into a [`checkout::Checkout`]
//! session and totalled against a shared [`pricing::PricingTable`] that supports
//! multi-buy and bulk quantity discounts.

pub mod checkout;
pub mod fixtures;
pub mod items;
pub mod prelude;
pub mod pricing;
