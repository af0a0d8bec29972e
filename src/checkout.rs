//! Checkout

use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;
use tracing::{debug, trace};

use crate::{
    items::ItemCounts,
    pricing::{LineTotalError, PricingTable},
};

/// Errors that can occur while totalling a checkout.
#[derive(Debug, Error, PartialEq)]
pub enum CheckoutError {
    /// A scanned item code has no rule in the pricing table.
    #[error("No pricing rule found for item {0}")]
    UnknownItem(String),

    /// The line total for an item code could not be represented.
    #[error("Line total overflowed for item {code}")]
    Overflow {
        /// Offending item code
        code: String,

        /// Underlying arithmetic error
        #[source]
        source: LineTotalError,
    },

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Priced quantity of a single item code.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineTotal<'a> {
    /// Item code
    pub code: &'a str,

    /// Number of units scanned
    pub quantity: usize,

    /// Amount charged for all units after discounts
    pub total: Money<'static, Currency>,
}

/// A checkout session: scans item codes against a shared pricing table.
#[derive(Debug, Clone)]
pub struct Checkout<'a> {
    pricing: &'a PricingTable,
    scanned: Vec<String>,
}

impl<'a> Checkout<'a> {
    /// Start a session with an empty scan log.
    pub fn new(pricing: &'a PricingTable) -> Self {
        Checkout {
            pricing,
            scanned: Vec::new(),
        }
    }

    /// Record a scanned item code.
    ///
    /// Codes are not checked against the pricing table until [`Checkout::total`].
    pub fn scan(&mut self, code: impl Into<String>) {
        let code = code.into();

        trace!(code = %code, position = self.scanned.len(), "scanned item");

        self.scanned.push(code);
    }

    /// Item codes in the order they were scanned.
    pub fn scanned(&self) -> &[String] {
        &self.scanned
    }

    /// Pricing table the session was created with.
    pub fn pricing(&self) -> &'a PricingTable {
        self.pricing
    }

    /// Number of scans recorded.
    pub fn len(&self) -> usize {
        self.scanned.len()
    }

    /// Check if nothing has been scanned.
    pub fn is_empty(&self) -> bool {
        self.scanned.is_empty()
    }

    /// Quantities per item code, in order of first scan.
    pub fn counts(&self) -> ItemCounts<'_> {
        ItemCounts::from_scans(&self.scanned)
    }

    /// Price every distinct item code, in order of first scan.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::UnknownItem`]: a scanned code has no pricing rule.
    /// - [`CheckoutError::Overflow`]: a line total left the representable range.
    pub fn line_totals(&self) -> Result<Vec<LineTotal<'_>>, CheckoutError> {
        let counts = self.counts();
        let mut lines = Vec::with_capacity(counts.len());

        for (code, quantity) in counts.iter() {
            let rule = self
                .pricing
                .rule(code)
                .ok_or_else(|| CheckoutError::UnknownItem(code.to_string()))?;

            let total = rule
                .line_total(quantity)
                .map_err(|source| CheckoutError::Overflow {
                    code: code.to_string(),
                    source,
                })?;

            debug!(code, quantity, total = %total, "priced line");

            lines.push(LineTotal {
                code,
                quantity,
                total,
            });
        }

        Ok(lines)
    }

    /// Calculate the total price of everything scanned so far.
    ///
    /// Fails on the first unpriceable item code; no partial total is returned.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::UnknownItem`]: a scanned code has no pricing rule.
    /// - [`CheckoutError::Overflow`]: a line total left the representable range.
    /// - [`CheckoutError::Money`]: a rule is priced in a different currency to the table.
    pub fn total(&self) -> Result<Money<'static, Currency>, CheckoutError> {
        let lines = self.line_totals()?;

        let total = lines.iter().try_fold(
            Money::from_minor(0, self.pricing.currency()),
            |acc, line| acc.add(line.total),
        )?;

        debug!(items = self.scanned.len(), total = %total, "checkout total");

        Ok(total)
    }
}
