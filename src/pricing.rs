//! Pricing rules

use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

/// Errors that can occur while pricing a single line.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LineTotalError {
    /// The line total does not fit in the minor unit range.
    #[error("line total for {count} units overflowed")]
    Overflow {
        /// Quantity that was being priced
        count: usize,
    },
}

/// "Buy N" rule: one unit's price is deducted for every complete group of `buy` units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MultiBuy {
    /// Group size
    pub buy: usize,

    /// Advertised number of units paid for in each group.
    ///
    /// Not used by the arithmetic, which always deducts exactly one unit per group.
    pub pay: usize,
}

impl MultiBuy {
    /// Create a new multi-buy rule.
    pub fn new(buy: usize, pay: usize) -> Self {
        Self { buy, pay }
    }

    /// Number of free units earned by `count` scans.
    ///
    /// A group size of zero never earns anything.
    pub fn free_units(&self, count: usize) -> usize {
        count.checked_div(self.buy).unwrap_or(0)
    }
}

/// Replaces the unit price of every unit once the quantity exceeds `threshold`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BulkDiscount {
    /// Quantity that must be strictly exceeded
    pub threshold: usize,

    /// Unit price charged once the discount applies
    pub discounted_price: Money<'static, Currency>,
}

impl BulkDiscount {
    /// Create a new bulk discount.
    pub fn new(threshold: usize, discounted_price: Money<'static, Currency>) -> Self {
        Self {
            threshold,
            discounted_price,
        }
    }

    /// Whether `count` units qualify for the discounted price.
    pub fn applies_to(&self, count: usize) -> bool {
        count > self.threshold
    }
}

/// Pricing for a single item code.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricingRule {
    /// Unit price
    pub price: Money<'static, Currency>,

    /// Optional bulk discount
    pub bulk_discount: Option<BulkDiscount>,

    /// Optional multi-buy
    pub multi_buy: Option<MultiBuy>,
}

impl PricingRule {
    /// Creates a rule with no discounts.
    pub fn new(price: Money<'static, Currency>) -> Self {
        Self {
            price,
            bulk_discount: None,
            multi_buy: None,
        }
    }

    /// Adds a bulk discount to the rule.
    #[must_use]
    pub fn with_bulk_discount(
        mut self,
        threshold: usize,
        discounted_price: Money<'static, Currency>,
    ) -> Self {
        self.bulk_discount = Some(BulkDiscount::new(threshold, discounted_price));
        self
    }

    /// Adds a multi-buy to the rule.
    #[must_use]
    pub fn with_multi_buy(mut self, buy: usize, pay: usize) -> Self {
        self.multi_buy = Some(MultiBuy::new(buy, pay));
        self
    }

    /// Price `count` units of this item.
    ///
    /// The multi-buy deduction is applied first. A qualifying bulk discount then
    /// replaces the whole line, so the two never combine.
    ///
    /// # Errors
    ///
    /// Returns [`LineTotalError::Overflow`] if the arithmetic leaves the `i64` minor unit range.
    pub fn line_total(&self, count: usize) -> Result<Money<'static, Currency>, LineTotalError> {
        let overflow = LineTotalError::Overflow { count };
        let quantity = i64::try_from(count).map_err(|_err| overflow.clone())?;
        let unit_price = self.price.to_minor_units();

        let mut currency = self.price.currency();
        let mut line = unit_price
            .checked_mul(quantity)
            .ok_or_else(|| overflow.clone())?;

        let free_units = self
            .multi_buy
            .map_or(0, |multi_buy| multi_buy.free_units(count));

        if free_units > 0 {
            let deduction = i64::try_from(free_units)
                .ok()
                .and_then(|free| unit_price.checked_mul(free))
                .ok_or_else(|| overflow.clone())?;

            line = line.checked_sub(deduction).ok_or_else(|| overflow.clone())?;
        }

        if let Some(bulk) = self.bulk_discount.filter(|bulk| bulk.applies_to(count)) {
            currency = bulk.discounted_price.currency();
            line = bulk
                .discounted_price
                .to_minor_units()
                .checked_mul(quantity)
                .ok_or(overflow)?;
        }

        Ok(Money::from_minor(line, currency))
    }
}

/// Pricing rules keyed by item code.
#[derive(Debug, Clone)]
pub struct PricingTable {
    rules: FxHashMap<String, PricingRule>,
    currency: &'static Currency,
}

impl PricingTable {
    /// Create an empty table in the given currency.
    pub fn new(currency: &'static Currency) -> Self {
        Self {
            rules: FxHashMap::default(),
            currency,
        }
    }

    /// Create a table from `(code, rule)` pairs. Later duplicates replace earlier ones.
    pub fn with_rules<K: Into<String>>(
        rules: impl IntoIterator<Item = (K, PricingRule)>,
        currency: &'static Currency,
    ) -> Self {
        let mut table = Self::new(currency);

        for (code, rule) in rules {
            table.insert(code, rule);
        }

        table
    }

    /// Insert a rule, returning the one it replaced.
    pub fn insert(&mut self, code: impl Into<String>, rule: PricingRule) -> Option<PricingRule> {
        self.rules.insert(code.into(), rule)
    }

    /// Look up the rule for an item code.
    pub fn rule(&self, code: &str) -> Option<&PricingRule> {
        self.rules.get(code)
    }

    /// Item codes in lexical order.
    pub fn codes(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        codes.sort_unstable();
        codes
    }

    /// Number of rules in the table.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if the table has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Currency of the table.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::AUD;
    use testresult::TestResult;

    use super::*;

    fn aud(minor: i64) -> Money<'static, Currency> {
        Money::from_minor(minor, AUD)
    }

    #[test]
    fn line_total_without_discounts_is_linear() -> TestResult {
        let rule = PricingRule::new(aud(3000));

        assert_eq!(rule.line_total(0)?, aud(0));
        assert_eq!(rule.line_total(1)?, aud(3000));
        assert_eq!(rule.line_total(7)?, aud(21_000));

        Ok(())
    }

    #[test]
    fn multi_buy_deducts_one_unit_per_complete_group() -> TestResult {
        let rule = PricingRule::new(aud(10_950)).with_multi_buy(3, 2);

        assert_eq!(rule.line_total(2)?, aud(21_900));
        assert_eq!(rule.line_total(3)?, aud(21_900));
        assert_eq!(rule.line_total(4)?, aud(32_850));
        assert_eq!(rule.line_total(6)?, aud(43_800));

        Ok(())
    }

    #[test]
    fn multi_buy_ignores_pay() -> TestResult {
        let rule = PricingRule::new(aud(100)).with_multi_buy(5, 1);

        assert_eq!(rule.line_total(5)?, aud(400));

        Ok(())
    }

    #[test]
    fn multi_buy_with_zero_group_size_deducts_nothing() -> TestResult {
        let rule = PricingRule::new(aud(100)).with_multi_buy(0, 0);

        assert_eq!(rule.line_total(3)?, aud(300));

        Ok(())
    }

    #[test]
    fn bulk_discount_threshold_is_exclusive() -> TestResult {
        let rule = PricingRule::new(aud(54_999)).with_bulk_discount(4, aud(49_999));

        assert_eq!(rule.line_total(4)?, aud(219_996));
        assert_eq!(rule.line_total(5)?, aud(249_995));

        Ok(())
    }

    #[test]
    fn bulk_discount_overrides_multi_buy() -> TestResult {
        let rule = PricingRule::new(aud(1000))
            .with_multi_buy(2, 1)
            .with_bulk_discount(3, aud(800));

        // 3 units: multi-buy only, 3000 - 1000
        assert_eq!(rule.line_total(3)?, aud(2000));
        // 4 units: bulk wins outright
        assert_eq!(rule.line_total(4)?, aud(3200));

        Ok(())
    }

    #[test]
    fn line_total_reports_overflow() {
        let rule = PricingRule::new(aud(i64::MAX));

        assert_eq!(
            rule.line_total(2),
            Err(LineTotalError::Overflow { count: 2 })
        );
    }

    #[test]
    fn insert_replaces_existing_rule() {
        let mut table = PricingTable::new(AUD);

        assert!(table.insert("vga", PricingRule::new(aud(3000))).is_none());

        let replaced = table.insert("vga", PricingRule::new(aud(2500)));

        assert_eq!(replaced, Some(PricingRule::new(aud(3000))));
        assert_eq!(table.rule("vga"), Some(&PricingRule::new(aud(2500))));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn codes_are_sorted_and_case_sensitive() {
        let table = PricingTable::with_rules(
            [
                ("vga", PricingRule::new(aud(3000))),
                ("VGA", PricingRule::new(aud(3100))),
                ("atv", PricingRule::new(aud(10_950))),
            ],
            AUD,
        );

        assert_eq!(table.codes(), vec!["VGA", "atv", "vga"]);
        assert!(table.rule("Atv").is_none());
    }

    #[test]
    fn empty_table() {
        let table = PricingTable::new(AUD);

        assert!(table.is_empty());
        assert_eq!(table.currency(), AUD);
    }
}
