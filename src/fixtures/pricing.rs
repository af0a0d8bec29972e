//! Pricing Fixtures

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rustc_hash::FxHashMap;
use rusty_money::{
    Money,
    iso::{AUD, Currency, EUR, GBP, NZD, USD},
};
use serde::Deserialize;

use crate::{
    fixtures::FixtureError,
    pricing::{BulkDiscount, MultiBuy, PricingRule},
};

/// Wrapper for a pricing table in YAML
#[derive(Debug, Deserialize)]
pub struct PricingTableFixture {
    /// Table currency code, required when there are no rules to infer it from
    #[serde(default)]
    pub currency: Option<String>,

    /// Map of item code -> rule fixture
    #[serde(default)]
    pub rules: FxHashMap<String, PricingRuleFixture>,
}

/// Pricing Rule Fixture
#[derive(Debug, Deserialize)]
pub struct PricingRuleFixture {
    /// Unit price (e.g., "549.99 AUD")
    pub price: String,

    /// Optional bulk discount
    #[serde(default)]
    pub bulk_discount: Option<BulkDiscountFixture>,

    /// Optional multi-buy
    #[serde(default)]
    pub multi_buy: Option<MultiBuyFixture>,
}

/// Bulk Discount Fixture
#[derive(Debug, Deserialize)]
pub struct BulkDiscountFixture {
    /// Quantity that must be exceeded
    pub threshold: usize,

    /// Discounted unit price (e.g., "499.99 AUD")
    pub discounted_price: String,
}

/// Multi-buy Fixture
#[derive(Debug, Deserialize)]
pub struct MultiBuyFixture {
    /// Group size
    pub buy: usize,

    /// Units paid for per group
    pub pay: usize,
}

impl TryFrom<PricingRuleFixture> for PricingRule {
    type Error = FixtureError;

    fn try_from(fixture: PricingRuleFixture) -> Result<Self, Self::Error> {
        let price = parse_money(&fixture.price)?;

        let bulk_discount = fixture
            .bulk_discount
            .map(|bulk| -> Result<BulkDiscount, FixtureError> {
                Ok(BulkDiscount::new(
                    bulk.threshold,
                    parse_money(&bulk.discounted_price)?,
                ))
            })
            .transpose()?;

        let multi_buy = fixture
            .multi_buy
            .map(|multi_buy| MultiBuy::new(multi_buy.buy, multi_buy.pay));

        Ok(PricingRule {
            price,
            bulk_discount,
            multi_buy,
        })
    }
}

fn parse_money(s: &str) -> Result<Money<'static, Currency>, FixtureError> {
    let (minor_units, currency) = parse_price(s)?;

    Ok(Money::from_minor(minor_units, currency))
}

/// Parse price string (e.g., "109.50 AUD") into minor units and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount cannot be parsed as a decimal or has fractions of a minor unit,
/// or if the currency code is not recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    if parts.len() != 2 {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    }

    let amount = parts
        .first()
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    let minor_units = amount
        .checked_mul(Decimal::new(100, 0))
        .filter(|value| value.fract().is_zero())
        .and_then(|value| value.to_i64())
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    let currency_code = parts
        .get(1)
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    Ok((minor_units, parse_currency(currency_code)?))
}

/// Parse an ISO currency code supported by the fixtures.
///
/// # Errors
///
/// Returns [`FixtureError::UnknownCurrency`] for any other code.
pub fn parse_currency(code: &str) -> Result<&'static Currency, FixtureError> {
    match code {
        "AUD" => Ok(AUD),
        "EUR" => Ok(EUR),
        "GBP" => Ok(GBP),
        "NZD" => Ok(NZD),
        "USD" => Ok(USD),
        other => Err(FixtureError::UnknownCurrency(other.to_string())),
    }
}
