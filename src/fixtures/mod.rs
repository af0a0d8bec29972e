//! Fixtures
//!
//! Pricing tables are configured as YAML files under `<base>/pricing/<name>.yml`.

use std::{
    fs,
    path::{Path, PathBuf},
};

use rusty_money::iso::Currency;
use thiserror::Error;
use tracing::debug;

use crate::{
    fixtures::pricing::{PricingTableFixture, parse_currency},
    pricing::{PricingRule, PricingTable},
};

pub mod pricing;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Currency mismatch between prices
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// No currency given and no rules to infer one from
    #[error("No currency given and no pricing rules to infer it from")]
    NoCurrency,
}

/// Fixture
#[derive(Debug, Clone)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

impl Fixture {
    /// Create a fixture loader with the default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a fixture loader with a custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Path of a named pricing set
    pub fn pricing_path(&self, name: &str) -> PathBuf {
        self.base_path.join("pricing").join(format!("{name}.yml"))
    }

    /// Load a named pricing set
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if its prices are invalid.
    pub fn load_pricing(&self, name: &str) -> Result<PricingTable, FixtureError> {
        load_pricing_file(self.pricing_path(name))
    }

    /// Load a named pricing set from the default base path
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if its prices are invalid.
    pub fn from_set(name: &str) -> Result<PricingTable, FixtureError> {
        Self::new().load_pricing(name)
    }
}

/// Load a pricing table from a YAML file
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if its prices are invalid.
pub fn load_pricing_file(path: impl AsRef<Path>) -> Result<PricingTable, FixtureError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let table = parse_pricing_table(&contents)?;

    debug!(path = %path.display(), rules = table.len(), "loaded pricing table");

    Ok(table)
}

/// Parse a pricing table from YAML
///
/// Every price in the table must share one currency. The top level `currency` key is
/// optional when there is at least one rule.
///
/// # Errors
///
/// Returns an error if the YAML is malformed, a price is invalid, or currencies differ.
pub fn parse_pricing_table(yaml: &str) -> Result<PricingTable, FixtureError> {
    let fixture: PricingTableFixture = serde_norway::from_str(yaml)?;

    let mut currency = fixture.currency.as_deref().map(parse_currency).transpose()?;
    let mut rules = Vec::with_capacity(fixture.rules.len());

    for (code, rule_fixture) in fixture.rules {
        let rule = PricingRule::try_from(rule_fixture)?;

        ensure_currency(&mut currency, rule.price.currency())?;

        if let Some(bulk) = &rule.bulk_discount {
            ensure_currency(&mut currency, bulk.discounted_price.currency())?;
        }

        rules.push((code, rule));
    }

    let currency = currency.ok_or(FixtureError::NoCurrency)?;

    Ok(PricingTable::with_rules(rules, currency))
}

fn ensure_currency(
    expected: &mut Option<&'static Currency>,
    found: &'static Currency,
) -> Result<(), FixtureError> {
    match expected {
        Some(existing) if *existing != found => Err(FixtureError::CurrencyMismatch(
            existing.iso_alpha_code.to_string(),
            found.iso_alpha_code.to_string(),
        )),
        Some(_) => Ok(()),
        None => {
            *expected = Some(found);
            Ok(())
        }
    }
}
