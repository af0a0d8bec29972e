//! Checkout scenarios against the default price list.
//!
//! | Item | Price    | Rule                               |
//! |------|----------|------------------------------------|
//! | atv  | $109.50  | buy 3, one unit free per group     |
//! | ipd  | $549.99  | $499.99 each when more than 4      |
//! | mbp  | $1399.99 |                                    |
//! | vga  | $30.00   |                                    |

use std::{io::Write, thread};

use rusty_money::{
    Money,
    iso::{AUD, Currency},
};
use tempfile::NamedTempFile;
use testresult::TestResult;

use checkout::{
    checkout::{Checkout, CheckoutError},
    fixtures::{Fixture, load_pricing_file},
    pricing::PricingTable,
};

fn aud(minor: i64) -> Money<'static, Currency> {
    Money::from_minor(minor, AUD)
}

fn total_of(
    table: &PricingTable,
    codes: &[&str],
) -> Result<Money<'static, Currency>, CheckoutError> {
    let mut checkout = Checkout::new(table);

    for code in codes {
        checkout.scan(*code);
    }

    checkout.total()
}

#[test]
fn nothing_scanned_totals_zero() -> TestResult {
    let table = Fixture::from_set("default")?;

    assert_eq!(total_of(&table, &[])?, aud(0));

    Ok(())
}

#[test]
fn single_item_is_full_price() -> TestResult {
    let table = Fixture::from_set("default")?;

    assert_eq!(total_of(&table, &["ipd"])?, aud(54_999));

    Ok(())
}

#[test]
fn undiscounted_items_are_linear() -> TestResult {
    let table = Fixture::from_set("default")?;

    for n in 0..10 {
        let codes = vec!["mbp"; n];
        let expected = 139_999 * i64::try_from(n)?;

        assert_eq!(total_of(&table, &codes)?, aud(expected), "{n} x mbp");
    }

    Ok(())
}

#[test]
fn bulk_discount_applies_above_threshold() -> TestResult {
    let table = Fixture::from_set("default")?;

    assert_eq!(total_of(&table, &["ipd"; 4])?, aud(219_996));
    assert_eq!(total_of(&table, &["ipd"; 5])?, aud(249_995));

    Ok(())
}

#[test]
fn multi_buy_gives_one_free_per_group() -> TestResult {
    let table = Fixture::from_set("default")?;

    assert_eq!(total_of(&table, &["atv"; 3])?, aud(21_900));

    Ok(())
}

#[test]
fn discounts_on_different_items_add_up() -> TestResult {
    let table = Fixture::from_set("default")?;

    let codes = ["ipd", "ipd", "ipd", "ipd", "ipd", "atv", "atv", "atv"];

    assert_eq!(total_of(&table, &codes)?, aud(271_895));

    Ok(())
}

#[test]
fn discounted_and_full_price_items_mix() -> TestResult {
    let table = Fixture::from_set("default")?;

    let codes = [
        "ipd", "ipd", "ipd", "ipd", "ipd", "atv", "atv", "atv", "mbp", "vga",
    ];

    assert_eq!(total_of(&table, &codes)?, aud(414_894));

    Ok(())
}

#[test]
fn scan_order_does_not_change_total() -> TestResult {
    let table = Fixture::from_set("default")?;

    assert_eq!(total_of(&table, &["atv", "atv", "atv", "vga"])?, aud(24_900));
    assert_eq!(total_of(&table, &["atv", "vga", "atv", "atv"])?, aud(24_900));
    assert_eq!(total_of(&table, &["vga", "atv", "atv", "atv"])?, aud(24_900));

    Ok(())
}

#[test]
fn interleaved_scans_with_bulk_and_short_multi_buy() -> TestResult {
    let table = Fixture::from_set("default")?;

    // two atv do not complete a group, five ipd pass the bulk threshold
    let codes = ["atv", "ipd", "ipd", "atv", "ipd", "ipd", "ipd"];

    assert_eq!(total_of(&table, &codes)?, aud(271_895));

    Ok(())
}

#[test]
fn unknown_item_fails() -> TestResult {
    let table = Fixture::from_set("default")?;

    let error = total_of(&table, &["ptv"]).err();

    assert_eq!(error, Some(CheckoutError::UnknownItem("ptv".to_string())));
    assert_eq!(
        error.as_ref().map(ToString::to_string),
        Some("No pricing rule found for item ptv".to_string())
    );

    Ok(())
}

#[test]
fn both_rules_on_one_item_prefers_bulk() -> TestResult {
    let mut file = NamedTempFile::new()?;

    write!(
        file,
        "
rules:
  cbl:
    price: 10.00 AUD
    multi_buy: {{ buy: 2, pay: 1 }}
    bulk_discount: {{ threshold: 5, discounted_price: 7.00 AUD }}
"
    )?;

    let table = load_pricing_file(file.path())?;

    // 4 units: two groups of 2, so two units free
    assert_eq!(total_of(&table, &["cbl"; 4])?, aud(2000));
    // 6 units: bulk replaces the multi-buy line
    assert_eq!(total_of(&table, &["cbl"; 6])?, aud(4200));

    Ok(())
}

#[test]
fn pricing_table_is_shared_between_threads() -> TestResult {
    let table = Fixture::from_set("default")?;

    let (atv, ipd) = thread::scope(|scope| {
        let atv = scope.spawn(|| total_of(&table, &["atv"; 3]));
        let ipd = scope.spawn(|| total_of(&table, &["ipd"; 5]));

        (atv.join(), ipd.join())
    });

    assert!(matches!(atv, Ok(Ok(total)) if total == aud(21_900)));
    assert!(matches!(ipd, Ok(Ok(total)) if total == aud(249_995)));

    Ok(())
}
