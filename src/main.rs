//! Checkout CLI
//!
//! Scans the given item codes against a pricing table and prints the total.
//!
//! Use `-s` to load a named pricing set from `./fixtures/pricing`
//! Use `-r` to load a pricing table from an explicit YAML file
//! Use `-l` to print the pricing table before the total

use std::{
    io::{self, Write},
    path::PathBuf,
};

use anyhow::{Context, Result, anyhow};
use checkout::{
    checkout::Checkout,
    fixtures::{Fixture, load_pricing_file},
    pricing::{PricingRule, PricingTable},
};
use clap::Parser;
use tabled::{builder::Builder, settings::Style};
use tracing_subscriber::EnvFilter;

const DEFAULT_SET: &str = "default";

#[derive(Debug, Parser)]
#[command(name = "checkout", about = "Checkout pricing calculator", long_about = None)]
struct Cli {
    /// Pricing table YAML file
    #[arg(short, long, conflicts_with = "set")]
    rules: Option<PathBuf>,

    /// Named pricing set under ./fixtures/pricing [default: default]
    #[arg(short, long)]
    set: Option<String>,

    /// Print the pricing table
    #[arg(short, long)]
    list: bool,

    /// Item codes, in scan order
    items: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging()?;

    let stdout = io::stdout();

    run(cli, stdout.lock())
}

fn run(cli: Cli, mut out: impl Write) -> Result<()> {
    let table = match (&cli.rules, cli.set.as_deref()) {
        (Some(path), _) => load_pricing_file(path)
            .with_context(|| format!("failed to load pricing table {}", path.display()))?,
        (None, set) => {
            let set = set.unwrap_or(DEFAULT_SET);

            Fixture::from_set(set).with_context(|| format!("failed to load pricing set {set}"))?
        }
    };

    if cli.list {
        write_pricing_table(&mut out, &table)?;
    }

    let mut checkout = Checkout::new(&table);

    for code in cli.items {
        checkout.scan(code);
    }

    let total = checkout.total()?;

    writeln!(out, "Total: {total}")?;

    Ok(())
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .compact()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|error| anyhow!("failed to initialise logging: {error}"))
}

fn write_pricing_table(mut out: impl Write, table: &PricingTable) -> io::Result<()> {
    let mut builder = Builder::default();

    builder.push_record(["Item", "Price", "Multi-buy", "Bulk discount"]);

    for code in table.codes() {
        if let Some(rule) = table.rule(code) {
            builder.push_record([
                code.to_string(),
                rule.price.to_string(),
                multi_buy_cell(rule),
                bulk_discount_cell(rule),
            ]);
        }
    }

    let mut rendered = builder.build();
    rendered.with(Style::rounded());

    writeln!(out, "{rendered}")
}

fn multi_buy_cell(rule: &PricingRule) -> String {
    rule.multi_buy.map_or_else(String::new, |multi_buy| {
        format!("{} for {}", multi_buy.buy, multi_buy.pay)
    })
}

fn bulk_discount_cell(rule: &PricingRule) -> String {
    rule.bulk_discount.map_or_else(String::new, |bulk| {
        format!("{} each over {}", bulk.discounted_price, bulk.threshold)
    })
}
