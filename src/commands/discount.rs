//! `discount-rate` command
//!
//! Resolves the requested dimensions against the static catalogs, fetches the
//! product's pricing document once and prints the resulting rates.

use anyhow::Result;
use colored::Colorize;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use aws_cost_report::config::{Config, PricingConfig};
use aws_cost_report::output::{self, TableData};
use aws_cost_report::pricing::catalog::resolve_value;
use aws_cost_report::pricing::rate::format_rate;
use aws_cost_report::pricing::{Dimension, DiscountRateFetcher, RateRequest};
use aws_cost_report::product::Product;

use crate::cli::{DiscountRateCommands, PricingArgs};

/// Execute the discount-rate command
pub async fn execute(cfg: &Config, command: &DiscountRateCommands) -> Result<()> {
    let (product, request, instance_type) = plan(&cfg.pricing, command)?;

    let fetcher = DiscountRateFetcher::from_config(&cfg.pricing)?;
    let rates = fetcher
        .fetch(product, &request, instance_type.as_deref())
        .await?;

    match instance_type {
        Some(instance_type) => display_single(product, &request, &instance_type, &rates),
        None => display_all(product, &request, &rates),
    }

    Ok(())
}

/// Turn command arguments into a validated request
fn plan(
    cfg: &PricingConfig,
    command: &DiscountRateCommands,
) -> Result<(Product, RateRequest, Option<String>)> {
    let planned = match command {
        DiscountRateCommands::Ec2 {
            pricing,
            operating_system,
            tenancy,
            instance_type,
        } => {
            let request = build_request(
                cfg,
                Product::Ec2,
                pricing,
                Some(operating_system.as_str()),
                Some((Dimension::Tenancy, tenancy.as_str())),
            )?;
            let instance_type = instance_type.as_ref().map(|t| t.trim().to_string());
            (Product::Ec2, request, instance_type)
        }
        DiscountRateCommands::Fargate {
            pricing,
            operating_system,
            cpu_architecture,
        } => {
            let request = build_request(
                cfg,
                Product::Fargate,
                pricing,
                Some(operating_system.as_str()),
                Some((Dimension::CpuArchitecture, cpu_architecture.as_str())),
            )?;
            (Product::Fargate, request, None)
        }
        DiscountRateCommands::Lambda { pricing } => {
            let request = build_request(cfg, Product::Lambda, pricing, None, None)?;
            (Product::Lambda, request, None)
        }
    };

    Ok(planned)
}

fn build_request(
    cfg: &PricingConfig,
    product: Product,
    args: &PricingArgs,
    operating_system: Option<&str>,
    extra: Option<(Dimension, &str)>,
) -> Result<RateRequest> {
    let strict = cfg.strict_catalog;
    let defaults = &cfg.defaults;
    let lookup = |dimension: Dimension, value: &str| {
        resolve_value(dimension, Some(product), value, strict)
    };

    Ok(RateRequest {
        term: lookup(Dimension::Term, args.term.as_deref().unwrap_or(&defaults.term))?,
        payment_option: lookup(
            Dimension::PaymentOption,
            args.payment_option.as_deref().unwrap_or(&defaults.payment_option),
        )?,
        region: lookup(Dimension::Region, args.region.as_deref().unwrap_or(&defaults.region))?,
        operating_system: operating_system
            .map(|os| lookup(Dimension::OperatingSystem, os))
            .transpose()?,
        extra_dimension: extra
            .map(|(dimension, value)| lookup(dimension, value))
            .transpose()?,
    })
}

fn request_details(product: Product, request: &RateRequest) -> Vec<(&'static str, String)> {
    let mut details = vec![
        ("Term", request.term.clone()),
        ("Payment option", request.payment_option.clone()),
        ("Region", request.region.clone()),
    ];
    if let Some(os) = &request.operating_system {
        details.push(("Operating system", os.clone()));
    }
    if let Some(extra) = &request.extra_dimension {
        let label = match product {
            Product::Fargate => "CPU architecture",
            _ => "Tenancy",
        };
        details.push((label, extra.clone()));
    }
    details
}

fn display_single(
    product: Product,
    request: &RateRequest,
    instance_type: &str,
    rates: &BTreeMap<String, Decimal>,
) {
    for rate in rates.values() {
        println!("{} {}", "Discount rate:".green(), format_rate(*rate));
    }
    println!("{} {}", "Instance type:".blue(), instance_type);
    for (label, value) in request_details(product, request) {
        println!("{} {}", format!("{}:", label).blue(), value);
    }
}

fn display_all(product: Product, request: &RateRequest, rates: &BTreeMap<String, Decimal>) {
    let details = request_details(product, request)
        .into_iter()
        .map(|(_, value)| value)
        .collect::<Vec<_>>()
        .join(" / ");
    let title = format!("{} Savings Plans discount rates ({})", product, details);

    println!("{}", output::render_table(&rate_table(rates), &title));
}

fn rate_table(rates: &BTreeMap<String, Decimal>) -> TableData {
    let mut table = TableData::new(["key", "rate"]);
    for (key, rate) in rates {
        table.push_row([key.clone(), format_rate(*rate)]);
    }
    table
}
