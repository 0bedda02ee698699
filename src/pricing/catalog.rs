//! Static catalogs of the dimension values the savings plan pricing API
//! publishes documents for.
//!
//! These are plain data tables rather than enums so a new region or
//! operating system is a one-line change.

use clap::ValueEnum;

use crate::error::AppError;
use crate::product::Product;

pub const TERMS: &[&str] = &[
    "1 year",
    "3 year",
];

pub const PAYMENT_OPTIONS: &[&str] = &[
    "All Upfront",
    "Partial Upfront",
    "No Upfront",
];

/// Regions and Local Zones published for the EC2 compute savings plan.
pub const EC2_REGIONS: &[&str] = &[
    "US East (N. Virginia)",
    "US West (Oregon)",
    "EU (Ireland)",
    "Asia Pacific (Tokyo)",
    "EU (Frankfurt)",
    "US East (Ohio)",
    "Asia Pacific (Sydney)",
    "Asia Pacific (Singapore)",
    "AWS GovCloud (US)",
    "Asia Pacific (Mumbai)",
    "Canada (Central)",
    "Asia Pacific (Seoul)",
    "US West (N. California)",
    "EU (London)",
    "South America (Sao Paulo)",
    "EU (Stockholm)",
    "EU (Paris)",
    "AWS GovCloud (US-East)",
    "EU (Spain)",
    "EU (Milan)",
    "Asia Pacific (Osaka)",
    "Africa (Cape Town)",
    "Asia Pacific (Hyderabad)",
    "Asia Pacific (Hong Kong)",
    "Asia Pacific (Jakarta)",
    "EU (Zurich)",
    "Israel (Tel Aviv)",
    "Asia Pacific (Malaysia)",
    "Middle East (Bahrain)",
    "Middle East (UAE)",
    "Asia Pacific (Thailand)",
    "Mexico (Central)",
    "Asia Pacific (Melbourne)",
    "Canada West (Calgary)",
    "US East (Dallas)",
    "US West (Los Angeles)",
    "US East (New York City)",
    "US East (Atlanta)",
    "US East (Chicago)",
    "US West (Phoenix)",
    "US East (Miami)",
    "US East (Houston)",
    "US East (Philadelphia)",
    "US West (Denver)",
    "Argentina (Buenos Aires)",
    "US East (Boston)",
    "Chile (Santiago)",
    "Peru (Lima)",
    "Australia (Perth)",
    "Mexico (Queretaro)",
    "US West (Honolulu)",
    "Nigeria (Lagos)",
    "Philippines (Manila)",
    "Poland (Warsaw)",
    "Taiwan (Taipei)",
    "Thailand (Bangkok)",
    "India (Kolkata)",
    "US East (Kansas City 2)",
    "New Zealand (Auckland)",
    "US East (Verizon) - Charlotte",
    "US East (Verizon) - Nashville",
    "US East (Verizon) - Washington DC",
    "Denmark (Copenhagen)",
    "Finland (Helsinki)",
    "Germany (Hamburg)",
    "India (Delhi)",
    "Oman (Muscat)",
    "US East (Minneapolis)",
    "US West (Las Vegas)",
    "US West (Portland)",
    "US West (Seattle)",
    "Morocco (Casablanca)",
    "Asia Pacific (SKT) - Seoul",
    "Canada (BELL) - Toronto",
    "EU (British Telecom) - Manchester",
    "EU (Vodafone) - Berlin",
    "EU (Vodafone) - Dortmund",
    "EU (Vodafone) - London",
    "EU (Vodafone) - Manchester",
    "EU (Vodafone) - Munich",
    "US East (Verizon) - Chicago",
    "US East (Verizon) - Detroit",
    "US East (Verizon) - Houston",
    "US East (Verizon) - Miami",
    "US East (Verizon) - Minneapolis",
    "US East (Verizon) - Tampa",
    "US West (Verizon) - Los Angeles",
    "US West (Verizon) - Phoenix",
    "US West (Verizon) - San Francisco Bay Area",
    "Asia Pacific (KDDI) - Osaka",
    "Asia Pacific (KDDI) - Tokyo",
    "Asia Pacific (SKT) - Daejeon",
    "US East (Verizon) - Atlanta",
    "US East (Verizon) - Boston",
    "US East (Verizon) - Dallas",
    "US East (Verizon) - New York",
    "US West (Verizon) - Denver",
    "US West (Verizon) - Las Vegas",
    "US West (Verizon) - Seattle",
];

/// Regions published for Fargate and Lambda.
pub const STANDARD_REGIONS: &[&str] = &[
    "Africa (Cape Town)",
    "Asia Pacific (Hong Kong)",
    "Asia Pacific (Hyderabad)",
    "Asia Pacific (Jakarta)",
    "Asia Pacific (Melbourne)",
    "Asia Pacific (Mumbai)",
    "Asia Pacific (Osaka)",
    "Asia Pacific (Seoul)",
    "Asia Pacific (Singapore)",
    "Asia Pacific (Sydney)",
    "Asia Pacific (Tokyo)",
    "Canada (Central)",
    "Canada West (Calgary)",
    "EU (Frankfurt)",
    "EU (Ireland)",
    "EU (London)",
    "EU (Milan)",
    "EU (Paris)",
    "EU (Spain)",
    "EU (Stockholm)",
    "EU (Zurich)",
    "Israel (Tel Aviv)",
    "Middle East (Bahrain)",
    "Middle East (UAE)",
    "South America (Sao Paulo)",
    "US East (N. Virginia)",
    "US East (Ohio)",
    "US West (N. California)",
    "US West (Oregon)",
    "AWS GovCloud (US)",
    "AWS GovCloud (US-East)",
    "Asia Pacific (Malaysia)",
    "Asia Pacific (Thailand)",
    "Mexico (Central)",
];

pub const EC2_OPERATING_SYSTEMS: &[&str] = &[
    "Linux",
    "RHEL",
    "SUSE",
    "Red Hat Enterprise Linux with HA",
    "Windows",
    "Ubuntu Pro",
    "Windows with SQL Web",
    "Linux with SQL Web",
    "Linux with SQL Std",
    "Windows with SQL Std",
    "BYOL",
    "Linux with SQL Ent",
    "Windows with SQL Ent",
    "RHEL with SQL Std",
    "Red Hat Enterprise Linux with HA with SQL Std",
    "RHEL with SQL Ent",
    "Red Hat Enterprise Linux with HA with SQL Ent",
    "RHEL with SQL Web",
];

pub const FARGATE_OPERATING_SYSTEMS: &[&str] = &[
    "Linux",
    "Windows",
];

pub const TENANCIES: &[&str] = &[
    "Shared",
    "Dedicated",
    "Host",
];

pub const CPU_ARCHITECTURES: &[&str] = &[
    "X86",
    "ARM",
];

/// A path dimension of a pricing document URL. The value names are the
/// catalog names accepted by `aws-cost catalog`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Dimension {
    #[value(name = "terms")]
    Term,
    #[value(name = "payment-options")]
    PaymentOption,
    #[value(name = "regions")]
    Region,
    #[value(name = "operating-systems")]
    OperatingSystem,
    #[value(name = "tenancies")]
    Tenancy,
    #[value(name = "cpu-architectures")]
    CpuArchitecture,
}

impl Dimension {
    pub const ALL: [Dimension; 6] = [
        Dimension::Term,
        Dimension::PaymentOption,
        Dimension::Region,
        Dimension::OperatingSystem,
        Dimension::Tenancy,
        Dimension::CpuArchitecture,
    ];

    /// Human-readable name used in messages
    pub fn label(self) -> &'static str {
        match self {
            Dimension::Term => "term",
            Dimension::PaymentOption => "payment option",
            Dimension::Region => "region",
            Dimension::OperatingSystem => "operating system",
            Dimension::Tenancy => "tenancy",
            Dimension::CpuArchitecture => "CPU architecture",
        }
    }

    /// Name of the `catalog` subcommand argument listing this dimension
    pub fn catalog_name(self) -> &'static str {
        match self {
            Dimension::Term => "terms",
            Dimension::PaymentOption => "payment-options",
            Dimension::Region => "regions",
            Dimension::OperatingSystem => "operating-systems",
            Dimension::Tenancy => "tenancies",
            Dimension::CpuArchitecture => "cpu-architectures",
        }
    }

    /// Valid values, narrowed to a product's documents when one is given
    pub fn values(self, product: Option<Product>) -> &'static [&'static str] {
        match (self, product) {
            (Dimension::Term, _) => TERMS,
            (Dimension::PaymentOption, _) => PAYMENT_OPTIONS,
            (Dimension::Region, Some(Product::Fargate | Product::Lambda)) => STANDARD_REGIONS,
            (Dimension::Region, _) => EC2_REGIONS,
            (Dimension::OperatingSystem, Some(Product::Fargate)) => FARGATE_OPERATING_SYSTEMS,
            (Dimension::OperatingSystem, _) => EC2_OPERATING_SYSTEMS,
            (Dimension::Tenancy, _) => TENANCIES,
            (Dimension::CpuArchitecture, _) => CPU_ARCHITECTURES,
        }
    }
}

/// Look up a value in a catalog, ignoring case and surrounding whitespace,
/// and return the canonical spelling.
pub fn resolve(
    dimension: Dimension,
    product: Option<Product>,
    value: &str,
) -> Result<&'static str, AppError> {
    let wanted = value.trim();
    dimension
        .values(product)
        .iter()
        .copied()
        .find(|candidate| candidate.eq_ignore_ascii_case(wanted))
        .ok_or_else(|| AppError::InvalidDimension {
            dimension: dimension.label(),
            value: value.to_string(),
            catalog: dimension.catalog_name(),
        })
}

/// Like [`resolve`], but when `strict` is off an unknown value is passed
/// through unchanged with a warning.
pub fn resolve_value(
    dimension: Dimension,
    product: Option<Product>,
    value: &str,
    strict: bool,
) -> Result<String, AppError> {
    match resolve(dimension, product, value) {
        Ok(canonical) => Ok(canonical.to_string()),
        Err(e) if strict => Err(e),
        Err(_) => {
            tracing::warn!(
                dimension = dimension.label(),
                value = value,
                "Value not in catalog, using it as given"
            );
            Ok(value.trim().to_string())
        }
    }
}
