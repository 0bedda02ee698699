use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use aws_cost_report::output::OutputFormat;
use aws_cost_report::pricing::Dimension;
use aws_cost_report::product::Product;
use aws_cost_report::usage::{GroupKey, UsageQuery};

#[derive(Parser, Debug)]
#[command(
    name = "aws-cost",
    version,
    about = "AWS cost and usage extraction and Savings Plans discount rates"
)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "aws-cost.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Extract Fargate usage (usage type containing "Fargate")
    #[command(alias = "aws-fargate")]
    Fargate(UsageArgs),

    /// Extract EC2 usage (usage type containing "Box")
    #[command(alias = "amazon-ec2")]
    Ec2(UsageArgs),

    /// Extract Lambda usage (usage type containing "Lambda-GB")
    #[command(alias = "aws-lambda")]
    Lambda(UsageArgs),

    /// Extract Fargate, EC2 and Lambda usage in one run
    All(AllArgs),

    /// Fetch Savings Plans discount rates
    DiscountRate {
        #[command(subcommand)]
        product: DiscountRateCommands,
    },

    /// List valid values for a pricing dimension
    Catalog(CatalogArgs),

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },

    /// Show version information
    Version,
}

/// Input files and the filter/aggregate options shared by usage commands
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Cost and usage CSV files or glob patterns
    #[arg(required = true, value_name = "PATH")]
    pub paths: Vec<String>,

    /// Drop SavingsPlanNegation line items
    #[arg(long)]
    pub no_negation: bool,

    /// Keep only SavingsPlanNegation line items
    #[arg(long)]
    pub negation_only: bool,

    /// Aggregate cost by these columns (repeatable); the account is always kept
    #[arg(short, long = "group-by", value_enum, value_name = "COLUMN")]
    pub group_by: Vec<GroupKey>,
}

impl SourceArgs {
    pub fn query(&self, product: Product) -> UsageQuery {
        UsageQuery::new(product.descriptor().usage_type_filter)
            .include_negation(!self.no_negation)
            .negation_only(self.negation_only)
            .group_by(self.group_by.iter().copied())
    }
}

#[derive(Args, Debug, Clone)]
pub struct UsageArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Display format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Write CSV to this file instead of displaying
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct AllArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Display format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Write fargate_usage.csv, ec2_usage.csv and lambda_usage.csv here
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
}

/// Dimensions shared by every pricing document. Omitted values fall back to
/// `pricing.defaults` in the configuration.
#[derive(Args, Debug, Clone, Default)]
pub struct PricingArgs {
    /// Commitment term, e.g. "1 year"
    #[arg(long)]
    pub term: Option<String>,

    /// Payment option, e.g. "Partial Upfront"
    #[arg(long)]
    pub payment_option: Option<String>,

    /// Region name, e.g. "Asia Pacific (Tokyo)"
    #[arg(long)]
    pub region: Option<String>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum DiscountRateCommands {
    /// EC2 instance discount rates
    Ec2 {
        #[command(flatten)]
        pricing: PricingArgs,

        #[arg(long, default_value = "Linux")]
        operating_system: String,

        #[arg(long, default_value = "Shared")]
        tenancy: String,

        /// Report a single instance type, e.g. t3.medium
        #[arg(long)]
        instance_type: Option<String>,
    },

    /// Fargate discount rates
    Fargate {
        #[command(flatten)]
        pricing: PricingArgs,

        #[arg(long, default_value = "Linux")]
        operating_system: String,

        #[arg(long, default_value = "X86")]
        cpu_architecture: String,
    },

    /// Lambda discount rates
    Lambda {
        #[command(flatten)]
        pricing: PricingArgs,
    },
}

#[derive(Args, Debug, Clone)]
pub struct CatalogArgs {
    /// Dimension to list
    #[arg(value_enum)]
    pub dimension: Dimension,

    /// Narrow regions/operating systems to one product's documents
    #[arg(short, long, value_enum)]
    pub product: Option<Product>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Display the effective configuration
    Show,

    /// Validate configuration file
    Validate,
}
