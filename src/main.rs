use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use aws_cost_report::config::{self, LoggingConfig};
use aws_cost_report::init_tracing;
use aws_cost_report::product::Product;
use cli::{Commands, ConfigCommands};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = cli::Cli::parse();

    match args.command {
        // Config commands report a broken file themselves, so they run
        // before the configuration is loaded
        Commands::Config { action } => {
            init_tracing(&LoggingConfig::default());
            match action {
                ConfigCommands::Show => commands::config::show(&args.config)?,
                ConfigCommands::Validate => commands::config::validate(&args.config)?,
            }
        }
        Commands::Version => {
            println!("aws-cost v{}", env!("CARGO_PKG_VERSION"));
        }
        command => {
            let cfg = config::load_config(&args.config)?;
            init_tracing(&cfg.logging);

            match command {
                Commands::Fargate(usage) => commands::usage::execute(Product::Fargate, &usage)?,
                Commands::Ec2(usage) => commands::usage::execute(Product::Ec2, &usage)?,
                Commands::Lambda(usage) => commands::usage::execute(Product::Lambda, &usage)?,
                Commands::All(all) => commands::usage::execute_all(&all)?,
                Commands::DiscountRate { product } => {
                    commands::discount::execute(&cfg, &product).await?
                }
                Commands::Catalog(catalog) => commands::catalog::execute(&catalog)?,
                Commands::Config { .. } | Commands::Version => {}
            }
        }
    }

    Ok(())
}
