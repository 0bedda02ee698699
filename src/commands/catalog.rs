use anyhow::Result;
use colored::Colorize;

use crate::cli::CatalogArgs;

/// Execute the catalog command
///
/// Prints the values accepted for a pricing dimension, one per line.
pub fn execute(args: &CatalogArgs) -> Result<()> {
    let heading = match args.product {
        Some(product) => format!("Valid {} values ({}):", args.dimension.label(), product),
        None => format!("Valid {} values:", args.dimension.label()),
    };

    println!("{}", heading.green().bold());
    for value in args.dimension.values(args.product) {
        println!("  {}", value);
    }

    Ok(())
}
