//! Command implementations for the CLI
//!
//! - usage: fargate / ec2 / lambda / all extraction
//! - discount: Savings Plans discount rates
//! - catalog: valid pricing dimension values
//! - config: configuration display and validation

pub mod catalog;
pub mod config;
pub mod discount;
pub mod usage;
