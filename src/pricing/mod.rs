//! Savings Plans pricing: dimension catalogs, discount rate computation and
//! the pricing document fetcher.

pub mod catalog;
pub mod fetcher;
pub mod rate;

pub use catalog::Dimension;
pub use fetcher::{DiscountRateFetcher, RateRequest};
pub use rate::compute_rate;
