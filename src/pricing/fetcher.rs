//! Savings plan discount rate fetcher
//!
//! Builds the pricing document URL for a product and a set of dimension
//! values, downloads it once, and computes a discount rate per catalog
//! entry.

use reqwest::Client;
use rust_decimal::Decimal;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::PricingConfig;
use crate::error::AppError;
use crate::pricing::catalog::Dimension;
use crate::pricing::rate::{compute_rate, price_field};
use crate::product::Product;

/// Discounted (savings plan) price field, common to every product
const DISCOUNTED_PRICE_FIELD: &str = "price";

/// Trailing document name of every pricing URL
const DOCUMENT_NAME: &str = "index.json";

/// Dimension values identifying one pricing document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateRequest {
    pub term: String,
    pub payment_option: String,
    pub region: String,
    pub operating_system: Option<String>,
    /// Tenancy (EC2) or CPU architecture (Fargate)
    pub extra_dimension: Option<String>,
}

impl RateRequest {
    fn value_for(&self, dimension: Dimension) -> Option<&str> {
        match dimension {
            Dimension::Term => Some(self.term.as_str()),
            Dimension::PaymentOption => Some(self.payment_option.as_str()),
            Dimension::Region => Some(self.region.as_str()),
            Dimension::OperatingSystem => self.operating_system.as_deref(),
            Dimension::Tenancy | Dimension::CpuArchitecture => self.extra_dimension.as_deref(),
        }
    }
}

/// HTTP client wrapper for the savings plan pricing API
pub struct DiscountRateFetcher {
    client: Client,
    base_url: String,
}

impl DiscountRateFetcher {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn from_config(cfg: &PricingConfig) -> Result<Self, AppError> {
        Self::new(
            cfg.base_url.trim(),
            Duration::from_secs(cfg.timeout_seconds),
        )
    }

    /// Build the document URL: `{base}/{document}/{dim}/.../index.json`,
    /// each dimension percent-encoded as a single path segment.
    pub fn build_url(&self, product: Product, request: &RateRequest) -> Result<String, AppError> {
        let descriptor = product.descriptor();
        let mut segments = Vec::with_capacity(descriptor.dimensions.len() + 2);
        segments.push(descriptor.pricing_document.to_string());

        for &dimension in descriptor.dimensions {
            let value = request
                .value_for(dimension)
                .ok_or_else(|| AppError::InvalidDimension {
                    dimension: dimension.label(),
                    value: "(missing)".to_string(),
                    catalog: dimension.catalog_name(),
                })?;
            segments.push(urlencoding::encode(value).into_owned());
        }
        segments.push(DOCUMENT_NAME.to_string());

        Ok(format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            segments.join("/")
        ))
    }

    /// Download the pricing document for a request
    ///
    /// # Errors
    /// Returns `PricingFetch` if the request fails or the status is not 2xx,
    /// and `InvalidPriceData` if the body is not JSON.
    pub async fn fetch_document(
        &self,
        product: Product,
        request: &RateRequest,
    ) -> Result<Value, AppError> {
        let url = self.build_url(product, request)?;
        info!(product = %product, url = %url, "Fetching savings plan pricing");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::PricingFetch(format!("{}: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(AppError::PricingFetch(format!(
                "HTTP {} from {}",
                response.status(),
                url
            )));
        }

        let body = response.text().await?;
        debug!(bytes = body.len(), "Downloaded pricing document");

        Ok(serde_json::from_str(&body)?)
    }

    /// Fetch a pricing document and compute discount rates.
    ///
    /// With `resource_filter`, only the entry whose resource type equals the
    /// filter is returned; otherwise every entry in the region is.
    pub async fn fetch(
        &self,
        product: Product,
        request: &RateRequest,
        resource_filter: Option<&str>,
    ) -> Result<BTreeMap<String, Decimal>, AppError> {
        let document = self.fetch_document(product, request).await?;
        rates_from_document(product, &document, &request.region, resource_filter)
    }
}

/// Compute discount rates from an already downloaded pricing document
pub fn rates_from_document(
    product: Product,
    document: &Value,
    region: &str,
    resource_filter: Option<&str>,
) -> Result<BTreeMap<String, Decimal>, AppError> {
    let descriptor = product.descriptor();

    let entries = document
        .get("regions")
        .and_then(|regions| regions.get(region))
        .ok_or_else(|| {
            AppError::NotFound(format!("region '{}' in {} pricing data", region, product))
        })?
        .as_object()
        .ok_or_else(|| {
            AppError::InvalidPriceData(format!("regions['{}'] is not an object", region))
        })?;

    let mut rates = BTreeMap::new();

    if let Some(filter) = resource_filter {
        let type_field = descriptor.resource_type_field.ok_or_else(|| {
            AppError::NotFound(format!(
                "{} pricing entries have no resource type to match",
                product
            ))
        })?;

        let (key, entry) = entries
            .iter()
            .find(|(_, entry)| entry.get(type_field).and_then(Value::as_str) == Some(filter))
            .ok_or_else(|| {
                AppError::NotFound(format!("{} '{}' in {}", type_field, filter, region))
            })?;

        rates.insert(key.clone(), entry_rate(entry, descriptor.list_price_field, key)?);
        return Ok(rates);
    }

    for (key, entry) in entries {
        rates.insert(key.clone(), entry_rate(entry, descriptor.list_price_field, key)?);
    }

    if rates.is_empty() {
        return Err(AppError::NotFound(format!(
            "{} pricing entries for region '{}'",
            product, region
        )));
    }

    Ok(rates)
}

fn entry_rate(entry: &Value, list_price_field: &str, key: &str) -> Result<Decimal, AppError> {
    let list_price = price_field(entry, list_price_field)?;
    let discounted = price_field(entry, DISCOUNTED_PRICE_FIELD)?;

    compute_rate(list_price, discounted).map_err(|e| match e {
        AppError::InvalidPriceData(msg) => AppError::InvalidPriceData(format!("{}: {}", key, msg)),
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    const TOKYO: &str = "Asia Pacific (Tokyo)";

    fn ec2_request() -> RateRequest {
        RateRequest {
            term: "1 year".to_string(),
            payment_option: "Partial Upfront".to_string(),
            region: "Asia Pacific (Tokyo)".to_string(),
            operating_system: Some("Linux".to_string()),
            extra_dimension: Some("Shared".to_string()),
        }
    }

    fn fetcher() -> DiscountRateFetcher {
        DiscountRateFetcher::new("https://pricing.example.com/current/", Duration::from_secs(5))
            .unwrap()
    }

    #[test]
    fn test_build_url_encodes_each_segment() {
        let url = fetcher().build_url(Product::Ec2, &ec2_request()).unwrap();
        assert_eq!(
            url,
            "https://pricing.example.com/current/compute-savings-plan-ec2/1%20year/Partial%20Upfront/Asia%20Pacific%20%28Tokyo%29/Linux/Shared/index.json"
        );
    }

    #[test]
    fn test_build_url_lambda_ignores_extra_dimensions() {
        let url = fetcher().build_url(Product::Lambda, &ec2_request()).unwrap();
        assert!(url.ends_with(
            "/compute-savings-plan-lambda/1%20year/Partial%20Upfront/Asia%20Pacific%20%28Tokyo%29/index.json"
        ));
    }

    #[test]
    fn test_build_url_requires_product_dimensions() {
        let mut request = ec2_request();
        request.extra_dimension = None;
        let err = fetcher().build_url(Product::Fargate, &request).unwrap_err();
        assert!(matches!(err, AppError::InvalidDimension { dimension: "CPU architecture", .. }));
    }

    fn ec2_document() -> Value {
        json!({
            "regions": {
                "Asia Pacific (Tokyo)": {
                    "t3.medium Linux": {"ec2:InstanceType": "t3.medium", "ec2:PricePerUnit": "100", "price": "72"},
                    "m5.large Linux": {"ec2:InstanceType": "m5.large", "ec2:PricePerUnit": "0.124", "price": "0.0868"}
                }
            }
        })
    }

    #[test]
    fn test_rates_for_every_entry() {
        let rates = rates_from_document(Product::Ec2, &ec2_document(), TOKYO, None).unwrap();
        assert_eq!(rates.len(), 2);
        assert_eq!(rates["t3.medium Linux"], dec!(0.28));
        assert_eq!(rates["m5.large Linux"], dec!(0.3));
    }

    #[test]
    fn test_rates_with_resource_filter() {
        let rates =
            rates_from_document(Product::Ec2, &ec2_document(), TOKYO, Some("t3.medium")).unwrap();
        assert_eq!(rates.len(), 1);
        assert_eq!(rates["t3.medium Linux"], dec!(0.28));
    }

    #[test]
    fn test_resource_filter_requires_exact_match() {
        let err = rates_from_document(Product::Ec2, &ec2_document(), TOKYO, Some("t3.med"))
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_missing_region_is_not_found() {
        let err =
            rates_from_document(Product::Ec2, &ec2_document(), "EU (Ireland)", None).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_zero_list_price_is_invalid_price_data() {
        let document = json!({
            "regions": {"EU (Ireland)": {"GB-Seconds": {"lambda:PricePerUnit": "0", "price": "0.1"}}}
        });
        let err =
            rates_from_document(Product::Lambda, &document, "EU (Ireland)", None).unwrap_err();
        match err {
            AppError::InvalidPriceData(msg) => assert!(msg.starts_with("GB-Seconds")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_uses_product_price_field() {
        let document = json!({
            "regions": {"EU (Ireland)": {"vCPU-Hours": {"fargate:PricePerUnit": "0.04", "price": "0.032"}}}
        });
        let rates = rates_from_document(Product::Fargate, &document, "EU (Ireland)", None).unwrap();
        assert_eq!(rates["vCPU-Hours"], dec!(0.2));

        let err = rates_from_document(Product::Ec2, &document, "EU (Ireland)", None).unwrap_err();
        assert!(matches!(err, AppError::InvalidPriceData(_)));
    }
}
