//! Per-product descriptors
//!
//! EC2, Fargate and Lambda share one usage pipeline and one pricing fetcher;
//! everything that differs between them lives in this table.

use clap::ValueEnum;
use std::fmt;

use crate::pricing::catalog::Dimension;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Product {
    Fargate,
    Ec2,
    Lambda,
}

#[derive(Debug)]
pub struct ProductDescriptor {
    pub display_name: &'static str,
    /// Substring matched against `usage_type` when extracting billing lines
    pub usage_type_filter: &'static str,
    pub usage_title: &'static str,
    /// File name used by `all --output-dir`
    pub export_file_name: &'static str,
    /// Document family under the savings plan pricing base URL
    pub pricing_document: &'static str,
    /// List (on-demand) price field in a catalog entry
    pub list_price_field: &'static str,
    /// Field holding the resource type, for products that support filtering by it
    pub resource_type_field: Option<&'static str>,
    /// URL path dimensions, in order
    pub dimensions: &'static [Dimension],
}

const FARGATE: ProductDescriptor = ProductDescriptor {
    display_name: "Fargate",
    usage_type_filter: "Fargate",
    usage_title: "Fargate usage",
    export_file_name: "fargate_usage.csv",
    pricing_document: "compute-savings-plan-fargate-with-arm",
    list_price_field: "fargate:PricePerUnit",
    resource_type_field: None,
    dimensions: &[
        Dimension::Term,
        Dimension::PaymentOption,
        Dimension::Region,
        Dimension::OperatingSystem,
        Dimension::CpuArchitecture,
    ],
};

const EC2: ProductDescriptor = ProductDescriptor {
    display_name: "EC2",
    usage_type_filter: "Box",
    usage_title: "EC2 usage",
    export_file_name: "ec2_usage.csv",
    pricing_document: "compute-savings-plan-ec2",
    list_price_field: "ec2:PricePerUnit",
    resource_type_field: Some("ec2:InstanceType"),
    dimensions: &[
        Dimension::Term,
        Dimension::PaymentOption,
        Dimension::Region,
        Dimension::OperatingSystem,
        Dimension::Tenancy,
    ],
};

const LAMBDA: ProductDescriptor = ProductDescriptor {
    display_name: "Lambda",
    usage_type_filter: "Lambda-GB",
    usage_title: "Lambda usage",
    export_file_name: "lambda_usage.csv",
    pricing_document: "compute-savings-plan-lambda",
    list_price_field: "lambda:PricePerUnit",
    resource_type_field: None,
    dimensions: &[Dimension::Term, Dimension::PaymentOption, Dimension::Region],
};

impl Product {
    /// Processing order for commands that cover every product
    pub const ALL: [Product; 3] = [Product::Fargate, Product::Ec2, Product::Lambda];

    pub fn descriptor(self) -> &'static ProductDescriptor {
        match self {
            Product::Fargate => &FARGATE,
            Product::Ec2 => &EC2,
            Product::Lambda => &LAMBDA,
        }
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.descriptor().display_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_product_starts_with_term_payment_region() {
        for product in Product::ALL {
            let dims = product.descriptor().dimensions;
            assert_eq!(
                &dims[..3],
                &[Dimension::Term, Dimension::PaymentOption, Dimension::Region]
            );
        }
    }

    #[test]
    fn test_only_ec2_filters_by_resource_type() {
        assert_eq!(Product::Ec2.descriptor().resource_type_field, Some("ec2:InstanceType"));
        assert!(Product::Fargate.descriptor().resource_type_field.is_none());
        assert!(Product::Lambda.descriptor().resource_type_field.is_none());
    }

    #[test]
    fn test_export_file_names_are_distinct() {
        let names: std::collections::HashSet<_> = Product::ALL
            .iter()
            .map(|p| p.descriptor().export_file_name)
            .collect();
        assert_eq!(names.len(), 3);
    }
}
