use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::convert::eur_to_usd;

/// Regex pattern for alphanumeric product codes
static ALPHANUMERIC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9]+$").unwrap());

/// Custom validator for product codes
fn validate_product_code(code: &str) -> Result<(), validator::ValidationError> {
    if !ALPHANUMERIC.is_match(code) {
        return Err(validator::ValidationError::new("invalid_product_code")
            .with_message("Product code must be alphanumeric".into()));
    }
    Ok(())
}

/// Product entity - a catalog item priced in EUR
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    /// Unique identifier
    pub id: i64,
    /// Unique 10-character product code
    pub code: String,
    /// Product display name
    pub name: String,
    /// Price in Euros
    pub price_eur: f64,
    /// Whether the product is available for purchase
    pub available: bool,
}

/// Input for persisting a new product
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub code: String,
    pub name: String,
    pub price_eur: f64,
    pub available: bool,
}

/// Data transfer object for product information.
///
/// All fields are optional so that partial client payloads deserialize
/// cleanly and validation can report every missing field by name.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    /// Unique product identifier
    pub id: Option<i64>,

    /// Unique product code, exactly 10 alphanumeric characters
    #[validate(
        required(message = "Product code is required"),
        length(equal = 10, message = "Product code must be 10 characters long"),
        custom(function = validate_product_code)
    )]
    pub code: Option<String>,

    /// Product display name
    #[validate(
        required(message = "Product name is required"),
        length(min = 1, message = "Product name is required")
    )]
    pub name: Option<String>,

    /// Price in Euros, must be positive
    #[validate(
        required(message = "Product price is required"),
        range(exclusive_min = 0.0, message = "Product price must be a positive number")
    )]
    pub price_eur: Option<f64>,

    /// Price in US Dollars, derived from the EUR price on reads
    pub price_usd: Option<f64>,

    /// Product availability status
    pub available: Option<bool>,
}

impl ProductDto {
    /// Build an API-ready DTO from a stored product, deriving the USD price
    /// from the given exchange rate.
    pub fn from_entity(product: &Product, usd_rate: f64) -> Self {
        Self {
            id: Some(product.id),
            code: Some(product.code.clone()),
            name: Some(product.name.clone()),
            price_eur: Some(product.price_eur),
            price_usd: Some(eur_to_usd(product.price_eur, usd_rate)),
            available: Some(product.available),
        }
    }
}

/// Unified response wrapper for all product endpoints.
///
/// A non-empty `errors` list indicates failure; `products` carries the
/// payload on success.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct ProductResponse {
    /// Error messages, non-empty indicates failure
    pub errors: Vec<String>,
    /// Successful operation payload
    pub products: Vec<ProductDto>,
}

impl ProductResponse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Error-only response
    pub fn with_errors(errors: Vec<String>) -> Self {
        Self {
            errors,
            products: Vec::new(),
        }
    }

    /// Single-error response
    pub fn error(message: impl Into<String>) -> Self {
        Self::with_errors(vec![message.into()])
    }

    pub fn add_product(&mut self, product: ProductDto) {
        self.products.push(product);
    }
}

/// Query parameters for listing products
#[derive(Debug, Clone, Deserialize, ToSchema, IntoParams)]
pub struct ListQuery {
    /// Zero-based page index
    #[serde(default)]
    pub page: i64,
    /// Number of items per page (1-100)
    #[serde(default = "default_per_page")]
    pub per_page: i64,
    /// Sort criteria in format: field(,asc|desc)
    #[serde(default = "default_sort")]
    pub sort: String,
    /// JSON filter object (e.g. {"name":"widget"})
    #[serde(default = "default_filter")]
    pub filter: String,
}

fn default_per_page() -> i64 {
    10
}

fn default_sort() -> String {
    "name".to_string()
}

fn default_filter() -> String {
    "{}".to_string()
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 0,
            per_page: default_per_page(),
            sort: default_sort(),
            filter: default_filter(),
        }
    }
}

/// Validated pagination window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub per_page: u64,
}

impl PageRequest {
    /// Item offset of this page, saturating on huge page indices
    pub fn offset(&self) -> u64 {
        self.page.saturating_mul(self.per_page)
    }
}

/// One page of products plus the total match count
#[derive(Debug, Clone, PartialEq)]
pub struct ProductPage {
    pub items: Vec<Product>,
    pub total_items: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_dto() -> ProductDto {
        ProductDto {
            id: None,
            code: Some("ABCDEF1234".to_string()),
            name: Some("Widget".to_string()),
            price_eur: Some(10.5),
            price_usd: None,
            available: Some(true),
        }
    }

    #[test]
    fn test_valid_dto_passes_validation() {
        assert!(valid_dto().validate().is_ok());
    }

    #[test]
    fn test_missing_code_is_reported() {
        let dto = ProductDto {
            code: None,
            ..valid_dto()
        };
        let errors = dto.validate().unwrap_err();
        let messages = format!("{:?}", errors);
        assert!(messages.contains("Product code is required"));
    }

    #[test]
    fn test_short_code_is_reported() {
        let dto = ProductDto {
            code: Some("ABC".to_string()),
            ..valid_dto()
        };
        let errors = dto.validate().unwrap_err();
        assert!(format!("{:?}", errors).contains("Product code must be 10 characters long"));
    }

    #[test]
    fn test_non_alphanumeric_code_is_reported() {
        let dto = ProductDto {
            code: Some("ABC-DEF-12".to_string()),
            ..valid_dto()
        };
        let errors = dto.validate().unwrap_err();
        assert!(format!("{:?}", errors).contains("Product code must be alphanumeric"));
    }

    #[test]
    fn test_zero_price_is_reported() {
        let dto = ProductDto {
            price_eur: Some(0.0),
            ..valid_dto()
        };
        let errors = dto.validate().unwrap_err();
        assert!(format!("{:?}", errors).contains("Product price must be a positive number"));
    }

    #[test]
    fn test_from_entity_derives_usd_price() {
        let product = Product {
            id: 7,
            code: "ABCDEF1234".to_string(),
            name: "Widget".to_string(),
            price_eur: 100.0,
            available: true,
        };

        let dto = ProductDto::from_entity(&product, 1.0545);
        assert_eq!(dto.id, Some(7));
        assert_eq!(dto.price_eur, Some(100.0));
        assert_eq!(dto.price_usd, Some(105.45));
    }

    #[test]
    fn test_dto_serializes_camel_case() {
        let dto = ProductDto::from_entity(
            &Product {
                id: 1,
                code: "ABCDEF1234".to_string(),
                name: "Widget".to_string(),
                price_eur: 2.0,
                available: false,
            },
            1.0,
        );

        let json = serde_json::to_value(&dto).unwrap();
        assert!(json.get("priceEur").is_some());
        assert!(json.get("priceUsd").is_some());
        assert!(json.get("available").is_some());
    }

    #[test]
    fn test_page_request_offset_saturates() {
        let page = PageRequest {
            page: u64::MAX,
            per_page: 10,
        };
        assert_eq!(page.offset(), u64::MAX);
    }

    #[test]
    fn test_list_query_defaults() {
        let query: ListQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.page, 0);
        assert_eq!(query.per_page, 10);
        assert_eq!(query.sort, "name");
        assert_eq!(query.filter, "{}");
    }
}
