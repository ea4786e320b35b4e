use std::sync::Arc;
use validator::Validate;

use crate::convert::round2;
use crate::filter::{FilterError, ProductFilter, SortSpec};
use crate::models::{ListQuery, NewProduct, PageRequest, ProductDto, ProductResponse};
use crate::rates::RateProvider;
use crate::repository::ProductRepository;

const FETCH_ERROR: &str = "Error fetching products. Please check logs.";
const SAVE_ERROR: &str = "Error saving product. Please check logs.";

/// Service layer for catalog business logic.
///
/// All operations return a [`ProductResponse`] envelope; failures are
/// reported through its `errors` list rather than as transport errors.
pub struct CatalogService<R: ProductRepository, P: RateProvider> {
    repository: Arc<R>,
    rates: Arc<P>,
}

impl<R: ProductRepository, P: RateProvider> Clone for CatalogService<R, P> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            rates: Arc::clone(&self.rates),
        }
    }
}

/// Flatten validation failures into their per-field messages
fn validation_messages(errors: &validator::ValidationErrors) -> Vec<String> {
    errors
        .field_errors()
        .values()
        .flat_map(|field_errors| field_errors.iter())
        .map(|error| {
            error
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| error.code.to_string())
        })
        .collect()
}

impl<R: ProductRepository, P: RateProvider> CatalogService<R, P> {
    pub fn new(repository: R, rates: P) -> Self {
        Self {
            repository: Arc::new(repository),
            rates: Arc::new(rates),
        }
    }

    /// List products with pagination, sorting, and filtering.
    ///
    /// Returns the response envelope plus the total match count for the
    /// pagination header. The exchange rate is fetched once per call and
    /// applied to every product on the page.
    pub async fn list_products(&self, query: ListQuery) -> (ProductResponse, u64) {
        tracing::info!("Fetching all products from repository");

        let mut errors = Vec::new();
        if query.page < 0 {
            errors.push("Page index must not be negative".to_string());
        }
        if !(1..=100).contains(&query.per_page) {
            errors.push("Page size must be between 1 and 100".to_string());
        }
        if !errors.is_empty() {
            return (ProductResponse::with_errors(errors), 0);
        }

        let sort = match SortSpec::parse(&query.sort) {
            Ok(sort) => sort,
            Err(e) => return (ProductResponse::error(e.to_string()), 0),
        };

        let filter = match ProductFilter::parse(&query.filter) {
            Ok(filter) => filter,
            Err(FilterError::Malformed) => {
                tracing::error!(filter = %query.filter, "Malformed filter document");
                return (ProductResponse::error(FETCH_ERROR), 0);
            }
            Err(e) => return (ProductResponse::error(e.to_string()), 0),
        };

        let page_request = PageRequest {
            page: query.page as u64,
            per_page: query.per_page as u64,
        };

        let page = match self.repository.find_page(filter, sort, page_request).await {
            Ok(page) => page,
            Err(e) => {
                tracing::error!(error = %e, "Error fetching products");
                return (ProductResponse::error(FETCH_ERROR), 0);
            }
        };

        if page.items.is_empty() {
            tracing::info!("No products found");
            return (ProductResponse::error("No products found."), page.total_items);
        }

        let usd_rate = self.rates.usd_rate().await;

        let mut response = ProductResponse::new();
        for product in &page.items {
            response.add_product(ProductDto::from_entity(product, usd_rate));
        }

        tracing::info!(count = page.items.len(), "Fetched all products");
        (response, page.total_items)
    }

    /// Fetch a single product by id, enriched with its USD price
    pub async fn get_product(&self, id: Option<i64>) -> ProductResponse {
        let Some(id) = id else {
            tracing::error!("Id is null");
            return ProductResponse::error("Id is null.");
        };
        if id <= 0 {
            tracing::error!(id, "Id must be a positive number");
            return ProductResponse::error("Id must be a positive number");
        }

        tracing::info!(id, "Fetching product");
        let product = match self.repository.find_by_id(id).await {
            Ok(product) => product,
            Err(e) => {
                tracing::error!(error = %e, "Error fetching product");
                return ProductResponse::error(FETCH_ERROR);
            }
        };

        let Some(product) = product else {
            tracing::info!(id, "No product found");
            return ProductResponse::error("No product found.");
        };

        let usd_rate = self.rates.usd_rate().await;

        let mut response = ProductResponse::new();
        response.add_product(ProductDto::from_entity(&product, usd_rate));
        tracing::info!(id, "Product found");
        response
    }

    /// Create a new product.
    ///
    /// The EUR price is rounded to two decimals before persistence. The
    /// response echoes the submitted payload; the USD price is not derived
    /// here, reads are the only place it is computed.
    pub async fn add_product(&self, input: Option<ProductDto>) -> ProductResponse {
        let Some(mut dto) = input else {
            tracing::error!("Product is null");
            return ProductResponse::error("Product is null.");
        };

        if let Err(e) = dto.validate() {
            return ProductResponse::with_errors(validation_messages(&e));
        }

        // Validation guarantees these are present
        let (Some(code), Some(name), Some(price_eur)) =
            (dto.code.clone(), dto.name.clone(), dto.price_eur)
        else {
            return ProductResponse::error("Product is null.");
        };

        match self.repository.exists_by_code(code.clone()).await {
            Ok(true) => {
                tracing::error!(code, "Product code already exists");
                return ProductResponse::error(format!(
                    "Product with code {} already exists.",
                    code
                ));
            }
            Ok(false) => {}
            Err(e) => {
                tracing::error!(error = %e, "Error checking product code");
                return ProductResponse::error(SAVE_ERROR);
            }
        }

        tracing::info!("Adding product to database");
        let price_eur = round2(price_eur);
        dto.price_eur = Some(price_eur);

        let input = NewProduct {
            code,
            name,
            price_eur,
            available: dto.available.unwrap_or(false),
        };

        match self.repository.insert(input).await {
            Ok(created) => {
                tracing::info!(product_id = created.id, "Product added");
                let mut response = ProductResponse::new();
                response.add_product(dto);
                response
            }
            Err(e) => {
                tracing::error!(error = %e, "Error saving product");
                ProductResponse::error(SAVE_ERROR)
            }
        }
    }
}
