use async_trait::async_trait;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering as AtomicOrdering};
use tokio::sync::RwLock;

use crate::error::CatalogResult;
use crate::filter::{ProductField, ProductFilter, SortSpec};
use crate::models::{NewProduct, PageRequest, Product, ProductPage};

/// Repository trait for Product persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Persist a new product and return it with its assigned id
    async fn insert(&self, input: NewProduct) -> CatalogResult<Product>;

    /// Get a product by ID
    async fn find_by_id(&self, id: i64) -> CatalogResult<Option<Product>>;

    /// Check whether a product with the given code exists
    async fn exists_by_code(&self, code: String) -> CatalogResult<bool>;

    /// Fetch one page of products matching the filter, sorted as requested,
    /// along with the total match count
    async fn find_page(
        &self,
        filter: ProductFilter,
        sort: SortSpec,
        page: PageRequest,
    ) -> CatalogResult<ProductPage>;
}

/// In-memory implementation of ProductRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryProductRepository {
    products: Arc<RwLock<HashMap<i64, Product>>>,
    next_id: Arc<AtomicI64>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self {
            products: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }
}

/// Text rendering of a product field, the form substring filters match against
fn field_text(product: &Product, field: ProductField) -> String {
    match field {
        ProductField::Code => product.code.clone(),
        ProductField::Name => product.name.clone(),
        ProductField::PriceEur => product.price_eur.to_string(),
        ProductField::Available => product.available.to_string(),
    }
}

fn compare_by(a: &Product, b: &Product, field: ProductField) -> Ordering {
    match field {
        ProductField::Code => a.code.cmp(&b.code),
        ProductField::Name => a.name.cmp(&b.name),
        ProductField::PriceEur => a
            .price_eur
            .partial_cmp(&b.price_eur)
            .unwrap_or(Ordering::Equal),
        ProductField::Available => a.available.cmp(&b.available),
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn insert(&self, input: NewProduct) -> CatalogResult<Product> {
        let mut products = self.products.write().await;

        let id = self.next_id.fetch_add(1, AtomicOrdering::SeqCst);
        let product = Product {
            id,
            code: input.code,
            name: input.name,
            price_eur: input.price_eur,
            available: input.available,
        };
        products.insert(id, product.clone());

        tracing::info!(product_id = id, "Created product");
        Ok(product)
    }

    async fn find_by_id(&self, id: i64) -> CatalogResult<Option<Product>> {
        let products = self.products.read().await;
        Ok(products.get(&id).cloned())
    }

    async fn exists_by_code(&self, code: String) -> CatalogResult<bool> {
        let products = self.products.read().await;
        Ok(products.values().any(|p| p.code == code))
    }

    async fn find_page(
        &self,
        filter: ProductFilter,
        sort: SortSpec,
        page: PageRequest,
    ) -> CatalogResult<ProductPage> {
        let products = self.products.read().await;

        let mut matches: Vec<Product> = products
            .values()
            .filter(|p| {
                filter
                    .clauses
                    .iter()
                    .all(|clause| field_text(p, clause.field).contains(&clause.value))
            })
            .cloned()
            .collect();

        matches.sort_by(|a, b| {
            let ordering = compare_by(a, b, sort.field);
            if sort.descending {
                ordering.reverse()
            } else {
                ordering
            }
        });

        let total_items = matches.len() as u64;
        let items: Vec<Product> = matches
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.per_page as usize)
            .collect();

        Ok(ProductPage { items, total_items })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_product(code: &str, name: &str, price_eur: f64, available: bool) -> NewProduct {
        NewProduct {
            code: code.to_string(),
            name: name.to_string(),
            price_eur,
            available,
        }
    }

    fn default_sort() -> SortSpec {
        SortSpec {
            field: ProductField::Name,
            descending: false,
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_sequential_ids() {
        let repo = InMemoryProductRepository::new();

        let first = repo
            .insert(new_product("AAAAAAAAA1", "First", 1.0, true))
            .await
            .unwrap();
        let second = repo
            .insert(new_product("AAAAAAAAA2", "Second", 2.0, true))
            .await
            .unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);

        let fetched = repo.find_by_id(first.id).await.unwrap();
        assert_eq!(fetched.unwrap().code, "AAAAAAAAA1");
    }

    #[tokio::test]
    async fn test_exists_by_code() {
        let repo = InMemoryProductRepository::new();
        repo.insert(new_product("AAAAAAAAA1", "Widget", 1.0, true))
            .await
            .unwrap();

        assert!(repo.exists_by_code("AAAAAAAAA1".to_string()).await.unwrap());
        assert!(!repo.exists_by_code("ZZZZZZZZZ9".to_string()).await.unwrap());
    }

    #[tokio::test]
    async fn test_find_page_filters_by_substring() {
        let repo = InMemoryProductRepository::new();
        repo.insert(new_product("AAAAAAAAA1", "Red widget", 1.0, true))
            .await
            .unwrap();
        repo.insert(new_product("AAAAAAAAA2", "Blue widget", 2.0, true))
            .await
            .unwrap();
        repo.insert(new_product("AAAAAAAAA3", "Gadget", 3.0, false))
            .await
            .unwrap();

        let filter = ProductFilter::parse(r#"{"name":"widget"}"#).unwrap();
        let page = repo
            .find_page(
                filter,
                default_sort(),
                PageRequest {
                    page: 0,
                    per_page: 10,
                },
            )
            .await
            .unwrap();

        assert_eq!(page.total_items, 2);
        assert_eq!(page.items.len(), 2);
        assert!(page.items.iter().all(|p| p.name.contains("widget")));
    }

    #[tokio::test]
    async fn test_find_page_sorts_and_paginates() {
        let repo = InMemoryProductRepository::new();
        repo.insert(new_product("AAAAAAAAA1", "Charlie", 3.0, true))
            .await
            .unwrap();
        repo.insert(new_product("AAAAAAAAA2", "Alpha", 1.0, true))
            .await
            .unwrap();
        repo.insert(new_product("AAAAAAAAA3", "Bravo", 2.0, true))
            .await
            .unwrap();

        let page = repo
            .find_page(
                ProductFilter::default(),
                default_sort(),
                PageRequest {
                    page: 0,
                    per_page: 2,
                },
            )
            .await
            .unwrap();

        assert_eq!(page.total_items, 3);
        let names: Vec<&str> = page.items.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Bravo"]);

        let second_page = repo
            .find_page(
                ProductFilter::default(),
                default_sort(),
                PageRequest {
                    page: 1,
                    per_page: 2,
                },
            )
            .await
            .unwrap();
        assert_eq!(second_page.items.len(), 1);
        assert_eq!(second_page.items[0].name, "Charlie");
    }

    #[tokio::test]
    async fn test_find_page_with_huge_page_index_is_empty() {
        let repo = InMemoryProductRepository::new();
        repo.insert(new_product("AAAAAAAAA1", "Widget", 1.0, true))
            .await
            .unwrap();

        let page = repo
            .find_page(
                ProductFilter::default(),
                default_sort(),
                PageRequest {
                    page: u64::MAX,
                    per_page: 10,
                },
            )
            .await
            .unwrap();

        assert_eq!(page.total_items, 1);
        assert!(page.items.is_empty());
    }

    #[tokio::test]
    async fn test_find_page_sorts_descending_by_price() {
        let repo = InMemoryProductRepository::new();
        repo.insert(new_product("AAAAAAAAA1", "Cheap", 1.0, true))
            .await
            .unwrap();
        repo.insert(new_product("AAAAAAAAA2", "Pricey", 9.0, true))
            .await
            .unwrap();

        let page = repo
            .find_page(
                ProductFilter::default(),
                SortSpec {
                    field: ProductField::PriceEur,
                    descending: true,
                },
                PageRequest {
                    page: 0,
                    per_page: 10,
                },
            )
            .await
            .unwrap();

        assert_eq!(page.items[0].name, "Pricey");
    }
}
