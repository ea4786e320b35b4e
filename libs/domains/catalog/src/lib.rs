//! Catalog Domain
//!
//! This module provides a complete domain implementation for managing a
//! product catalog with EUR pricing and derived USD pricing.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Business logic, validation, USD enrichment
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐     ┌─────────────┐
//! │ Repository  │     │    Rates    │  ← EUR→USD exchange rate provider
//! └──────┬──────┘     └─────────────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, DTOs, filters
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_catalog::{
//!     handlers,
//!     rates::FixedRateProvider,
//!     repository::InMemoryProductRepository,
//!     service::CatalogService,
//! };
//!
//! // Create repository, rate provider, and service
//! let repository = InMemoryProductRepository::new();
//! let rates = FixedRateProvider::new(1.0);
//! let service = CatalogService::new(repository, rates);
//!
//! // Create Axum router
//! let router = handlers::router(service);
//! ```

pub mod convert;
pub mod entity;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod rates;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{CatalogError, CatalogResult};
pub use filter::{FilterClause, ProductField, ProductFilter, SortSpec};
pub use models::{
    ListQuery, NewProduct, PageRequest, Product, ProductDto, ProductPage, ProductResponse,
};
pub use postgres::PgProductRepository;
pub use rates::{FixedRateProvider, HnbRateClient, RateProvider};
pub use repository::{InMemoryProductRepository, ProductRepository};
pub use service::CatalogService;
