use async_trait::async_trait;
use database::BaseRepository;
use sea_orm::sea_query::{Alias, Expr, ExprTrait};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, Order, PaginatorTrait, QueryFilter,
    QueryOrder,
};

use crate::{
    entity,
    error::CatalogResult,
    filter::{FilterClause, ProductField, ProductFilter, SortSpec},
    models::{NewProduct, PageRequest, Product, ProductPage},
    repository::ProductRepository,
};

pub struct PgProductRepository {
    base: BaseRepository<entity::Entity>,
}

impl PgProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }
}

fn column_for(field: ProductField) -> entity::Column {
    match field {
        ProductField::Code => entity::Column::Code,
        ProductField::Name => entity::Column::Name,
        ProductField::PriceEur => entity::Column::PriceEur,
        ProductField::Available => entity::Column::Available,
    }
}

/// Substring predicate for one filter clause.
///
/// Text columns match with LIKE directly; numeric and boolean columns are
/// cast to text first so that the same substring semantics apply.
fn clause_condition(clause: &FilterClause) -> sea_orm::sea_query::SimpleExpr {
    let pattern = format!("%{}%", clause.value);
    match clause.field {
        ProductField::Code => entity::Column::Code.contains(&clause.value),
        ProductField::Name => entity::Column::Name.contains(&clause.value),
        ProductField::PriceEur | ProductField::Available => Expr::col(column_for(clause.field))
            .cast_as(Alias::new("text"))
            .like(pattern),
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn insert(&self, input: NewProduct) -> CatalogResult<Product> {
        let active_model: entity::ActiveModel = input.into();
        let model = self.base.insert(active_model).await?;

        tracing::info!(product_id = model.id, "Created product");
        Ok(model.into())
    }

    async fn find_by_id(&self, id: i64) -> CatalogResult<Option<Product>> {
        let model = self.base.find_by_id(id).await?;
        Ok(model.map(|m| m.into()))
    }

    async fn exists_by_code(&self, code: String) -> CatalogResult<bool> {
        let exists = entity::Entity::find()
            .filter(entity::Column::Code.eq(code))
            .one(self.base.db())
            .await?
            .is_some();

        Ok(exists)
    }

    async fn find_page(
        &self,
        filter: ProductFilter,
        sort: SortSpec,
        page: PageRequest,
    ) -> CatalogResult<ProductPage> {
        let mut condition = Condition::all();
        for clause in &filter.clauses {
            condition = condition.add(clause_condition(clause));
        }

        let direction = if sort.descending {
            Order::Desc
        } else {
            Order::Asc
        };

        let query = entity::Entity::find()
            .filter(condition)
            .order_by(column_for(sort.field), direction);

        // The paginator computes page * per_page internally; clamp the page
        // index so that product cannot overflow on huge page values
        let last_addressable = if page.per_page == 0 {
            0
        } else {
            u64::MAX / page.per_page
        };
        let page_index = page.page.min(last_addressable);

        let paginator = query.paginate(self.base.db(), page.per_page);
        let total_items = paginator.num_items().await?;
        let models = paginator.fetch_page(page_index).await?;

        Ok(ProductPage {
            items: models.into_iter().map(|m| m.into()).collect(),
            total_items,
        })
    }
}
