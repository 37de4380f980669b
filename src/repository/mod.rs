use std::fmt;
use std::sync::Arc;

use chrono::{NaiveDateTime, Utc};

use crate::db::{DbConnection, DbPool};
use crate::domain::product::{NewProduct, Product};
use crate::domain::types::{ProductId, ProductPrice};

pub mod errors;
pub mod product;

pub use errors::{RepositoryError, RepositoryResult};

/// Source of the timestamps written on insert and update.
pub type Clock = Arc<dyn Fn() -> NaiveDateTime + Send + Sync>;

/// Repository implementation backed by Diesel and SQLite.
///
/// The underlying `r2d2::Pool` is cheap to clone, allowing the repository to
/// be passed around freely between callers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
    clock: Clock,
}

impl DieselRepository {
    /// Create a new repository from an established database pool.
    pub fn new(pool: DbPool) -> Self {
        Self::with_clock(pool, Arc::new(|| Utc::now().naive_utc()))
    }

    /// Create a repository that stamps records using `clock`.
    pub fn with_clock(pool: DbPool, clock: Clock) -> Self {
        Self { pool, clock }
    }

    /// Get a pooled database connection.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }

    fn now(&self) -> NaiveDateTime {
        (self.clock)()
    }
}

impl fmt::Debug for DieselRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DieselRepository")
            .field("pool", &self.pool.state())
            .finish_non_exhaustive()
    }
}

/// Parameters for paging through every stored product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based page number; `0` is treated as `1`.
    pub page: usize,
    pub per_page: usize,
}

impl Pagination {
    /// `OFFSET`/`LIMIT` for this page.
    ///
    /// Returns `None` when the offset does not fit in an `i64`, which is
    /// always past the last row. An oversized `per_page` is clamped.
    pub fn bounds(&self) -> Option<(i64, i64)> {
        let offset = (self.page.max(1) - 1)
            .checked_mul(self.per_page)
            .and_then(|offset| i64::try_from(offset).ok())?;
        let limit = i64::try_from(self.per_page).unwrap_or(i64::MAX);
        Some((offset, limit))
    }
}

/// Query parameters used when listing products.
#[derive(Debug, Clone, Default)]
pub struct ProductListQuery {
    /// Pagination parameters.
    pub pagination: Option<Pagination>,
}

impl ProductListQuery {
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// Read-only operations for product entities.
///
/// Lists are returned in ascending id order.
pub trait ProductReader {
    /// Retrieve a product by its identifier.
    fn get_product_by_id(&self, id: ProductId) -> RepositoryResult<Product>;
    /// Page through all products, returning the total count alongside the page.
    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)>;
    /// Number of stored products.
    fn count_products(&self) -> RepositoryResult<usize>;
    /// Products whose category equals `category` exactly (case-sensitive).
    fn list_by_category(&self, category: &str) -> RepositoryResult<Vec<Product>>;
    /// Products whose name contains `fragment`, ignoring case (full Unicode folding).
    fn search_by_name(&self, fragment: &str) -> RepositoryResult<Vec<Product>>;
    /// Products priced within `min..=max`.
    fn list_by_price_range(
        &self,
        min: ProductPrice,
        max: ProductPrice,
    ) -> RepositoryResult<Vec<Product>>;
    /// Products in `category` priced within `min..=max`.
    fn list_by_category_and_price_range(
        &self,
        category: &str,
        min: ProductPrice,
        max: ProductPrice,
    ) -> RepositoryResult<Vec<Product>>;
    /// Products priced strictly above `threshold`.
    fn list_by_price_greater_than(&self, threshold: ProductPrice)
    -> RepositoryResult<Vec<Product>>;
    /// Products priced strictly below `threshold`.
    fn list_by_price_less_than(&self, threshold: ProductPrice) -> RepositoryResult<Vec<Product>>;
    /// Number of products whose category equals `category` exactly.
    fn count_by_category(&self, category: &str) -> RepositoryResult<usize>;
    /// Whether any product is named exactly `name`.
    fn exists_by_name(&self, name: &str) -> RepositoryResult<bool>;
    /// Highest priced product in `category`; ties go to the lowest id.
    fn most_expensive_in_category(&self, category: &str) -> RepositoryResult<Option<Product>>;
    /// Lowest priced product in `category`; ties go to the lowest id.
    fn least_expensive_in_category(&self, category: &str) -> RepositoryResult<Option<Product>>;
}

/// Write operations for product entities.
pub trait ProductWriter {
    /// Validate and insert a product, assigning its id and timestamps.
    fn create_product(&self, product: &NewProduct) -> RepositoryResult<Product>;
    /// Replace every writable field of an existing product.
    ///
    /// `created_at` is preserved and `updated_at` never moves backwards.
    fn update_product(&self, id: ProductId, product: &NewProduct) -> RepositoryResult<Product>;
    /// Remove a product; deleting an absent id is an error.
    fn delete_product(&self, id: ProductId) -> RepositoryResult<()>;
}
