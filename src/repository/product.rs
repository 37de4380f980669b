use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::db::unicode_lower;
use crate::domain::product::{NewProduct, Product};
use crate::domain::types::{ProductId, ProductPrice};
use crate::models::product::{
    NewProduct as DbNewProduct, Product as DbProduct, ProductChangeset,
};
use crate::repository::{
    DieselRepository, ProductListQuery, ProductReader, ProductWriter, RepositoryError,
    RepositoryResult,
};
use crate::schema::products;

/// Wrap `fragment` for a `LIKE ... ESCAPE '\'` substring match.
fn like_pattern(fragment: &str) -> String {
    let mut pattern = String::with_capacity(fragment.len() + 2);
    pattern.push('%');
    for ch in fragment.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn into_domain(rows: Vec<DbProduct>) -> RepositoryResult<Vec<Product>> {
    let items = rows
        .into_iter()
        .map(TryInto::try_into)
        .collect::<Result<Vec<Product>, _>>()?;
    Ok(items)
}

fn ensure_valid(product: &NewProduct) -> RepositoryResult<()> {
    let violations = product.violations();
    if violations.is_empty() {
        Ok(())
    } else {
        log::warn!("Rejected product write: {violations:?}");
        Err(RepositoryError::Validation(violations))
    }
}

impl DieselRepository {
    fn load_products(
        &self,
        query: products::BoxedQuery<'_, Sqlite>,
    ) -> RepositoryResult<Vec<Product>> {
        let mut conn = self.conn()?;
        let rows = query
            .order(products::id.asc())
            .load::<DbProduct>(&mut conn)?;
        into_domain(rows)
    }

    fn first_in_category_by_price(
        &self,
        category: &str,
        descending: bool,
    ) -> RepositoryResult<Option<Product>> {
        let mut conn = self.conn()?;

        let query = products::table
            .filter(products::category.eq(category))
            .into_boxed::<Sqlite>();
        let query = if descending {
            query.order((products::price.desc(), products::id.asc()))
        } else {
            query.order((products::price.asc(), products::id.asc()))
        };

        let product = query.first::<DbProduct>(&mut conn).optional()?;
        let product = product.map(TryInto::try_into).transpose()?;
        Ok(product)
    }
}

impl ProductReader for DieselRepository {
    fn get_product_by_id(&self, id: ProductId) -> RepositoryResult<Product> {
        let mut conn = self.conn()?;

        let product = products::table
            .find(id.get())
            .first::<DbProduct>(&mut conn)
            .optional()?
            .ok_or(RepositoryError::NotFound(id))?;

        Ok(product.try_into()?)
    }

    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)> {
        let mut conn = self.conn()?;

        let total = products::table.count().get_result::<i64>(&mut conn)? as usize;

        let mut items = products::table.into_boxed::<Sqlite>();
        if let Some(pagination) = &query.pagination {
            let Some((offset, limit)) = pagination.bounds() else {
                return Ok((total, Vec::new()));
            };
            items = items.offset(offset).limit(limit);
        }

        let items = items
            .order(products::id.asc())
            .load::<DbProduct>(&mut conn)?;

        Ok((total, into_domain(items)?))
    }

    fn count_products(&self) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;
        let total = products::table.count().get_result::<i64>(&mut conn)?;
        Ok(total as usize)
    }

    fn list_by_category(&self, category: &str) -> RepositoryResult<Vec<Product>> {
        self.load_products(
            products::table
                .filter(products::category.eq(category))
                .into_boxed::<Sqlite>(),
        )
    }

    fn search_by_name(&self, fragment: &str) -> RepositoryResult<Vec<Product>> {
        self.load_products(
            products::table
                .filter(
                    unicode_lower(products::name)
                        .like(like_pattern(&fragment.to_lowercase()))
                        .escape('\\'),
                )
                .into_boxed::<Sqlite>(),
        )
    }

    fn list_by_price_range(
        &self,
        min: ProductPrice,
        max: ProductPrice,
    ) -> RepositoryResult<Vec<Product>> {
        self.load_products(
            products::table
                .filter(products::price.between(min.cents(), max.cents()))
                .into_boxed::<Sqlite>(),
        )
    }

    fn list_by_category_and_price_range(
        &self,
        category: &str,
        min: ProductPrice,
        max: ProductPrice,
    ) -> RepositoryResult<Vec<Product>> {
        self.load_products(
            products::table
                .filter(products::category.eq(category))
                .filter(products::price.between(min.cents(), max.cents()))
                .into_boxed::<Sqlite>(),
        )
    }

    fn list_by_price_greater_than(
        &self,
        threshold: ProductPrice,
    ) -> RepositoryResult<Vec<Product>> {
        self.load_products(
            products::table
                .filter(products::price.gt(threshold.cents()))
                .into_boxed::<Sqlite>(),
        )
    }

    fn list_by_price_less_than(&self, threshold: ProductPrice) -> RepositoryResult<Vec<Product>> {
        self.load_products(
            products::table
                .filter(products::price.lt(threshold.cents()))
                .into_boxed::<Sqlite>(),
        )
    }

    fn count_by_category(&self, category: &str) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;
        let total = products::table
            .filter(products::category.eq(category))
            .count()
            .get_result::<i64>(&mut conn)?;
        Ok(total as usize)
    }

    fn exists_by_name(&self, name: &str) -> RepositoryResult<bool> {
        let mut conn = self.conn()?;
        let exists = diesel::select(diesel::dsl::exists(
            products::table.filter(products::name.eq(name)),
        ))
        .get_result::<bool>(&mut conn)?;
        Ok(exists)
    }

    fn most_expensive_in_category(&self, category: &str) -> RepositoryResult<Option<Product>> {
        self.first_in_category_by_price(category, true)
    }

    fn least_expensive_in_category(&self, category: &str) -> RepositoryResult<Option<Product>> {
        self.first_in_category_by_price(category, false)
    }
}

impl ProductWriter for DieselRepository {
    fn create_product(&self, product: &NewProduct) -> RepositoryResult<Product> {
        ensure_valid(product)?;

        let mut conn = self.conn()?;
        let now = self.now();

        let created = diesel::insert_into(products::table)
            .values(DbNewProduct::new(product, now))
            .returning(DbProduct::as_returning())
            .get_result::<DbProduct>(&mut conn)?;

        log::debug!("Created product {} ({})", created.id, created.name);
        Ok(created.try_into()?)
    }

    fn update_product(&self, id: ProductId, product: &NewProduct) -> RepositoryResult<Product> {
        let mut conn = self.conn()?;
        let now = self.now();

        let updated = conn.transaction::<_, RepositoryError, _>(|conn| {
            let existing = products::table
                .find(id.get())
                .first::<DbProduct>(conn)
                .optional()?
                .ok_or(RepositoryError::NotFound(id))?;

            ensure_valid(product)?;

            let updated_at = now.max(existing.updated_at);
            let updated = diesel::update(products::table.find(id.get()))
                .set(ProductChangeset::new(product, updated_at))
                .returning(DbProduct::as_returning())
                .get_result::<DbProduct>(conn)?;
            Ok(updated)
        })?;

        log::debug!("Updated product {id}");
        Ok(updated.try_into()?)
    }

    fn delete_product(&self, id: ProductId) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        let affected = diesel::delete(products::table.find(id.get())).execute(&mut conn)?;
        if affected == 0 {
            return Err(RepositoryError::NotFound(id));
        }

        log::debug!("Deleted product {id}");
        Ok(())
    }
}
