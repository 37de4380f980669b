use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::product::{NewProduct as DomainNewProduct, Product as DomainProduct};
use crate::domain::types::{ProductPrice, TypeConstraintError};

/// Diesel model representing the `products` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::products)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    /// Minor units.
    pub price: i64,
    pub category: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insertable form of [`Product`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::products)]
pub struct NewProduct<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub price: i64,
    pub category: &'a str,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Full-record update; `created_at` is deliberately absent.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = crate::schema::products)]
#[diesel(treat_none_as_null = true)]
pub struct ProductChangeset<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub price: i64,
    pub category: &'a str,
    pub updated_at: NaiveDateTime,
}

impl<'a> NewProduct<'a> {
    pub fn new(product: &'a DomainNewProduct, now: NaiveDateTime) -> Self {
        Self {
            name: &product.name,
            description: product.description.as_deref(),
            price: product.price.cents(),
            category: &product.category,
            created_at: now,
            updated_at: now,
        }
    }
}

impl<'a> ProductChangeset<'a> {
    pub fn new(product: &'a DomainNewProduct, updated_at: NaiveDateTime) -> Self {
        Self {
            name: &product.name,
            description: product.description.as_deref(),
            price: product.price.cents(),
            category: &product.category,
            updated_at,
        }
    }
}

impl TryFrom<Product> for DomainProduct {
    type Error = TypeConstraintError;

    fn try_from(product: Product) -> Result<Self, Self::Error> {
        Ok(Self {
            id: product.id.try_into()?,
            name: product.name,
            description: product.description,
            price: ProductPrice::from_cents(product.price),
            category: product.category,
            created_at: product.created_at,
            updated_at: product.updated_at,
        })
    }
}
