use std::borrow::Cow;
use std::fmt::{Display, Formatter};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::domain::types::{ProductId, ProductPrice};

/// Maximum length of a product name, in characters.
pub const NAME_MAX_LEN: u64 = 100;
/// Maximum length of a product description, in characters.
pub const DESCRIPTION_MAX_LEN: u64 = 500;
/// Maximum length of a product category, in characters.
pub const CATEGORY_MAX_LEN: u64 = 50;

/// A stored product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub price: ProductPrice,
    pub category: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Product {
    /// The writable part of this record.
    pub fn to_new_product(&self) -> NewProduct {
        NewProduct {
            name: self.name.clone(),
            description: self.description.clone(),
            price: self.price,
            category: self.category.clone(),
        }
    }
}

/// Caller-supplied fields of a [`Product`], used for both inserts and full
/// updates. Identifier and timestamps are always assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct NewProduct {
    #[validate(length(
        min = 1,
        max = 100,
        message = "must be between 1 and 100 characters"
    ))]
    pub name: String,
    #[validate(length(max = 500, message = "cannot exceed 500 characters"))]
    pub description: Option<String>,
    #[validate(custom(function = "validate_price"))]
    pub price: ProductPrice,
    #[validate(length(
        min = 1,
        max = 50,
        message = "must be between 1 and 50 characters"
    ))]
    pub category: String,
}

impl NewProduct {
    pub fn new(
        name: impl Into<String>,
        description: Option<String>,
        price: ProductPrice,
        category: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description,
            price,
            category: category.into(),
        }
    }

    /// Checks every field rule and returns the failures sorted by field.
    /// An empty list means the payload may be written.
    pub fn violations(&self) -> Vec<FieldViolation> {
        match self.validate() {
            Ok(()) => Vec::new(),
            Err(errors) => FieldViolation::from_errors(&errors),
        }
    }
}

fn validate_price(price: &ProductPrice) -> Result<(), ValidationError> {
    if !price.is_positive() {
        return Err(ValidationError::new("price_min")
            .with_message(Cow::Borrowed("must be at least 0.01")));
    }
    if *price > ProductPrice::MAX {
        return Err(ValidationError::new("price_max")
            .with_message(Cow::Borrowed("cannot exceed 99999999.99")));
    }
    Ok(())
}

/// A single failed field rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub reason: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Flattens `validator` output into a deterministic list.
    pub fn from_errors(errors: &ValidationErrors) -> Vec<Self> {
        let mut violations: Vec<Self> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                let field = field.to_string();
                errors.iter().map(move |error| {
                    let reason = error
                        .message
                        .as_ref()
                        .map(|message| message.to_string())
                        .unwrap_or_else(|| error.code.to_string());
                    Self::new(field.clone(), reason)
                })
            })
            .collect();
        violations.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.reason.cmp(&b.reason)));
        violations
    }
}

impl Display for FieldViolation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.field, self.reason)
    }
}
