//! Product search filter.
//!
//! Each factory returns a predicate even when its input is absent: a missing input
//! yields [`ProductPredicate::Any`], which matches every product. A filter is the AND
//! of its predicates, so adding a predicate can only shrink the result set. Stores
//! evaluate the same predicate list either in memory ([`ProductFilter::matches`]) or by
//! rendering each predicate to one SQL condition.

use rust_decimal::Decimal;

use crate::types::Product;

#[derive(Debug, Clone, PartialEq)]
pub enum ProductPredicate {
    /// No constraint.
    Any,
    /// Case-insensitive substring of the product name. Holds the lowercased needle.
    NameContains(String),
    CategoryIs(i64),
    /// Inclusive lower bound.
    PriceAtLeast(Decimal),
    /// Inclusive upper bound.
    PriceAtMost(Decimal),
}

impl ProductPredicate {
    /// Blank or absent search text imposes no constraint.
    pub fn name_like(search: Option<&str>) -> Self {
        match search {
            Some(s) if !s.trim().is_empty() => Self::NameContains(s.to_lowercase()),
            _ => Self::Any,
        }
    }

    pub fn category_is(category_id: Option<i64>) -> Self {
        category_id.map_or(Self::Any, Self::CategoryIs)
    }

    pub fn price_at_least(min: Option<Decimal>) -> Self {
        min.map_or(Self::Any, Self::PriceAtLeast)
    }

    pub fn price_at_most(max: Option<Decimal>) -> Self {
        max.map_or(Self::Any, Self::PriceAtMost)
    }

    pub fn matches(&self, product: &Product) -> bool {
        match self {
            Self::Any => true,
            Self::NameContains(needle) => product.name.to_lowercase().contains(needle.as_str()),
            Self::CategoryIs(id) => product.category_id == *id,
            Self::PriceAtLeast(min) => product.price >= *min,
            Self::PriceAtMost(max) => product.price <= *max,
        }
    }
}

/// Conjunction of product predicates.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProductFilter {
    predicates: Vec<ProductPredicate>,
}

impl ProductFilter {
    /// The filter that matches every product.
    pub fn all() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn and(mut self, predicate: ProductPredicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn predicates(&self) -> &[ProductPredicate] {
        &self.predicates
    }

    pub fn matches(&self, product: &Product) -> bool {
        self.predicates.iter().all(|p| p.matches(product))
    }
}

/// Optional search criteria as they arrive from a caller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductCriteria {
    pub search: Option<String>,
    pub category_id: Option<i64>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
}

impl ProductCriteria {
    pub fn to_filter(&self) -> ProductFilter {
        ProductFilter::all()
            .and(ProductPredicate::name_like(self.search.as_deref()))
            .and(ProductPredicate::category_is(self.category_id))
            .and(ProductPredicate::price_at_least(self.min_price))
            .and(ProductPredicate::price_at_most(self.max_price))
    }
}
