//! Page requests, sorting and the paged result envelope.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::dto::ProductResponse;
use crate::error::CatalogError;

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// `desc` in any case means descending; anything else is ascending.
    pub fn parse_lenient(s: &str) -> Self {
        if s.eq_ignore_ascii_case("desc") {
            Self::Desc
        } else {
            Self::Asc
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Closed set of product properties a search may sort on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProductSortField {
    Id,
    #[default]
    Name,
    Description,
    Price,
    CategoryId,
    CreatedAt,
    UpdatedAt,
}

impl ProductSortField {
    pub fn column(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Description => "description",
            Self::Price => "price",
            Self::CategoryId => "category_id",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
        }
    }
}

impl FromStr for ProductSortField {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(Self::Id),
            "name" => Ok(Self::Name),
            "description" => Ok(Self::Description),
            "price" => Ok(Self::Price),
            "categoryId" => Ok(Self::CategoryId),
            "createdAt" => Ok(Self::CreatedAt),
            "updatedAt" => Ok(Self::UpdatedAt),
            other => Err(CatalogError::invalid_field(
                "sortBy",
                format!("Unsupported sort field '{other}'"),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sort {
    pub field: ProductSortField,
    pub direction: SortDirection,
}

/// Zero-based page index plus page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
    pub sort: Sort,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            sort: Sort::default(),
        }
    }
}

impl PageRequest {
    pub fn new(page: u32, size: u32, sort: Sort) -> Result<Self, CatalogError> {
        if size == 0 || size > MAX_PAGE_SIZE {
            return Err(CatalogError::invalid_field(
                "size",
                format!("Page size must be between 1 and {MAX_PAGE_SIZE}"),
            ));
        }
        Ok(Self { page, size, sort })
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }

    pub fn limit(&self) -> u64 {
        u64::from(self.size)
    }
}

/// Bounded slice of an ordered result set plus its position metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[aliases(ProductPage = Page<ProductResponse>)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u64,
    pub first: bool,
    pub last: bool,
    pub empty: bool,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: &PageRequest, total_elements: u64) -> Self {
        let size = u64::from(request.size.max(1));
        let total_pages = total_elements.div_ceil(size);
        let page = request.page;
        Self {
            empty: content.is_empty(),
            content,
            page,
            size: request.size,
            total_elements,
            total_pages,
            first: page == 0,
            last: u64::from(page) + 1 >= total_pages,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            first: self.first,
            last: self.last,
            empty: self.empty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(page: u32, size: u32) -> PageRequest {
        PageRequest::new(page, size, Sort::default()).unwrap()
    }

    #[test]
    fn single_full_page() {
        let p = Page::new(vec![1], &req(0, 20), 1);
        assert_eq!(p.total_pages, 1);
        assert!(p.first);
        assert!(p.last);
        assert!(!p.empty);
    }

    #[test]
    fn middle_page() {
        let p = Page::new(vec![1, 2], &req(1, 2), 5);
        assert_eq!(p.total_pages, 3);
        assert!(!p.first);
        assert!(!p.last);
    }

    #[test]
    fn page_beyond_last_is_empty_and_last() {
        let p: Page<i32> = Page::new(vec![], &req(9, 2), 5);
        assert!(p.empty);
        assert!(p.last);
        assert!(!p.first);
        assert_eq!(p.total_elements, 5);
    }

    #[test]
    fn no_matches() {
        let p: Page<i32> = Page::new(vec![], &req(0, 20), 0);
        assert_eq!(p.total_pages, 0);
        assert!(p.first);
        assert!(p.last);
        assert!(p.empty);
    }

    #[test]
    fn offset_and_limit() {
        let r = req(3, 25);
        assert_eq!(r.offset(), 75);
        assert_eq!(r.limit(), 25);
    }

    #[test]
    fn size_bounds() {
        assert!(PageRequest::new(0, 0, Sort::default()).is_err());
        assert!(PageRequest::new(0, MAX_PAGE_SIZE + 1, Sort::default()).is_err());
        assert!(PageRequest::new(0, MAX_PAGE_SIZE, Sort::default()).is_ok());
    }

    #[test]
    fn sort_parsing() {
        assert_eq!(
            "createdAt".parse::<ProductSortField>().unwrap(),
            ProductSortField::CreatedAt
        );
        assert!("price; DROP TABLE".parse::<ProductSortField>().is_err());
        assert_eq!(SortDirection::parse_lenient("DESC"), SortDirection::Desc);
        assert_eq!(SortDirection::parse_lenient("sideways"), SortDirection::Asc);
    }

    #[test]
    fn map_keeps_metadata() {
        let p = Page::new(vec![1, 2], &req(0, 2), 3).map(|n| n * 10);
        assert_eq!(p.content, vec![10, 20]);
        assert_eq!(p.total_pages, 2);
        assert!(!p.last);
    }
}
