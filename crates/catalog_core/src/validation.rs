//! Field-level validation: pure, no store access.
//!
//! Every rule appends to a shared violation list so a request reports all of its bad
//! fields at once. Uniqueness and existence checks live in the service, not here.

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{CatalogError, FieldViolation};

pub const CATEGORY_NAME_MIN: usize = 2;
pub const CATEGORY_NAME_MAX: usize = 100;
pub const CATEGORY_DESCRIPTION_MAX: usize = 500;
pub const PRODUCT_NAME_MIN: usize = 2;
pub const PRODUCT_NAME_MAX: usize = 200;
pub const PRODUCT_DESCRIPTION_MAX: usize = 1000;
pub const SKU_CODE_MIN: usize = 3;
pub const SKU_CODE_MAX: usize = 50;

/// Price column is NUMERIC(10,2).
pub const PRICE_SCALE: u32 = 2;
pub static PRICE_MAX: LazyLock<Decimal> = LazyLock::new(|| Decimal::new(99_999_999_99, 2));

static SKU_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9\-_]+$").expect("valid SKU code regex"));

/// Collects violations for one request.
#[derive(Debug, Default)]
pub struct Violations(Vec<FieldViolation>);

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(FieldViolation::new(field, message));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `Ok(value)` if nothing was recorded, otherwise a `FieldValidation` error.
    pub fn finish<T>(self, value: impl FnOnce() -> T) -> Result<T, CatalogError> {
        if self.0.is_empty() {
            Ok(value())
        } else {
            Err(CatalogError::FieldValidation(self.0))
        }
    }
}

/// Required, non-blank, length-bounded text.
pub fn required_text(
    v: &mut Violations,
    field: &str,
    value: Option<&str>,
    (min, max): (usize, usize),
    required_msg: &str,
    length_msg: &str,
) {
    match value {
        None => v.push(field, required_msg),
        Some(s) if s.trim().is_empty() => {
            v.push(field, required_msg);
            // A blank value of the wrong length also fails the size rule.
            let len = s.chars().count();
            if len < min || len > max {
                v.push(field, length_msg);
            }
        }
        Some(s) => {
            let len = s.chars().count();
            if len < min || len > max {
                v.push(field, length_msg);
            }
        }
    }
}

pub fn optional_text_max(
    v: &mut Violations,
    field: &str,
    value: Option<&str>,
    max: usize,
    msg: &str,
) {
    if let Some(s) = value {
        if s.chars().count() > max {
            v.push(field, msg);
        }
    }
}

pub fn required<T>(v: &mut Violations, field: &str, value: Option<&T>, msg: &str) {
    if value.is_none() {
        v.push(field, msg);
    }
}

pub fn price(v: &mut Violations, field: &str, value: Option<&Decimal>) {
    match value {
        None => v.push(field, "Price is required"),
        // Judged at the stored scale: 0.004 would be saved as 0.00.
        Some(p) if normalize_price(*p) <= Decimal::ZERO => {
            v.push(field, "Price must be greater than 0")
        }
        Some(p) if normalize_price(*p) > *PRICE_MAX => {
            v.push(field, format!("Price cannot exceed {}", *PRICE_MAX))
        }
        Some(_) => {}
    }
}

/// Round to the stored scale the way PostgreSQL NUMERIC does.
pub fn normalize_price(p: Decimal) -> Decimal {
    p.round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

pub fn sku_code(v: &mut Violations, field: &str, value: Option<&str>) {
    required_text(
        v,
        field,
        value,
        (SKU_CODE_MIN, SKU_CODE_MAX),
        "SKU code is required",
        "SKU code must be between 3 and 50 characters",
    );
    if let Some(code) = value {
        if !code.trim().is_empty() && !SKU_CODE_RE.is_match(code) {
            v.push(
                field,
                "SKU code must contain only uppercase letters, numbers, hyphens, and underscores",
            );
        }
    }
}

pub fn quantity(v: &mut Violations, field: &str, value: Option<i32>) {
    match value {
        None => v.push(field, "Quantity is required"),
        Some(q) if q < 0 => v.push(field, "Quantity cannot be negative"),
        Some(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn messages(v: Violations) -> Vec<String> {
        match v.finish(|| ()) {
            Ok(()) => vec![],
            Err(CatalogError::FieldValidation(list)) => {
                list.into_iter().map(|f| f.message).collect()
            }
            Err(other) => panic!("Expected FieldValidation, got {other:?}"),
        }
    }

    #[test]
    fn required_text_missing_and_blank() {
        let mut v = Violations::new();
        required_text(&mut v, "name", None, (2, 100), "req", "len");
        assert_eq!(messages(v), vec!["req"]);

        let mut v = Violations::new();
        required_text(&mut v, "name", Some("   "), (2, 100), "req", "len");
        assert_eq!(messages(v), vec!["req"]);

        let mut v = Violations::new();
        required_text(&mut v, "name", Some(" "), (2, 100), "req", "len");
        assert_eq!(messages(v), vec!["req", "len"]);
    }

    #[test]
    fn required_text_counts_chars_not_bytes() {
        let mut v = Violations::new();
        // Two characters, four bytes.
        required_text(&mut v, "name", Some("éé"), (2, 2), "req", "len");
        assert!(v.is_empty());
    }

    #[test]
    fn optional_text_over_limit() {
        let mut v = Violations::new();
        optional_text_max(&mut v, "description", Some(&"x".repeat(501)), 500, "too long");
        assert_eq!(messages(v), vec!["too long"]);

        let mut v = Violations::new();
        optional_text_max(&mut v, "description", Some(&"x".repeat(500)), 500, "too long");
        optional_text_max(&mut v, "description", None, 500, "too long");
        assert!(v.is_empty());
    }

    #[test]
    fn price_rules() {
        let mut v = Violations::new();
        price(&mut v, "price", None);
        price(&mut v, "price", Some(&Decimal::ZERO));
        price(&mut v, "price", Some(&dec("-1.00")));
        price(&mut v, "price", Some(&dec("0.004")));
        price(&mut v, "price", Some(&dec("100000000.00")));
        assert_eq!(
            messages(v),
            vec![
                "Price is required",
                "Price must be greater than 0",
                "Price must be greater than 0",
                "Price must be greater than 0",
                "Price cannot exceed 99999999.99",
            ]
        );

        let mut v = Violations::new();
        price(&mut v, "price", Some(&dec("0.01")));
        price(&mut v, "price", Some(&dec("0.005")));
        price(&mut v, "price", Some(&dec("99999999.99")));
        assert!(v.is_empty());
    }

    #[test]
    fn normalize_price_rounds_half_away_from_zero() {
        assert_eq!(normalize_price(dec("10.005")), dec("10.01"));
        assert_eq!(normalize_price(dec("10.004")), dec("10.00"));
        assert_eq!(normalize_price(dec("1299.99")), dec("1299.99"));
    }

    #[test]
    fn sku_code_rules() {
        let mut v = Violations::new();
        sku_code(&mut v, "skuCode", Some("LAP-001_A"));
        assert!(v.is_empty());

        let mut v = Violations::new();
        sku_code(&mut v, "skuCode", Some("lap-001"));
        assert_eq!(
            messages(v),
            vec!["SKU code must contain only uppercase letters, numbers, hyphens, and underscores"]
        );

        let mut v = Violations::new();
        sku_code(&mut v, "skuCode", Some("AB"));
        assert_eq!(messages(v), vec!["SKU code must be between 3 and 50 characters"]);

        let mut v = Violations::new();
        sku_code(&mut v, "skuCode", None);
        assert_eq!(messages(v), vec!["SKU code is required"]);
    }

    #[test]
    fn quantity_rules() {
        let mut v = Violations::new();
        quantity(&mut v, "quantity", None);
        quantity(&mut v, "quantity", Some(-1));
        assert_eq!(
            messages(v),
            vec!["Quantity is required", "Quantity cannot be negative"]
        );

        let mut v = Violations::new();
        quantity(&mut v, "quantity", Some(0));
        assert!(v.is_empty());
    }
}
