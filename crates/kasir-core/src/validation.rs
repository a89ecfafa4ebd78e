//! # Validation Module
//!
//! Input validation utilities for Kasir POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP handler (kasir-api)                                     │
//! │  └── Type validation (JSON deserialization)                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE - business rule validation                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::{CheckoutItem, NewProduct};
use crate::{MAX_CHECKOUT_ITEMS, MAX_ITEM_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 200 characters
///
/// ## Example
/// ```rust
/// use kasir_core::validation::validate_product_name;
///
/// assert!(validate_product_name("bebek bumbu hitam").is_ok());
/// assert!(validate_product_name("   ").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Parses a report date in `YYYY-MM-DD` form.
pub fn parse_report_date(field: &str, value: &str) -> ValidationResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "expected YYYY-MM-DD".to_string(),
        }
    })
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price.
///
/// ## Example
/// ```rust
/// use kasir_core::validation::validate_price;
///
/// assert!(validate_price(15_000).is_ok());
/// assert!(validate_price(0).is_ok());     // Free item
/// assert!(validate_price(-100).is_err());
/// ```
pub fn validate_price(price: i64) -> ValidationResult<()> {
    if price < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a storage identifier.
pub fn validate_id(field: &str, id: i64) -> ValidationResult<()> {
    if id <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Composite Validators
// =============================================================================

/// Validates a product payload before insert or update.
pub fn validate_new_product(product: &NewProduct) -> ValidationResult<()> {
    validate_product_name(&product.name)?;
    validate_price(product.price)?;
    Ok(())
}

/// Validates a whole checkout request before any storage access.
///
/// ## User Workflow
/// ```text
/// POST /api/checkout { items: [...] }
///       │
///       ▼
/// validate_checkout_items ← THIS FUNCTION
///       │
///       ├── empty?          → CoreError::EmptyCheckout
///       ├── > 100 lines?    → CoreError::TooManyItems
///       ├── bad quantity?   → CoreError::Validation
///       │
///       └── OK → open checkout scope
/// ```
///
/// Product ids are not checked here. An id that matches no row, including
/// zero or a negative id, fails the in-scope lookup as `ProductNotFound`.
pub fn validate_checkout_items(items: &[CheckoutItem]) -> CoreResult<()> {
    if items.is_empty() {
        return Err(CoreError::EmptyCheckout);
    }

    if items.len() > MAX_CHECKOUT_ITEMS {
        return Err(CoreError::TooManyItems {
            max: MAX_CHECKOUT_ITEMS,
        });
    }

    for item in items {
        validate_quantity(item.quantity)?;
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("es teh").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name(&"A".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(MAX_ITEM_QUANTITY).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(MAX_ITEM_QUANTITY + 1).is_err());
    }

    #[test]
    fn test_validate_new_product() {
        let ok = NewProduct {
            name: "ayam bumbu hitam".to_string(),
            price: 12_000,
            stock: 60,
        };
        assert!(validate_new_product(&ok).is_ok());

        let negative = NewProduct { price: -1, ..ok };
        assert!(matches!(
            validate_new_product(&negative),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_empty_checkout_rejected() {
        assert_eq!(validate_checkout_items(&[]), Err(CoreError::EmptyCheckout));
    }

    #[test]
    fn test_checkout_line_limits() {
        let too_many = vec![CheckoutItem::new(1, 1); MAX_CHECKOUT_ITEMS + 1];
        assert_eq!(
            validate_checkout_items(&too_many),
            Err(CoreError::TooManyItems {
                max: MAX_CHECKOUT_ITEMS
            })
        );

        let zero_qty = [CheckoutItem::new(1, 0)];
        assert!(matches!(
            validate_checkout_items(&zero_qty),
            Err(CoreError::Validation(ValidationError::MustBePositive { .. }))
        ));

        // unknown ids are left to the product lookup
        assert!(validate_checkout_items(&[CheckoutItem::new(0, 1)]).is_ok());

        assert!(validate_checkout_items(&[CheckoutItem::new(1, 2)]).is_ok());
    }

    #[test]
    fn test_parse_report_date() {
        let d = parse_report_date("start_date", "2026-01-31").unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2026, 1, 31).unwrap());
        assert!(parse_report_date("start_date", "31-01-2026").is_err());
    }
}
