//! # Checkout Ledger
//!
//! Pure bookkeeping for one checkout: applies the stock policy, prices each
//! line from its product snapshot and keeps the running total. The database
//! layer feeds it one product snapshot per line while holding the storage
//! scope open.
//!
//! ```text
//! item 1 ──► snapshot ──► record() ──► DetailDraft ─┐
//! item 2 ──► snapshot ──► record() ──► DetailDraft ─┼──► total = Σ subtotal
//! item N ──► snapshot ──► record() ──► DetailDraft ─┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{CheckoutItem, DetailDraft, ProductSnapshot};

// =============================================================================
// Stock Policy
// =============================================================================

/// What to do when a line asks for more than the product has in stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockPolicy {
    /// Decrement unconditionally; stock may go negative.
    #[default]
    AllowNegative,
    /// Reject the checkout with `InsufficientStock`.
    RequireAvailable,
}

impl StockPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockPolicy::AllowNegative => "allow_negative",
            StockPolicy::RequireAvailable => "require_available",
        }
    }
}

impl fmt::Display for StockPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StockPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "allow_negative" => Ok(StockPolicy::AllowNegative),
            "require_available" => Ok(StockPolicy::RequireAvailable),
            other => Err(format!("unknown stock policy '{}'", other)),
        }
    }
}

// =============================================================================
// Ledger
// =============================================================================

/// Accumulates priced lines for a single checkout.
#[derive(Debug, Clone)]
pub struct CheckoutLedger {
    policy: StockPolicy,
    total: Money,
    lines: Vec<DetailDraft>,
}

impl CheckoutLedger {
    pub fn new(policy: StockPolicy) -> Self {
        CheckoutLedger::with_capacity(policy, 0)
    }

    pub fn with_capacity(policy: StockPolicy, lines: usize) -> Self {
        CheckoutLedger {
            policy,
            total: Money::zero(),
            lines: Vec::with_capacity(lines),
        }
    }

    /// Prices one line against the current product snapshot.
    ///
    /// `snapshot.stock` must reflect decrements already made by earlier lines
    /// of the same checkout.
    ///
    /// ## Errors
    /// - `InsufficientStock` under [`StockPolicy::RequireAvailable`]
    /// - `AmountOverflow` if the subtotal or the running total overflows
    pub fn record(&mut self, item: &CheckoutItem, snapshot: &ProductSnapshot) -> CoreResult<&DetailDraft> {
        if self.policy == StockPolicy::RequireAvailable && snapshot.stock < item.quantity {
            return Err(CoreError::InsufficientStock {
                product_id: item.product_id,
                available: snapshot.stock,
                requested: item.quantity,
            });
        }

        let overflow = CoreError::AmountOverflow {
            product_id: item.product_id,
        };
        let subtotal = Money::from_units(snapshot.price)
            .checked_multiply_quantity(item.quantity)
            .ok_or_else(|| overflow.clone())?;
        self.total = self.total.checked_add(subtotal).ok_or(overflow)?;

        let index = self.lines.len();
        self.lines.push(DetailDraft {
            product_id: item.product_id,
            product_name: snapshot.name.clone(),
            quantity: item.quantity,
            subtotal: subtotal.units(),
        });

        Ok(&self.lines[index])
    }

    /// Consumes the ledger, yielding the total and the drafted lines.
    pub fn into_parts(self) -> (Money, Vec<DetailDraft>) {
        (self.total, self.lines)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(name: &str, price: i64, stock: i64) -> ProductSnapshot {
        ProductSnapshot {
            name: name.to_string(),
            price,
            stock,
        }
    }

    #[test]
    fn test_total_equals_sum_of_subtotals() {
        let mut ledger = CheckoutLedger::new(StockPolicy::AllowNegative);
        ledger
            .record(&CheckoutItem::new(1, 2), &snapshot("bebek bumbu hitam", 15_000, 60))
            .unwrap();
        ledger
            .record(&CheckoutItem::new(3, 4), &snapshot("es teh", 3_000, 120))
            .unwrap();

        let (total, lines) = ledger.into_parts();
        assert_eq!(total.units(), 42_000);
        assert_eq!(lines.iter().map(|l| l.subtotal).sum::<i64>(), total.units());
        assert_eq!(lines[0].product_name, "bebek bumbu hitam");
        assert_eq!(lines[1].subtotal, 12_000);
    }

    #[test]
    fn test_allow_negative_ignores_stock() {
        let mut ledger = CheckoutLedger::new(StockPolicy::AllowNegative);
        let line = ledger
            .record(&CheckoutItem::new(1, 10), &snapshot("es teh", 3_000, 2))
            .unwrap();
        assert_eq!(line.quantity, 10);
    }

    #[test]
    fn test_require_available_rejects_oversell() {
        let mut ledger = CheckoutLedger::new(StockPolicy::RequireAvailable);
        let err = ledger
            .record(&CheckoutItem::new(1, 10), &snapshot("es teh", 3_000, 2))
            .unwrap_err();
        assert_eq!(
            err,
            CoreError::InsufficientStock {
                product_id: 1,
                available: 2,
                requested: 10
            }
        );
        let (total, lines) = ledger.into_parts();
        assert!(lines.is_empty());
        assert_eq!(total, Money::zero());
    }

    #[test]
    fn test_require_available_accepts_exact_stock() {
        let mut ledger = CheckoutLedger::new(StockPolicy::RequireAvailable);
        assert!(ledger
            .record(&CheckoutItem::new(1, 2), &snapshot("es teh", 3_000, 2))
            .is_ok());
    }

    #[test]
    fn test_overflow_is_reported() {
        let mut ledger = CheckoutLedger::new(StockPolicy::AllowNegative);
        let err = ledger
            .record(&CheckoutItem::new(9, 2), &snapshot("gold", i64::MAX, 1))
            .unwrap_err();
        assert_eq!(err, CoreError::AmountOverflow { product_id: 9 });
    }

    #[test]
    fn test_stock_policy_parsing() {
        assert_eq!("allow_negative".parse::<StockPolicy>(), Ok(StockPolicy::AllowNegative));
        assert_eq!(
            " Require_Available ".parse::<StockPolicy>(),
            Ok(StockPolicy::RequireAvailable)
        );
        assert!("strict".parse::<StockPolicy>().is_err());
        assert_eq!(StockPolicy::default(), StockPolicy::AllowNegative);
    }
}
