//! Finance invariant arithmetic
//!
//! Every batch event carries a cost split: `paid + debt == total_cost`.
//! The split is computed here, once, as a pure value; the transaction
//! coordinator only persists what this module has already validated.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a finance split could not be built
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FinanceError {
    #[error("amount must be greater than 0")]
    NonPositiveAmount,

    #[error("buy price must be greater than 0")]
    NonPositivePrice,

    #[error("paid amount must not be negative")]
    NegativePaid,

    #[error("paid amount {paid} exceeds total cost {total_cost}")]
    Overpaid { paid: Decimal, total_cost: Decimal },
}

/// The validated paid/debt split for one batch event
///
/// Holds the invariant `paid + debt == total_cost` by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinanceSplit {
    pub total_cost: Decimal,
    pub paid: Decimal,
    pub debt: Decimal,
}

impl FinanceSplit {
    /// Build the split for a new batch
    pub fn new(amount: Decimal, buy_price: Decimal, paid: Decimal) -> Result<Self, FinanceError> {
        if amount <= Decimal::ZERO {
            return Err(FinanceError::NonPositiveAmount);
        }
        if buy_price <= Decimal::ZERO {
            return Err(FinanceError::NonPositivePrice);
        }
        if paid < Decimal::ZERO {
            return Err(FinanceError::NegativePaid);
        }
        let total_cost = amount * buy_price;
        if paid > total_cost {
            return Err(FinanceError::Overpaid { paid, total_cost });
        }
        Ok(Self {
            total_cost,
            paid,
            debt: total_cost - paid,
        })
    }

    /// Plan the reconciliation for an amended batch
    ///
    /// When `new_paid` is absent the paid sum is held constant and the debt
    /// absorbs the cost delta. Overpayment against the new total cost is
    /// rejected before anything is written.
    pub fn amend(
        new_amount: Decimal,
        new_buy_price: Decimal,
        previously_paid: Decimal,
        new_paid: Option<Decimal>,
    ) -> Result<Self, FinanceError> {
        Self::new(new_amount, new_buy_price, new_paid.unwrap_or(previously_paid))
    }
}

/// Row operation that brings one pinned posting in line with its
/// reconciled amount
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostingChange {
    /// Rewrite the existing row to the new amount
    Set(Decimal),
    /// Delete the existing row; nothing is owed or paid any more
    Remove,
    /// Insert a row where none exists yet
    Create(Decimal),
    /// No row exists and none is needed
    Keep,
}

impl PostingChange {
    /// Pick the row operation from whether a pinned row exists and what the
    /// reconciled amount must become
    pub fn plan(has_pinned: bool, target: Decimal) -> Self {
        match (has_pinned, target > Decimal::ZERO) {
            (true, true) => PostingChange::Set(target),
            (true, false) => PostingChange::Remove,
            (false, true) => PostingChange::Create(target),
            (false, false) => PostingChange::Keep,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn split_holds_invariant() {
        let split = FinanceSplit::new(dec("100"), dec("1000"), dec("60000")).unwrap();
        assert_eq!(split.total_cost, dec("100000"));
        assert_eq!(split.paid, dec("60000"));
        assert_eq!(split.debt, dec("40000"));
        assert_eq!(split.paid + split.debt, split.total_cost);
    }

    #[test]
    fn fully_paid_leaves_no_debt() {
        let split = FinanceSplit::new(dec("10"), dec("2.5"), dec("25")).unwrap();
        assert_eq!(split.debt, Decimal::ZERO);
    }

    #[test]
    fn unpaid_is_all_debt() {
        let split = FinanceSplit::new(dec("10"), dec("2.5"), Decimal::ZERO).unwrap();
        assert_eq!(split.paid, Decimal::ZERO);
        assert_eq!(split.debt, dec("25"));
    }

    #[test]
    fn overpayment_is_rejected() {
        let err = FinanceSplit::new(dec("100"), dec("1000"), dec("100001")).unwrap_err();
        assert_eq!(
            err,
            FinanceError::Overpaid {
                paid: dec("100001"),
                total_cost: dec("100000"),
            }
        );
    }

    #[test]
    fn non_positive_quantities_are_rejected() {
        assert_eq!(
            FinanceSplit::new(Decimal::ZERO, dec("10"), Decimal::ZERO),
            Err(FinanceError::NonPositiveAmount)
        );
        assert_eq!(
            FinanceSplit::new(dec("5"), dec("-1"), Decimal::ZERO),
            Err(FinanceError::NonPositivePrice)
        );
        assert_eq!(
            FinanceSplit::new(dec("5"), dec("10"), dec("-1")),
            Err(FinanceError::NegativePaid)
        );
    }

    #[test]
    fn amend_holds_paid_constant_when_not_supplied() {
        // amount 100 -> 150 at price 1000, paid stays 60000
        let split = FinanceSplit::amend(dec("150"), dec("1000"), dec("60000"), None).unwrap();
        assert_eq!(split.total_cost, dec("150000"));
        assert_eq!(split.paid, dec("60000"));
        assert_eq!(split.debt, dec("90000"));
    }

    #[test]
    fn amend_rejects_overpayment_against_new_total() {
        // shrinking the batch below what was already paid is an overpayment
        let err = FinanceSplit::amend(dec("10"), dec("1000"), dec("60000"), None).unwrap_err();
        assert!(matches!(err, FinanceError::Overpaid { .. }));
    }

    #[test]
    fn amend_applies_explicit_new_paid() {
        let split =
            FinanceSplit::amend(dec("150"), dec("1000"), dec("60000"), Some(dec("150000")))
                .unwrap();
        assert_eq!(split.debt, Decimal::ZERO);
    }
}
