use crate::core::currency::{CurrencyCode, CurrencyTable};
use crate::core::group::ExpenseGroup;
use crate::core::person::PersonId;
use crate::settlement::solver::Debt;
use crate::settlement::{SettlementError, EPSILON};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Net balance per participant, in the group's base currency.
///
/// A positive balance means the participant is owed money (net
/// creditor). A negative balance means they owe (net debtor).
///
/// Balances are exact sums; no rounding to minor-unit precision happens
/// here. Presentation layers round, the engine does not.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceSheet {
    currency: CurrencyCode,
    balances: HashMap<PersonId, Decimal>,
}

impl BalanceSheet {
    /// Fold a group's expenses into net balances.
    ///
    /// Every participant appears in the result, including those with no
    /// activity (balance zero). For each expense the payer is credited
    /// the full normalized amount and every split member is debited an
    /// even share — the payer included, if they are in the split set.
    ///
    /// Expense order does not matter; the fold is a pure sum.
    ///
    /// # Errors
    ///
    /// - [`SettlementError::DegenerateSplit`] if an expense has an empty
    ///   split set.
    /// - [`SettlementError::Currency`] if an expense or the group uses a
    ///   currency absent from `table`.
    pub fn accumulate(
        group: &ExpenseGroup,
        table: &CurrencyTable,
    ) -> Result<Self, SettlementError> {
        let mut balances: HashMap<PersonId, Decimal> = group
            .participants()
            .iter()
            .map(|p| (p.id(), Decimal::ZERO))
            .collect();

        for expense in group.expenses() {
            if expense.split_between().is_empty() {
                return Err(SettlementError::DegenerateSplit {
                    expense_id: expense.id(),
                });
            }

            let normalized = table.normalize(
                expense.amount(),
                expense.currency(),
                group.base_currency(),
            )?;
            let per_person = normalized / Decimal::from(expense.share_count());

            *balances.entry(expense.paid_by()).or_insert(Decimal::ZERO) += normalized;
            for member in expense.split_between() {
                *balances.entry(*member).or_insert(Decimal::ZERO) -= per_person;
            }
        }

        Ok(Self {
            currency: group.base_currency().clone(),
            balances,
        })
    }

    /// The currency every balance is expressed in.
    pub fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    /// Net balance for one person. Unknown ids read as zero.
    pub fn balance(&self, id: PersonId) -> Decimal {
        self.balances.get(&id).copied().unwrap_or(Decimal::ZERO)
    }

    /// All balances.
    pub fn balances(&self) -> &HashMap<PersonId, Decimal> {
        &self.balances
    }

    pub fn len(&self) -> usize {
        self.balances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }

    /// Whether credits and debits cancel out, within tolerance.
    ///
    /// Holds by construction for any accumulated group: each expense
    /// credits and debits the same normalized total.
    pub fn is_conserved(&self) -> bool {
        let total: Decimal = self.balances.values().sum();
        total.abs() <= EPSILON
    }

    /// Sum of all positive balances — the total that still has to move
    /// for the group to be square.
    pub fn total_outstanding(&self) -> Decimal {
        self.balances
            .values()
            .filter(|v| **v > EPSILON)
            .sum()
    }

    /// Whether every balance is within tolerance of zero.
    pub fn is_settled(&self) -> bool {
        self.balances.values().all(|v| v.abs() <= EPSILON)
    }

    /// Apply a settling payment as a transfer: the debtor's balance
    /// rises toward zero, the creditor's claim shrinks by the same
    /// amount.
    pub fn apply(&mut self, debt: &Debt) {
        *self.balances.entry(debt.debtor).or_insert(Decimal::ZERO) += debt.amount;
        *self.balances.entry(debt.creditor).or_insert(Decimal::ZERO) -= debt.amount;
    }
}
