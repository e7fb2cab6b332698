use crate::core::currency::CurrencyCode;
use crate::core::person::PersonId;
use crate::settlement::balance::BalanceSheet;
use crate::settlement::EPSILON;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A settling payment from one participant to another.
///
/// Always expressed in the group's base currency and always larger than
/// the settlement tolerance. Debts are ephemeral solver output: computed
/// fresh on every run, never stored as group state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Debt {
    pub debtor: PersonId,
    pub creditor: PersonId,
    pub amount: Decimal,
    pub currency: CurrencyCode,
}

impl fmt::Display for Debt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} owes {} {} {}",
            self.debtor, self.creditor, self.amount, self.currency
        )
    }
}

/// The result of settling a balance sheet: an ordered list of payments
/// that brings every balance within tolerance of zero.
///
/// The solver is a greedy single-pass matcher, not a minimum-transaction
/// optimizer. It fully settles any conserved balance sheet, but it may
/// emit one more payment than a provably optimal matching would.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settlement {
    currency: CurrencyCode,
    debts: Vec<Debt>,
}

impl Settlement {
    /// Compute settling payments for a balance sheet.
    ///
    /// # Algorithm
    ///
    /// 1. Balances within `EPSILON` of zero are already settled and drop
    ///    out.
    /// 2. The rest are ordered ascending by value (ties broken by person
    ///    id so the result is deterministic): debtors are visited most
    ///    negative first, creditors least positive first.
    /// 3. Each debtor's outstanding amount is pushed across the creditor
    ///    list in that fixed order, paying `min(remaining, capacity)` to
    ///    each creditor that still has capacity, until the debtor is
    ///    within tolerance of square.
    /// 4. Any payment not exceeding `EPSILON` is dropped from the output.
    ///
    /// Creditor capacities live in a mutable array parallel to the
    /// immutable creditor order. If a conservation violation leaves a
    /// debtor's remainder unabsorbed, the remainder is silently dropped;
    /// that is an accepted limitation of the heuristic, not an error.
    pub fn solve(sheet: &BalanceSheet) -> Self {
        let mut entries: Vec<(PersonId, Decimal)> = sheet
            .balances()
            .iter()
            .map(|(id, value)| (*id, *value))
            .collect();
        entries.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));

        let debtors: Vec<(PersonId, Decimal)> = entries
            .iter()
            .filter(|(_, v)| *v < -EPSILON)
            .copied()
            .collect();
        let creditors: Vec<PersonId> = entries
            .iter()
            .filter(|(_, v)| *v > EPSILON)
            .map(|(id, _)| *id)
            .collect();
        let mut capacities: Vec<Decimal> = entries
            .iter()
            .filter(|(_, v)| *v > EPSILON)
            .map(|(_, v)| *v)
            .collect();

        let mut debts = Vec::new();
        for (debtor, balance) in debtors {
            let mut remaining = balance.abs();

            for (i, creditor) in creditors.iter().enumerate() {
                if remaining <= EPSILON {
                    break;
                }
                if capacities[i] <= EPSILON {
                    continue;
                }

                let payment = remaining.min(capacities[i]);
                debts.push(Debt {
                    debtor,
                    creditor: *creditor,
                    amount: payment,
                    currency: sheet.currency().clone(),
                });
                capacities[i] -= payment;
                remaining -= payment;
            }
            // Any remainder still here means credits and debits did not
            // balance; it is dropped.
        }

        debts.retain(|d| d.amount > EPSILON);

        Self {
            currency: sheet.currency().clone(),
            debts,
        }
    }

    // --- Accessors ---

    pub fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    /// The settling payments, in emission order (debtor-major,
    /// creditor-minor).
    pub fn debts(&self) -> &[Debt] {
        &self.debts
    }

    pub fn len(&self) -> usize {
        self.debts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.debts.is_empty()
    }

    /// Total amount moved across all payments.
    pub fn total_transferred(&self) -> Decimal {
        self.debts.iter().map(|d| d.amount).sum()
    }

    /// Whether applying every payment to `sheet` leaves all balances
    /// within tolerance of zero.
    pub fn settles(&self, sheet: &BalanceSheet) -> bool {
        let mut after = sheet.clone();
        for debt in &self.debts {
            after.apply(debt);
        }
        after.is_settled()
    }
}

impl fmt::Display for Settlement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Settlement ===")?;
        writeln!(f, "Payments: {}", self.debts.len())?;
        writeln!(f, "Total:    {} {}", self.total_transferred(), self.currency)?;
        for debt in &self.debts {
            writeln!(f, "  {}", debt)?;
        }
        Ok(())
    }
}
