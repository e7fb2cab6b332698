//! Random group fixtures.
//!
//! Generates expense groups with random payers, split sets, and amounts
//! for stress testing the settlement pipeline and for the CLI `generate`
//! command.

use crate::core::currency::CurrencyCode;
use crate::core::expense::Expense;
use crate::core::group::ExpenseGroup;
use crate::core::person::{Person, PersonId};
use rand::Rng;
use rust_decimal::Decimal;

/// Configuration for generating a random expense group.
#[derive(Debug, Clone)]
pub struct GroupConfig {
    /// Number of participants.
    pub participant_count: usize,
    /// Number of expenses.
    pub expense_count: usize,
    /// Currencies expenses may be denominated in. The first entry is
    /// the group's base currency.
    pub currencies: Vec<CurrencyCode>,
    /// Minimum expense amount.
    pub min_amount: Decimal,
    /// Maximum expense amount.
    pub max_amount: Decimal,
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self {
            participant_count: 5,
            expense_count: 20,
            currencies: vec![CurrencyCode::new("SEK")],
            min_amount: Decimal::from(10),
            max_amount: Decimal::from(2_000),
        }
    }
}

/// Generate a random expense group for testing.
///
/// Every expense has a random payer and a random non-empty split set,
/// so the result always satisfies the accumulator's input contract.
pub fn generate_random_group(config: &GroupConfig) -> ExpenseGroup {
    let mut rng = rand::thread_rng();

    let people: Vec<Person> = (0..config.participant_count)
        .map(|i| Person::new(format!("participant-{:03}", i)))
        .collect();
    let ids: Vec<PersonId> = people.iter().map(|p| p.id()).collect();

    let base = config
        .currencies
        .first()
        .cloned()
        .unwrap_or_else(|| CurrencyCode::new("SEK"));

    let mut group = ExpenseGroup::new("generated", base);
    for person in people {
        group = group.with_participant(person);
    }

    let min_f64: f64 = config.min_amount.to_string().parse().unwrap_or(10.0);
    let max_f64: f64 = config.max_amount.to_string().parse().unwrap_or(2_000.0);

    for i in 0..config.expense_count {
        let payer = ids[rng.gen_range(0..ids.len())];

        // Random non-empty split set.
        let mut split: Vec<PersonId> = ids
            .iter()
            .filter(|_| rng.gen_bool(0.5))
            .copied()
            .collect();
        if split.is_empty() {
            split.push(ids[rng.gen_range(0..ids.len())]);
        }

        let amount_f64 = rng.gen_range(min_f64..max_f64);
        let amount = Decimal::from_f64_retain(amount_f64)
            .unwrap_or(Decimal::from(10))
            .round_dp(2);

        let currency = config.currencies[rng.gen_range(0..config.currencies.len())].clone();

        if amount > Decimal::ZERO {
            group = group.with_expense(Expense::new(
                format!("expense-{:03}", i),
                amount,
                currency,
                payer,
                split,
            ));
        }
    }

    group
}
