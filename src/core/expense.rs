use crate::core::currency::CurrencyCode;
use crate::core::person::PersonId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single shared expense within a group.
///
/// `paid_by` fronted the full `amount` in `currency`; the cost is split
/// evenly across `split_between`. The payer may or may not appear in the
/// split set — the two roles are independent.
///
/// Expenses are immutable once created.
///
/// # Examples
///
/// ```
/// use settlement_engine::core::currency::CurrencyCode;
/// use settlement_engine::core::expense::Expense;
/// use settlement_engine::core::person::PersonId;
/// use rust_decimal_macros::dec;
///
/// let alice = PersonId::new();
/// let bob = PersonId::new();
/// let dinner = Expense::new(
///     "Dinner",
///     dec!(100),
///     CurrencyCode::new("SEK"),
///     alice,
///     vec![alice, bob],
/// );
/// assert_eq!(dinner.amount(), dec!(100));
/// assert_eq!(dinner.share_count(), 2);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    /// Unique identifier for this expense.
    id: Uuid,
    /// Short human-readable description.
    title: String,
    /// The amount paid. Must be positive.
    amount: Decimal,
    /// The currency the amount was paid in.
    currency: CurrencyCode,
    /// The participant who fronted the money.
    paid_by: PersonId,
    /// The participants the cost is split across. Must be non-empty
    /// by the time the expense is accumulated.
    split_between: Vec<PersonId>,
    /// When this expense was recorded.
    created_at: DateTime<Utc>,
}

impl Expense {
    /// Create a new expense.
    ///
    /// # Panics
    ///
    /// Panics if `amount` is not positive.
    pub fn new(
        title: impl Into<String>,
        amount: Decimal,
        currency: CurrencyCode,
        paid_by: PersonId,
        split_between: Vec<PersonId>,
    ) -> Self {
        assert!(
            amount > Decimal::ZERO,
            "Expense amount must be positive, got {}",
            amount
        );
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            amount,
            currency,
            paid_by,
            split_between,
            created_at: Utc::now(),
        }
    }

    /// Create an expense with a specific ID (useful for testing / determinism).
    pub fn with_id(
        id: Uuid,
        title: impl Into<String>,
        amount: Decimal,
        currency: CurrencyCode,
        paid_by: PersonId,
        split_between: Vec<PersonId>,
    ) -> Self {
        assert!(amount > Decimal::ZERO);
        Self {
            id,
            title: title.into(),
            amount,
            currency,
            paid_by,
            split_between,
            created_at: Utc::now(),
        }
    }

    // --- Accessors ---

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    pub fn paid_by(&self) -> PersonId {
        self.paid_by
    }

    pub fn split_between(&self) -> &[PersonId] {
        &self.split_between
    }

    /// Number of people the cost is divided across.
    pub fn share_count(&self) -> usize {
        self.split_between.len()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
