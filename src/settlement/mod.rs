//! Balance accumulation and greedy debt settlement.
//!
//! The pipeline is pure and synchronous: a group snapshot and a currency
//! table snapshot go in, a per-person balance sheet and an ordered list
//! of settling payments come out. No I/O, no shared state, safe to run
//! concurrently over caller-owned snapshots.

pub mod balance;
pub mod solver;

use crate::core::currency::CurrencyError;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Tolerance below which a balance or payment is treated as zero.
///
/// Residue this small is accumulation noise (uneven divisions), not an
/// outstanding debt. Expressed in base-currency units.
pub const EPSILON: Decimal = Decimal::from_parts(1, 0, 0, false, 2); // 0.01

/// Errors arising from the settlement pipeline.
#[derive(Debug, Error)]
pub enum SettlementError {
    /// An expense's split set is empty; there is nobody to divide the
    /// cost across. Never silently treated as zero participants.
    #[error("expense {expense_id} has an empty split set")]
    DegenerateSplit { expense_id: Uuid },

    /// An expense or group references a currency the supplied table
    /// does not know.
    #[error(transparent)]
    Currency(#[from] CurrencyError),
}
