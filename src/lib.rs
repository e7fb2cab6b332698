//! # settlement-engine
//!
//! Shared-expense settlement engine.
//!
//! Given a group of people, a list of expenses (each with a payer, a
//! currency, and a split set), and an exchange-rate table, this engine
//! normalizes all spending into the group's base currency and computes a
//! near-minimal set of pairwise payments that settles everyone's balance.
//!
//! ## Architecture
//!
//! - **core** — Foundational types: people, currencies, expenses, groups
//! - **settlement** — Balance accumulation and the greedy debt solver
//! - **rates** — Exchange-rate snapshots and remote-payload ingestion
//! - **store** — JSON persistence for groups and rate snapshots
//! - **generator** — Random group fixtures for stress testing

pub mod core;
pub mod generator;
pub mod rates;
pub mod settlement;
pub mod store;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::core::currency::{Currency, CurrencyCode, CurrencyTable};
    pub use crate::core::expense::Expense;
    pub use crate::core::group::{ExpenseGroup, GroupRegistry};
    pub use crate::core::person::{Person, PersonId};
    pub use crate::settlement::balance::BalanceSheet;
    pub use crate::settlement::solver::{Debt, Settlement};
    pub use crate::settlement::{SettlementError, EPSILON};
}
