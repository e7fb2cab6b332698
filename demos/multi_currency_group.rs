//! Multi-currency group example.
//!
//! Expenses paid in EUR and USD normalize into a SEK group before
//! settlement, using rates ingested from a fetched payload.

use chrono::Utc;
use rust_decimal_macros::dec;
use settlement_engine::core::currency::CurrencyCode;
use settlement_engine::core::expense::Expense;
use settlement_engine::core::group::ExpenseGroup;
use settlement_engine::core::person::Person;
use settlement_engine::rates::{RatePayload, RateSnapshot};
use settlement_engine::settlement::balance::BalanceSheet;
use settlement_engine::settlement::solver::Settlement;

fn main() {
    println!("╔══════════════════════════════════════════════╗");
    println!("║  settlement-engine: Multi-Currency Example   ║");
    println!("╚══════════════════════════════════════════════╝\n");

    // Pretend this payload just came back from the rate provider.
    let payload: RatePayload = serde_json::from_str(
        r#"{
            "amount": 1.0,
            "base": "SEK",
            "date": "2026-08-25",
            "rates": { "EUR": 0.087, "USD": 0.092 }
        }"#,
    )
    .expect("payload is well-formed");
    let snapshot = RateSnapshot::from_payload(&payload, Utc::now());

    println!("━━━ Rate snapshot ━━━\n");
    for currency in snapshot.table().currencies() {
        println!("  {:<4} {:<16} rate {}", currency.code, currency.name, currency.rate);
    }

    let sek = CurrencyCode::new("SEK");
    let eur = CurrencyCode::new("EUR");
    let usd = CurrencyCode::new("USD");

    let alice = Person::new("Alice");
    let bob = Person::new("Bob");
    let (a, b) = (alice.id(), bob.id());

    let group = ExpenseGroup::new("City break", sek)
        .with_participant(alice.clone())
        .with_participant(bob.clone())
        .with_expense(Expense::new("Hotel", dec!(180), eur, a, vec![a, b]))
        .with_expense(Expense::new("Museum", dec!(42), usd, b, vec![a, b]));

    let sheet = BalanceSheet::accumulate(&group, snapshot.table()).expect("group is well-formed");

    println!("\n━━━ Net balances (SEK) ━━━\n");
    for person in [&alice, &bob] {
        println!(
            "  {:<8} {:>10}",
            person.name(),
            sheet.balance(person.id()).round_dp(2)
        );
    }

    let settlement = Settlement::solve(&sheet);

    println!("\n━━━ Settling payments ━━━\n");
    for debt in settlement.debts() {
        let debtor = group.participant(debt.debtor).expect("known participant");
        let creditor = group.participant(debt.creditor).expect("known participant");
        println!(
            "  {} pays {} → {} {}",
            debtor.name(),
            creditor.name(),
            debt.amount.round_dp(2),
            debt.currency
        );
    }
}
