//! Weekend trip settlement example.
//!
//! Builds a small group, accumulates balances, and prints the settling
//! payments.

use rust_decimal_macros::dec;
use settlement_engine::core::currency::{CurrencyCode, CurrencyTable};
use settlement_engine::core::expense::Expense;
use settlement_engine::core::group::ExpenseGroup;
use settlement_engine::core::person::Person;
use settlement_engine::settlement::balance::BalanceSheet;
use settlement_engine::settlement::solver::Settlement;

fn main() {
    println!("╔══════════════════════════════════════════════╗");
    println!("║  settlement-engine: Weekend Trip Example     ║");
    println!("╚══════════════════════════════════════════════╝\n");

    let sek = CurrencyCode::new("SEK");

    let alice = Person::new("Alice");
    let bob = Person::new("Bob");
    let carol = Person::new("Carol");
    let (a, b, c) = (alice.id(), bob.id(), carol.id());

    let group = ExpenseGroup::new("Weekend trip", sek.clone())
        .with_participant(alice.clone())
        .with_participant(bob.clone())
        .with_participant(carol.clone())
        .with_expense(Expense::new("Cabin", dec!(2400), sek.clone(), a, vec![a, b, c]))
        .with_expense(Expense::new("Groceries", dec!(630), sek.clone(), b, vec![a, b, c]))
        .with_expense(Expense::new("Fuel", dec!(480), sek.clone(), c, vec![a, c]));

    let table = CurrencyTable::builtin();
    let sheet = BalanceSheet::accumulate(&group, &table).expect("group is well-formed");

    println!("━━━ Net balances ━━━\n");
    for person in [&alice, &bob, &carol] {
        let balance = sheet.balance(person.id());
        let status = if balance > dec!(0) {
            "CREDITOR"
        } else if balance < dec!(0) {
            "DEBTOR"
        } else {
            "SETTLED"
        };
        println!("  {:<8} {:>10} SEK  [{}]", person.name(), balance.round_dp(2), status);
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

    println!(
        "\n{} payment(s) move {} SEK in total.",
        settlement.len(),
        settlement.total_transferred().round_dp(2)
    );
}
