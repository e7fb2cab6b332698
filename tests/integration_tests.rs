use rust_decimal_macros::dec;
use settlement_engine::core::currency::{Currency, CurrencyCode, CurrencyTable};
use settlement_engine::core::expense::Expense;
use settlement_engine::core::group::{ExpenseGroup, GroupRegistry};
use settlement_engine::core::person::Person;
use settlement_engine::rates::{RatePayload, RateSnapshot};
use settlement_engine::settlement::balance::BalanceSheet;
use settlement_engine::settlement::solver::Settlement;
use settlement_engine::settlement::{SettlementError, EPSILON};
use settlement_engine::store;

fn sek() -> CurrencyCode {
    CurrencyCode::new("SEK")
}

/// Full pipeline test: group → balances → settlement, with a foreign
/// currency expense in the mix.
#[test]
fn full_pipeline_ski_trip() {
    let alice = Person::new("Alice");
    let bob = Person::new("Bob");
    let carol = Person::new("Carol");
    let dave = Person::new("Dave");
    let (a, b, c, d) = (alice.id(), bob.id(), carol.id(), dave.id());
    let everyone = vec![a, b, c, d];

    let group = ExpenseGroup::new("Ski trip", sek())
        .with_participant(alice)
        .with_participant(bob)
        .with_participant(carol)
        .with_participant(dave)
        .with_expense(Expense::new("Cabin", dec!(4800), sek(), a, everyone.clone()))
        .with_expense(Expense::new("Groceries", dec!(1200), sek(), b, everyone.clone()))
        .with_expense(Expense::new(
            "Lift passes",
            dec!(180),
            CurrencyCode::new("EUR"),
            c,
            everyone.clone(),
        ))
        .with_expense(Expense::new("Tolls", dec!(240), sek(), a, vec![a, b]));

    let table = CurrencyTable::builtin();
    let sheet = BalanceSheet::accumulate(&group, &table).unwrap();

    // Credits and debits cancel.
    assert!(sheet.is_conserved());
    assert_eq!(sheet.len(), 4);

    let settlement = Settlement::solve(&sheet);
    assert!(settlement.settles(&sheet));
    for debt in settlement.debts() {
        assert_ne!(debt.debtor, debt.creditor);
        assert!(debt.amount > EPSILON);
        assert_eq!(debt.currency, sek());
    }

    // Total moved equals total outstanding (within tolerance).
    assert!((settlement.total_transferred() - sheet.total_outstanding()).abs() <= EPSILON);
}

/// Scenario: one expense, split between payer and one other person.
#[test]
fn two_person_split_yields_single_payment() {
    let alice = Person::new("Alice");
    let bob = Person::new("Bob");
    let (a, b) = (alice.id(), bob.id());

    let group = ExpenseGroup::new("Lunch", sek())
        .with_participant(alice)
        .with_participant(bob)
        .with_expense(Expense::new("Lunch", dec!(100), sek(), a, vec![a, b]));

    let sheet = BalanceSheet::accumulate(&group, &CurrencyTable::builtin()).unwrap();
    assert_eq!(sheet.balance(a), dec!(50));
    assert_eq!(sheet.balance(b), dec!(-50));

    let settlement = Settlement::solve(&sheet);
    assert_eq!(settlement.len(), 1);
    assert_eq!(settlement.debts()[0].debtor, b);
    assert_eq!(settlement.debts()[0].creditor, a);
    assert_eq!(settlement.debts()[0].amount, dec!(50));
}

/// Scenario: chained expenses net out so that both debtors pay the one
/// creditor, most indebted first.
#[test]
fn chained_expenses_settle_to_single_creditor() {
    let a_p = Person::new("A");
    let b_p = Person::new("B");
    let c_p = Person::new("C");
    let (a, b, c) = (a_p.id(), b_p.id(), c_p.id());

    let group = ExpenseGroup::new("Chain", sek())
        .with_participant(a_p)
        .with_participant(b_p)
        .with_participant(c_p)
        .with_expense(Expense::new("First", dec!(90), sek(), a, vec![a, b, c]))
        .with_expense(Expense::new("Second", dec!(30), sek(), b, vec![b, c]));

    let sheet = BalanceSheet::accumulate(&group, &CurrencyTable::builtin()).unwrap();
    assert_eq!(sheet.balance(a), dec!(60));
    assert_eq!(sheet.balance(b), dec!(-15));
    assert_eq!(sheet.balance(c), dec!(-45));

    let settlement = Settlement::solve(&sheet);
    let debts = settlement.debts();
    assert_eq!(debts.len(), 2);
    assert_eq!((debts[0].debtor, debts[0].creditor, debts[0].amount), (c, a, dec!(45)));
    assert_eq!((debts[1].debtor, debts[1].creditor, debts[1].amount), (b, a, dec!(15)));
}

/// Scenario: a fully settled group produces no payments.
#[test]
fn presettled_group_produces_empty_settlement() {
    let alice = Person::new("Alice");
    let bob = Person::new("Bob");
    let (a, b) = (alice.id(), bob.id());

    let group = ExpenseGroup::new("Even", sek())
        .with_participant(alice)
        .with_participant(bob)
        .with_expense(Expense::new("Hers", dec!(75), sek(), a, vec![a, b]))
        .with_expense(Expense::new("His", dec!(75), sek(), b, vec![a, b]));

    let sheet = BalanceSheet::accumulate(&group, &CurrencyTable::builtin()).unwrap();
    assert!(sheet.is_settled());
    assert!(Settlement::solve(&sheet).is_empty());
}

/// Scenario: an empty split set is rejected, never divided by zero.
#[test]
fn empty_split_fails_accumulation() {
    let alice = Person::new("Alice");
    let a = alice.id();
    let group = ExpenseGroup::new("Broken", sek())
        .with_participant(alice)
        .with_expense(Expense::new("Orphan", dec!(10), sek(), a, vec![]));

    let result = BalanceSheet::accumulate(&group, &CurrencyTable::builtin());
    assert!(matches!(
        result,
        Err(SettlementError::DegenerateSplit { .. })
    ));
}

/// Fetched rates flow end to end: payload → snapshot → settlement.
#[test]
fn fetched_rates_drive_normalization() {
    let payload: RatePayload = serde_json::from_str(
        r#"{
            "amount": 1.0,
            "base": "SEK",
            "date": "2026-08-25",
            "rates": { "EUR": 0.087, "USD": 0.092 }
        }"#,
    )
    .unwrap();
    let snapshot = RateSnapshot::from_payload(&payload, chrono::Utc::now());

    let alice = Person::new("Alice");
    let bob = Person::new("Bob");
    let (a, b) = (alice.id(), bob.id());
    let group = ExpenseGroup::new("Abroad", sek())
        .with_participant(alice)
        .with_participant(bob)
        .with_expense(Expense::new(
            "Tickets",
            dec!(10),
            CurrencyCode::new("EUR"),
            a,
            vec![b],
        ));

    let sheet = BalanceSheet::accumulate(&group, snapshot.table()).unwrap();
    // 10 EUR ≈ 114.94 SEK
    assert!((sheet.balance(a) - dec!(114.94)).abs() < dec!(0.01));

    let settlement = Settlement::solve(&sheet);
    assert_eq!(settlement.len(), 1);
    assert!((settlement.debts()[0].amount - dec!(114.94)).abs() < dec!(0.01));
}

/// Registry and rate snapshots survive a save/load cycle.
#[test]
fn persistence_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let groups_path = dir.path().join("groups.json");
    let rates_path = dir.path().join("rates.json");

    let alice = Person::new("Alice");
    let a = alice.id();
    let group = ExpenseGroup::new("Trip", sek())
        .with_participant(alice)
        .with_expense(Expense::new("Taxi", dec!(120), sek(), a, vec![a]));
    let group_id = group.id();

    let registry = GroupRegistry::new().with_group(group).unwrap();
    store::save_registry(&groups_path, &registry).unwrap();
    store::save_rates(&rates_path, &RateSnapshot::builtin()).unwrap();

    let registry = store::load_registry(&groups_path).unwrap();
    let snapshot = store::load_rates(&rates_path).unwrap();

    let group = registry.get(group_id).unwrap();
    assert_eq!(group.name(), "Trip");
    assert_eq!(group.expenses().len(), 1);

    // The reloaded pair still settles.
    let sheet = BalanceSheet::accumulate(group, snapshot.table()).unwrap();
    assert!(sheet.is_settled());
}

/// Group JSON serialization keeps ids stable.
#[test]
fn group_json_round_trip() {
    let alice = Person::new("Alice");
    let a = alice.id();
    let group = ExpenseGroup::new("Trip", sek())
        .with_participant(alice)
        .with_expense(Expense::new("Taxi", dec!(120), sek(), a, vec![a]));

    let json = serde_json::to_string(&group).unwrap();
    let restored: ExpenseGroup = serde_json::from_str(&json).unwrap();
    assert_eq!(restored.id(), group.id());
    assert_eq!(restored.participants()[0].id(), a);
    assert_eq!(restored.expenses()[0].paid_by(), a);
}

/// A removed participant no longer appears in the sheet, but the group
/// still balances over whoever remains in the expenses.
#[test]
fn removed_participant_is_tolerated() {
    let alice = Person::new("Alice");
    let bob = Person::new("Bob");
    let carol = Person::new("Carol");
    let (a, b, c) = (alice.id(), bob.id(), carol.id());

    let group = ExpenseGroup::new("Shrink", sek())
        .with_participant(alice)
        .with_participant(bob)
        .with_participant(carol)
        .with_expense(Expense::new("Dinner", dec!(90), sek(), a, vec![a, b, c]))
        .without_participant(c);

    // Carol's reference dangles; the accumulator balances over her
    // anyway instead of crashing.
    let sheet = BalanceSheet::accumulate(&group, &CurrencyTable::builtin()).unwrap();
    assert!(sheet.is_conserved());
    assert_eq!(sheet.balance(c), dec!(-30));
}

/// An expense in a currency missing from a sparse table is a hard error.
#[test]
fn sparse_table_rejects_unknown_currency() {
    let mut table = CurrencyTable::new();
    table
        .insert(Currency::new("SEK", "Swedish Krona", "kr", dec!(1.0)))
        .unwrap();

    let alice = Person::new("Alice");
    let a = alice.id();
    let group = ExpenseGroup::new("Sparse", sek())
        .with_participant(alice)
        .with_expense(Expense::new(
            "Dinner",
            dec!(30),
            CurrencyCode::new("EUR"),
            a,
            vec![a],
        ));

    assert!(matches!(
        BalanceSheet::accumulate(&group, &table),
        Err(SettlementError::Currency(_))
    ));
}
