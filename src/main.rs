//! settlement-engine CLI
//!
//! Settle a shared-expense group from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Compute settling payments for a group
//! settlement-engine settle --input group.json
//!
//! # With freshly fetched exchange rates
//! settlement-engine settle --input group.json --rates rates.json
//!
//! # Show per-person net balances
//! settlement-engine balances --input group.json
//!
//! # Generate a random group for testing
//! settlement-engine generate --participants 6 --expenses 25
//! ```

use chrono::Utc;
use rust_decimal::Decimal;
use settlement_engine::core::currency::CurrencyCode;
use settlement_engine::core::expense::Expense;
use settlement_engine::core::group::ExpenseGroup;
use settlement_engine::core::person::{Person, PersonId};
use settlement_engine::generator::{generate_random_group, GroupConfig};
use settlement_engine::rates::{RatePayload, RateSnapshot};
use settlement_engine::settlement::balance::BalanceSheet;
use settlement_engine::settlement::solver::Settlement;
use std::collections::HashMap;
use std::fs;
use std::process;

fn print_usage() {
    eprintln!(
        r#"settlement-engine — shared-expense settlement with currency normalization

USAGE:
    settlement-engine <COMMAND> [OPTIONS]

COMMANDS:
    settle      Compute settling payments for a group
    balances    Show each participant's net balance
    generate    Generate a random group (for testing)
    help        Show this message

OPTIONS (settle, balances):
    --input <FILE>      Path to JSON group file
    --rates <FILE>      Path to a fetched rates payload (optional;
                        falls back to the built-in table)
    --format <FORMAT>   Output format: text (default) or json

OPTIONS (generate):
    --participants <N>  Number of participants (default: 5)
    --expenses <N>      Number of expenses (default: 20)
    --currencies <LIST> Comma-separated currency codes, first is the
                        base currency (default: SEK)
    --output <FILE>     Write to file instead of stdout

EXAMPLES:
    settlement-engine settle --input trip.json
    settlement-engine settle --input trip.json --rates rates.json --format json
    settlement-engine balances --input trip.json
    settlement-engine generate --participants 8 --currencies SEK,EUR,USD"#
    );
}

/// JSON schema for input groups. Participants are referenced by name,
/// which must be unique within the file.
#[derive(serde::Deserialize)]
struct GroupFile {
    name: String,
    base_currency: String,
    participants: Vec<String>,
    expenses: Vec<ExpenseInput>,
}

#[derive(serde::Deserialize)]
struct ExpenseInput {
    title: String,
    amount: String,
    /// Defaults to the group's base currency.
    currency: Option<String>,
    paid_by: String,
    split_between: Vec<String>,
}

/// JSON output schema for settlement results.
#[derive(serde::Serialize)]
struct SettleOutput {
    group: String,
    currency: String,
    balances: Vec<BalanceOutput>,
    debts: Vec<DebtOutput>,
}

#[derive(serde::Serialize)]
struct BalanceOutput {
    participant: String,
    net_balance: String,
    status: String,
}

#[derive(serde::Serialize)]
struct DebtOutput {
    debtor: String,
    creditor: String,
    amount: String,
    currency: String,
}

fn load_group(path: &str) -> ExpenseGroup {
    let content = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{}': {}", path, e);
        process::exit(1);
    });

    let file: GroupFile = serde_json::from_str(&content).unwrap_or_else(|e| {
        eprintln!("Error parsing JSON: {}", e);
        eprintln!("Expected format:");
        eprintln!(
            r#"{{
  "name": "Trip",
  "base_currency": "SEK",
  "participants": ["Alice", "Bob"],
  "expenses": [
    {{ "title": "Dinner", "amount": "100", "paid_by": "Alice",
       "split_between": ["Alice", "Bob"] }}
  ]
}}"#
        );
        process::exit(1);
    });

    let base = CurrencyCode::new(&file.base_currency);
    let mut group = ExpenseGroup::new(&file.name, base.clone());
    let mut by_name: HashMap<String, PersonId> = HashMap::new();

    for name in &file.participants {
        if by_name.contains_key(name) {
            eprintln!("Duplicate participant name: {}", name);
            process::exit(1);
        }
        let person = Person::new(name);
        by_name.insert(name.clone(), person.id());
        group = group.with_participant(person);
    }

    let resolve = |name: &str, by_name: &HashMap<String, PersonId>| -> PersonId {
        *by_name.get(name).unwrap_or_else(|| {
            eprintln!("Unknown participant: {}", name);
            process::exit(1);
        })
    };

    for input in file.expenses {
        let amount: Decimal = input.amount.parse().unwrap_or_else(|e| {
            eprintln!("Invalid amount '{}': {}", input.amount, e);
            process::exit(1);
        });
        if amount <= Decimal::ZERO {
            eprintln!("Expense amount must be positive: {}", input.amount);
            process::exit(1);
        }
        if input.split_between.is_empty() {
            eprintln!("Expense '{}' has an empty split set", input.title);
            process::exit(1);
        }
        let currency = input
            .currency
            .map(CurrencyCode::new)
            .unwrap_or_else(|| base.clone());
        let paid_by = resolve(&input.paid_by, &by_name);
        let split: Vec<PersonId> = input
            .split_between
            .iter()
            .map(|n| resolve(n, &by_name))
            .collect();

        group = group.with_expense(Expense::new(input.title, amount, currency, paid_by, split));
    }

    group
}

fn load_snapshot(rates_path: Option<&str>) -> RateSnapshot {
    match rates_path {
        Some(path) => {
            let content = fs::read_to_string(path).unwrap_or_else(|e| {
                eprintln!("Error reading rates file '{}': {}", path, e);
                process::exit(1);
            });
            let payload: RatePayload = serde_json::from_str(&content).unwrap_or_else(|e| {
                eprintln!("Error parsing rates payload: {}", e);
                process::exit(1);
            });
            RateSnapshot::from_payload(&payload, Utc::now())
        }
        None => {
            log::info!("no rates file supplied, using built-in table");
            RateSnapshot::builtin()
        }
    }
}

fn parse_io_options(args: &[String]) -> (Option<String>, Option<String>, String) {
    let mut input_path = None;
    let mut rates_path = None;
    let mut format = "text".to_string();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                input_path = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--input requires a file path");
                    process::exit(1);
                }));
            }
            "--rates" => {
                i += 1;
                rates_path = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--rates requires a file path");
                    process::exit(1);
                }));
            }
            "--format" => {
                i += 1;
                format = args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--format requires 'text' or 'json'");
                    process::exit(1);
                });
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }
    (input_path, rates_path, format)
}

fn accumulate_or_exit(group: &ExpenseGroup, snapshot: &RateSnapshot) -> BalanceSheet {
    BalanceSheet::accumulate(group, snapshot.table()).unwrap_or_else(|e| {
        eprintln!("Cannot settle group: {}", e);
        process::exit(1);
    })
}

fn display_name(group: &ExpenseGroup, id: PersonId) -> String {
    group
        .participant(id)
        .map(|p| p.name().to_string())
        .unwrap_or_else(|| id.to_string())
}

fn cmd_settle(args: &[String]) {
    let (input_path, rates_path, format) = parse_io_options(args);
    let path = input_path.unwrap_or_else(|| {
        eprintln!("Error: --input <FILE> is required");
        process::exit(1);
    });

    let group = load_group(&path);
    let snapshot = load_snapshot(rates_path.as_deref());
    let sheet = accumulate_or_exit(&group, &snapshot);
    let settlement = Settlement::solve(&sheet);

    if format == "json" {
        let mut balances: Vec<BalanceOutput> = sheet
            .balances()
            .iter()
            .map(|(id, amount)| BalanceOutput {
                participant: display_name(&group, *id),
                net_balance: amount.round_dp(2).to_string(),
                status: if *amount > Decimal::ZERO {
                    "CREDITOR".to_string()
                } else if *amount < Decimal::ZERO {
                    "DEBTOR".to_string()
                } else {
                    "SETTLED".to_string()
                },
            })
            .collect();
        balances.sort_by(|a, b| a.participant.cmp(&b.participant));

        let output = SettleOutput {
            group: group.name().to_string(),
            currency: group.base_currency().to_string(),
            balances,
            debts: settlement
                .debts()
                .iter()
                .map(|d| DebtOutput {
                    debtor: display_name(&group, d.debtor),
                    creditor: display_name(&group, d.creditor),
                    amount: d.amount.round_dp(2).to_string(),
                    currency: d.currency.to_string(),
                })
                .collect(),
        };

        println!("{}", serde_json::to_string_pretty(&output).unwrap());
    } else {
        print_balances_text(&group, &sheet);
        println!();
        if settlement.is_empty() {
            println!("Everyone is settled up.");
        } else {
            println!("Settling payments:");
            for debt in settlement.debts() {
                println!(
                    "  {} → {}: {} {}",
                    display_name(&group, debt.debtor),
                    display_name(&group, debt.creditor),
                    debt.amount.round_dp(2),
                    debt.currency
                );
            }
        }
    }
}

fn cmd_balances(args: &[String]) {
    let (input_path, rates_path, format) = parse_io_options(args);
    let path = input_path.unwrap_or_else(|| {
        eprintln!("Error: --input <FILE> is required");
        process::exit(1);
    });

    let group = load_group(&path);
    let snapshot = load_snapshot(rates_path.as_deref());
    let sheet = accumulate_or_exit(&group, &snapshot);

    if format == "json" {
        let mut balances: Vec<BalanceOutput> = sheet
            .balances()
            .iter()
            .map(|(id, amount)| BalanceOutput {
                participant: display_name(&group, *id),
                net_balance: amount.round_dp(2).to_string(),
                status: if *amount > Decimal::ZERO {
                    "CREDITOR".to_string()
                } else if *amount < Decimal::ZERO {
                    "DEBTOR".to_string()
                } else {
                    "SETTLED".to_string()
                },
            })
            .collect();
        balances.sort_by(|a, b| a.participant.cmp(&b.participant));
        println!("{}", serde_json::to_string_pretty(&balances).unwrap());
    } else {
        print_balances_text(&group, &sheet);
    }
}

fn print_balances_text(group: &ExpenseGroup, sheet: &BalanceSheet) {
    println!(
        "Group: {} ({} participants, {} expenses, base {})",
        group.name(),
        group.participants().len(),
        group.expenses().len(),
        group.base_currency()
    );
    let mut rows: Vec<(String, Decimal)> = sheet
        .balances()
        .iter()
        .map(|(id, amount)| (display_name(group, *id), *amount))
        .collect();
    rows.sort_by(|a, b| a.0.cmp(&b.0));
    for (name, amount) in rows {
        let status = if amount > Decimal::ZERO {
            "is owed"
        } else if amount < Decimal::ZERO {
            "owes"
        } else {
            "settled"
        };
        println!(
            "  {:<20} {:>12} {}  [{}]",
            name,
            amount.round_dp(2),
            group.base_currency(),
            status
        );
    }
}

fn cmd_generate(args: &[String]) {
    let mut participants = 5usize;
    let mut expenses = 20usize;
    let mut currencies_str = "SEK".to_string();
    let mut output_path: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--participants" => {
                i += 1;
                participants = args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                    eprintln!("--participants requires a number");
                    process::exit(1);
                });
            }
            "--expenses" => {
                i += 1;
                expenses = args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                    eprintln!("--expenses requires a number");
                    process::exit(1);
                });
            }
            "--currencies" => {
                i += 1;
                currencies_str = args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--currencies requires a comma-separated list");
                    process::exit(1);
                });
            }
            "--output" => {
                i += 1;
                output_path = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--output requires a file path");
                    process::exit(1);
                }));
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let currencies: Vec<CurrencyCode> = currencies_str
        .split(',')
        .map(|s| CurrencyCode::new(s.trim()))
        .collect();

    let config = GroupConfig {
        participant_count: participants,
        expense_count: expenses,
        currencies,
        ..Default::default()
    };

    let group = generate_random_group(&config);

    #[derive(serde::Serialize)]
    struct OutputExpense {
        title: String,
        amount: String,
        currency: String,
        paid_by: String,
        split_between: Vec<String>,
    }

    #[derive(serde::Serialize)]
    struct OutputFile {
        name: String,
        base_currency: String,
        participants: Vec<String>,
        expenses: Vec<OutputExpense>,
    }

    let name_of = |id: PersonId| -> String {
        group
            .participant(id)
            .map(|p| p.name().to_string())
            .unwrap_or_else(|| id.to_string())
    };

    let output = OutputFile {
        name: group.name().to_string(),
        base_currency: group.base_currency().to_string(),
        participants: group.participants().iter().map(|p| p.name().to_string()).collect(),
        expenses: group
            .expenses()
            .iter()
            .map(|e| OutputExpense {
                title: e.title().to_string(),
                amount: e.amount().to_string(),
                currency: e.currency().to_string(),
                paid_by: name_of(e.paid_by()),
                split_between: e.split_between().iter().map(|id| name_of(*id)).collect(),
            })
            .collect(),
    };

    let json = serde_json::to_string_pretty(&output).unwrap();

    if let Some(path) = output_path {
        fs::write(&path, &json).unwrap_or_else(|e| {
            eprintln!("Error writing to '{}': {}", path, e);
            process::exit(1);
        });
        eprintln!(
            "Generated {} expenses across {} participants → {}",
            group.expenses().len(),
            participants,
            path
        );
    } else {
        println!("{}", json);
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "settle" => cmd_settle(rest),
        "balances" => cmd_balances(rest),
        "generate" => cmd_generate(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
