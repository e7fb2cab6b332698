//! Exchange-rate snapshots.
//!
//! The actual network fetch lives outside this crate; whatever performs
//! it hands the raw payload here. This module turns a remote rates
//! payload into a [`CurrencyTable`] snapshot, stamps it with a fetch
//! time, and falls back to the built-in table when nothing fresher is
//! available. Snapshots are replaced wholesale, never patched in place.

use crate::core::currency::{Currency, CurrencyCode, CurrencyTable};
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Raw payload shape returned by Frankfurter-style rate providers:
/// `{"amount": 1.0, "base": "SEK", "date": "...", "rates": {"USD": 0.092, ...}}`.
///
/// Rates quote the value of one `base` unit in each listed currency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatePayload {
    pub amount: Decimal,
    pub base: String,
    pub date: String,
    pub rates: HashMap<String, Decimal>,
}

/// A currency table plus the moment it was fetched.
///
/// `fetched_at` is `None` for the built-in fallback table, which has no
/// provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateSnapshot {
    table: CurrencyTable,
    fetched_at: Option<DateTime<Utc>>,
}

impl RateSnapshot {
    /// The built-in fallback snapshot.
    pub fn builtin() -> Self {
        Self {
            table: CurrencyTable::builtin(),
            fetched_at: None,
        }
    }

    /// Build a snapshot from a fetched payload.
    ///
    /// The base currency enters at rate 1.0; every quoted currency
    /// enters at its quoted rate, enriched with a display name and
    /// symbol where one is known (the code doubles as both otherwise).
    /// Quotes with non-positive rates are unusable and are skipped with
    /// a warning rather than poisoning the whole snapshot.
    pub fn from_payload(payload: &RatePayload, fetched_at: DateTime<Utc>) -> Self {
        let mut table = CurrencyTable::new();

        let base = Currency::new(
            payload.base.as_str(),
            display_name(&payload.base).unwrap_or(payload.base.as_str()),
            display_symbol(&payload.base).unwrap_or(payload.base.as_str()),
            Decimal::ONE,
        );
        // Rate 1.0 is always valid.
        let _ = table.insert(base);

        for (code, rate) in &payload.rates {
            let currency = Currency::new(
                code.as_str(),
                display_name(code).unwrap_or(code.as_str()),
                display_symbol(code).unwrap_or(code.as_str()),
                *rate,
            );
            if let Err(err) = table.insert(currency) {
                log::warn!("skipping unusable rate quote: {}", err);
            }
        }

        log::info!(
            "rate snapshot built from {} payload: {} currencies",
            payload.base,
            table.len()
        );

        Self {
            table,
            fetched_at: Some(fetched_at),
        }
    }

    pub fn table(&self) -> &CurrencyTable {
        &self.table
    }

    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    /// Whether the snapshot is older than `max_age` as of `now`.
    /// The built-in fallback is always considered stale.
    pub fn is_stale(&self, now: DateTime<Utc>, max_age: Duration) -> bool {
        match self.fetched_at {
            Some(at) => now - at > max_age,
            None => true,
        }
    }
}

/// Display name for a well-known currency code.
fn display_name(code: &str) -> Option<&'static str> {
    let name = match code {
        "SEK" => "Swedish Krona",
        "USD" => "US Dollar",
        "EUR" => "Euro",
        "GBP" => "British Pound",
        "NOK" => "Norwegian Krone",
        "DKK" => "Danish Krone",
        "CHF" => "Swiss Franc",
        "JPY" => "Japanese Yen",
        "CAD" => "Canadian Dollar",
        "AUD" => "Australian Dollar",
        "CNY" => "Chinese Yuan",
        "INR" => "Indian Rupee",
        "BRL" => "Brazilian Real",
        "KRW" => "South Korean Won",
        "SGD" => "Singapore Dollar",
        "HKD" => "Hong Kong Dollar",
        "MXN" => "Mexican Peso",
        "THB" => "Thai Baht",
        "TRY" => "Turkish Lira",
        "ZAR" => "South African Rand",
        "PLN" => "Polish Zloty",
        "CZK" => "Czech Koruna",
        "HUF" => "Hungarian Forint",
        "ISK" => "Icelandic Krona",
        _ => return None,
    };
    Some(name)
}

/// Display symbol for a well-known currency code.
fn display_symbol(code: &str) -> Option<&'static str> {
    let symbol = match code {
        "SEK" | "NOK" | "DKK" | "ISK" => "kr",
        "USD" | "MXN" => "$",
        "EUR" => "€",
        "GBP" => "£",
        "CHF" => "CHF",
        "JPY" | "CNY" => "¥",
        "CAD" => "C$",
        "AUD" => "A$",
        "INR" => "₹",
        "BRL" => "R$",
        "KRW" => "₩",
        "SGD" => "S$",
        "HKD" => "HK$",
        "THB" => "฿",
        "TRY" => "₺",
        "ZAR" => "R",
        "PLN" => "zł",
        "CZK" => "Kč",
        "HUF" => "Ft",
        _ => return None,
    };
    Some(symbol)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_payload() -> RatePayload {
        let mut rates = HashMap::new();
        rates.insert("USD".to_string(), dec!(0.095));
        rates.insert("EUR".to_string(), dec!(0.088));
        RatePayload {
            amount: Decimal::ONE,
            base: "SEK".to_string(),
            date: "2026-08-25".to_string(),
            rates,
        }
    }

    #[test]
    fn test_payload_parses_from_json() {
        let json = r#"{
            "amount": 1.0,
            "base": "SEK",
            "date": "2026-08-25",
            "rates": { "USD": 0.095, "EUR": 0.088 }
        }"#;
        let payload: RatePayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.base, "SEK");
        assert_eq!(payload.rates.len(), 2);
    }

    #[test]
    fn test_snapshot_from_payload() {
        let snapshot = RateSnapshot::from_payload(&sample_payload(), Utc::now());
        let table = snapshot.table();
        assert_eq!(table.len(), 3);

        let sek = table.get(&CurrencyCode::new("SEK")).unwrap();
        assert_eq!(sek.rate, Decimal::ONE);
        let usd = table.get(&CurrencyCode::new("USD")).unwrap();
        assert_eq!(usd.rate, dec!(0.095));
        assert_eq!(usd.name, "US Dollar");
        assert_eq!(usd.symbol, "$");
        assert!(snapshot.fetched_at().is_some());
    }

    #[test]
    fn test_unknown_code_keeps_code_as_name() {
        let mut payload = sample_payload();
        payload.rates.insert("XAU".to_string(), dec!(0.0001));
        let snapshot = RateSnapshot::from_payload(&payload, Utc::now());
        let xau = snapshot.table().get(&CurrencyCode::new("XAU")).unwrap();
        assert_eq!(xau.name, "XAU");
        assert_eq!(xau.symbol, "XAU");
    }

    #[test]
    fn test_bad_quote_is_skipped() {
        let mut payload = sample_payload();
        payload.rates.insert("BAD".to_string(), dec!(-1));
        let snapshot = RateSnapshot::from_payload(&payload, Utc::now());
        assert!(!snapshot.table().contains(&CurrencyCode::new("BAD")));
        assert!(snapshot.table().contains(&CurrencyCode::new("USD")));
    }

    #[test]
    fn test_staleness() {
        let now = Utc::now();
        let fresh = RateSnapshot::from_payload(&sample_payload(), now);
        assert!(!fresh.is_stale(now, Duration::hours(24)));
        assert!(fresh.is_stale(now + Duration::hours(25), Duration::hours(24)));
        assert!(RateSnapshot::builtin().is_stale(now, Duration::hours(24)));
    }
}
