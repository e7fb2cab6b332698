use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// ISO 4217-style currency code.
///
/// Supports standard fiat currencies (SEK, USD, EUR, etc.) as well as
/// arbitrary identifiers for whatever a group chooses to account in.
///
/// # Examples
///
/// ```
/// use settlement_engine::core::currency::CurrencyCode;
///
/// let sek = CurrencyCode::new("SEK");
/// let eur = CurrencyCode::new("EUR");
/// assert_ne!(sek, eur);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CurrencyCode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Errors arising from currency table operations.
#[derive(Debug, Error)]
pub enum CurrencyError {
    #[error("no rate available for currency {code}")]
    UnknownCurrency { code: CurrencyCode },
    #[error("rate must be positive, got {rate} for {code}")]
    InvalidRate { code: CurrencyCode, rate: Decimal },
}

/// A currency with its display metadata and exchange rate.
///
/// `rate` expresses the value of one reference-currency unit in this
/// currency, with the reference currency itself carrying rate 1.0.
/// All rates in a table must be quoted against the same reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Currency {
    pub code: CurrencyCode,
    pub name: String,
    pub symbol: String,
    pub rate: Decimal,
}

impl Currency {
    pub fn new(
        code: impl Into<CurrencyCode>,
        name: impl Into<String>,
        symbol: impl Into<String>,
        rate: Decimal,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            symbol: symbol.into(),
            rate,
        }
    }
}

/// Exchange-rate table for converting between currencies.
///
/// A table is a consistent snapshot: every rate is quoted against the
/// same reference currency, and the whole table is replaced wholesale
/// when fresh rates arrive. A settlement computation always operates
/// on a single snapshot passed by the caller.
///
/// # Examples
///
/// ```
/// use settlement_engine::core::currency::{Currency, CurrencyCode, CurrencyTable};
/// use rust_decimal_macros::dec;
///
/// let mut table = CurrencyTable::new();
/// table.insert(Currency::new("SEK", "Swedish Krona", "kr", dec!(1.0))).unwrap();
/// table.insert(Currency::new("USD", "US Dollar", "$", dec!(0.092))).unwrap();
///
/// let sek = table
///     .normalize(dec!(9.2), &CurrencyCode::new("USD"), &CurrencyCode::new("SEK"))
///     .unwrap();
/// assert_eq!(sek, dec!(100));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyTable {
    currencies: HashMap<CurrencyCode, Currency>,
}

impl CurrencyTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in fallback table, used when no fetched rates are
    /// available. Quoted against SEK.
    pub fn builtin() -> Self {
        let mut table = Self::new();
        let defaults = [
            Currency::new("SEK", "Swedish Krona", "kr", Decimal::ONE),
            Currency::new("USD", "US Dollar", "$", Decimal::new(92, 3)),
            Currency::new("EUR", "Euro", "€", Decimal::new(87, 3)),
            Currency::new("NOK", "Norwegian Krone", "kr", Decimal::new(102, 2)),
            Currency::new("DKK", "Danish Krone", "kr", Decimal::new(65, 2)),
        ];
        for currency in defaults {
            // Built-in rates are known positive.
            let _ = table.insert(currency);
        }
        table
    }

    /// Insert a currency, replacing any previous entry for its code.
    ///
    /// Rejects non-positive rates; a zero or negative rate would make
    /// every conversion through that currency meaningless.
    pub fn insert(&mut self, currency: Currency) -> Result<(), CurrencyError> {
        if currency.rate <= Decimal::ZERO {
            return Err(CurrencyError::InvalidRate {
                code: currency.code.clone(),
                rate: currency.rate,
            });
        }
        self.currencies.insert(currency.code.clone(), currency);
        Ok(())
    }

    /// Look up a currency by code.
    pub fn get(&self, code: &CurrencyCode) -> Result<&Currency, CurrencyError> {
        self.currencies
            .get(code)
            .ok_or_else(|| CurrencyError::UnknownCurrency { code: code.clone() })
    }

    pub fn contains(&self, code: &CurrencyCode) -> bool {
        self.currencies.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.currencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.currencies.is_empty()
    }

    /// All currencies in the table, sorted by code.
    pub fn currencies(&self) -> Vec<&Currency> {
        let mut all: Vec<&Currency> = self.currencies.values().collect();
        all.sort_by(|a, b| a.code.cmp(&b.code));
        all
    }

    /// Convert an amount from one currency to another.
    ///
    /// An identity conversion returns the amount untouched without
    /// consulting the table, so a no-op never introduces arithmetic
    /// noise. Otherwise the cross rate `to.rate / from.rate` applies.
    /// Unknown codes are an error, never a silent rate of 1.0.
    pub fn normalize(
        &self,
        amount: Decimal,
        from: &CurrencyCode,
        to: &CurrencyCode,
    ) -> Result<Decimal, CurrencyError> {
        if from == to {
            return Ok(amount);
        }
        let from_rate = self.get(from)?.rate;
        let to_rate = self.get(to)?.rate;
        Ok(amount * to_rate / from_rate)
    }
}
