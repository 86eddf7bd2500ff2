//! Type-safe price representation using decimal arithmetic.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price with currency information.
///
/// Amounts are held in the currency's standard unit (e.g. złoty, not grosze)
/// and rounded to two decimal places at the edges of the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit.
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency: CurrencyCode) -> Self {
        Self { amount, currency }
    }

    /// Multiply the amount by a scalar and round to two decimal places.
    ///
    /// Used when converting seeded catalog prices with a fixed multiplier.
    #[must_use]
    pub fn scaled(self, factor: Decimal) -> Self {
        Self {
            amount: (self.amount * factor).round_dp(2),
            currency: self.currency,
        }
    }

    /// Format for display, e.g. `79.96 zł`.
    #[must_use]
    pub fn display(&self) -> String {
        format!("{:.2} {}", self.amount, self.currency.symbol())
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// ISO 4217 currency codes supported by the shop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    /// Polish złoty - the seeded catalog currency.
    #[default]
    PLN,
    USD,
    EUR,
}

impl CurrencyCode {
    /// The ISO code as a string.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::PLN => "PLN",
            Self::USD => "USD",
            Self::EUR => "EUR",
        }
    }

    /// Display symbol.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::PLN => "zł",
            Self::USD => "$",
            Self::EUR => "€",
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl std::str::FromStr for CurrencyCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PLN" => Ok(Self::PLN),
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            _ => Err(format!("unsupported currency: {s}")),
        }
    }
}

// SQLx support (with postgres feature): stored as TEXT
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for CurrencyCode {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for CurrencyCode {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(s.parse::<Self>()?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for CurrencyCode {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.code(), buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::dec;

    #[test]
    fn test_display() {
        let price = Price::new(dec!(19.99), CurrencyCode::PLN);
        assert_eq!(price.display(), "19.99 zł");
    }

    #[test]
    fn test_scaled_rounds_to_cents() {
        // 9.99 * 4 = 39.96
        let price = Price::new(dec!(9.99), CurrencyCode::PLN).scaled(dec!(4));
        assert_eq!(price.amount, dec!(39.96));

        // rounding: 1.005 * 3 = 3.015 -> 3.02 (banker's rounding rounds to even)
        let price = Price::new(dec!(1.005), CurrencyCode::PLN).scaled(dec!(3));
        assert_eq!(price.amount.round_dp(2), price.amount);
    }

    #[test]
    fn test_currency_roundtrip() {
        for code in [CurrencyCode::PLN, CurrencyCode::USD, CurrencyCode::EUR] {
            assert_eq!(code.code().parse::<CurrencyCode>().unwrap(), code);
        }
        assert!("GBP".parse::<CurrencyCode>().is_err());
    }
}
