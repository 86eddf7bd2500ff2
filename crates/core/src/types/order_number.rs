//! Human-readable, date-scoped order numbers.
//!
//! Format: `OM<YYYYMMDD>-<NNNN>` where `NNNN` is a zero-padded counter that
//! resets every day. The next number for a day is derived from the highest
//! existing number for that day, so allocation is read-then-write and not
//! safe under concurrent order creation; the `orders.order_number` unique
//! constraint catches the loser (see DESIGN.md).

use core::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Prefix for all order numbers.
const PREFIX: &str = "OM";

/// Counter width in digits.
const COUNTER_WIDTH: usize = 4;

/// Errors that can occur when parsing an [`OrderNumber`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderNumberError {
    /// Missing the `OM` prefix.
    #[error("order number must start with {PREFIX}")]
    BadPrefix,
    /// The date stamp is not a valid `YYYYMMDD` date.
    #[error("order number has an invalid date stamp")]
    BadDate,
    /// The counter is missing or not a number.
    #[error("order number has an invalid counter")]
    BadCounter,
}

/// A date-scoped unique order identifier, e.g. `OM20260828-0001`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderNumber(String);

impl OrderNumber {
    /// Build an order number from its parts.
    #[must_use]
    pub fn from_parts(date: NaiveDate, counter: u32) -> Self {
        Self(format!("{PREFIX}{}-{counter:04}", date.format("%Y%m%d")))
    }

    /// The first order number of a day (`-0001`).
    #[must_use]
    pub fn first_of_day(date: NaiveDate) -> Self {
        Self::from_parts(date, 1)
    }

    /// The next number for `date`, given the current day maximum (if any).
    ///
    /// `prior_max` is expected to be the highest existing order number for
    /// that date; its counter is incremented by one. With no prior orders the
    /// counter starts at `0001`.
    #[must_use]
    pub fn next_for_day(date: NaiveDate, prior_max: Option<&Self>) -> Self {
        let counter = prior_max.map_or(0, |n| n.counter().unwrap_or(0)) + 1;
        Self::from_parts(date, counter)
    }

    /// Parse and validate an order number string.
    ///
    /// # Errors
    ///
    /// Returns an error if the prefix, date stamp, or counter is malformed.
    pub fn parse(s: &str) -> Result<Self, OrderNumberError> {
        let rest = s.strip_prefix(PREFIX).ok_or(OrderNumberError::BadPrefix)?;
        let (stamp, counter) = rest.split_once('-').ok_or(OrderNumberError::BadCounter)?;
        NaiveDate::parse_from_str(stamp, "%Y%m%d").map_err(|_| OrderNumberError::BadDate)?;
        if counter.len() != COUNTER_WIDTH || counter.parse::<u32>().is_err() {
            return Err(OrderNumberError::BadCounter);
        }
        Ok(Self(s.to_owned()))
    }

    /// The date stamp, if well formed.
    #[must_use]
    pub fn date(&self) -> Option<NaiveDate> {
        let stamp = self.0.strip_prefix(PREFIX)?.split_once('-')?.0;
        NaiveDate::parse_from_str(stamp, "%Y%m%d").ok()
    }

    /// The per-day counter, if well formed.
    #[must_use]
    pub fn counter(&self) -> Option<u32> {
        self.0.split_once('-')?.1.parse().ok()
    }

    /// The order number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// SQL `LIKE` pattern matching every order number of `date`.
    #[must_use]
    pub fn day_pattern(date: NaiveDate) -> String {
        format!("{PREFIX}{}-%", date.format("%Y%m%d"))
    }
}

impl fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for OrderNumber {
    type Err = OrderNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// SQLx support (with postgres feature): stored as TEXT
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for OrderNumber {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for OrderNumber {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Database values are assumed valid
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for OrderNumber {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_first_of_day_starts_at_0001() {
        let n = OrderNumber::next_for_day(day(2026, 8, 28), None);
        assert_eq!(n.as_str(), "OM20260828-0001");
    }

    #[test]
    fn test_next_increments_prior_max() {
        let prior = OrderNumber::parse("OM20260828-0042").unwrap();
        let n = OrderNumber::next_for_day(day(2026, 8, 28), Some(&prior));
        assert_eq!(n.as_str(), "OM20260828-0043");
        assert_eq!(n.counter(), Some(43));
    }

    #[test]
    fn test_counter_is_zero_padded() {
        for (max, expected) in [
            (None, "OM20260101-0001"),
            (Some("OM20260101-0009"), "OM20260101-0010"),
            (Some("OM20260101-0099"), "OM20260101-0100"),
            (Some("OM20260101-0999"), "OM20260101-1000"),
        ] {
            let prior = max.map(|s| OrderNumber::parse(s).unwrap());
            let n = OrderNumber::next_for_day(day(2026, 1, 1), prior.as_ref());
            assert_eq!(n.as_str(), expected);
        }
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(
            OrderNumber::parse("XX20260828-0001"),
            Err(OrderNumberError::BadPrefix)
        );
        assert_eq!(
            OrderNumber::parse("OM2026x828-0001"),
            Err(OrderNumberError::BadDate)
        );
        assert_eq!(
            OrderNumber::parse("OM20260828-01"),
            Err(OrderNumberError::BadCounter)
        );
        assert_eq!(
            OrderNumber::parse("OM20260828"),
            Err(OrderNumberError::BadCounter)
        );
    }

    #[test]
    fn test_date_accessor() {
        let n = OrderNumber::parse("OM20261231-0007").unwrap();
        assert_eq!(n.date(), Some(day(2026, 12, 31)));
    }

    #[test]
    fn test_day_pattern() {
        assert_eq!(
            OrderNumber::day_pattern(day(2026, 8, 28)),
            "OM20260828-%"
        );
    }
}
