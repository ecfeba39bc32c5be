//! Money in minor currency units.
//!
//! Amounts are stored and summed as integer cents. Conversion from the
//! dollar amount a user types goes through [`rust_decimal::Decimal`] so
//! that `34.5` becomes exactly `3450` rather than whatever `34.5 * 100.0`
//! happens to round to in binary floating point.

use core::fmt;

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use serde::{Deserialize, Serialize};

/// An amount of USD in cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Cents(i64);

impl Cents {
    /// Zero cents.
    pub const ZERO: Self = Self(0);

    /// Wrap a raw cent count.
    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Convert a dollar amount to cents, rounding half away from zero.
    ///
    /// Returns `None` when the result does not fit in an `i64`.
    ///
    /// ```
    /// use acme_core::Cents;
    /// use rust_decimal::Decimal;
    ///
    /// let amount: Decimal = "34.5".parse().unwrap();
    /// assert_eq!(Cents::from_dollars(amount), Some(Cents::new(3450)));
    /// ```
    #[must_use]
    pub fn from_dollars(dollars: Decimal) -> Option<Self> {
        dollars
            .checked_mul(Decimal::ONE_HUNDRED)?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
            .map(Self)
    }

    /// The amount in dollars, exact.
    #[must_use]
    pub fn to_dollars(self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    /// The raw cent count.
    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self.0
    }

    /// Whether the amount is strictly positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for Cents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::format::format_currency(*self))
    }
}

impl From<i64> for Cents {
    fn from(cents: i64) -> Self {
        Self(cents)
    }
}

// SQLx support (with postgres feature), stored as BIGINT
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Cents {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <i64 as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <i64 as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Cents {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        Ok(Self(<i64 as sqlx::Decode<sqlx::Postgres>>::decode(value)?))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Cents {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <i64 as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dollars(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_from_dollars_is_exact_for_decimal_input() {
        assert_eq!(Cents::from_dollars(dollars("34.5")), Some(Cents::new(3450)));
        assert_eq!(Cents::from_dollars(dollars("0.1")), Some(Cents::new(10)));
        assert_eq!(Cents::from_dollars(dollars("19.99")), Some(Cents::new(1999)));
        assert_eq!(Cents::from_dollars(dollars("1000")), Some(Cents::new(100_000)));
    }

    #[test]
    fn test_from_dollars_rounds_sub_cent_amounts() {
        assert_eq!(Cents::from_dollars(dollars("0.005")), Some(Cents::new(1)));
        assert_eq!(Cents::from_dollars(dollars("0.004")), Some(Cents::new(0)));
        assert_eq!(Cents::from_dollars(dollars("2.675")), Some(Cents::new(268)));
    }

    #[test]
    fn test_from_dollars_overflow() {
        assert_eq!(Cents::from_dollars(Decimal::MAX), None);
    }

    #[test]
    fn test_to_dollars() {
        assert_eq!(Cents::new(3450).to_dollars(), dollars("34.50"));
        assert_eq!(Cents::new(3450).to_dollars().normalize().to_string(), "34.5");
    }
}
