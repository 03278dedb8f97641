//! Fixed-point amount arithmetic.
//!
//! Amounts are raw base units of whatever asset a stream carries, stored as
//! `u128` to rule out floating-point error. Every operation the ledger
//! performs on amounts is checked: overflow never wraps, it surfaces as an
//! error at the call site.
//!
//! JSON serialization uses decimal strings, since raw token amounts routinely
//! exceed the integer range JSON consumers handle safely.

use std::fmt;
use std::ops::{Add, Sub};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A quantity of an asset in raw base units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(u128);

impl Amount {
    pub const ZERO: Self = Self(0);

    #[must_use]
    pub fn new(raw: u128) -> Self {
        Self(raw)
    }

    #[must_use]
    pub fn raw(&self) -> u128 {
        self.0
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    #[must_use]
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    #[must_use]
    pub fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    #[must_use]
    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// Amount accrued after `secs` seconds at `self` per second.
    #[must_use]
    pub fn checked_mul_secs(self, secs: u64) -> Option<Self> {
        self.0.checked_mul(u128::from(secs)).map(Self)
    }

    /// How many whole seconds of streaming `self` buys at `rate` per second.
    ///
    /// Floor division: the sub-second remainder is dust that never extends a
    /// stream. Returns `None` for a zero rate or a duration beyond what a
    /// `u64` second counter can carry.
    #[must_use]
    pub fn whole_seconds_at(self, rate: Self) -> Option<u64> {
        if rate.is_zero() {
            return None;
        }
        u64::try_from(self.0 / rate.0).ok()
    }
}

impl Add for Amount {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Amount {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse::<u128>()
            .map(Self)
            .map_err(|_| serde::de::Error::custom(format!("invalid amount: {s}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_zero() {
        assert!(Amount::ZERO.is_zero());
        assert!(!Amount::new(1).is_zero());
    }

    #[test]
    fn checked_add_detects_overflow() {
        let max = Amount::new(u128::MAX);
        assert_eq!(max.checked_add(Amount::new(1)), None);
        assert_eq!(
            Amount::new(2).checked_add(Amount::new(3)),
            Some(Amount::new(5))
        );
    }

    #[test]
    fn checked_sub_detects_underflow() {
        assert_eq!(Amount::new(1).checked_sub(Amount::new(2)), None);
        assert_eq!(
            Amount::new(5).checked_sub(Amount::new(3)),
            Some(Amount::new(2))
        );
    }

    #[test]
    fn saturating_add_caps_at_max() {
        let max = Amount::new(u128::MAX);
        assert_eq!(max.saturating_add(Amount::new(5)), max);
        assert_eq!(
            Amount::new(2).saturating_add(Amount::new(3)),
            Amount::new(5)
        );
    }

    #[test]
    fn saturating_sub_floors_at_zero() {
        assert_eq!(Amount::new(1).saturating_sub(Amount::new(9)), Amount::ZERO);
        assert_eq!(
            Amount::new(9).saturating_sub(Amount::new(1)),
            Amount::new(8)
        );
    }

    #[test]
    fn mul_secs_accrues_linearly() {
        let rate = Amount::new(10);
        assert_eq!(rate.checked_mul_secs(0), Some(Amount::ZERO));
        assert_eq!(rate.checked_mul_secs(7), Some(Amount::new(70)));
        assert_eq!(Amount::new(u128::MAX).checked_mul_secs(2), None);
    }

    #[test]
    fn whole_seconds_floors() {
        let rate = Amount::new(3);
        assert_eq!(Amount::new(100).whole_seconds_at(rate), Some(33));
        assert_eq!(Amount::new(2).whole_seconds_at(rate), Some(0));
        assert_eq!(Amount::new(9).whole_seconds_at(rate), Some(3));
    }

    #[test]
    fn whole_seconds_rejects_zero_rate() {
        assert_eq!(Amount::new(100).whole_seconds_at(Amount::ZERO), None);
    }

    #[test]
    fn whole_seconds_rejects_u64_overflow() {
        let huge = Amount::new(u128::from(u64::MAX) + 1);
        assert_eq!(huge.whole_seconds_at(Amount::new(1)), None);
    }

    #[test]
    fn serializes_as_decimal_string() {
        // Larger than u64::MAX: must survive a JSON roundtrip intact.
        let amt = Amount::new(340_282_366_920_938_463_463_374_607_431_768_211_455);
        let json = serde_json::to_string(&amt).unwrap();
        assert_eq!(json, "\"340282366920938463463374607431768211455\"");
        let back: Amount = serde_json::from_str(&json).unwrap();
        assert_eq!(amt, back);
    }

    #[test]
    fn deserialize_rejects_garbage() {
        assert!(serde_json::from_str::<Amount>("\"12x\"").is_err());
        assert!(serde_json::from_str::<Amount>("\"-5\"").is_err());
    }
}
