use std::cmp::Ordering;
use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};

/// Largest scale a `Decimal` can carry
const MAX_SCALE: i64 = 28;

/// A non-negative probability held as `mantissa * 10^exponent`.
///
/// The mantissa stays in `[1, 10)` (or is zero), so products of many small
/// CPT entries keep their significant digits instead of running past the 28
/// decimal places a bare `Decimal` can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Probability {
    mantissa: Decimal,
    exponent: i32,
}

impl Probability {
    pub const ZERO: Self = Self {
        mantissa: Decimal::ZERO,
        exponent: 0,
    };

    pub const ONE: Self = Self {
        mantissa: Decimal::ONE,
        exponent: 0,
    };

    pub fn from_decimal(value: Decimal) -> Self {
        Self {
            mantissa: value,
            exponent: 0,
        }
        .normalized()
    }

    pub fn is_zero(&self) -> bool {
        self.mantissa.is_zero()
    }

    pub fn mantissa(&self) -> Decimal {
        self.mantissa
    }

    pub fn exponent(&self) -> i32 {
        self.exponent
    }

    pub fn checked_mul(self, other: Self) -> Option<Self> {
        if self.is_zero() || other.is_zero() {
            return Some(Self::ZERO);
        }
        Some(
            Self {
                mantissa: self.mantissa.checked_mul(other.mantissa)?,
                exponent: self.exponent.checked_add(other.exponent)?,
            }
            .normalized(),
        )
    }

    pub fn checked_div(self, other: Self) -> Option<Self> {
        if other.is_zero() {
            return None;
        }
        if self.is_zero() {
            return Some(Self::ZERO);
        }
        Some(
            Self {
                mantissa: self.mantissa.checked_div(other.mantissa)?,
                exponent: self.exponent.checked_sub(other.exponent)?,
            }
            .normalized(),
        )
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        if other.is_zero() {
            return Some(self);
        }
        if self.is_zero() {
            return Some(other);
        }
        let (large, small) = if self.exponent >= other.exponent {
            (self, other)
        } else {
            (other, self)
        };
        let shift = i64::from(large.exponent) - i64::from(small.exponent);
        if shift > MAX_SCALE {
            // below the precision of the larger term
            return Some(large);
        }
        let shifted = small.mantissa.checked_mul(Decimal::new(1, shift as u32))?;
        Some(
            Self {
                mantissa: large.mantissa.checked_add(shifted)?,
                exponent: large.exponent,
            }
            .normalized(),
        )
    }

    /// Rounds to `digits` significant digits, half away from zero
    pub fn round_significant(self, digits: u32) -> Self {
        if self.is_zero() || digits == 0 {
            return self;
        }
        Self {
            mantissa: self
                .mantissa
                .round_dp_with_strategy(digits - 1, RoundingStrategy::MidpointAwayFromZero),
            exponent: self.exponent,
        }
        .normalized()
    }

    /// The value as a `Decimal`, or `None` when it is smaller than the
    /// 28 decimal places a `Decimal` holds. Digits past that scale are rounded.
    pub fn to_decimal(self) -> Option<Decimal> {
        if self.is_zero() {
            return Some(Decimal::ZERO);
        }
        let exponent = i64::from(self.exponent);
        let mut mantissa = self.mantissa;
        if i64::from(mantissa.scale()) - exponent > MAX_SCALE {
            let keep = MAX_SCALE + exponent;
            if keep < 0 {
                return None;
            }
            mantissa = mantissa
                .round_dp_with_strategy(keep as u32, RoundingStrategy::MidpointAwayFromZero)
                .normalize();
        }
        let scale = i64::from(mantissa.scale()) - exponent;
        if scale >= 0 {
            Decimal::try_from_i128_with_scale(mantissa.mantissa(), scale as u32).ok()
        } else {
            let factor = 10i128.checked_pow(u32::try_from(-scale).ok()?)?;
            Decimal::try_from_i128_with_scale(mantissa.mantissa().checked_mul(factor)?, 0).ok()
        }
    }

    /// Nearest `f64`, read back from the decimal digits so short values
    /// such as `0.42976` compare equal to the literal
    pub fn to_f64(self) -> Option<f64> {
        if self.is_zero() {
            return Some(0.0);
        }
        format!("{}e{}", self.mantissa, self.exponent).parse().ok()
    }

    fn normalized(mut self) -> Self {
        if self.mantissa.is_zero() {
            return Self::ZERO;
        }
        while self.mantissa.abs() >= Decimal::TEN {
            self.mantissa /= Decimal::TEN;
            self.exponent += 1;
        }
        while self.mantissa.abs() < Decimal::ONE {
            self.mantissa *= Decimal::TEN;
            self.exponent -= 1;
        }
        self.mantissa = self.mantissa.normalize();
        self
    }
}

impl PartialOrd for Probability {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Probability {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.is_zero(), other.is_zero()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => self
                .exponent
                .cmp(&other.exponent)
                .then(self.mantissa.cmp(&other.mantissa)),
        }
    }
}

impl fmt::Display for Probability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_decimal() {
            Some(value) => write!(f, "{}", value),
            None => write!(f, "{}e{}", self.mantissa, self.exponent),
        }
    }
}
