//! Type-safe KRW price representation.
//!
//! The Korean won has no minor unit in practice, so prices are whole won held
//! in a `u64`. Arithmetic saturates: a cart total can never wrap around.

use core::fmt;
use core::iter::Sum;

use serde::{Deserialize, Serialize};

/// A non-negative amount of Korean won.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(u64);

impl Price {
    /// Zero won.
    pub const ZERO: Self = Self(0);

    /// Create a price from a whole-won amount.
    #[must_use]
    pub const fn won(amount: u64) -> Self {
        Self(amount)
    }

    /// The amount in won.
    #[must_use]
    pub const fn amount(self) -> u64 {
        self.0
    }

    /// Whether the amount is zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Multiply by a quantity, saturating at `u64::MAX`.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(u64::from(quantity)))
    }

    /// Add another price, saturating at `u64::MAX`.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Subtract another price, flooring at zero.
    #[must_use]
    pub const fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// Percentage off when this list price is sold at `sale`, rounded to the
    /// nearest whole percent. Zero when `sale` is not lower.
    #[must_use]
    pub fn discount_percent(self, sale: Self) -> u8 {
        if self.0 <= sale.0 {
            return 0;
        }
        let off = u128::from(self.0 - sale.0) * 100;
        let list = u128::from(self.0);
        u8::try_from((off + list / 2) / list).unwrap_or(100)
    }

    /// Format with digit grouping and the won sign (e.g., `₩99,000`).
    #[must_use]
    pub fn display(self) -> String {
        format!("₩{}", group_thousands(self.0))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl From<u64> for Price {
    fn from(amount: u64) -> Self {
        Self(amount)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Self::saturating_add)
    }
}

/// Insert a comma every three digits from the right.
fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
