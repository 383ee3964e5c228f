use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Sub},
    str::FromStr,
};

use crate::EngineError;

/// Money amount represented as **integer cents**.
///
/// Every amount in the engine (transaction amounts, budget limits, spend
/// totals) uses this type so repeated additions never drift. Arithmetic
/// saturates at the `i64` bounds.
///
/// # Examples
///
/// ```rust
/// use engine::MoneyCents;
///
/// let amount = MoneyCents::new(12_34);
/// assert_eq!(amount.cents(), 1234);
/// assert_eq!(amount.to_string(), "$12.34");
/// ```
///
/// Parsing from user input (accepts `.` or `,` as decimal separator; rejects >
/// 2 decimals):
///
/// ```rust
/// use engine::MoneyCents;
///
/// assert_eq!("10".parse::<MoneyCents>().unwrap().cents(), 1000);
/// assert_eq!("10,5".parse::<MoneyCents>().unwrap().cents(), 1050);
/// assert!("12.345".parse::<MoneyCents>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct MoneyCents(i64);

impl MoneyCents {
    pub const ZERO: MoneyCents = MoneyCents(0);

    /// Creates a new amount from integer cents.
    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the raw value in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Returns `true` if the amount is 0.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if the amount is positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// `self` as a percentage of `whole`, or `None` when `whole` is not
    /// positive.
    #[must_use]
    pub fn percent_of(self, whole: MoneyCents) -> Option<f64> {
        if !whole.is_positive() {
            return None;
        }
        Some(self.0 as f64 * 100.0 / whole.0 as f64)
    }

    /// Exact check of `self >= whole * percent / 100`, done on cents.
    #[must_use]
    pub fn reaches_percent_of(self, whole: MoneyCents, percent: i64) -> bool {
        i128::from(self.0) * 100 >= i128::from(whole.0) * i128::from(percent)
    }
}

impl fmt::Display for MoneyCents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let dollars = abs / 100;
        let cents = abs % 100;
        write!(f, "{sign}${dollars}.{cents:02}")
    }
}

impl From<i64> for MoneyCents {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<MoneyCents> for i64 {
    fn from(value: MoneyCents) -> Self {
        value.0
    }
}

impl Add for MoneyCents {
    type Output = MoneyCents;

    fn add(self, rhs: MoneyCents) -> Self::Output {
        MoneyCents(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for MoneyCents {
    fn add_assign(&mut self, rhs: MoneyCents) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Sub for MoneyCents {
    type Output = MoneyCents;

    fn sub(self, rhs: MoneyCents) -> Self::Output {
        MoneyCents(self.0.saturating_sub(rhs.0))
    }
}

impl Sum for MoneyCents {
    fn sum<I: Iterator<Item = MoneyCents>>(iter: I) -> Self {
        iter.fold(MoneyCents::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a MoneyCents> for MoneyCents {
    fn sum<I: Iterator<Item = &'a MoneyCents>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl FromStr for MoneyCents {
    type Err = EngineError;

    /// Parses a decimal string into cents.
    ///
    /// Accepts `.` or `,` as decimal separator, an optional leading `$` and
    /// an optional leading `+`/`-`.
    ///
    /// Validation rules:
    /// - max 2 fractional digits (rejects `12.345`)
    /// - rejects empty/invalid strings
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let empty = || EngineError::InvalidAmount("empty amount".to_string());
        let invalid = || EngineError::InvalidAmount("invalid amount".to_string());
        let overflow = || EngineError::InvalidAmount("amount too large".to_string());

        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(empty());
        }

        let (sign, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
            (-1i64, stripped)
        } else if let Some(stripped) = trimmed.strip_prefix('+') {
            (1i64, stripped)
        } else {
            (1i64, trimmed)
        };

        let rest = rest.trim();
        let rest = rest.strip_prefix('$').unwrap_or(rest);
        if rest.is_empty() {
            return Err(empty());
        }

        let rest = rest.replace(',', ".");
        let mut parts = rest.split('.');
        let dollars_str = parts.next().ok_or_else(invalid)?;
        let cents_str = parts.next();

        if parts.next().is_some() {
            return Err(invalid());
        }

        if dollars_str.is_empty() || !dollars_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let dollars: i64 = dollars_str.parse().map_err(|_| invalid())?;

        let cents: i64 = match cents_str {
            None | Some("") => 0,
            Some(frac) => {
                if !frac.chars().all(|c| c.is_ascii_digit()) {
                    return Err(invalid());
                }
                match frac.len() {
                    1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
                    2 => frac.parse::<i64>().map_err(|_| invalid())?,
                    _ => return Err(EngineError::InvalidAmount("too many decimals".to_string())),
                }
            }
        };

        let total = dollars
            .checked_mul(100)
            .and_then(|v| v.checked_add(cents))
            .ok_or_else(overflow)?;

        let signed = if sign < 0 {
            total.checked_neg().ok_or_else(overflow)?
        } else {
            total
        };

        Ok(MoneyCents(signed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_usd() {
        assert_eq!(MoneyCents::new(0).to_string(), "$0.00");
        assert_eq!(MoneyCents::new(1).to_string(), "$0.01");
        assert_eq!(MoneyCents::new(1050).to_string(), "$10.50");
        assert_eq!(MoneyCents::new(-1050).to_string(), "-$10.50");
    }

    #[test]
    fn parse_accepts_dot_comma_and_dollar_sign() {
        assert_eq!("10".parse::<MoneyCents>().unwrap().cents(), 1000);
        assert_eq!("10.5".parse::<MoneyCents>().unwrap().cents(), 1050);
        assert_eq!("10,50".parse::<MoneyCents>().unwrap().cents(), 1050);
        assert_eq!("$89.99".parse::<MoneyCents>().unwrap().cents(), 8999);
        assert_eq!("-0.01".parse::<MoneyCents>().unwrap().cents(), -1);
        assert_eq!("  2.30 ".parse::<MoneyCents>().unwrap().cents(), 230);
    }

    #[test]
    fn parse_rejects_more_than_two_decimals() {
        assert!("12.345".parse::<MoneyCents>().is_err());
        assert!("$".parse::<MoneyCents>().is_err());
        assert!("1.2.3".parse::<MoneyCents>().is_err());
    }

    #[test]
    fn repeated_cent_additions_do_not_drift() {
        let total: MoneyCents = std::iter::repeat_n(MoneyCents::new(10), 1_000).sum();
        assert_eq!(total, MoneyCents::new(10_000));
    }

    #[test]
    fn percent_helpers_are_exact_at_the_boundary() {
        let limit = MoneyCents::new(100_00);
        assert!(MoneyCents::new(90_00).reaches_percent_of(limit, 90));
        assert!(!MoneyCents::new(89_99).reaches_percent_of(limit, 90));
        assert_eq!(MoneyCents::new(90_00).percent_of(limit), Some(90.0));
        assert_eq!(MoneyCents::new(10).percent_of(MoneyCents::ZERO), None);
    }

    #[test]
    fn sums_saturate_instead_of_overflowing() {
        let half = MoneyCents::new(i64::MAX / 2 + 1);
        let total: MoneyCents = [half, half, half].into_iter().sum();
        assert_eq!(total, MoneyCents::new(i64::MAX));
        let mut running = half;
        running += half;
        assert_eq!(running.cents(), i64::MAX);
        assert_eq!(MoneyCents::new(i64::MIN) - MoneyCents::new(1), MoneyCents::new(i64::MIN));
    }
}
