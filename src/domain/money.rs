use crate::error::InvestError;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::str::FromStr;

/// Decimal places used when reporting monetary values.
pub const MONEY_DP: u32 = 2;
/// Decimal places used for fractional share counts.
pub const SHARE_DP: u32 = 4;

/// Rounds half away from zero to `dp` places.
///
/// `Decimal::round_dp` uses banker's rounding, which would turn `0.125` into
/// `0.12`; reported cents must round half up.
pub fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds half up to cents and pads the scale, so `10` reports as `10.00`.
pub fn round_money(value: Decimal) -> Decimal {
    let mut rounded = round_half_up(value, MONEY_DP);
    rounded.rescale(MONEY_DP);
    rounded
}

pub fn round_shares(value: Decimal) -> Decimal {
    round_half_up(value, SHARE_DP)
}

/// Percentage `part / whole * 100` rounded to `dp` places, zero when `whole` is zero.
pub fn percent_of(part: Decimal, whole: Decimal, dp: u32) -> Result<Decimal, InvestError> {
    if whole.is_zero() {
        return Ok(Decimal::ZERO);
    }
    let ratio = part
        .checked_div(whole)
        .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
        .ok_or_else(|| out_of_range(format!("{part} / {whole} as a percentage")))?;
    Ok(round_half_up(ratio, dp))
}

pub(crate) fn out_of_range(what: impl fmt::Display) -> InvestError {
    InvestError::invalid(format!("{what} is outside the supported decimal range"))
}

pub(crate) fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

/// Converts a float result back into a decimal.
///
/// NaN, infinities and magnitudes beyond `Decimal::MAX` are rejected.
pub(crate) fn from_f64(value: f64) -> Result<Decimal, InvestError> {
    if value.is_finite() {
        Decimal::from_f64(value).ok_or_else(|| out_of_range(value))
    } else {
        Err(out_of_range(value))
    }
}

/// A running monetary total (saved, invested, upcoming).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Balance(pub Decimal);

impl Balance {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl Add for Balance {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Balance {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl AddAssign for Balance {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Balance {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

/// A strictly positive monetary amount (purchase amounts, prices).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self, InvestError> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(InvestError::invalid(format!(
                "amount must be positive, got {value}"
            )))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = InvestError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = <Decimal as Deserialize>::deserialize(deserializer)?;
        Amount::new(value).map_err(serde::de::Error::custom)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl From<Amount> for Balance {
    fn from(amount: Amount) -> Self {
        Self(amount.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Usd,
    Cad,
    Inr,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Cad => "CAD",
            Currency::Inr => "INR",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = InvestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USD" => Ok(Currency::Usd),
            "CAD" => Ok(Currency::Cad),
            "INR" => Ok(Currency::Inr),
            other => Err(InvestError::invalid(format!(
                "unsupported currency '{other}'"
            ))),
        }
    }
}
