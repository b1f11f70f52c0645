//! Core domain types for implied volatility surfaces.
//!
//! These newtypes wrap `f64` to provide compile-time type safety, preventing
//! accidental parameter swapping (e.g., storing a tenor where a strike is
//! expected in a [`SurfacePoint`](crate::surface::SurfacePoint)).
//!
//! # Newtype Strategy
//!
//! **Outputs use newtypes**: [`Vol`], [`Strike`], [`Tenor`] wrap values the
//! crate hands back to callers.
//!
//! **Inputs use bare `f64`**: the pricer and solver accept raw floats for
//! ergonomics, since the parameter names already document intent.
//!
//! # Why no `Eq` or `Ord`?
//! These types wrap `f64`, which does not implement `Eq` or `Ord` because `NaN`
//! breaks total ordering. We derive `PartialEq` and `PartialOrd` only.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::IvSurfError;

/// Strike price `K` of an option contract.
///
/// # Examples
/// ```
/// use ivsurf::types::Strike;
/// let strike = Strike(100.0);
/// assert_eq!(strike.0, 100.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Strike(pub f64);

/// Time to expiry `T` in years, ACT/365.
///
/// # Examples
/// ```
/// use ivsurf::types::Tenor;
/// let three_months = Tenor(0.25);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Tenor(pub f64);

/// Implied volatility `σ`, annualized, as a decimal.
///
/// A vol of 0.20 represents 20% annualized volatility.
///
/// # Examples
/// ```
/// use ivsurf::types::Vol;
/// let vol = Vol(0.20);
/// assert_eq!(vol.percent(), 20.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Vol(pub f64);

impl Vol {
    /// The volatility expressed in percent (σ × 100).
    pub fn percent(self) -> f64 {
        self.0 * 100.0
    }
}

/// Option type: call or put.
///
/// Selects the pricing formula branch and which side of an option chain
/// entry a surface is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    /// Right to buy at strike price.
    #[default]
    Call,
    /// Right to sell at strike price.
    Put,
}

impl OptionType {
    /// Lowercase name, as accepted by [`FromStr`].
    pub fn as_str(self) -> &'static str {
        match self {
            OptionType::Call => "call",
            OptionType::Put => "put",
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses `"call"` or `"put"`, ignoring case and surrounding whitespace.
///
/// Any other name is rejected rather than defaulting to a call.
///
/// ```
/// use ivsurf::OptionType;
///
/// assert_eq!("Put".parse::<OptionType>()?, OptionType::Put);
/// assert!("straddle".parse::<OptionType>().is_err());
/// # Ok::<(), ivsurf::IvSurfError>(())
/// ```
impl FromStr for OptionType {
    type Err = IvSurfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "call" => Ok(OptionType::Call),
            "put" => Ok(OptionType::Put),
            _ => Err(IvSurfError::InvalidInput {
                message: format!("option kind must be 'call' or 'put', got '{s}'"),
            }),
        }
    }
}
