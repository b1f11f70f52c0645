//! Black-Scholes pricing of European options on a spot underlying.
//!
//! # Formula
//! ```text
//! d1 = (ln(S/K) + (r + σ²/2)·T) / (σ·√T)
//! d2 = d1 − σ·√T
//! C  = S·Φ(d1) − K·e^(−rT)·Φ(d2)
//! P  = K·e^(−rT)·Φ(−d2) − S·Φ(−d1)
//! ```

use std::f64::consts::SQRT_2;

use statrs::function::erf::erfc;

use crate::types::OptionType;

/// Standard normal cumulative distribution function Φ(x).
///
/// Computed as `½·erfc(−x/√2)`, which keeps full relative precision in the
/// lower tail.
///
/// ```
/// use ivsurf::implied::normal_cdf;
///
/// assert!((normal_cdf(0.0) - 0.5).abs() < 1e-15);
/// assert!((normal_cdf(1.96) - 0.975).abs() < 1e-4);
/// ```
pub fn normal_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / SQRT_2)
}

/// Black-Scholes value of a European option.
///
/// Returns exactly `0.0` when any of `spot`, `strike`, `expiry` or `vol` is
/// non-positive. The implied vol solver relies on this to bound its search.
///
/// # Arguments
/// * `spot` — Current underlying price `S`
/// * `strike` — Strike price `K`
/// * `expiry` — Time to expiry `T` in years
/// * `rate` — Continuously compounded risk-free rate `r`
/// * `vol` — Volatility `σ` as a decimal
/// * `option_type` — Call or Put
///
/// # Examples
/// ```
/// use ivsurf::implied::black_scholes_price;
/// use ivsurf::OptionType;
///
/// let call = black_scholes_price(100.0, 100.0, 1.0, 0.05, 0.25, OptionType::Call);
/// assert!((call - 12.336).abs() < 1e-3);
///
/// assert_eq!(black_scholes_price(100.0, 100.0, 0.0, 0.05, 0.25, OptionType::Put), 0.0);
/// ```
pub fn black_scholes_price(
    spot: f64,
    strike: f64,
    expiry: f64,
    rate: f64,
    vol: f64,
    option_type: OptionType,
) -> f64 {
    if expiry <= 0.0 || vol <= 0.0 || spot <= 0.0 || strike <= 0.0 {
        return 0.0;
    }

    let sqrt_t = expiry.sqrt();
    let sigma_sqrt_t = vol * sqrt_t;
    let d1 = ((spot / strike).ln() + (rate + 0.5 * vol * vol) * expiry) / sigma_sqrt_t;
    let d2 = d1 - sigma_sqrt_t;
    let discounted_strike = strike * (-rate * expiry).exp();

    match option_type {
        OptionType::Call => spot * normal_cdf(d1) - discounted_strike * normal_cdf(d2),
        OptionType::Put => discounted_strike * normal_cdf(-d2) - spot * normal_cdf(-d1),
    }
}
