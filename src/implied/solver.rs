//! Black-Scholes implied volatility via bracketed root search.
//!
//! Inverts [`black_scholes_price`] with Brent's method over
//! σ ∈ \[1e-6, 5.0\]. Brent combines bisection, secant and inverse quadratic
//! interpolation while always keeping a sign change inside the bracket, so
//! the search is bounded by the iteration cap and never diverges.
//!
//! A price with no implied volatility inside the bracket (below intrinsic
//! value, above the 500% vol price, or a degenerate input) is an expected
//! outcome on live chains. It is reported as [`NotSolvable`], not as an
//! [`IvSurfError`](crate::IvSurfError).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::implied::black::black_scholes_price;
use crate::types::{OptionType, Vol};

/// Lower end of the volatility search bracket.
pub const VOL_LOWER_BOUND: f64 = 1e-6;
/// Upper end of the volatility search bracket (500%).
pub const VOL_UPPER_BOUND: f64 = 5.0;
/// Smallest volatility step the root search takes.
const VOL_RESOLUTION: f64 = 1e-12;

/// Reasons an option price has no implied volatility.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum NotSolvable {
    /// Non-positive (or non-finite) price, spot, strike or expiry.
    /// The pricer is not consulted.
    #[error("degenerate input: price, spot, strike and expiry must be positive and finite")]
    DegenerateInput,

    /// The price residual has the same sign at both ends of the bracket.
    #[error("market price {market_price} is not attainable for vol in [{lower}, {upper}]")]
    NoSignChange {
        market_price: f64,
        lower: f64,
        upper: f64,
    },

    /// The iteration budget ran out before the bracket converged.
    #[error("no convergence after {iterations} iterations (bracket width {bracket_width:e})")]
    MaxIterations {
        iterations: usize,
        bracket_width: f64,
    },
}

/// Root search settings.
///
/// ```
/// use ivsurf::implied::SolverConfig;
///
/// let config = SolverConfig::default();
/// assert_eq!(config.tolerance, 1e-5);
/// assert_eq!(config.max_iterations, 100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Convergence threshold on both the volatility bracket and the price
    /// residual `|price(σ) − market|`.
    pub tolerance: f64,
    /// Maximum number of Brent iterations.
    pub max_iterations: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-5,
            max_iterations: 100,
        }
    }
}

/// Black-Scholes implied volatility calculator.
///
/// # Examples
/// ```
/// use ivsurf::implied::{black_scholes_price, ImpliedVolSolver};
/// use ivsurf::OptionType;
///
/// let price = black_scholes_price(100.0, 110.0, 0.5, 0.01, 0.3, OptionType::Call);
/// let vol = ImpliedVolSolver::default()
///     .solve(price, 100.0, 110.0, 0.5, 0.01, OptionType::Call)
///     .unwrap();
/// assert!((vol.0 - 0.3).abs() < 1e-4);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ImpliedVolSolver {
    config: SolverConfig,
}

impl ImpliedVolSolver {
    /// Create a solver with the given tolerance and iteration cap.
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// The solver's settings.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Implied volatility of an observed option price.
    ///
    /// # Arguments
    /// * `market_price` — Observed option premium (must be > 0)
    /// * `spot` — Underlying price (must be > 0)
    /// * `strike` — Strike price (must be > 0)
    /// * `expiry` — Time to expiry in years (must be > 0)
    /// * `rate` — Risk-free rate
    /// * `option_type` — Call or Put
    ///
    /// # Errors
    /// Returns [`NotSolvable`] when the inputs are degenerate or no volatility
    /// in \[1e-6, 5.0\] reproduces the price within tolerance.
    pub fn solve(
        &self,
        market_price: f64,
        spot: f64,
        strike: f64,
        expiry: f64,
        rate: f64,
        option_type: OptionType,
    ) -> Result<Vol, NotSolvable> {
        if !rate.is_finite() {
            return Err(NotSolvable::DegenerateInput);
        }
        self.solve_with(market_price, &[spot, strike, expiry], |vol| {
            black_scholes_price(spot, strike, expiry, rate, vol, option_type)
        })
    }

    /// Guard the inputs, then invert `price_at` on the volatility bracket.
    fn solve_with<F>(&self, market_price: f64, positives: &[f64], price_at: F) -> Result<Vol, NotSolvable>
    where
        F: Fn(f64) -> f64,
    {
        let degenerate = |x: f64| !x.is_finite() || x <= 0.0;
        if degenerate(market_price) || positives.iter().any(|&x| degenerate(x)) {
            return Err(NotSolvable::DegenerateInput);
        }

        let objective = |vol: f64| price_at(vol) - market_price;
        brent(objective, VOL_LOWER_BOUND, VOL_UPPER_BOUND, &self.config)
            .map(Vol)
            .map_err(|failure| match failure {
                BrentFailure::NoSignChange => NotSolvable::NoSignChange {
                    market_price,
                    lower: VOL_LOWER_BOUND,
                    upper: VOL_UPPER_BOUND,
                },
                BrentFailure::MaxIterations { bracket_width } => NotSolvable::MaxIterations {
                    iterations: self.config.max_iterations,
                    bracket_width,
                },
            })
    }
}

/// Implied volatility with an explicit tolerance and iteration cap.
///
/// Shorthand for [`ImpliedVolSolver::solve`].
#[allow(clippy::too_many_arguments)]
pub fn implied_volatility(
    market_price: f64,
    spot: f64,
    strike: f64,
    expiry: f64,
    rate: f64,
    option_type: OptionType,
    tolerance: f64,
    max_iterations: usize,
) -> Result<Vol, NotSolvable> {
    ImpliedVolSolver::new(SolverConfig {
        tolerance,
        max_iterations,
    })
    .solve(market_price, spot, strike, expiry, rate, option_type)
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum BrentFailure {
    NoSignChange,
    MaxIterations { bracket_width: f64 },
}

/// Brent's method on `[lower, upper]`.
///
/// Converged when the bracket half-width is within `2ε|b| + tol/2` and the
/// residual is within `tol`, when the bracket has collapsed to
/// [`VOL_RESOLUTION`], or on an exact root. If the budget runs out the
/// estimate is accepted only from a bracket within `2ε|b| + tol/2`.
fn brent<F>(f: F, lower: f64, upper: f64, config: &SolverConfig) -> Result<f64, BrentFailure>
where
    F: Fn(f64) -> f64,
{
    let tol = config.tolerance;
    let mut a = lower;
    let mut b = upper;
    let mut fa = f(a);
    let mut fb = f(b);

    if fa == 0.0 {
        return Ok(a);
    }
    if fb == 0.0 {
        return Ok(b);
    }
    if fa.is_nan() || fb.is_nan() || fa.signum() == fb.signum() {
        return Err(BrentFailure::NoSignChange);
    }

    // b: current estimate, c: contrapoint with f(c) of opposite sign.
    let mut c = a;
    let mut fc = fa;
    let mut d = b - a;
    let mut e = d;
    let mut half_width = 0.5 * (c - b).abs();
    let mut x_tol = 0.5 * tol;

    for _ in 0..config.max_iterations {
        if fb.signum() == fc.signum() {
            c = a;
            fc = fa;
            d = b - a;
            e = d;
        }
        if fc.abs() < fb.abs() {
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }

        let step_tol = 2.0 * f64::EPSILON * b.abs() + 0.5 * VOL_RESOLUTION;
        x_tol = 2.0 * f64::EPSILON * b.abs() + 0.5 * tol;
        let m = 0.5 * (c - b);
        half_width = m.abs();

        if fb == 0.0 || half_width <= step_tol || (half_width <= x_tol && fb.abs() <= tol) {
            return Ok(b);
        }

        if e.abs() >= step_tol && fa.abs() > fb.abs() {
            let s = fb / fa;
            let (mut p, mut q) = if a == c {
                // Secant
                (2.0 * m * s, 1.0 - s)
            } else {
                // Inverse quadratic interpolation
                let q = fa / fc;
                let r = fb / fc;
                (
                    s * (2.0 * m * q * (q - r) - (b - a) * (r - 1.0)),
                    (q - 1.0) * (r - 1.0) * (s - 1.0),
                )
            };
            if p > 0.0 {
                q = -q;
            } else {
                p = -p;
            }
            if 2.0 * p < (3.0 * m * q - (step_tol * q).abs()).min((e * q).abs()) {
                e = d;
                d = p / q;
            } else {
                d = m;
                e = m;
            }
        } else {
            d = m;
            e = m;
        }

        a = b;
        fa = fb;
        b += if d.abs() > step_tol {
            d
        } else {
            step_tol.copysign(m)
        };
        fb = f(b);
    }

    if half_width <= x_tol {
        Ok(b)
    } else {
        Err(BrentFailure::MaxIterations {
            bracket_width: 2.0 * half_width,
        })
    }
}
