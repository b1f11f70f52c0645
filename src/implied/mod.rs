//! Black-Scholes pricing and implied volatility extraction.
//!
//! - [`black_scholes_price`] — Closed-form European option value
//! - [`ImpliedVolSolver`] — Brent root search inverting the pricer, with
//!   [`NotSolvable`] for prices that have no implied vol

pub mod black;
pub mod solver;

pub use black::{black_scholes_price, normal_cdf};
pub use solver::{
    implied_volatility, ImpliedVolSolver, NotSolvable, SolverConfig, VOL_LOWER_BOUND,
    VOL_UPPER_BOUND,
};
