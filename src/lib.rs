//! # ivsurf
//!
//! Implied volatility surfaces from raw exchange option chains.
//!
//! Provides the pipeline: option chain quotes → cleaning → mid prices →
//! Black-Scholes implied vol per quote → (strike, expiry, IV %) point cloud
//! ready for a triangulating renderer.
//!
//! ## Architecture
//!
//! - **`implied`** — Black-Scholes pricer and Brent implied vol solver
//! - **`chain`** — Quote and per-expiry chain types, the [`ChainSource`] seam
//! - **`surface`** — Chain cleaning and surface assembly
//! - **`pipeline`** — Fetch-and-build from a [`ChainSource`]
//!
//! ## Design
//!
//! - **Newtypes for outputs, bare `f64` for inputs.** [`Vol`], [`Strike`],
//!   [`Tenor`] wrap surface values; the pricer and solver take raw `f64`.
//! - **Skips are not errors.** A quote with no implied vol yields
//!   [`NotSolvable`](implied::NotSolvable) and is dropped; bad rows and bad
//!   expiries are dropped at the smallest granularity; an empty surface is a
//!   normal result. Only configuration mistakes return [`IvSurfError`].
//! - **No panics.** Library code never calls `unwrap()` or `expect()`.
//! - **Stateless.** Each build is a pure function of the chain, spot, rate
//!   and snapshot date. With the `parallel` feature, entries are solved on
//!   the rayon pool and reassembled in chain order.

pub mod chain;
pub mod conventions;
pub mod error;
pub mod implied;
pub mod pipeline;
pub mod surface;
pub mod types;
mod validate;

#[doc(inline)]
pub use chain::{ChainSource, MarketQuote, OptionChainEntry};
#[doc(inline)]
pub use error::{IvSurfError, Result};
#[doc(inline)]
pub use surface::{Surface, SurfaceBuilder, SurfaceConfig, SurfacePoint};
#[doc(inline)]
pub use types::{OptionType, Strike, Tenor, Vol};
