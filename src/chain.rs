//! Raw option chain data and the market-data source seam.
//!
//! An option chain arrives as one [`OptionChainEntry`] per expiry, each
//! holding the call and put [`MarketQuote`]s quoted for that date. Quotes are
//! taken as delivered: nothing here filters or repairs them. Cleaning happens
//! in [`SurfaceBuilder`](crate::surface::SurfaceBuilder).
//!
//! Concrete providers implement [`ChainSource`]; [`fetch_option_chain`]
//! collects the nearest expiries from one and keeps going when a single
//! expiry cannot be fetched.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::conventions;
use crate::error::{self, IvSurfError};
use crate::types::OptionType;
use crate::validate::all_finite;

/// One quoted option row: strike with the current bid and ask.
///
/// The option kind is implied by which side of the [`OptionChainEntry`]
/// holds the quote.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketQuote {
    pub strike: f64,
    pub bid: f64,
    pub ask: f64,
}

impl MarketQuote {
    /// A quote at `strike` with the given bid and ask.
    pub fn new(strike: f64, bid: f64, ask: f64) -> Self {
        Self { strike, bid, ask }
    }

    /// Mid price `(bid + ask) / 2`.
    pub fn mid(&self) -> f64 {
        (self.bid + self.ask) / 2.0
    }

    /// True when strike, bid and ask are all finite numbers.
    pub fn is_well_formed(&self) -> bool {
        all_finite(&[self.strike, self.bid, self.ask])
    }

    /// True when both sides of the market are strictly positive.
    pub fn has_two_sided_market(&self) -> bool {
        self.bid > 0.0 && self.ask > 0.0
    }
}

/// All quotes sharing one expiry date.
///
/// # Examples
/// ```
/// use ivsurf::chain::{MarketQuote, OptionChainEntry};
/// use ivsurf::OptionType;
///
/// let entry = OptionChainEntry::new("2026-01-16")
///     .with_calls(vec![MarketQuote::new(100.0, 5.0, 5.4)])
///     .with_puts(vec![MarketQuote::new(100.0, 4.1, 4.5)]);
///
/// assert_eq!(entry.quotes(OptionType::Call).len(), 1);
/// assert_eq!(entry.expiry_date()?.to_string(), "2026-01-16");
/// # Ok::<(), ivsurf::IvSurfError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OptionChainEntry {
    /// Expiry label as supplied by the source, `YYYY-MM-DD`.
    pub expiry: String,
    #[serde(default)]
    pub calls: Vec<MarketQuote>,
    #[serde(default)]
    pub puts: Vec<MarketQuote>,
}

impl OptionChainEntry {
    /// An entry with no quotes yet.
    pub fn new(expiry: impl Into<String>) -> Self {
        Self {
            expiry: expiry.into(),
            calls: Vec::new(),
            puts: Vec::new(),
        }
    }

    /// Set the call side of the chain.
    pub fn with_calls(mut self, calls: Vec<MarketQuote>) -> Self {
        self.calls = calls;
        self
    }

    /// Set the put side of the chain.
    pub fn with_puts(mut self, puts: Vec<MarketQuote>) -> Self {
        self.puts = puts;
        self
    }

    /// Quotes on the given side of the chain.
    pub fn quotes(&self, option_type: OptionType) -> &[MarketQuote] {
        match option_type {
            OptionType::Call => &self.calls,
            OptionType::Put => &self.puts,
        }
    }

    /// The expiry label parsed as a calendar date.
    ///
    /// # Errors
    /// Returns [`IvSurfError::InvalidInput`] if the label is not a valid
    /// `YYYY-MM-DD` date.
    pub fn expiry_date(&self) -> error::Result<NaiveDate> {
        conventions::parse_expiry(&self.expiry)
    }
}

/// A provider of option chains and spot prices for a symbol.
///
/// Implementations talk to a market-data vendor. All methods may fail with
/// [`IvSurfError::DataUnavailable`].
pub trait ChainSource {
    /// Listed expiry labels for `symbol`, nearest first.
    fn expiries(&self, symbol: &str) -> error::Result<Vec<String>>;

    /// The call and put quotes for one expiry.
    fn chain(&self, symbol: &str, expiry: &str) -> error::Result<OptionChainEntry>;

    /// Latest price of the underlying.
    fn spot_price(&self, symbol: &str) -> error::Result<f64>;
}

/// Fetch the chain for the first `max_expiries` expiries of `symbol`.
///
/// An expiry whose chain cannot be fetched is logged and left out; the
/// remaining expiries are still returned in listing order.
///
/// # Errors
/// Returns the source's error if the expiry listing itself fails.
pub fn fetch_option_chain<S>(
    source: &S,
    symbol: &str,
    max_expiries: usize,
) -> error::Result<Vec<OptionChainEntry>>
where
    S: ChainSource + ?Sized,
{
    let expiries = source.expiries(symbol)?;
    let mut entries = Vec::with_capacity(expiries.len().min(max_expiries));

    for expiry in expiries.iter().take(max_expiries) {
        match source.chain(symbol, expiry) {
            Ok(entry) => entries.push(entry),
            Err(_err) => {
                #[cfg(feature = "logging")]
                tracing::warn!(symbol, expiry = %expiry, error = %_err, "failed to fetch option chain");
            }
        }
    }

    #[cfg(feature = "logging")]
    tracing::debug!(symbol, n_entries = entries.len(), "option chain fetched");

    Ok(entries)
}

/// Latest spot price of `symbol`.
///
/// # Errors
/// Returns the source's error, or [`IvSurfError::DataUnavailable`] if the
/// source answers with a non-positive or non-finite price.
pub fn fetch_current_price<S>(source: &S, symbol: &str) -> error::Result<f64>
where
    S: ChainSource + ?Sized,
{
    let spot = source.spot_price(symbol)?;
    if !spot.is_finite() || spot <= 0.0 {
        return Err(IvSurfError::DataUnavailable {
            message: format!("could not fetch a usable price for {symbol}, got {spot}"),
        });
    }
    Ok(spot)
}
