//! Ergonomic builder API for implied volatility surface construction.
//!
//! ```
//! use chrono::NaiveDate;
//! use ivsurf::chain::{MarketQuote, OptionChainEntry};
//! use ivsurf::surface::SurfaceBuilder;
//! use ivsurf::OptionType;
//!
//! let chain = vec![
//!     OptionChainEntry::new("2025-09-19")
//!         .with_calls(vec![MarketQuote::new(100.0, 6.1, 6.5)])
//!         .with_puts(vec![MarketQuote::new(100.0, 5.2, 5.6)]),
//! ];
//!
//! let surface = SurfaceBuilder::new()
//!     .spot(100.0)
//!     .rate(0.03)
//!     .option_type(OptionType::Put)
//!     .as_of(NaiveDate::from_ymd_opt(2025, 3, 21).unwrap())
//!     .build(&chain)
//!     .unwrap();
//!
//! assert_eq!(surface.len(), 1);
//! ```
//!
//! # Cleaning rules
//!
//! For each of the first `max_expiries` chain entries, in order:
//! 1. Entries with no quotes of the requested kind are skipped.
//! 2. Entries whose expiry label does not parse are logged and skipped.
//! 3. Entries expiring today or earlier are skipped whole.
//! 4. Quotes with a non-finite strike, bid or ask are skipped.
//! 5. Quotes without a strictly positive bid and ask are skipped.
//! 6. The mid price is solved for implied vol; unsolvable quotes are skipped.
//!
//! Only configuration problems fail a build. Bad market data never does.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::chain::OptionChainEntry;
use crate::conventions;
use crate::error::IvSurfError;
use crate::implied::{ImpliedVolSolver, SolverConfig};
use crate::surface::{Surface, SurfacePoint};
use crate::types::{OptionType, Strike, Tenor};
use crate::validate::{validate_finite, validate_positive};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Surface construction settings.
///
/// Every field has a documented default, so partial configs deserialize:
///
/// ```
/// use ivsurf::surface::SurfaceConfig;
/// use ivsurf::OptionType;
///
/// let config = SurfaceConfig::default();
/// assert_eq!(config.option_type, OptionType::Call);
/// assert_eq!(config.risk_free_rate, 0.01);
/// assert_eq!(config.max_expiries, 5);
/// assert_eq!(config.solver.tolerance, 1e-5);
/// assert_eq!(config.solver.max_iterations, 100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    /// Side of the chain to build from. Default: call.
    pub option_type: OptionType,
    /// Continuously compounded risk-free rate. Default: 0.01.
    pub risk_free_rate: f64,
    /// Number of nearest expiries fetched from a chain source and
    /// considered by the builder. Default: 5.
    pub max_expiries: usize,
    /// Root search settings. Default: tolerance 1e-5, 100 iterations.
    pub solver: SolverConfig,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            option_type: OptionType::Call,
            risk_free_rate: 0.01,
            max_expiries: 5,
            solver: SolverConfig::default(),
        }
    }
}

/// Builder for implied volatility surfaces from raw option chains.
///
/// Spot is required; everything else defaults per [`SurfaceConfig`]. The
/// snapshot date defaults to today in local time.
#[derive(Debug, Clone)]
pub struct SurfaceBuilder {
    spot: Option<f64>,
    rate: f64,
    option_type: OptionType,
    max_expiries: usize,
    solver: SolverConfig,
    as_of: Option<NaiveDate>,
}

impl SurfaceBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self::from_config(&SurfaceConfig::default())
    }

    /// Create a builder from a [`SurfaceConfig`].
    pub fn from_config(config: &SurfaceConfig) -> Self {
        Self {
            spot: None,
            rate: config.risk_free_rate,
            option_type: config.option_type,
            max_expiries: config.max_expiries,
            solver: config.solver,
            as_of: None,
        }
    }

    /// Set the spot price of the underlying.
    pub fn spot(mut self, spot: f64) -> Self {
        self.spot = Some(spot);
        self
    }

    /// Set the risk-free rate. Default is 0.01.
    pub fn rate(mut self, rate: f64) -> Self {
        self.rate = rate;
        self
    }

    /// Select calls or puts. Default is calls.
    pub fn option_type(mut self, option_type: OptionType) -> Self {
        self.option_type = option_type;
        self
    }

    /// Only consider the first `n` chain entries. Default is 5.
    pub fn max_expiries(mut self, n: usize) -> Self {
        self.max_expiries = n;
        self
    }

    /// Set the root search tolerance and iteration cap.
    pub fn solver(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }

    /// Measure times to expiry from `date` instead of today.
    pub fn as_of(mut self, date: NaiveDate) -> Self {
        self.as_of = Some(date);
        self
    }

    /// Build the surface from the first `max_expiries` of `entries`.
    ///
    /// Bad market data is skipped at the smallest granularity (quote, or the
    /// whole entry for expiry problems). An empty surface is returned, not an
    /// error, when nothing survives.
    ///
    /// # Errors
    /// Returns [`IvSurfError::InvalidInput`] if spot is missing, non-positive
    /// or non-finite, the rate is non-finite, the tolerance is not positive,
    /// or the iteration cap is zero.
    pub fn build(self, entries: &[OptionChainEntry]) -> crate::error::Result<Surface> {
        let spot = self.spot.ok_or_else(|| IvSurfError::InvalidInput {
            message: "spot price is required".into(),
        })?;
        validate_positive(spot, "spot")?;
        validate_finite(self.rate, "rate")?;
        validate_positive(self.solver.tolerance, "solver tolerance")?;
        if self.solver.max_iterations == 0 {
            return Err(IvSurfError::InvalidInput {
                message: "solver max_iterations must be at least 1".into(),
            });
        }

        let as_of = self
            .as_of
            .unwrap_or_else(|| chrono::Local::now().date_naive());

        let entries = &entries[..entries.len().min(self.max_expiries)];

        #[cfg(feature = "logging")]
        tracing::debug!(
            n_entries = entries.len(),
            option_type = %self.option_type,
            spot,
            rate = self.rate,
            %as_of,
            "surface build started"
        );

        let slicer = EntrySlicer {
            as_of,
            spot,
            rate: self.rate,
            option_type: self.option_type,
            solver: ImpliedVolSolver::new(self.solver),
        };

        #[cfg(feature = "parallel")]
        let per_entry: Vec<Vec<SurfacePoint>> =
            entries.par_iter().map(|e| slicer.points(e)).collect();
        #[cfg(not(feature = "parallel"))]
        let per_entry: Vec<Vec<SurfacePoint>> = entries.iter().map(|e| slicer.points(e)).collect();

        let points: Vec<SurfacePoint> = per_entry.into_iter().flatten().collect();

        #[cfg(feature = "logging")]
        tracing::debug!(n_points = points.len(), "surface build complete");

        Ok(Surface::new(as_of, self.option_type, points))
    }
}

impl Default for SurfaceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a surface measured from today with the default solver settings.
///
/// # Errors
/// See [`SurfaceBuilder::build`].
pub fn build_surface(
    entries: &[OptionChainEntry],
    spot: f64,
    rate: f64,
    option_type: OptionType,
) -> crate::error::Result<Surface> {
    SurfaceBuilder::new()
        .spot(spot)
        .rate(rate)
        .option_type(option_type)
        .build(entries)
}

/// Validated per-build state applied to each chain entry.
struct EntrySlicer {
    as_of: NaiveDate,
    spot: f64,
    rate: f64,
    option_type: OptionType,
    solver: ImpliedVolSolver,
}

impl EntrySlicer {
    /// All surface points contributed by one entry, in quote order.
    fn points(&self, entry: &OptionChainEntry) -> Vec<SurfacePoint> {
        let quotes = entry.quotes(self.option_type);
        if quotes.is_empty() {
            #[cfg(feature = "logging")]
            tracing::debug!(expiry = %entry.expiry, "no quotes of requested kind, entry skipped");
            return Vec::new();
        }

        let expiry_date = match entry.expiry_date() {
            Ok(date) => date,
            Err(_err) => {
                #[cfg(feature = "logging")]
                tracing::warn!(expiry = %entry.expiry, error = %_err, "unparseable expiry, entry skipped");
                return Vec::new();
            }
        };

        let t = conventions::year_fraction(self.as_of, expiry_date);
        if t <= 0.0 {
            #[cfg(feature = "logging")]
            tracing::debug!(expiry = %entry.expiry, t, "expired entry skipped");
            return Vec::new();
        }

        let points: Vec<SurfacePoint> = quotes
            .iter()
            .filter(|q| q.is_well_formed() && q.has_two_sided_market())
            .filter_map(|q| {
                self.solver
                    .solve(q.mid(), self.spot, q.strike, t, self.rate, self.option_type)
                    .ok()
                    .map(|vol| SurfacePoint {
                        strike: Strike(q.strike),
                        expiry: Tenor(t),
                        iv_percent: vol.percent(),
                    })
            })
            .collect();

        #[cfg(feature = "logging")]
        tracing::debug!(
            expiry = %entry.expiry,
            t,
            n_quotes = quotes.len(),
            n_points = points.len(),
            "entry solved"
        );

        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::MarketQuote;
    use crate::implied::black_scholes_price;
    use approx::assert_abs_diff_eq;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 2).unwrap()
    }

    /// Quote priced at `vol` with a symmetric 2% spread around model value.
    fn model_quote(strike: f64, t: f64, vol: f64, kind: OptionType) -> MarketQuote {
        let p = black_scholes_price(100.0, strike, t, 0.01, vol, kind);
        MarketQuote::new(strike, p * 0.99, p * 1.01)
    }

    fn builder() -> SurfaceBuilder {
        SurfaceBuilder::new().spot(100.0).rate(0.01).as_of(as_of())
    }

    #[test]
    fn single_valid_quote_produces_one_point() {
        let entry = OptionChainEntry::new("2025-12-20")
            .with_calls(vec![MarketQuote::new(100.0, 5.0, 6.0)])
            .with_puts(vec![MarketQuote::new(100.0, 4.0, 5.0)]);
        let surface = builder().build(&[entry]).unwrap();

        assert_eq!(surface.len(), 1);
        let p = surface.points()[0];
        assert_eq!(p.strike, Strike(100.0));
        assert_abs_diff_eq!(p.expiry.0, 352.0 / 365.0, epsilon = 1e-15);
        assert!(p.iv_percent > 0.0);
    }

    #[test]
    fn recovers_model_vol_in_percent() {
        let t = 180.0 / 365.0;
        let expiry = (as_of() + chrono::Days::new(180)).to_string();
        let entry = OptionChainEntry::new(expiry).with_calls(vec![
            model_quote(90.0, t, 0.30, OptionType::Call),
            model_quote(100.0, t, 0.25, OptionType::Call),
            model_quote(110.0, t, 0.22, OptionType::Call),
        ]);
        let surface = builder().build(&[entry]).unwrap();
        let ivs = surface.columns().ivs;
        assert_eq!(ivs.len(), 3);
        // Mid equals model price exactly under a symmetric spread.
        assert_abs_diff_eq!(ivs[0], 30.0, epsilon = 1e-2);
        assert_abs_diff_eq!(ivs[1], 25.0, epsilon = 1e-2);
        assert_abs_diff_eq!(ivs[2], 22.0, epsilon = 1e-2);
    }

    #[test]
    fn zero_bid_and_ask_is_filtered() {
        let entry = OptionChainEntry::new("2025-12-20")
            .with_calls(vec![MarketQuote::new(100.0, 0.0, 0.0)])
            .with_puts(vec![MarketQuote::new(100.0, 0.0, 0.0)]);
        let surface = builder().build(&[entry]).unwrap();
        assert!(surface.is_empty());
    }

    #[test]
    fn one_sided_and_negative_quotes_are_filtered() {
        let entry = OptionChainEntry::new("2025-12-20").with_calls(vec![
            MarketQuote::new(100.0, 0.0, 6.0),
            MarketQuote::new(100.0, 5.0, 0.0),
            MarketQuote::new(100.0, -1.0, 6.0),
            MarketQuote::new(100.0, 5.0, 6.0),
        ]);
        let surface = builder().build(&[entry]).unwrap();
        assert_eq!(surface.len(), 1);
    }

    #[test]
    fn malformed_numbers_are_filtered_per_row() {
        let entry = OptionChainEntry::new("2025-12-20").with_calls(vec![
            MarketQuote::new(f64::NAN, 5.0, 6.0),
            MarketQuote::new(100.0, f64::NAN, 6.0),
            MarketQuote::new(100.0, 5.0, f64::INFINITY),
            MarketQuote::new(105.0, 3.0, 3.4),
        ]);
        let surface = builder().build(&[entry]).unwrap();
        assert_eq!(surface.columns().strikes, vec![105.0]);
    }

    #[test]
    fn past_and_same_day_expiries_drop_whole_entry() {
        let quotes = vec![MarketQuote::new(100.0, 5.0, 6.0), MarketQuote::new(95.0, 8.0, 9.0)];
        let past = OptionChainEntry::new("2024-12-20").with_calls(quotes.clone());
        let today = OptionChainEntry::new("2025-01-02").with_calls(quotes);
        let surface = builder().build(&[past, today]).unwrap();
        assert!(surface.is_empty());
    }

    #[test]
    fn unparseable_expiry_skips_only_that_entry() {
        let good = OptionChainEntry::new("2025-06-20").with_calls(vec![MarketQuote::new(100.0, 4.0, 4.4)]);
        let bad = OptionChainEntry::new("20/06/2025").with_calls(vec![MarketQuote::new(100.0, 4.0, 4.4)]);
        let surface = builder().build(&[bad, good]).unwrap();
        assert_eq!(surface.len(), 1);
        assert_abs_diff_eq!(surface.points()[0].expiry.0, 169.0 / 365.0, epsilon = 1e-15);
    }

    #[test]
    fn entry_without_requested_kind_is_skipped() {
        let calls_only =
            OptionChainEntry::new("2025-06-20").with_calls(vec![MarketQuote::new(100.0, 4.0, 4.4)]);
        let surface = builder()
            .option_type(OptionType::Put)
            .build(&[calls_only])
            .unwrap();
        assert!(surface.is_empty());
        assert_eq!(surface.option_type(), OptionType::Put);
    }

    #[test]
    fn unsolvable_quotes_are_skipped() {
        // Deep ITM call quoted far below intrinsic value, and a quote above spot.
        let entry = OptionChainEntry::new("2025-06-20").with_calls(vec![
            MarketQuote::new(50.0, 10.0, 10.5),
            MarketQuote::new(100.0, 150.0, 151.0),
            MarketQuote::new(100.0, 4.0, 4.4),
        ]);
        let surface = builder().build(&[entry]).unwrap();
        assert_eq!(surface.len(), 1);
    }

    #[test]
    fn order_follows_entries_then_rows_and_keeps_duplicates() {
        let near = OptionChainEntry::new("2025-03-21").with_calls(vec![
            MarketQuote::new(105.0, 1.0, 1.2),
            MarketQuote::new(95.0, 6.0, 6.4),
            MarketQuote::new(105.0, 1.0, 1.2),
        ]);
        let far = OptionChainEntry::new("2025-12-19").with_calls(vec![MarketQuote::new(100.0, 9.0, 9.6)]);
        let surface = builder().build(&[far, near]).unwrap();
        assert_eq!(surface.columns().strikes, vec![100.0, 105.0, 95.0, 105.0]);
        let t = surface.columns().expiries;
        assert!(t[0] > t[1]);
        assert_eq!(t[1], t[2]);
        assert_eq!(surface.points()[1], surface.points()[3]);
    }

    #[test]
    fn puts_build_from_put_side() {
        let t = 90.0 / 365.0;
        let expiry = (as_of() + chrono::Days::new(90)).to_string();
        let entry = OptionChainEntry::new(expiry)
            .with_calls(vec![MarketQuote::new(100.0, 0.0, 0.0)])
            .with_puts(vec![model_quote(95.0, t, 0.33, OptionType::Put)]);
        let surface = builder().option_type(OptionType::Put).build(&[entry]).unwrap();
        assert_eq!(surface.len(), 1);
        assert_abs_diff_eq!(surface.points()[0].iv_percent, 33.0, epsilon = 1e-2);
    }

    #[test]
    fn empty_chain_gives_empty_surface() {
        let surface = builder().build(&[]).unwrap();
        assert!(surface.is_empty());
        assert_eq!(surface.as_of(), as_of());
    }

    fn monthly_chain(n: u64) -> Vec<OptionChainEntry> {
        (1..=n)
            .map(|i| {
                let days = 30 * i;
                let t = days as f64 / 365.0;
                let expiry = (as_of() + chrono::Days::new(days)).to_string();
                OptionChainEntry::new(expiry).with_calls(vec![
                    model_quote(90.0, t, 0.28, OptionType::Call),
                    model_quote(100.0, t, 0.25, OptionType::Call),
                    model_quote(110.0, t, 0.23, OptionType::Call),
                ])
            })
            .collect()
    }

    #[test]
    fn only_first_max_expiries_entries_are_used() {
        let chain = monthly_chain(8);

        let default_limit = builder().build(&chain).unwrap();
        assert_eq!(default_limit.len(), 5 * 3);

        let surface = builder().max_expiries(2).build(&chain).unwrap();
        let expiries = surface.columns().expiries;
        assert_eq!(expiries.len(), 2 * 3);
        assert_abs_diff_eq!(expiries[0], 30.0 / 365.0, epsilon = 1e-15);
        assert_abs_diff_eq!(expiries[5], 60.0 / 365.0, epsilon = 1e-15);

        assert!(builder().max_expiries(0).build(&chain).unwrap().is_empty());
        assert_eq!(builder().max_expiries(50).build(&chain).unwrap().len(), 8 * 3);
    }

    #[test]
    fn from_config_applies_max_expiries() {
        let config = SurfaceConfig {
            max_expiries: 3,
            ..SurfaceConfig::default()
        };
        let surface = SurfaceBuilder::from_config(&config)
            .spot(100.0)
            .as_of(as_of())
            .build(&monthly_chain(6))
            .unwrap();
        assert_eq!(surface.len(), 3 * 3);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_build_matches_sequential_order() {
        let mut chain = monthly_chain(5);
        chain[2].calls.push(MarketQuote::new(95.0, 0.0, 0.0));
        chain[3].expiry = "not a date".into();

        let slicer = EntrySlicer {
            as_of: as_of(),
            spot: 100.0,
            rate: 0.01,
            option_type: OptionType::Call,
            solver: ImpliedVolSolver::default(),
        };
        let sequential: Vec<SurfacePoint> = chain.iter().flat_map(|e| slicer.points(e)).collect();

        let surface = builder().build(&chain).unwrap();
        assert_eq!(surface.len(), 4 * 3);
        assert_eq!(surface.points(), sequential.as_slice());
    }

    #[test]
    fn missing_spot_returns_invalid_input() {
        let result = SurfaceBuilder::new().as_of(as_of()).build(&[]);
        assert!(matches!(result, Err(IvSurfError::InvalidInput { .. })));
    }

    #[test]
    fn non_positive_spot_returns_invalid_input() {
        for spot in [0.0, -100.0, f64::NAN] {
            let result = SurfaceBuilder::new().spot(spot).build(&[]);
            assert!(matches!(result, Err(IvSurfError::InvalidInput { .. })));
        }
    }

    #[test]
    fn non_finite_rate_returns_invalid_input() {
        let result = builder().rate(f64::INFINITY).build(&[]);
        assert!(matches!(result, Err(IvSurfError::InvalidInput { .. })));
    }

    #[test]
    fn bad_solver_settings_return_invalid_input() {
        let zero_iters = builder()
            .solver(SolverConfig {
                tolerance: 1e-5,
                max_iterations: 0,
            })
            .build(&[]);
        assert!(matches!(zero_iters, Err(IvSurfError::InvalidInput { .. })));

        let zero_tol = builder()
            .solver(SolverConfig {
                tolerance: 0.0,
                max_iterations: 100,
            })
            .build(&[]);
        assert!(matches!(zero_tol, Err(IvSurfError::InvalidInput { .. })));
    }

    #[test]
    fn negative_rate_is_accepted() {
        let entry = OptionChainEntry::new("2025-12-20").with_calls(vec![MarketQuote::new(100.0, 5.0, 6.0)]);
        let surface = builder().rate(-0.01).build(&[entry]).unwrap();
        assert_eq!(surface.len(), 1);
    }

    #[test]
    fn from_config_applies_settings() {
        let config = SurfaceConfig {
            option_type: OptionType::Put,
            risk_free_rate: 0.04,
            ..SurfaceConfig::default()
        };
        let surface = SurfaceBuilder::from_config(&config)
            .spot(100.0)
            .as_of(as_of())
            .build(&[])
            .unwrap();
        assert_eq!(surface.option_type(), OptionType::Put);
    }

    #[test]
    fn config_deserializes_partial_json() {
        let config: SurfaceConfig =
            serde_json::from_str(r#"{"option_type":"put","solver":{"tolerance":1e-6}}"#).unwrap();
        assert_eq!(config.option_type, OptionType::Put);
        assert_eq!(config.risk_free_rate, 0.01);
        assert_eq!(config.max_expiries, 5);
        assert_eq!(config.solver.tolerance, 1e-6);
        assert_eq!(config.solver.max_iterations, 100);
    }

    #[test]
    fn free_function_uses_today() {
        let surface = build_surface(&[], 100.0, 0.01, OptionType::Call).unwrap();
        assert_eq!(surface.as_of(), chrono::Local::now().date_naive());
    }
}
