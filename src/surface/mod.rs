//! Implied volatility surfaces as point clouds.
//!
//! A [`Surface`] is the set of (strike, time to expiry, implied vol %) points
//! solved from one option chain snapshot. Points are kept in the order the
//! chain was walked (expiry, then quote) with no sorting, deduplication or
//! interpolation; meshing is left to the renderer, which takes the three
//! parallel sequences from [`Surface::columns`].
//!
//! - [`Surface`] / [`SurfacePoint`] — The computed point cloud
//! - [`SurfaceBuilder`] — Chain cleaning and per-quote IV solving
//! - [`SurfaceConfig`] — Plain-parameter configuration with defaults

pub mod builder;

pub use builder::{build_surface, SurfaceBuilder, SurfaceConfig};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{OptionType, Strike, Tenor};

/// One solved quote on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfacePoint {
    /// Strike of the quote.
    pub strike: Strike,
    /// Time to expiry in years, ACT/365.
    pub expiry: Tenor,
    /// Implied volatility in percent (σ × 100).
    pub iv_percent: f64,
}

/// Three equal-length sequences for a triangulating renderer.
///
/// Index `i` of each vector describes the same point.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SurfaceColumns {
    pub strikes: Vec<f64>,
    pub expiries: Vec<f64>,
    pub ivs: Vec<f64>,
}

/// Implied volatility point cloud for one underlying, one option kind and
/// one snapshot date.
///
/// Immutable after construction. An empty surface is a valid result meaning
/// no quote in the chain was usable; callers should report "no data" rather
/// than render it.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use ivsurf::chain::{MarketQuote, OptionChainEntry};
/// use ivsurf::surface::SurfaceBuilder;
///
/// let as_of = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
/// let chain = vec![
///     OptionChainEntry::new("2025-12-19").with_calls(vec![MarketQuote::new(100.0, 9.8, 10.2)]),
/// ];
///
/// let surface = SurfaceBuilder::new().spot(100.0).as_of(as_of).build(&chain)?;
/// assert_eq!(surface.len(), 1);
///
/// let columns = surface.columns();
/// assert_eq!(columns.strikes, vec![100.0]);
/// assert!(columns.ivs[0] > 0.0);
/// # Ok::<(), ivsurf::IvSurfError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    as_of: NaiveDate,
    option_type: OptionType,
    points: Vec<SurfacePoint>,
}

impl Surface {
    pub(crate) fn new(as_of: NaiveDate, option_type: OptionType, points: Vec<SurfacePoint>) -> Self {
        Self {
            as_of,
            option_type,
            points,
        }
    }

    /// Snapshot date the times to expiry were measured from.
    pub fn as_of(&self) -> NaiveDate {
        self.as_of
    }

    /// Which side of the chain the surface was built from.
    pub fn option_type(&self) -> OptionType {
        self.option_type
    }

    /// Points in chain order.
    pub fn points(&self) -> &[SurfacePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when no quote produced a point.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Split the points into strike, expiry and IV % columns.
    pub fn columns(&self) -> SurfaceColumns {
        let mut columns = SurfaceColumns {
            strikes: Vec::with_capacity(self.points.len()),
            expiries: Vec::with_capacity(self.points.len()),
            ivs: Vec::with_capacity(self.points.len()),
        };
        for p in &self.points {
            columns.strikes.push(p.strike.0);
            columns.expiries.push(p.expiry.0);
            columns.ivs.push(p.iv_percent);
        }
        columns
    }

    /// Consume the surface, returning its points.
    pub fn into_points(self) -> Vec<SurfacePoint> {
        self.points
    }
}
