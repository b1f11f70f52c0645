//! End-to-end surface construction from a [`ChainSource`].

use chrono::NaiveDate;

use crate::chain::{fetch_current_price, fetch_option_chain, ChainSource};
use crate::error;
use crate::surface::{Surface, SurfaceBuilder, SurfaceConfig};

/// Fetch the nearest `config.max_expiries` expiries and the spot price for
/// `symbol`, then build its surface as of `as_of` (today if `None`).
///
/// # Errors
/// Returns the source's error if the expiry listing or the spot price cannot
/// be fetched, and [`IvSurfError::InvalidInput`](crate::IvSurfError::InvalidInput)
/// for invalid settings. Individual expiries that fail to fetch are skipped.
pub fn surface_for_symbol<S>(
    source: &S,
    symbol: &str,
    config: &SurfaceConfig,
    as_of: Option<NaiveDate>,
) -> error::Result<Surface>
where
    S: ChainSource + ?Sized,
{
    let entries = fetch_option_chain(source, symbol, config.max_expiries)?;
    let spot = fetch_current_price(source, symbol)?;

    let mut builder = SurfaceBuilder::from_config(config).spot(spot);
    if let Some(date) = as_of {
        builder = builder.as_of(date);
    }
    let surface = builder.build(&entries)?;

    if surface.is_empty() {
        #[cfg(feature = "logging")]
        tracing::warn!(symbol, "no valid option data to compute a surface");
    }

    Ok(surface)
}
