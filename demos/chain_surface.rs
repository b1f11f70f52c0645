//! Build an implied volatility surface from an option chain source.
//!
//! Uses an in-memory [`ChainSource`] standing in for a market-data vendor.
//! Quotes are generated from a skewed smile with a bid/ask spread, plus a few
//! broken rows (zero quotes, a stale expiry, an unparseable date) that the
//! builder drops.
//!
//! Run with: `cargo run --example chain_surface`

use chrono::{Days, Local, NaiveDate};
use ivsurf::chain::ChainSource;
use ivsurf::implied::black_scholes_price;
use ivsurf::pipeline::surface_for_symbol;
use ivsurf::{IvSurfError, MarketQuote, OptionChainEntry, OptionType, SurfaceConfig};

struct DemoVendor {
    today: NaiveDate,
    spot: f64,
}

impl DemoVendor {
    fn smile(&self, strike: f64, t: f64) -> f64 {
        let m = (strike / self.spot).ln();
        0.22 + 0.04 * t.sqrt() - 0.3 * m + 0.8 * m * m
    }

    fn quotes(&self, days: u64, kind: OptionType) -> Vec<MarketQuote> {
        let t = days as f64 / 365.0;
        let mut quotes: Vec<MarketQuote> = (0..13)
            .map(|i| {
                let k = self.spot * (0.7 + 0.05 * i as f64);
                let p = black_scholes_price(self.spot, k, t, 0.01, self.smile(k, t), kind);
                let half_spread = (0.02 * p).max(0.01);
                MarketQuote::new(k, (p - half_spread).max(0.0), p + half_spread)
            })
            .collect();
        // No market on the far wing.
        quotes.push(MarketQuote::new(self.spot * 1.5, 0.0, 0.0));
        quotes
    }
}

impl ChainSource for DemoVendor {
    fn expiries(&self, _symbol: &str) -> ivsurf::Result<Vec<String>> {
        let mut labels = vec!["2020-01-17".to_string(), "third friday".to_string()];
        labels.extend([14, 30, 60, 90, 180].map(|d: u64| (self.today + Days::new(d)).to_string()));
        Ok(labels)
    }

    fn chain(&self, _symbol: &str, expiry: &str) -> ivsurf::Result<OptionChainEntry> {
        let days = NaiveDate::parse_from_str(expiry, "%Y-%m-%d")
            .map(|d| (d - self.today).num_days().max(1) as u64)
            .unwrap_or(30);
        Ok(OptionChainEntry::new(expiry)
            .with_calls(self.quotes(days, OptionType::Call))
            .with_puts(self.quotes(days, OptionType::Put)))
    }

    fn spot_price(&self, symbol: &str) -> ivsurf::Result<f64> {
        if symbol.is_empty() {
            return Err(IvSurfError::DataUnavailable {
                message: "empty symbol".into(),
            });
        }
        Ok(self.spot)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let vendor = DemoVendor {
        today: Local::now().date_naive(),
        spot: 187.5,
    };
    let symbol = "DEMO";

    for option_type in [OptionType::Call, OptionType::Put] {
        let config = SurfaceConfig {
            option_type,
            max_expiries: 7,
            ..SurfaceConfig::default()
        };
        let surface = surface_for_symbol(&vendor, symbol, &config, None)?;

        println!("\n{symbol} {option_type} implied volatility surface");
        if surface.is_empty() {
            println!("  No valid option data found to compute surface.");
            continue;
        }

        let columns = surface.columns();
        println!("  {} points", columns.strikes.len());
        println!("{:>10} {:>10} {:>10}", "Strike", "T (y)", "IV %");
        for i in 0..columns.strikes.len() {
            println!(
                "{:>10.2} {:>10.4} {:>10.2}",
                columns.strikes[i], columns.expiries[i], columns.ivs[i]
            );
        }
    }

    Ok(())
}
