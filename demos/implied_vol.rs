//! Price options with Black-Scholes and extract implied vol back.
//!
//! Shows how to:
//!   - Price a call and a put
//!   - Recover implied vol with the Brent solver
//!   - Tell solvable prices from unsolvable ones
//!
//! Run with: `cargo run --example implied_vol`

use ivsurf::implied::{black_scholes_price, ImpliedVolSolver};
use ivsurf::OptionType;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let spot = 100.0;
    let strike = 105.0;
    let expiry = 0.5; // 6 months
    let rate = 0.01;
    let vol = 0.25;

    // ---------------------------------------------------------------
    // 1. Price a call and a put
    // ---------------------------------------------------------------

    let call_price = black_scholes_price(spot, strike, expiry, rate, vol, OptionType::Call);
    let put_price = black_scholes_price(spot, strike, expiry, rate, vol, OptionType::Put);

    println!("Black-Scholes pricing");
    println!("  Spot:    {spot}");
    println!("  Strike:  {strike}");
    println!("  Expiry:  {expiry}y");
    println!("  Vol:     {:.0}%", vol * 100.0);
    println!();
    println!("  Call price: {call_price:.6}");
    println!("  Put price:  {put_price:.6}");
    println!(
        "  Put-call parity check: C - P = {:.6}, S - K·e^(-rT) = {:.6}",
        call_price - put_price,
        spot - strike * (-rate * expiry).exp()
    );

    // ---------------------------------------------------------------
    // 2. Extract implied vol from the prices
    // ---------------------------------------------------------------

    let solver = ImpliedVolSolver::default();
    let iv_call = solver.solve(call_price, spot, strike, expiry, rate, OptionType::Call)?;
    let iv_put = solver.solve(put_price, spot, strike, expiry, rate, OptionType::Put)?;

    println!("\nImplied vol extraction (Brent)");
    println!("  From call: {:.8}", iv_call.0);
    println!("  From put:  {:.8}", iv_put.0);
    println!("  Input vol: {vol:.8}");

    // ---------------------------------------------------------------
    // 3. Scan across strikes
    // ---------------------------------------------------------------

    println!("\n--- IV extraction across strikes ---\n");
    println!("{:>8} {:>12} {:>12} {:>14}", "Strike", "Call Price", "IV %", "Residual");
    println!("{}", "-".repeat(50));

    for k in [80.0, 90.0, 95.0, 100.0, 105.0, 110.0, 120.0] {
        let price = black_scholes_price(spot, k, expiry, rate, vol, OptionType::Call);
        let iv = solver.solve(price, spot, k, expiry, rate, OptionType::Call)?;
        let reprice = black_scholes_price(spot, k, expiry, rate, iv.0, OptionType::Call);
        println!(
            "{k:>8.0} {price:>12.6} {:>12.6} {:>14.2e}",
            iv.percent(),
            (price - reprice).abs()
        );
    }

    // ---------------------------------------------------------------
    // 4. Prices with no implied vol
    // ---------------------------------------------------------------

    println!("\n--- Unsolvable prices ---\n");
    let intrinsic = spot - 80.0 * (-rate * expiry).exp();
    for (label, price) in [
        ("zero premium", 0.0),
        ("below intrinsic", intrinsic - 1.0),
        ("above spot", spot + 1.0),
    ] {
        match solver.solve(price, spot, 80.0, expiry, rate, OptionType::Call) {
            Ok(iv) => println!("  {label:<16} {price:>10.4} -> {:.6}", iv.0),
            Err(reason) => println!("  {label:<16} {price:>10.4} -> skipped: {reason}"),
        }
    }

    Ok(())
}
