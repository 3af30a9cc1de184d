//! Monte Carlo prices against closed-form solutions.
//!
//! # Test Categories
//!
//! 1. **Vanilla**: MC vs Black-Scholes, with and without dividend yield
//! 2. **Digital**: MC vs cash-or-nothing formula
//! 3. **Barrier**: MC with daily monitoring vs Reiner-Rubinstein with the
//!    Broadie-Glasserman-Kou correction
//! 4. **Convergence**: standard error shrinks like 1/sqrt(M)

use pricer_core::types::{BarrierDirection, BarrierMode, OptionType};
use pricer_models::analytical::{price_vanilla, AnalyticBarrier, BlackScholes, CashOrNothing};
use pricer_pricing::mc::{MonteCarloPricer, PricingResult, SimulationGrid};
use pricer_pricing::path_dependent::{BarrierSpec, Observation};

const SEED: u64 = 20_240_601;

fn grid(spot: f64, rate: f64, dividend: f64, vol: f64, expiry: f64, steps: usize, paths: usize) -> SimulationGrid {
    SimulationGrid::builder()
        .initial_price(spot)
        .drift(rate)
        .dividend_yield(dividend)
        .volatility(vol)
        .horizon(expiry)
        .step_count(steps)
        .path_count(paths)
        .seed(SEED)
        .build()
        .unwrap()
}

fn assert_within_se(result: &PricingResult, reference: f64, n_se: f64, slack: f64) {
    let se = result.std_error.unwrap();
    let diff = (result.premium - reference).abs();
    assert!(
        diff <= n_se * se + slack,
        "MC {:.6} vs analytic {:.6}: |diff| = {:.6} > {} SE ({:.6}) + {}",
        result.premium,
        reference,
        diff,
        n_se,
        se,
        slack
    );
}

// ============================================================================
// Vanilla
// ============================================================================

#[test]
fn test_vanilla_call_mc_vs_black_scholes() {
    let pricer = MonteCarloPricer::new(grid(100.0, 0.05, 0.0, 0.2, 1.0, 1, 400_000));
    let mc = pricer.price_vanilla(OptionType::Call, 100.0, 0.05).unwrap();
    let analytic = price_vanilla(100.0, 100.0, 0.05, 1.0, 0.2, OptionType::Call).unwrap();

    assert!((analytic - 10.450583572185565).abs() < 1e-10);
    assert_within_se(&mc, analytic, 4.0, 0.0);
    assert_eq!(mc.hit_rate, 0.0);
}

#[test]
fn test_vanilla_put_mc_vs_black_scholes() {
    let pricer = MonteCarloPricer::new(grid(100.0, 0.05, 0.0, 0.2, 1.0, 1, 400_000));
    let mc = pricer.price_vanilla(OptionType::Put, 100.0, 0.05).unwrap();
    let analytic = price_vanilla(100.0, 100.0, 0.05, 1.0, 0.2, OptionType::Put).unwrap();
    assert_within_se(&mc, analytic, 4.0, 0.0);
}

#[test]
fn test_vanilla_with_dividend_mc_vs_black_scholes() {
    // Multi-step paths exercise the per-step drift including q.
    let pricer = MonteCarloPricer::new(grid(100.0, 0.05, 0.03, 0.2, 1.0, 12, 200_000));
    let model = BlackScholes::<f64>::new(100.0, 0.05, 0.03, 0.2).unwrap();
    for (option_type, reference) in [
        (OptionType::Call, 8.652528553942709),
        (OptionType::Put, 6.7309176491633025),
    ] {
        let analytic = model.price(option_type, 100.0, 1.0).unwrap();
        assert!((analytic - reference).abs() < 1e-10);
        let mc = pricer.price_vanilla(option_type, 100.0, 0.05).unwrap();
        assert_within_se(&mc, analytic, 4.0, 0.0);
    }
}

// ============================================================================
// Digital
// ============================================================================

#[test]
fn test_digital_mc_vs_closed_form() {
    let pricer = MonteCarloPricer::new(grid(100.0, 0.05, 0.02, 0.25, 0.75, 1, 200_000));
    let digital = CashOrNothing::new(BlackScholes::new(100.0, 0.05, 0.02, 0.25).unwrap(), 10.0).unwrap();
    for option_type in [OptionType::Call, OptionType::Put] {
        let analytic = digital.price(option_type, 95.0, 0.75).unwrap();
        let mc = pricer.price_digital(option_type, 95.0, 10.0, 0.05).unwrap();
        assert_within_se(&mc, analytic, 4.0, 0.0);
    }
}

// ============================================================================
// Barrier
// ============================================================================

#[test]
fn test_down_and_out_call_mc_vs_bgk() {
    let (spot, strike, level, rate, vol, expiry, steps) = (100.0, 100.0, 90.0, 0.05, 0.2, 1.0, 252);
    let pricer = MonteCarloPricer::new(grid(spot, rate, 0.0, vol, expiry, steps, 100_000));
    let spec = BarrierSpec::new(level, BarrierDirection::Down, BarrierMode::KnockOut, Observation::Continuous).unwrap();
    let mc = pricer.price_barrier(OptionType::Call, strike, &spec, rate).unwrap();

    let market = BlackScholes::new(spot, rate, 0.0, vol).unwrap();
    let contract = AnalyticBarrier::new(OptionType::Call, BarrierDirection::Down, BarrierMode::KnockOut, strike, level).unwrap();
    let discrete = contract.price_discrete(&market, expiry, expiry / steps as f64).unwrap();
    let continuous = contract.price(&market, expiry).unwrap();

    // Daily monitoring knocks out less often than continuous monitoring.
    assert!(discrete > continuous);
    assert_within_se(&mc, discrete, 4.0, 0.01);
}

#[test]
fn test_up_and_in_put_mc_vs_bgk() {
    let (spot, strike, level, rate, vol, expiry, steps) = (100.0, 105.0, 115.0, 0.03, 0.25, 0.5, 126);
    let pricer = MonteCarloPricer::new(grid(spot, rate, 0.0, vol, expiry, steps, 100_000));
    let spec = BarrierSpec::new(level, BarrierDirection::Up, BarrierMode::KnockIn, Observation::Continuous).unwrap();
    let mc = pricer.price_barrier(OptionType::Put, strike, &spec, rate).unwrap();

    let market = BlackScholes::new(spot, rate, 0.0, vol).unwrap();
    let contract = AnalyticBarrier::new(OptionType::Put, BarrierDirection::Up, BarrierMode::KnockIn, strike, level).unwrap();
    let discrete = contract.price_discrete(&market, expiry, expiry / steps as f64).unwrap();

    assert_within_se(&mc, discrete, 4.0, 0.01);
    assert!(mc.hit_rate > 0.0 && mc.hit_rate < 1.0);
}

#[test]
fn test_terminal_observation_knock_out_matches_truncated_call() {
    // With terminal monitoring an up-and-out call pays max(S_T - K, 0) only
    // when S_T < H: a call spread minus a digital, all in closed form.
    let (spot, strike, level, rate, vol, expiry) = (100.0, 100.0, 120.0, 0.05, 0.2, 1.0);
    let pricer = MonteCarloPricer::new(grid(spot, rate, 0.0, vol, expiry, 1, 300_000));
    let spec = BarrierSpec::new(level, BarrierDirection::Up, BarrierMode::KnockOut, Observation::Terminal).unwrap();
    let mc = pricer.price_barrier(OptionType::Call, strike, &spec, rate).unwrap();

    let market = BlackScholes::new(spot, rate, 0.0, vol).unwrap();
    let digital = CashOrNothing::new(market, level - strike).unwrap();
    let analytic = market.price(OptionType::Call, strike, expiry).unwrap()
        - market.price(OptionType::Call, level, expiry).unwrap()
        - digital.price(OptionType::Call, level, expiry).unwrap();

    assert_within_se(&mc, analytic, 4.0, 0.0);
}

// ============================================================================
// Convergence
// ============================================================================

#[test]
fn test_std_error_scales_with_path_count() {
    let small = MonteCarloPricer::new(grid(100.0, 0.05, 0.0, 0.2, 1.0, 1, 10_000))
        .price_vanilla(OptionType::Call, 100.0, 0.05)
        .unwrap();
    let large = MonteCarloPricer::new(grid(100.0, 0.05, 0.0, 0.2, 1.0, 1, 160_000))
        .price_vanilla(OptionType::Call, 100.0, 0.05)
        .unwrap();
    let ratio = small.std_error.unwrap() / large.std_error.unwrap();
    assert!((ratio - 4.0).abs() < 0.4, "ratio = {}", ratio);
}
