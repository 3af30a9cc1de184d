//! Scenario sweep integration tests.

use pricer_core::types::{BarrierDirection, BarrierMode, OptionType, PricingError};
use pricer_models::analytical::{BlackScholes, CashOrNothing};
use pricer_pricing::mc::{
    sweep, sweep_barrier, BarrierScenario, EvolutionScheme, ScenarioGrid, ScenarioPoint,
};
use pricer_pricing::path_dependent::{BarrierSpec, Observation};

fn scenario() -> BarrierScenario {
    BarrierScenario {
        base_spot: 55.0,
        rate: 0.06,
        dividend_yield: 0.0,
        volatility: 0.2,
        strike: 60.0,
        option_type: OptionType::Call,
        barrier: BarrierSpec::new(80.0, BarrierDirection::Up, BarrierMode::KnockOut, Observation::Continuous)
            .unwrap(),
        steps_per_year: 252,
        path_count: 4_000,
        seed: 1234,
        scheme: EvolutionScheme::LogExact,
    }
}

fn grid() -> ScenarioGrid {
    ScenarioGrid::new(vec![0.8, 0.9, 1.0, 1.1, 1.2], vec![0.25, 0.5, 1.0]).unwrap()
}

#[test]
fn test_sweep_is_idempotent() {
    let first = sweep_barrier(&grid(), &scenario());
    let second = sweep_barrier(&grid(), &scenario());
    assert!(first.is_complete());
    assert_eq!(first, second);
}

#[test]
fn test_sweep_cells_match_direct_pricing() {
    let scenario = scenario();
    let grid = grid();
    let table = sweep_barrier(&grid, &scenario);
    for (row, factor) in grid.spot_factors().iter().enumerate() {
        for (column, tenor) in grid.tenors().iter().enumerate() {
            let point = ScenarioPoint {
                row,
                column,
                spot_factor: *factor,
                tenor: *tenor,
            };
            let direct = scenario.price_cell(point).unwrap();
            assert_eq!(table.get(row, column).unwrap().as_ref().unwrap(), &direct);
        }
    }
}

#[test]
fn test_knock_out_premium_rises_with_spot_below_barrier() {
    // Deep below the barrier the knock-out call behaves like the vanilla.
    let table = sweep_barrier(&ScenarioGrid::new(vec![0.8, 1.0], vec![0.25]).unwrap(), &scenario());
    let low = table.get(0, 0).unwrap().as_ref().unwrap();
    let mid = table.get(1, 0).unwrap().as_ref().unwrap();
    assert!(mid.premium > low.premium);
    assert!(low.hit_rate <= mid.hit_rate);
}

#[test]
fn test_invalid_cell_is_reported_not_fatal() {
    // The 150% row starts above the barrier, so every path knocks out.
    // The (150%, 1y) cell is made to fail.
    let grid = ScenarioGrid::new(vec![1.0, 1.5], vec![0.5, 1.0]).unwrap();
    let scenario = scenario();
    let table = sweep(&grid, |point| {
        if point.spot_factor > 1.4 && point.tenor > 0.9 {
            Err(PricingError::invalid("volatility", "test failure"))
        } else {
            scenario.price_cell(point)
        }
    });

    let failures = table.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!((failures[0].0, failures[0].1), (1, 1));

    let knocked = table.get(1, 0).unwrap().as_ref().unwrap();
    assert_eq!(knocked.hit_rate, 1.0);
    assert_eq!(knocked.premium, 0.0);
}

#[test]
fn test_closed_form_digital_matrix() {
    let grid = ScenarioGrid::new(vec![0.9, 1.0, 1.1], vec![0.5, 1.0, 2.0]).unwrap();
    let table = sweep(&grid, |point| {
        let market = BlackScholes::new(100.0 * point.spot_factor, 0.05, 0.0, 0.25)?;
        let digital = CashOrNothing::new(market, 1.0)?;
        Ok(digital.price(OptionType::Call, 100.0, point.tenor)?)
    });

    assert!(table.is_complete());
    for column in 0..3 {
        let mut previous = 0.0;
        for row in 0..3 {
            let value = *table.get(row, column).unwrap().as_ref().unwrap();
            assert!(value > previous);
            previous = value;
        }
    }
    let labels: Vec<&str> = table.rows().map(|(label, _)| label).collect();
    assert_eq!(labels, ["90%", "100%", "110%"]);
}
