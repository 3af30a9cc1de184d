//! Property-based tests for the simulation, observation and payoff stages.
//!
//! - Determinism and column 0 for any valid grid
//! - Terminal observation reads column N only
//! - Continuous up-observation equals the path maximum test, monotone in level
//! - Knock-in + knock-out = vanilla per path

use pricer_core::types::{BarrierDirection, BarrierMode, OptionType};
use pricer_pricing::diagnostics::cumulative_hit_profile;
use pricer_pricing::mc::{simulate, EvolutionScheme, PathMatrix, SimulationGrid};
use pricer_pricing::path_dependent::{observe_barrier, payoff, Observation, OptionFamily};
use proptest::prelude::*;

fn grid_strategy() -> impl Strategy<Value = SimulationGrid> {
    (
        10.0..200.0f64,
        -0.05..0.15f64,
        0.05..0.8f64,
        0.0..0.06f64,
        0.05..3.0f64,
        1usize..40,
        1usize..700,
        any::<u64>(),
        any::<bool>(),
    )
        .prop_map(|(s0, mu, sigma, q, t, n, m, seed, stepwise)| {
            SimulationGrid::builder()
                .initial_price(s0)
                .drift(mu)
                .volatility(sigma)
                .dividend_yield(q)
                .horizon(t)
                .step_count(n)
                .path_count(m)
                .seed(seed)
                .scheme(if stepwise {
                    EvolutionScheme::Stepwise
                } else {
                    EvolutionScheme::LogExact
                })
                .build()
                .unwrap()
        })
}

fn matrix_strategy() -> impl Strategy<Value = Vec<Vec<f64>>> {
    (1usize..12, 2usize..10).prop_flat_map(|(rows, columns)| {
        prop::collection::vec(prop::collection::vec(50.0..150.0f64, columns), rows)
    })
    .prop_map(|mut rows| {
        for row in rows.iter_mut() {
            row[0] = 100.0;
        }
        rows
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_simulation_is_deterministic(grid in grid_strategy()) {
        let a = simulate(&grid).unwrap();
        let b = simulate(&grid).unwrap();
        prop_assert_eq!(a.as_slice(), b.as_slice());
    }

    #[test]
    fn test_column_zero_is_initial_price(grid in grid_strategy()) {
        let paths = simulate(&grid).unwrap();
        prop_assert_eq!(paths.path_count(), grid.path_count());
        prop_assert_eq!(paths.columns(), grid.step_count() + 1);
        for row in paths.paths() {
            prop_assert_eq!(row[0], grid.initial_price());
            prop_assert!(row.iter().all(|p| *p > 0.0 && p.is_finite()));
        }
    }

    #[test]
    fn test_terminal_observation_reads_last_column_only(
        rows in matrix_strategy(),
        replacement in 50.0..150.0f64,
        level in 60.0..140.0f64,
        up in any::<bool>(),
    ) {
        let direction = if up { BarrierDirection::Up } else { BarrierDirection::Down };
        let original = PathMatrix::from_rows(&rows).unwrap();

        let mut altered_rows = rows.clone();
        for row in altered_rows.iter_mut() {
            let last = row.len() - 1;
            for price in row[..last].iter_mut() {
                *price = replacement;
            }
        }
        let altered = PathMatrix::from_rows(&altered_rows).unwrap();

        let a = observe_barrier(&original, level, direction, Observation::Terminal).unwrap();
        let b = observe_barrier(&altered, level, direction, Observation::Terminal).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn test_continuous_up_is_max_test_and_monotone(
        rows in matrix_strategy(),
        level in 60.0..140.0f64,
        raise in 0.0..30.0f64,
    ) {
        let paths = PathMatrix::from_rows(&rows).unwrap();
        let low = observe_barrier(&paths, level, BarrierDirection::Up, Observation::Continuous).unwrap();
        let high = observe_barrier(&paths, level + raise, BarrierDirection::Up, Observation::Continuous).unwrap();

        for (i, row) in rows.iter().enumerate() {
            let max = row.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            prop_assert_eq!(low.as_slice()[i], max >= level);
            // Raising the level never creates a hit.
            prop_assert!(!high.as_slice()[i] || low.as_slice()[i]);
        }
    }

    #[test]
    fn test_knock_in_plus_knock_out_is_vanilla(
        grid in grid_strategy(),
        strike_factor in 0.7..1.3f64,
        level_factor in 0.7..1.3f64,
        is_call in any::<bool>(),
        terminal in any::<bool>(),
    ) {
        let paths = simulate(&grid).unwrap();
        let s0 = grid.initial_price();
        let direction = if level_factor >= 1.0 { BarrierDirection::Up } else { BarrierDirection::Down };
        let observation = if terminal { Observation::Terminal } else { Observation::Continuous };
        let option_type = if is_call { OptionType::Call } else { OptionType::Put };
        let strike = s0 * strike_factor;

        let hits = observe_barrier(&paths, s0 * level_factor, direction, observation).unwrap();
        let vanilla = payoff(&paths, &hits, strike, OptionFamily::vanilla(option_type)).unwrap();
        let knock_in = payoff(&paths, &hits, strike, OptionFamily::barrier(option_type, BarrierMode::KnockIn)).unwrap();
        let knock_out = payoff(&paths, &hits, strike, OptionFamily::barrier(option_type, BarrierMode::KnockOut)).unwrap();

        for i in 0..vanilla.len() {
            prop_assert_eq!(knock_in.as_slice()[i] + knock_out.as_slice()[i], vanilla.as_slice()[i]);
        }
    }

    #[test]
    fn test_cumulative_hit_profile_is_non_decreasing(
        grid in grid_strategy(),
        level_factor in 1.0..1.5f64,
    ) {
        let paths = simulate(&grid).unwrap();
        let level = grid.initial_price() * level_factor;
        let profile = cumulative_hit_profile(&paths, level, BarrierDirection::Up);
        prop_assert_eq!(profile.len(), paths.columns());
        for pair in profile.windows(2) {
            prop_assert!(pair[0] <= pair[1]);
        }
        let hits = observe_barrier(&paths, level, BarrierDirection::Up, Observation::Continuous).unwrap();
        prop_assert!((profile[profile.len() - 1] - hits.hit_rate()).abs() < 1e-12);
    }
}
