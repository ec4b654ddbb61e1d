use kinetic_table::kernel::actuator::{ActuatorConfig, ActuatorModel};
use kinetic_table::kernel::grid::{Grid, GridError};

fn small_table() -> ActuatorModel {
    ActuatorModel::new(ActuatorConfig {
        rows: 4,
        cols: 4,
        max_height: 100.0,
        max_speed: 50.0,
    })
}

fn all_cells(grid: &Grid, expected: f64) -> bool {
    grid.iter().all(|v| v == expected)
}

#[test]
fn test_bounded_motion_reaches_target_without_overshoot() {
    let mut table = small_table();
    table.set_target(Grid::filled(4, 4, 100.0)).unwrap();

    // 50 mm/s for 0.1 s moves exactly 5 mm.
    table.advance(0.1);
    assert!(all_cells(&table.current_heights(), 5.0), "First step should be 5.0 everywhere");

    for _ in 0..20 {
        table.advance(0.1);
    }
    assert!(all_cells(&table.current_heights(), 100.0), "Pins should settle on the target");
}

#[test]
fn test_set_target_clamps_into_travel() {
    let mut table = small_table();
    let wild = Grid::from_fn(4, 4, |r, c| (r as f64 - 1.5) * 200.0 + c as f64);
    table.set_target(wild).unwrap();

    let target = table.target_heights();
    assert!(target.iter().all(|v| (0.0..=100.0).contains(&v)));
    assert_eq!(target.get(0, 0), Some(0.0));
    assert_eq!(target.get(3, 3), Some(100.0));
}

#[test]
fn test_set_target_rejects_wrong_shape() {
    let mut table = small_table();
    table.set_target(Grid::filled(4, 4, 40.0)).unwrap();

    let err = table.set_target(Grid::zeros(3, 5)).unwrap_err();
    assert_eq!(
        err,
        GridError::Shape { expected_rows: 4, expected_cols: 4, rows: 3, cols: 5 }
    );
    // Failed call leaves the previous target alone.
    assert!(all_cells(&table.target_heights(), 40.0));
}

#[test]
fn test_small_gap_closes_exactly() {
    let mut table = small_table();
    table.set_target(Grid::filled(4, 4, 2.5)).unwrap();
    table.advance(0.1);
    assert!(all_cells(&table.current_heights(), 2.5), "Gap below one step must not overshoot");
}

#[test]
fn test_pins_descend_at_speed_limit() {
    let mut table = small_table();
    table.set_target(Grid::filled(4, 4, 100.0)).unwrap();
    table.advance(10.0);
    assert!(all_cells(&table.current_heights(), 100.0));

    table.set_target(Grid::filled(4, 4, 0.0)).unwrap();
    table.advance(0.5);
    assert!(all_cells(&table.current_heights(), 75.0));
}

#[test]
fn test_long_stall_is_one_big_step() {
    let mut table = small_table();
    table.set_target(Grid::filled(4, 4, 60.0)).unwrap();
    table.advance(3600.0);
    assert!(all_cells(&table.current_heights(), 60.0));
}

#[test]
fn test_negative_or_nan_dt_moves_nothing() {
    let mut table = small_table();
    table.set_target(Grid::filled(4, 4, 80.0)).unwrap();
    table.advance(-1.0);
    table.advance(f64::NAN);
    assert!(all_cells(&table.current_heights(), 0.0));
}

#[test]
fn test_mixed_targets_stay_in_bounds() {
    let mut table = small_table();
    table
        .set_target(Grid::from_fn(4, 4, |r, c| ((r * 4 + c) as f64) * 7.0))
        .unwrap();
    let target = table.target_heights();
    assert_eq!(target.get(3, 3), Some(100.0));

    for _ in 0..50 {
        table.advance(0.05);
        let current = table.current_heights();
        assert!(current.iter().all(|v| (0.0..=100.0).contains(&v)));
        for (now, goal) in current.iter().zip(target.iter()) {
            assert!(now <= goal + 1e-12, "Pin passed its target: {} > {}", now, goal);
        }
    }
    assert_eq!(table.current_heights(), target);
}

#[test]
fn test_current_heights_is_a_copy() {
    let mut table = small_table();
    table.set_target(Grid::filled(4, 4, 10.0)).unwrap();
    table.advance(1.0);

    let mut copy = table.current_heights();
    copy.set(0, 0, 99.0);
    assert_eq!(table.current_heights().get(0, 0), Some(10.0));
}

#[test]
fn test_reset_flattens_table() {
    let mut table = small_table();
    table.set_target(Grid::filled(4, 4, 50.0)).unwrap();
    table.advance(1.0);
    table.reset();
    assert!(all_cells(&table.current_heights(), 0.0));
    assert!(all_cells(&table.target_heights(), 0.0));
}

#[tokio::test(start_paused = true)]
async fn test_advance_auto_uses_elapsed_time() {
    let mut table = small_table();
    table.set_target(Grid::filled(4, 4, 100.0)).unwrap();
    tokio::time::advance(std::time::Duration::from_millis(200)).await;

    let dt = table.advance_auto();
    assert!((dt - 0.2).abs() < 1e-9, "dt was {}", dt);
    let moved = table.current_heights().get(0, 0).unwrap();
    assert!((moved - 10.0).abs() < 1e-6, "moved {}", moved);
}

#[test]
fn test_degenerate_limits_hold_pins_at_zero() {
    for (max_height, max_speed) in [(-1.0, 50.0), (f64::NAN, 50.0), (100.0, -5.0), (100.0, f64::INFINITY)] {
        let mut table = ActuatorModel::new(ActuatorConfig { rows: 2, cols: 2, max_height, max_speed });
        table.set_target(Grid::filled(2, 2, 40.0)).unwrap();
        table.advance(0.1);
        let current = table.current_heights();
        assert!(current.iter().all(|v| v.is_finite() && v >= 0.0));
        assert!(table.config().max_height >= 0.0 && table.config().max_speed >= 0.0);
    }

    let mut flat = ActuatorModel::new(ActuatorConfig { rows: 2, cols: 2, max_height: -1.0, max_speed: 50.0 });
    flat.set_target(Grid::filled(2, 2, 40.0)).unwrap();
    flat.advance(0.1);
    assert!(all_cells(&flat.target_heights(), 0.0));
    assert!(all_cells(&flat.current_heights(), 0.0));
}
