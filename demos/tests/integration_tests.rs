//! Integration tests for the demo suite.

use qubridge_adapter_qulacs::QulacsBackend;
use qubridge_demos::{
    H2_GROUND_ENERGY, H2_OPTIMAL_THETA, h2_ansatz, h2_hamiltonian, minimum, scan_h2_energy,
};
use qubridge_hal::{Backend, RunMode};

#[test]
fn test_h2_optimum_reaches_ground_energy() {
    let backend = QulacsBackend::new();
    let result = backend
        .process(
            &h2_ansatz(H2_OPTIMAL_THETA).unwrap(),
            &RunMode::Expectation(h2_hamiltonian()),
        )
        .unwrap();
    let energy = result.expectation().unwrap();
    assert!((energy - H2_GROUND_ENERGY).abs() < 1e-8, "{energy}");
}

#[test]
fn test_scan_never_goes_below_ground() {
    let backend = QulacsBackend::new();
    let points = scan_h2_energy(&backend, -0.5, 0.5, 11).unwrap();
    assert_eq!(points.len(), 11);
    assert!((points[0].theta + 0.5).abs() < 1e-12);
    assert!((points[10].theta - 0.5).abs() < 1e-12);

    for point in &points {
        assert!(point.energy >= H2_GROUND_ENERGY - 1e-9);
    }

    let best = minimum(&points).unwrap();
    assert!(best.theta.abs() < 0.2);
}

#[test]
fn test_minimum_of_empty_scan() {
    assert!(minimum(&[]).is_none());
}
