//! End-to-end tests for the qulacs backend.

use num_complex::Complex64;
use std::error::Error as _;
use std::f64::consts::{FRAC_1_SQRT_2, PI};

use qubridge_adapter_qulacs::{
    QulacsBackend, QulacsConfig, ResultType, SUPPORTED_GATES, register_backends,
};
use qubridge_hal::{
    Backend, BackendConfig, BackendRegistry, BasisOrder, ExecutionResult, HalError, JobStatus,
    RunMode,
};
use qubridge_ir::{Circuit, ClbitId, IrResult, OpType, Pauli, PauliOperator, PauliString, QubitId};
use qubridge_sim::{Device, Precision};

const PARAM: f64 = -0.11176849;

fn backends() -> Vec<QulacsBackend> {
    let mut configs = vec![
        QulacsConfig::default(),
        QulacsConfig::default().with_seed(1),
        QulacsConfig::default().with_result_type(ResultType::DensityMatrix),
        QulacsConfig::default()
            .with_result_type(ResultType::DensityMatrix)
            .with_seed(1),
    ];
    if Device::Gpu.is_available() {
        configs.push(QulacsConfig::default().with_device(Device::Gpu));
        configs.push(QulacsConfig::default().with_device(Device::Gpu).with_seed(1));
        configs.push(
            QulacsConfig::default()
                .with_device(Device::Gpu)
                .with_result_type(ResultType::DensityMatrix),
        );
    }
    configs
        .into_iter()
        .map(|c| QulacsBackend::with_config(c).unwrap())
        .collect()
}

fn supports_state(b: &QulacsBackend) -> bool {
    b.capabilities().has_feature("statevector")
}

fn c(re: f64) -> Complex64 {
    Complex64::new(re, 0.0)
}

fn assert_close(actual: &[Complex64], expected: &[Complex64], tol: f64) {
    assert_eq!(actual.len(), expected.len());
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert!((a - e).norm() < tol, "index {i}: {a} != {e}");
    }
}

fn outer(v: &[Complex64]) -> Vec<Complex64> {
    v.iter()
        .flat_map(|a| v.iter().map(move |b| a * b.conj()))
        .collect()
}

/// State vector, or the density matrix, in `order`.
fn final_state(result: &ExecutionResult, order: BasisOrder) -> Vec<Complex64> {
    result
        .state_vector(order)
        .or_else(|| result.density_matrix(order))
        .unwrap()
}

fn check_state(b: &QulacsBackend, circuit: &Circuit, expected: &[Complex64], order: BasisOrder) {
    let result = b.process(circuit, &RunMode::State).unwrap();
    if supports_state(b) {
        assert_close(&final_state(&result, order), expected, 1e-10);
    } else {
        assert_close(&final_state(&result, order), &outer(expected), 1e-10);
    }
}

fn h2_3q_circ(theta: f64) -> Circuit {
    let q = QubitId;
    let mut circ = Circuit::with_size("h2_3q", 3, 0);
    circ.x(q(0)).unwrap().x(q(1)).unwrap();
    circ.rx(0.5, q(0)).unwrap().h(q(1)).unwrap().h(q(2)).unwrap();
    circ.cx(q(0), q(1)).unwrap().cx(q(1), q(2)).unwrap();
    circ.rz(-2.0 / PI * theta, q(2)).unwrap();
    circ.cx(q(1), q(2)).unwrap().cx(q(0), q(1)).unwrap();
    circ.rx(-0.5, q(0)).unwrap().h(q(1)).unwrap().h(q(2)).unwrap();
    circ
}

fn h2_4q_circ(theta: f64) -> Circuit {
    let q = QubitId;
    let mut circ = Circuit::with_size("h2_4q", 4, 0);
    circ.x(q(0)).unwrap().x(q(1)).unwrap();
    circ.rx(0.5, q(0)).unwrap();
    circ.h(q(1)).unwrap().h(q(2)).unwrap().h(q(3)).unwrap();
    circ.cx(q(0), q(1)).unwrap().cx(q(1), q(2)).unwrap().cx(q(2), q(3)).unwrap();
    circ.rz(-2.0 / PI * theta, q(3)).unwrap();
    circ.cx(q(2), q(3)).unwrap().cx(q(1), q(2)).unwrap().cx(q(0), q(1)).unwrap();
    circ.rx(-0.5, q(0)).unwrap();
    circ.h(q(1)).unwrap().h(q(2)).unwrap().h(q(3)).unwrap();
    circ
}

fn h2_hamiltonian() -> PauliOperator {
    let ps = |ops: &[(u32, Pauli)]| {
        PauliString::from_ops(ops.iter().map(|&(q, p)| (QubitId(q), p)))
    };
    use Pauli::{X, Y, Z};
    PauliOperator::from_terms(vec![
        (PauliString::identity(), 0.08406444459465776),
        (ps(&[(0, Z)]), 0.17218393261915543),
        (ps(&[(1, Z)]), 0.17218393261915546),
        (ps(&[(2, Z)]), -0.45150698444804915),
        (ps(&[(0, Z), (1, Z)]), 0.16892753870087912),
        (ps(&[(0, Z), (2, Z)]), 0.2870580651815905),
        (ps(&[(1, Z), (2, Z)]), 0.2870580651815905),
        (ps(&[(0, Y), (1, X), (2, Y)]), 0.04523279994605785),
        (ps(&[(0, X), (1, X), (2, X)]), 0.04523279994605785),
        (ps(&[(0, Y), (1, Y), (2, X)]), -0.04523279994605785),
        (ps(&[(0, X), (1, Y), (2, Y)]), 0.04523279994605785),
    ])
}

// ---------------------------------------------------------------------------
// States
// ---------------------------------------------------------------------------

#[test]
fn bell_state() {
    let mut circuit = Circuit::with_size("bell", 2, 0);
    circuit.h(QubitId(0)).unwrap().cx(QubitId(0), QubitId(1)).unwrap();
    let expected = [c(FRAC_1_SQRT_2), c(0.0), c(0.0), c(FRAC_1_SQRT_2)];
    for b in backends() {
        check_state(&b, &circuit, &expected, BasisOrder::Ilo);
    }
}

#[test]
fn basis_order() {
    let mut circuit = Circuit::with_size("x1", 2, 0);
    circuit.x(QubitId(1)).unwrap();
    for b in backends() {
        check_state(&b, &circuit, &[c(0.0), c(1.0), c(0.0), c(0.0)], BasisOrder::Ilo);
        check_state(&b, &circuit, &[c(0.0), c(0.0), c(1.0), c(0.0)], BasisOrder::Dlo);
    }

    circuit.measure_all().unwrap();
    for b in backends() {
        let result = b.process(&circuit, &RunMode::seeded_shots(4, 4)).unwrap();
        let shots = result.shots().unwrap();
        assert_eq!((shots.len(), shots.width()), (4, 2));
        let counts = result.counts().unwrap();
        assert_eq!(counts.get("01"), 4);
        assert_eq!(counts.len(), 1);
    }
}

#[test]
fn empty_circuit_is_ground_state() {
    let circuit = Circuit::with_size("empty", 3, 0);
    let mut expected = vec![c(0.0); 8];
    expected[0] = c(1.0);
    for b in backends() {
        check_state(&b, &circuit, &expected, BasisOrder::Ilo);
    }
}

// ---------------------------------------------------------------------------
// Gate references
// ---------------------------------------------------------------------------

/// Phase of `t` half-turns.
fn e(t: f64) -> Complex64 {
    Complex64::from_polar(1.0, t * PI)
}

fn permutation(dim: usize, swaps: &[(usize, usize)]) -> Vec<Complex64> {
    let mut m = vec![c(0.0); dim * dim];
    let mut image: Vec<usize> = (0..dim).collect();
    for &(a, b) in swaps {
        image.swap(a, b);
    }
    for (col, &row) in image.iter().enumerate() {
        m[row * dim + col] = c(1.0);
    }
    m
}

fn diag(entries: &[Complex64]) -> Vec<Complex64> {
    let dim = entries.len();
    let mut m = vec![c(0.0); dim * dim];
    for (k, &d) in entries.iter().enumerate() {
        m[k * dim + k] = d;
    }
    m
}

const A: f64 = 0.3;
const B: f64 = 0.7;
const L: f64 = -0.4;

/// Append `op` on qubits `0..arity` with the angles above.
fn apply_op(circ: &mut Circuit, op: OpType) -> IrResult<()> {
    let q = QubitId;
    let appended = match op {
        OpType::X => circ.x(q(0)),
        OpType::Y => circ.y(q(0)),
        OpType::Z => circ.z(q(0)),
        OpType::H => circ.h(q(0)),
        OpType::S => circ.s(q(0)),
        OpType::Sdg => circ.sdg(q(0)),
        OpType::T => circ.t(q(0)),
        OpType::Tdg => circ.tdg(q(0)),
        OpType::SX => circ.sx(q(0)),
        OpType::SXdg => circ.sxdg(q(0)),
        OpType::Rx => circ.rx(A, q(0)),
        OpType::Ry => circ.ry(A, q(0)),
        OpType::Rz => circ.rz(A, q(0)),
        OpType::U1 => circ.u1(L, q(0)),
        OpType::U2 => circ.u2(B, L, q(0)),
        OpType::U3 => circ.u3(A, B, L, q(0)),
        OpType::CX => circ.cx(q(0), q(1)),
        OpType::CY => circ.cy(q(0), q(1)),
        OpType::CZ => circ.cz(q(0), q(1)),
        OpType::Swap => circ.swap(q(0), q(1)),
        OpType::CCX => circ.ccx(q(0), q(1), q(2)),
        OpType::CSwap => circ.cswap(q(0), q(1), q(2)),
        other => panic!("no reference for {other:?}"),
    };
    appended.map(|_| ())
}

/// Unitary of `op` in ILO order (qubit 0 most significant), row-major.
fn reference(op: OpType) -> Vec<Complex64> {
    let i = Complex64::i();
    let r = c(FRAC_1_SQRT_2);
    let half = |t: f64| (t * PI / 2.0).cos();
    let half_s = |t: f64| (t * PI / 2.0).sin();
    match op {
        OpType::X => vec![c(0.0), c(1.0), c(1.0), c(0.0)],
        OpType::Y => vec![c(0.0), -i, i, c(0.0)],
        OpType::Z => diag(&[c(1.0), c(-1.0)]),
        OpType::H => vec![r, r, r, -r],
        OpType::S => diag(&[c(1.0), i]),
        OpType::Sdg => diag(&[c(1.0), -i]),
        OpType::T => diag(&[c(1.0), e(0.25)]),
        OpType::Tdg => diag(&[c(1.0), e(-0.25)]),
        OpType::SX => vec![(1.0 + i) / 2.0, (1.0 - i) / 2.0, (1.0 - i) / 2.0, (1.0 + i) / 2.0],
        OpType::SXdg => vec![(1.0 - i) / 2.0, (1.0 + i) / 2.0, (1.0 + i) / 2.0, (1.0 - i) / 2.0],
        OpType::Rx => vec![
            c(half(A)),
            -i * half_s(A),
            -i * half_s(A),
            c(half(A)),
        ],
        OpType::Ry => vec![c(half(A)), c(-half_s(A)), c(half_s(A)), c(half(A))],
        OpType::Rz => diag(&[e(-A / 2.0), e(A / 2.0)]),
        OpType::U1 => diag(&[c(1.0), e(L)]),
        OpType::U2 => vec![r, -e(L) * r, e(B) * r, e(B + L) * r],
        OpType::U3 => vec![
            c(half(A)),
            -e(L) * half_s(A),
            e(B) * half_s(A),
            e(B + L) * half(A),
        ],
        OpType::CX => permutation(4, &[(2, 3)]),
        OpType::CY => {
            let mut m = diag(&[c(1.0), c(1.0), c(0.0), c(0.0)]);
            m[2 * 4 + 3] = -i;
            m[3 * 4 + 2] = i;
            m
        }
        OpType::CZ => diag(&[c(1.0), c(1.0), c(1.0), c(-1.0)]),
        OpType::Swap => permutation(4, &[(1, 2)]),
        OpType::CCX => permutation(8, &[(6, 7)]),
        OpType::CSwap => permutation(8, &[(5, 6)]),
        other => panic!("no reference for {other:?}"),
    }
}

#[test]
fn every_supported_gate_matches_reference() {
    let backends = backends();
    for &op in SUPPORTED_GATES {
        let n = op.num_qubits();
        let dim = 1_usize << n;
        let m = reference(op);
        assert_eq!(m.len(), dim * dim, "{op:?}");

        // Column k of the unitary is the image of basis state k.
        for k in 0..dim {
            let mut circuit = Circuit::with_size(op.name(), n, 0);
            for j in 0..n {
                if (k >> (n - 1 - j)) & 1 == 1 {
                    circuit.x(QubitId(j)).unwrap();
                }
            }
            apply_op(&mut circuit, op).unwrap();
            let expected: Vec<_> = (0..dim).map(|row| m[row * dim + k]).collect();
            for b in &backends {
                check_state(b, &circuit, &expected, BasisOrder::Ilo);
            }
        }
    }
}

#[test]
fn gate_order_is_preserved() {
    let mut hx = Circuit::with_size("hx", 1, 0);
    hx.h(QubitId(0)).unwrap().x(QubitId(0)).unwrap();
    let mut xh = Circuit::with_size("xh", 1, 0);
    xh.x(QubitId(0)).unwrap().h(QubitId(0)).unwrap();

    let mut h_cx = Circuit::with_size("h_cx", 2, 0);
    h_cx.h(QubitId(0)).unwrap().cx(QubitId(0), QubitId(1)).unwrap();
    let mut cx_h = Circuit::with_size("cx_h", 2, 0);
    cx_h.cx(QubitId(0), QubitId(1)).unwrap().h(QubitId(0)).unwrap();

    let r = FRAC_1_SQRT_2;
    for b in backends() {
        check_state(&b, &hx, &[c(r), c(r)], BasisOrder::Ilo);
        check_state(&b, &xh, &[c(r), c(-r)], BasisOrder::Ilo);
        check_state(&b, &h_cx, &[c(r), c(0.0), c(0.0), c(r)], BasisOrder::Ilo);
        check_state(&b, &cx_h, &[c(r), c(0.0), c(r), c(0.0)], BasisOrder::Ilo);
    }
}

#[test]
fn statevector_phase() {
    let mut circuit = Circuit::with_size("bell", 2, 0);
    circuit.h(QubitId(0)).unwrap().cx(QubitId(0), QubitId(1)).unwrap();
    for b in backends().into_iter().filter(supports_state) {
        let state = final_state(&b.process(&circuit, &RunMode::State).unwrap(), BasisOrder::Ilo);
        let mut shifted = circuit.clone();
        shifted.add_phase(0.5);
        let state1 = final_state(&b.process(&shifted, &RunMode::State).unwrap(), BasisOrder::Ilo);
        let expected: Vec<_> = state.iter().map(|a| a * Complex64::i()).collect();
        assert_close(&state1, &expected, 1e-10);
    }
}

#[test]
fn h2_4q_state() {
    let circuit = h2_4q_circ(PARAM);
    let mut expected = vec![c(0.0); 16];
    expected[3] = c(-0.11153592967168438);
    expected[12] = c(0.9937604019039358);
    for b in backends() {
        let result = b.process(&circuit, &RunMode::State).unwrap();
        let tol = 1e-8;
        if supports_state(&b) {
            assert_close(&final_state(&result, BasisOrder::Ilo), &expected, tol);
        } else {
            assert_close(&final_state(&result, BasisOrder::Ilo), &outer(&expected), tol);
        }
    }
}

#[test]
fn register_offsets() {
    let mut circuit = Circuit::new("regs");
    circuit.add_qreg("a", 1).unwrap();
    let b_reg = circuit.add_qreg("b", 2).unwrap();
    circuit.x(b_reg[1]).unwrap();

    // a[0], b[0], b[1] -> |001⟩
    let mut expected = vec![c(0.0); 8];
    expected[1] = c(1.0);
    check_state(&QulacsBackend::new(), &circuit, &expected, BasisOrder::Ilo);
}

#[test]
fn single_precision_close_to_double() {
    let circuit = h2_4q_circ(PARAM);
    let single =
        QulacsBackend::with_config(QulacsConfig::default().with_precision(Precision::Single))
            .unwrap();
    let double = QulacsBackend::new();
    let s = final_state(&single.process(&circuit, &RunMode::State).unwrap(), BasisOrder::Ilo);
    let d = final_state(&double.process(&circuit, &RunMode::State).unwrap(), BasisOrder::Ilo);
    assert_close(&s, &d, 1e-5);
}

// ---------------------------------------------------------------------------
// Expectation values
// ---------------------------------------------------------------------------

#[test]
fn h2_energy() {
    let target = -1.1373060357534004;
    let circuit = h2_3q_circ(PARAM);
    let hamiltonian = h2_hamiltonian();
    for b in backends() {
        let result = b
            .process(&circuit, &RunMode::Expectation(hamiltonian.clone()))
            .unwrap();
        let energy = result.expectation().unwrap();
        assert!((energy - target).abs() < 1e-8, "{}: {energy}", b.name());
    }
}

#[test]
fn expectation_on_unknown_qubit_fails() {
    let circuit = Circuit::with_size("t", 2, 0);
    let mut op = PauliOperator::new();
    op.add_term(PauliString::from_ops([(QubitId(5), Pauli::Z)]), 1.0);
    assert!(matches!(
        QulacsBackend::new().process(&circuit, &RunMode::Expectation(op)),
        Err(HalError::IncompatibleCircuit(_))
    ));
}

// ---------------------------------------------------------------------------
// Shots
// ---------------------------------------------------------------------------

#[test]
fn bell_shots() {
    let circuit = Circuit::bell().unwrap();
    for b in backends() {
        let counts = b.process(&circuit, &RunMode::shots(1000)).unwrap().counts().unwrap();
        assert_eq!(counts.get("00") + counts.get("11"), 1000);
        assert_eq!(counts.get("01") + counts.get("10"), 0);
    }
}

#[test]
fn measurement_mask() {
    let mut circ1 = Circuit::with_size("m1", 2, 2);
    circ1.x(QubitId(0)).unwrap().x(QubitId(1)).unwrap().measure_all().unwrap();
    let mut circ2 = Circuit::with_size("m2", 2, 2);
    circ2.x(QubitId(0)).unwrap().measure_all().unwrap();
    let mut circ3 = Circuit::with_size("m3", 2, 1);
    circ3.x(QubitId(1)).unwrap().measure(QubitId(0), ClbitId(0)).unwrap();
    let mut circ4 = Circuit::with_size("m4", 3, 2);
    circ4
        .x(QubitId(0))
        .unwrap()
        .measure(QubitId(0), ClbitId(0))
        .unwrap()
        .measure(QubitId(2), ClbitId(1))
        .unwrap();

    let cases: [(&Circuit, Vec<u8>); 4] = [
        (&circ1, vec![1, 1]),
        (&circ2, vec![1, 0]),
        (&circ3, vec![0]),
        (&circ4, vec![1, 0]),
    ];
    for b in backends() {
        for (circuit, target) in &cases {
            let result = b.process(circuit, &RunMode::shots(10)).unwrap();
            let shots = result.shots().unwrap();
            assert_eq!(shots.len(), 10);
            for row in shots.rows() {
                assert_eq!(row, target);
            }
        }
    }
}

#[test]
fn no_measure_shots() {
    let mut circuit = Circuit::with_size("nm", 2, 2);
    circuit.h(QubitId(0)).unwrap().x(QubitId(1)).unwrap();
    for b in backends() {
        let result = b.process(&circuit, &RunMode::shots(20)).unwrap();
        assert!(result.shots().unwrap().rows().iter().all(|r| r == &[0, 0]));
        assert_eq!(result.counts().unwrap().get("00"), 20);
    }
}

#[test]
fn shots_bits_edge_cases() {
    for n_bits in 0..=6u32 {
        for n_shots in 1..=4usize {
            let circuit = Circuit::with_size("edge", n_bits, n_bits);
            for b in backends() {
                let result = b.process(&circuit, &RunMode::shots(n_shots)).unwrap();
                let shots = result.shots().unwrap();
                assert_eq!((shots.len(), shots.width()), (n_shots, n_bits as usize));
                assert!(shots.rows().iter().all(|r| r.iter().all(|&bit| bit == 0)));

                let counts = result.counts().unwrap();
                assert_eq!(counts.len(), 1);
                assert_eq!(counts.get(&"0".repeat(n_bits as usize)), n_shots as u64);
            }
        }
    }
}

#[test]
fn seeded_shots_reproducible() {
    let mut circuit = Circuit::with_size("rand", 4, 0);
    for i in 0..4 {
        circuit.h(QubitId(i)).unwrap();
    }
    circuit.measure_all().unwrap();

    let b = QulacsBackend::new();
    let first = b.process(&circuit, &RunMode::seeded_shots(200, 42)).unwrap();
    let second = b.process(&circuit, &RunMode::seeded_shots(200, 42)).unwrap();
    assert_eq!(first.shots(), second.shots());
    assert_eq!(first.metadata.seed, Some(42));

    // Config seed applies when the run has none.
    let seeded = QulacsBackend::with_config(QulacsConfig::default().with_seed(42)).unwrap();
    let third = seeded.process(&circuit, &RunMode::shots(200)).unwrap();
    assert_eq!(first.shots(), third.shots());
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[test]
fn unsupported_gate() {
    let mut circuit = Circuit::with_size("ch", 2, 0);
    circuit.h(QubitId(0)).unwrap().ch(QubitId(0), QubitId(1)).unwrap();
    let err = QulacsBackend::new().prepare(&circuit).unwrap_err();
    assert!(matches!(
        err,
        HalError::UnsupportedGate { ref gate, position: 1 } if gate == "ch"
    ));
}

#[test]
fn too_many_qubits() {
    let b = QulacsBackend::with_config(QulacsConfig::default().with_max_qubits(5)).unwrap();
    let circuit = Circuit::with_size("wide", 10, 0);
    assert!(matches!(b.prepare(&circuit), Err(HalError::IncompatibleCircuit(_))));
}

#[test]
fn allocation_failure_is_execution_error() {
    let b = QulacsBackend::with_config(QulacsConfig::default().with_max_qubits(60)).unwrap();
    let circuit = Circuit::with_size("huge", 60, 0);
    let prepared = b.prepare(&circuit).unwrap();
    let err = b.run(&prepared, &RunMode::State).unwrap_err();
    assert!(matches!(err, HalError::Execution { .. }));
    assert!(err.source().is_some());
}

#[test]
fn gpu_variant() {
    match QulacsBackend::gpu() {
        Ok(gpu) => {
            assert!(Device::Gpu.is_available());
            assert_eq!(gpu.name(), "qulacs-gpu");
            assert!(gpu.capabilities().has_feature("gpu"));
            let circuit = h2_4q_circ(PARAM);
            let a = QulacsBackend::new().process(&circuit, &RunMode::State).unwrap();
            let g = gpu.process(&circuit, &RunMode::State).unwrap();
            assert_close(
                &final_state(&g, BasisOrder::Ilo),
                &final_state(&a, BasisOrder::Ilo),
                1e-10,
            );
        }
        Err(err) => {
            assert!(!Device::Gpu.is_available());
            assert!(matches!(err, HalError::BackendUnavailable(_)));
        }
    }
}

// ---------------------------------------------------------------------------
// Cache, jobs and registry
// ---------------------------------------------------------------------------

#[test]
fn prepare_cache_hit() {
    let circuit = h2_3q_circ(PARAM);
    let b = QulacsBackend::new();
    let first = b.prepare(&circuit).unwrap();
    let second = b.prepare(&circuit.clone()).unwrap();
    assert_eq!(first.key(), second.key());
    assert!(first.shares_native_with(&second));
    assert_eq!(b.cached_circuits(), 1);

    let uncached = QulacsBackend::with_config(QulacsConfig::default().with_cache(false)).unwrap();
    let first = uncached.prepare(&circuit).unwrap();
    let second = uncached.prepare(&circuit).unwrap();
    assert!(!first.shares_native_with(&second));
    assert_eq!(uncached.cached_circuits(), 0);
}

#[test]
fn job_round_trip() {
    let b = QulacsBackend::new();
    let job_id = b.submit(&Circuit::bell().unwrap(), RunMode::shots(100)).unwrap();
    assert_eq!(b.status(&job_id).unwrap(), JobStatus::Completed);
    assert_eq!(b.pending_jobs(), 1);
    let result = b.result(&job_id).unwrap();
    assert_eq!(result.shots().unwrap().len(), 100);
    assert_eq!(result.metadata.backend, "qulacs");

    // Retrieval hands the result over and forgets the job.
    assert_eq!(b.pending_jobs(), 0);
    assert!(matches!(b.result(&job_id), Err(HalError::JobNotFound(_))));
    assert!(matches!(b.status(&job_id), Err(HalError::JobNotFound(_))));

    let missing = qubridge_hal::JobId::new("missing");
    assert!(matches!(b.status(&missing), Err(HalError::JobNotFound(_))));
    assert!(matches!(b.result(&missing), Err(HalError::JobNotFound(_))));
}

#[test]
fn failed_job_keeps_reason() {
    let b = QulacsBackend::new();
    let mut op = PauliOperator::new();
    op.add_term(PauliString::from_ops([(QubitId(9), Pauli::X)]), 1.0);
    let job_id = b
        .submit(&Circuit::with_size("t", 1, 0), RunMode::Expectation(op))
        .unwrap();
    assert!(matches!(b.status(&job_id).unwrap(), JobStatus::Failed(_)));
    assert!(matches!(b.result(&job_id), Err(HalError::JobFailed(_))));
    assert!(matches!(b.result(&job_id), Err(HalError::JobNotFound(_))));
}

#[test]
fn scan_keeps_backend_state_bounded() {
    let b = QulacsBackend::with_config(QulacsConfig::default().with_cache_capacity(16)).unwrap();
    for i in 0..200 {
        let mut circuit = Circuit::with_size("scan", 1, 0);
        circuit.ry(i as f64 / 200.0, QubitId(0)).unwrap();
        b.process(&circuit, &RunMode::State).unwrap();
        let job_id = b.submit(&circuit, RunMode::State).unwrap();
        b.result(&job_id).unwrap();
        assert!(b.cached_circuits() <= 16);
    }
    assert_eq!(b.cached_circuits(), 16);
    assert_eq!(b.pending_jobs(), 0);

    b.clear_cache();
    assert_eq!(b.cached_circuits(), 0);
}

#[test]
fn cache_evicts_oldest_first() {
    let b = QulacsBackend::with_config(QulacsConfig::default().with_cache_capacity(2)).unwrap();
    let circuits: Vec<Circuit> = (0..3)
        .map(|i| {
            let mut circuit = Circuit::with_size("evict", 1, 0);
            circuit.rx(0.1 * f64::from(i), QubitId(0)).unwrap();
            circuit
        })
        .collect();
    let first = b.prepare(&circuits[0]).unwrap();
    let second = b.prepare(&circuits[1]).unwrap();
    b.prepare(&circuits[2]).unwrap();
    assert_eq!(b.cached_circuits(), 2);

    assert!(b.prepare(&circuits[1]).unwrap().shares_native_with(&second));
    assert!(!b.prepare(&circuits[0]).unwrap().shares_native_with(&first));
}

#[test]
fn registry_creates_both_variants() {
    let mut registry = BackendRegistry::new();
    register_backends(&mut registry);
    assert_eq!(registry.available_backends(), vec!["qulacs", "qulacs-gpu"]);

    let config = BackendConfig::new("qulacs").with_extra("result_type", "density_matrix".into());
    let backend = registry.create("qulacs", config).unwrap();
    assert!(backend.capabilities().has_feature("density_matrix"));
    let result = backend.process(&Circuit::bell().unwrap(), &RunMode::State).unwrap();
    assert!(result.density_matrix(BasisOrder::Ilo).is_some());

    match registry.create("qulacs-gpu", BackendConfig::new("qulacs-gpu")) {
        Ok(gpu) => assert!(gpu.capabilities().has_feature("gpu")),
        Err(err) => assert!(matches!(err, HalError::BackendUnavailable(_))),
    }
}

#[test]
fn registry_names_follow_device() {
    let mut registry = BackendRegistry::new();
    register_backends(&mut registry);

    let conflicting = BackendConfig::new("qulacs-gpu").with_extra("device", "cpu".into());
    assert!(matches!(
        registry.create("qulacs-gpu", conflicting),
        Err(HalError::Configuration(_))
    ));

    let on_gpu = BackendConfig::new("qulacs").with_extra("device", "gpu".into());
    match registry.create("qulacs", on_gpu) {
        Ok(backend) => {
            assert_eq!(backend.name(), "qulacs-gpu");
            assert!(backend.capabilities().has_feature("gpu"));
        }
        Err(err) => {
            assert!(!Device::Gpu.is_available());
            assert!(matches!(err, HalError::BackendUnavailable(_)));
        }
    }

    let explicit = BackendConfig::new("qulacs-gpu").with_extra("device", "gpu".into());
    if Device::Gpu.is_available() {
        assert_eq!(registry.create("qulacs-gpu", explicit).unwrap().name(), "qulacs-gpu");
    }
}
