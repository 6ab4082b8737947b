//! Protocol-level scenarios: Bell statistics, superdense coding and
//! teleportation, all run against the public API with fixed seeds.

use entangle::protocols::{encode_bell, measure_bell, prepare_bell, send_superdense, teleport_qubit};
use entangle::{gates, matrix, Complex, QuantumError, QuantumSystem};

const TRIALS: usize = 10_000;

fn assert_state(sys: &QuantumSystem, name: &str, expected: &[Complex]) {
    let got = sys.state_vector_of(name).unwrap();
    assert_eq!(got.len(), expected.len(), "length of {name}'s group");
    for (i, (g, e)) in got.iter().zip(expected).enumerate() {
        assert!(g.approx_eq(e, 1e-12), "{name}[{i}] = {g}, expected {e}");
    }
}

// ============================================================================
// Bell pairs
// ============================================================================

#[test]
fn bell_pairs_measure_equal_bits_for_selectors_0_and_1() {
    let mut sys = QuantumSystem::with_seed(2016);
    for selector in [0u8, 1] {
        let mut counts = [0usize; 4];
        for _ in 0..TRIALS {
            sys.clear();
            prepare_bell(&mut sys, "A", "B", selector).unwrap();
            let a = sys.measure_qubit("A").unwrap();
            let b = sys.measure_qubit("B").unwrap();
            assert_eq!(a, b, "selector {selector} produced unequal bits");
            counts[usize::from(a << 1 | b)] += 1;
        }
        assert_eq!(counts[0] + counts[3], TRIALS);
        let frac = counts[0] as f64 / TRIALS as f64;
        assert!((frac - 0.5).abs() < 0.03, "selector {selector}: P(00) = {frac}");
    }
}

#[test]
fn bell_pairs_measure_opposite_bits_for_selectors_2_and_3() {
    let mut sys = QuantumSystem::with_seed(7);
    for selector in [2u8, 3] {
        for _ in 0..500 {
            sys.clear();
            prepare_bell(&mut sys, "A", "B", selector).unwrap();
            let a = sys.measure_qubit("A").unwrap();
            let b = sys.measure_qubit("B").unwrap();
            assert_ne!(a, b);
        }
    }
}

#[test]
fn bell_measurement_recovers_selector() {
    let mut sys = QuantumSystem::with_seed(1);
    for selector in 0..4u8 {
        for _ in 0..50 {
            sys.clear();
            prepare_bell(&mut sys, "A", "B", selector).unwrap();
            assert_eq!(
                measure_bell(&mut sys, "A", "B").unwrap(),
                (selector & 1, selector >> 1)
            );
        }
    }
}

// ============================================================================
// Superdense coding
// ============================================================================

#[test]
fn superdense_coding_is_deterministic() {
    for seed in 0..25u64 {
        let mut sys = QuantumSystem::with_seed(seed);
        for (a1, a2) in [(0, 0), (0, 1), (1, 0), (1, 1)] {
            sys.clear();
            assert_eq!(send_superdense(&mut sys, a1, a2, "A", "B").unwrap(), (a1, a2));
            assert!(sys.is_consistent());
        }
    }
}

#[test]
fn superdense_rejects_live_names() {
    let mut sys = QuantumSystem::with_seed(0);
    sys.create_qubit("B", 1.0, 0.0).unwrap();
    assert_eq!(
        send_superdense(&mut sys, 0, 1, "A", "B"),
        Err(QuantumError::NameCollision("B".into()))
    );
    assert!(!sys.is_live("A"));
}

// ============================================================================
// Teleportation
// ============================================================================

#[test]
fn teleport_moves_real_state() {
    for seed in 0..40u64 {
        let mut sys = QuantumSystem::with_seed(seed);
        sys.create_qubit("C", 0.6, 0.8).unwrap();
        teleport_qubit(&mut sys, "C", "A", "B").unwrap();

        assert_eq!(sys.group_order_of("B").unwrap(), vec!["B"]);
        assert_state(&sys, "B", &[Complex::from(0.6), Complex::from(0.8)]);
        // sender side is classical
        assert_eq!(sys.group_order_of("C").unwrap(), vec!["C"]);
        assert_eq!(sys.group_order_of("A").unwrap(), vec!["A"]);
        assert!(sys.is_consistent());
    }
}

#[test]
fn teleport_moves_complex_state() {
    let a0 = Complex::new(0.6, 0.0);
    let a1 = Complex::new(0.0, 0.8);
    for seed in 0..40u64 {
        let mut sys = QuantumSystem::with_seed(seed);
        sys.create_qubit("C", a0, a1).unwrap();
        teleport_qubit(&mut sys, "C", "A", "B").unwrap();
        assert_state(&sys, "B", &[a0, a1]);
    }
}

#[test]
fn teleport_carries_entanglement() {
    // A is entangled with B; after teleporting A to D, D is entangled with B.
    for seed in 0..100u64 {
        let mut sys = QuantumSystem::with_seed(seed);
        prepare_bell(&mut sys, "A", "B", 0).unwrap();
        teleport_qubit(&mut sys, "A", "C", "D").unwrap();
        let mut order = sys.group_order_of("D").unwrap();
        order.sort();
        assert_eq!(order, vec!["B", "D"]);

        let d = sys.measure_qubit("D").unwrap();
        let b = sys.measure_qubit("B").unwrap();
        assert_eq!(d, b);
    }
}

#[test]
fn encode_bell_on_unknown_qubit() {
    let mut sys = QuantumSystem::with_seed(0);
    assert_eq!(
        encode_bell(&mut sys, 0, 0, "nobody"),
        Err(QuantumError::UnknownQubit("nobody".into()))
    );
}

// ============================================================================
// Concrete two-qubit scenario
// ============================================================================

#[test]
fn cnot_scenario_joint_amplitudes_and_marginals() {
    let a = [Complex::from(0.6), Complex::from(0.8)];
    let b = [Complex::from(0.8), Complex::from(0.6)];
    // Recompute the joint state from the four input amplitudes
    let joint = matrix::apply(&gates::controlled_not(), &matrix::kron_vec(&a, &b).unwrap()).unwrap();
    let expected = [a[0] * b[0], a[0] * b[1], a[1] * b[1], a[1] * b[0]];
    for (j, e) in joint.iter().zip(&expected) {
        assert!(j.approx_eq(e, 1e-15));
    }
    let probs: Vec<f64> = joint.iter().map(Complex::norm_sq).collect();

    let mut sys = QuantumSystem::with_seed(42);
    let mut counts = [0usize; 4];
    for trial in 0..TRIALS {
        sys.clear();
        sys.create_qubit("A", 0.6, 0.8).unwrap();
        sys.create_qubit("B", 0.8, 0.6).unwrap();
        sys.apply_gate(&gates::controlled_not(), &["A", "B"]).unwrap();
        if trial == 0 {
            assert_state(&sys, "A", &joint);
        }
        let m_a = sys.measure_qubit("A").unwrap();
        let m_b = sys.measure_qubit("B").unwrap();
        counts[usize::from(m_a << 1 | m_b)] += 1;
    }

    for (i, (&count, &p)) in counts.iter().zip(&probs).enumerate() {
        let freq = count as f64 / TRIALS as f64;
        assert!((freq - p).abs() < 0.03, "outcome {i:02b}: {freq} vs {p}");
    }
}

#[test]
fn single_qubit_measurement_frequency() {
    let mut sys = QuantumSystem::with_seed(3664);
    let mut ones = 0usize;
    for _ in 0..TRIALS {
        sys.clear();
        sys.create_qubit("A", 0.6, 0.8).unwrap();
        ones += usize::from(sys.measure_qubit("A").unwrap());
    }
    let freq = ones as f64 / TRIALS as f64;
    assert!((freq - 0.64).abs() < 0.03, "P(1) = {freq}");
}
