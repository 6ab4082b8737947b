//! Canned two-party protocols built on [`QuantumSystem`].
//!
//! Everything here goes through the public registry API only: qubit
//! creation, gate application and measurement.
//!
//! Bell selectors pick the pre-entanglement basis states. Bit 0 of the
//! selector is the first qubit's state, bit 1 the second's. This puts both
//! equal-bit Bell states at selectors 0 and 1, so `measure_bell` returns
//! `(selector & 1, selector >> 1)`:
//!
//! | selector | first, second | Bell state            |
//! |----------|---------------|-----------------------|
//! | 0        | \|0⟩, \|0⟩    | (\|00⟩ + \|11⟩) / √2  |
//! | 1        | \|1⟩, \|0⟩    | (\|00⟩ − \|11⟩) / √2  |
//! | 2        | \|0⟩, \|1⟩    | (\|01⟩ + \|10⟩) / √2  |
//! | 3        | \|1⟩, \|1⟩    | (\|01⟩ − \|10⟩) / √2  |

use crate::core::{gates, matrix, QuantumSystem};
use crate::error::{QuantumError, Result};

fn check_bit(name: &str, value: u8) -> Result<()> {
    if value > 1 {
        return Err(QuantumError::invalid_argument(
            name,
            format!("classical bit must be 0 or 1, got {value}"),
        ));
    }
    Ok(())
}

/// Create `first` and `second` and entangle them into the Bell state chosen
/// by `selector` (0..=3).
pub fn prepare_bell(sys: &mut QuantumSystem, first: &str, second: &str, selector: u8) -> Result<()> {
    if selector > 3 {
        return Err(QuantumError::invalid_argument(
            "selector",
            format!("Bell selector must be in 0..=3, got {selector}"),
        ));
    }
    if first == second {
        return Err(QuantumError::DuplicateQubit(first.to_string()));
    }
    // check both names before creating either
    for name in [first, second] {
        if sys.is_live(name) {
            return Err(QuantumError::NameCollision(name.to_string()));
        }
    }

    let basis = |bit: u8| if bit == 0 { (1.0, 0.0) } else { (0.0, 1.0) };
    let (a0, a1) = basis(selector & 1);
    sys.create_qubit(first, a0, a1)?;
    let (b0, b1) = basis(selector >> 1);
    sys.create_qubit(second, b0, b1)?;

    sys.h(first)?.cnot(first, second)?;
    Ok(())
}

/// Apply I, X, Z or Z·X to `qubit` for the bit pair (bit1, bit2).
///
/// bit1 selects Z, bit2 selects X; when both are set X acts first.
pub fn encode_bell(sys: &mut QuantumSystem, bit1: u8, bit2: u8, qubit: &str) -> Result<()> {
    check_bit("bit1", bit1)?;
    check_bit("bit2", bit2)?;
    let gate = match (bit1, bit2) {
        (0, 0) => gates::identity(),
        (0, _) => gates::pauli_x(),
        (_, 0) => gates::pauli_z(),
        _ => matrix::multiply(&gates::pauli_z(), &gates::pauli_x())?,
    };
    sys.apply_gate(&gate, &[qubit])
}

/// Measure `first` and `second` in the Bell basis.
///
/// Undoes the entangling circuit (CNOT then H) and measures both qubits,
/// `first` before `second`.
pub fn measure_bell(sys: &mut QuantumSystem, first: &str, second: &str) -> Result<(u8, u8)> {
    sys.cnot(first, second)?.h(first)?;
    let b1 = sys.measure_qubit(first)?;
    let b2 = sys.measure_qubit(second)?;
    Ok((b1, b2))
}

/// Send two classical bits through one qubit of a shared Bell pair.
///
/// Creates `sender` and `receiver`; returns the bits the receiver decodes.
pub fn send_superdense(
    sys: &mut QuantumSystem,
    a1: u8,
    a2: u8,
    sender: &str,
    receiver: &str,
) -> Result<(u8, u8)> {
    check_bit("a1", a1)?;
    check_bit("a2", a2)?;
    prepare_bell(sys, sender, receiver, 0)?;
    encode_bell(sys, a1, a2, sender)?;
    measure_bell(sys, sender, receiver)
}

/// Move the state of `from` onto a freshly created `to`, using `via` as
/// the sender's half of the Bell pair.
///
/// `from` must be live; `via` and `to` must not be. Afterwards `from` and
/// `via` hold classical values and `to` holds the original state of `from`
/// (including any entanglement `from` had). Returns the two classical bits
/// that were sent.
pub fn teleport_qubit(sys: &mut QuantumSystem, from: &str, via: &str, to: &str) -> Result<(u8, u8)> {
    if !sys.is_live(from) {
        return Err(QuantumError::UnknownQubit(from.to_string()));
    }
    prepare_bell(sys, via, to, 0)?;
    let (b1, b2) = measure_bell(sys, from, via)?;
    encode_bell(sys, b1, b2, to)?;
    tracing::debug!(from, to, b1, b2, "teleported qubit");
    Ok((b1, b2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Complex;

    #[test]
    fn test_prepare_bell_states() {
        let h = std::f64::consts::FRAC_1_SQRT_2;
        let expected = [
            [h, 0.0, 0.0, h],
            [h, 0.0, 0.0, -h],
            [0.0, h, h, 0.0],
            [0.0, h, -h, 0.0],
        ];
        for (selector, amps) in expected.iter().enumerate() {
            let mut sys = QuantumSystem::with_seed(0);
            prepare_bell(&mut sys, "A", "B", selector as u8).unwrap();
            let got = sys.state_vector_of("A").unwrap();
            for (g, &e) in got.iter().zip(amps) {
                assert!(g.approx_eq(&Complex::from(e), 1e-12), "selector {selector}");
            }
        }
    }

    #[test]
    fn test_measure_bell_inverts_prepare() {
        for selector in 0..4u8 {
            let mut sys = QuantumSystem::with_seed(u64::from(selector));
            prepare_bell(&mut sys, "A", "B", selector).unwrap();
            let bits = measure_bell(&mut sys, "A", "B").unwrap();
            assert_eq!(bits, (selector & 1, selector >> 1));
        }
    }

    #[test]
    fn test_encode_bell_gates() {
        let mut sys = QuantumSystem::with_seed(0);
        sys.create_qubit("Q", 0.6, 0.8).unwrap();
        encode_bell(&mut sys, 1, 1, "Q").unwrap();
        // Z·X (0.6, 0.8) = Z (0.8, 0.6) = (0.8, -0.6)
        let v = sys.state_vector_of("Q").unwrap();
        assert!(v[0].approx_eq(&Complex::from(0.8), 1e-12));
        assert!(v[1].approx_eq(&Complex::from(-0.6), 1e-12));
    }

    #[test]
    fn test_argument_validation() {
        let mut sys = QuantumSystem::with_seed(0);
        assert!(matches!(
            prepare_bell(&mut sys, "A", "B", 4),
            Err(QuantumError::InvalidArgument { .. })
        ));
        assert!(matches!(
            prepare_bell(&mut sys, "A", "A", 0),
            Err(QuantumError::DuplicateQubit(_))
        ));
        assert_eq!(sys.num_qubits(), 0);

        sys.create_qubit("Q", 1.0, 0.0).unwrap();
        assert!(matches!(
            encode_bell(&mut sys, 2, 0, "Q"),
            Err(QuantumError::InvalidArgument { .. })
        ));
        assert_eq!(
            teleport_qubit(&mut sys, "missing", "A", "B"),
            Err(QuantumError::UnknownQubit("missing".into()))
        );
        assert!(!sys.is_live("A"));
    }
}
