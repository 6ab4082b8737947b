/// Standard gate matrices.
///
/// Every constructor returns a fresh dense [`Matrix`]. Multi-qubit gates use
/// the registry's bit convention: the first qubit passed to `apply_gate` is
/// the most-significant bit of the basis index, so for `controlled(U)` the
/// control is the first name and the target the second.
use super::complex::Complex;
use super::matrix::{self, Matrix};
use crate::error::{QuantumError, Result};
use std::f64::consts::{FRAC_1_SQRT_2, PI};

fn m2(a: Complex, b: Complex, c: Complex, d: Complex) -> Matrix {
    vec![vec![a, b], vec![c, d]]
}

// ── Single-qubit gates ─────────────────────────────────────────────────────

/// Identity, the padding factor for wider groups.
pub fn identity() -> Matrix {
    matrix::identity(2)
}

/// H = (1/√2) * [[1, 1], [1, -1]]
pub fn hadamard() -> Matrix {
    let h = Complex::new(FRAC_1_SQRT_2, 0.0);
    m2(h, h, h, -h)
}

/// X = [[0, 1], [1, 0]]
pub fn pauli_x() -> Matrix {
    m2(Complex::ZERO, Complex::ONE, Complex::ONE, Complex::ZERO)
}

/// Y = [[0, -i], [i, 0]]
pub fn pauli_y() -> Matrix {
    m2(Complex::ZERO, -Complex::I, Complex::I, Complex::ZERO)
}

/// Z = [[1, 0], [0, -1]]
pub fn pauli_z() -> Matrix {
    m2(Complex::ONE, Complex::ZERO, Complex::ZERO, -Complex::ONE)
}

/// P(φ) = [[1, 0], [0, e^(iφ)]]
pub fn phase_shift(phi: f64) -> Matrix {
    m2(Complex::ONE, Complex::ZERO, Complex::ZERO, Complex::cis(phi))
}

/// S = P(π/2)
pub fn s_gate() -> Matrix {
    m2(Complex::ONE, Complex::ZERO, Complex::ZERO, Complex::I)
}

/// T = P(π/4)
pub fn t_gate() -> Matrix {
    phase_shift(PI / 4.0)
}

/// Rx(θ) = [[cos(θ/2), -i·sin(θ/2)], [-i·sin(θ/2), cos(θ/2)]]
pub fn rx(theta: f64) -> Matrix {
    let cos = Complex::new((theta / 2.0).cos(), 0.0);
    let i_sin = Complex::new(0.0, -(theta / 2.0).sin());
    m2(cos, i_sin, i_sin, cos)
}

/// Ry(θ) = [[cos(θ/2), -sin(θ/2)], [sin(θ/2), cos(θ/2)]]
pub fn ry(theta: f64) -> Matrix {
    let cos = Complex::new((theta / 2.0).cos(), 0.0);
    let sin = Complex::new((theta / 2.0).sin(), 0.0);
    m2(cos, -sin, sin, cos)
}

/// Rz(θ) = [[e^(-iθ/2), 0], [0, e^(iθ/2)]]
pub fn rz(theta: f64) -> Matrix {
    m2(
        Complex::cis(-theta / 2.0),
        Complex::ZERO,
        Complex::ZERO,
        Complex::cis(theta / 2.0),
    )
}

// ── Multi-qubit gates ──────────────────────────────────────────────────────

/// Embed `u` in the lower-right block of an identity twice its size.
///
/// The extra (control) qubit is the most-significant one. For a 2×2 `u`
/// this is the usual 4×4 controlled gate.
pub fn controlled(u: &[Vec<Complex>]) -> Result<Matrix> {
    let n = matrix::validate_matrix(u)?;
    let mut out = matrix::identity(2 * n);
    for (r, row) in u.iter().enumerate() {
        out[n + r][n..].copy_from_slice(row);
    }
    Ok(out)
}

/// CNOT = controlled(X)
pub fn controlled_not() -> Matrix {
    let mut m = matrix::identity(4);
    m[2][2] = Complex::ZERO;
    m[2][3] = Complex::ONE;
    m[3][2] = Complex::ONE;
    m[3][3] = Complex::ZERO;
    m
}

/// CCNOT = controlled(controlled(X))
pub fn toffoli() -> Matrix {
    let mut m = matrix::identity(8);
    m[6].swap(6, 7);
    m[7].swap(6, 7);
    m
}

/// SWAP exchanges |01⟩ and |10⟩.
pub fn swap() -> Matrix {
    let mut m = matrix::identity(4);
    m.swap(1, 2);
    m
}

/// N-point discrete Fourier transform: entry (r, c) = w^(rc) / √N, w = e^(2πi/N).
pub fn discrete_fourier(n: usize) -> Result<Matrix> {
    if n < 2 || !n.is_power_of_two() {
        return Err(QuantumError::dimension(format!(
            "Fourier size {n} is not a power of two >= 2"
        )));
    }
    let norm = 1.0 / (n as f64).sqrt();
    let step = 2.0 * PI / n as f64;
    Ok((0..n)
        .map(|r| {
            (0..n)
                // reduce the exponent mod n to keep the angle small
                .map(|c| Complex::from_polar(norm, step * ((r * c) % n) as f64))
                .collect()
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::matrix::multiply;

    fn nearly_eq_matrix(a: &Matrix, b: &Matrix) -> bool {
        a.len() == b.len()
            && a.iter()
                .zip(b)
                .all(|(ra, rb)| ra.iter().zip(rb).all(|(x, y)| x.approx_eq(y, 1e-12)))
    }

    #[test]
    fn test_self_inverse_gates() {
        for g in [pauli_x(), pauli_y(), pauli_z(), hadamard(), swap(), controlled_not(), toffoli()] {
            let id = matrix::identity(g.len());
            assert!(nearly_eq_matrix(&multiply(&g, &g).unwrap(), &id));
        }
    }

    #[test]
    fn test_controlled_embeds_lower_right() {
        let cy = controlled(&pauli_y()).unwrap();
        assert_eq!(cy[0][0], Complex::ONE);
        assert_eq!(cy[1][1], Complex::ONE);
        assert_eq!(cy[2][3], -Complex::I);
        assert_eq!(cy[3][2], Complex::I);
        assert_eq!(cy[2][2], Complex::ZERO);
    }

    #[test]
    fn test_cnot_and_toffoli_match_controlled() {
        assert_eq!(controlled(&pauli_x()).unwrap(), controlled_not());
        assert_eq!(controlled(&controlled_not()).unwrap(), toffoli());
    }

    #[test]
    fn test_controlled_rejects_non_power_of_two() {
        let bad = vec![vec![Complex::ONE; 3]; 3];
        assert!(matches!(controlled(&bad), Err(QuantumError::Dimension(_))));
    }

    #[test]
    fn test_swap_permutation() {
        let s = swap();
        assert_eq!(s[1][2], Complex::ONE);
        assert_eq!(s[2][1], Complex::ONE);
        assert_eq!(s[0][0], Complex::ONE);
        assert_eq!(s[3][3], Complex::ONE);
        assert_eq!(s[1][1], Complex::ZERO);
    }

    #[test]
    fn test_phase_shift_special_cases() {
        assert!(nearly_eq_matrix(&phase_shift(PI), &pauli_z()));
        assert!(nearly_eq_matrix(&phase_shift(PI / 2.0), &s_gate()));
        assert!(nearly_eq_matrix(&multiply(&t_gate(), &t_gate()).unwrap(), &s_gate()));
    }

    #[test]
    fn test_rotations_at_pi() {
        // Rx(π) = -iX, Rz(π) = -iZ
        let minus_i = Complex::new(0.0, -1.0);
        assert!(nearly_eq_matrix(&rx(PI), &matrix::scale(minus_i, &pauli_x()).unwrap()));
        assert!(nearly_eq_matrix(&rz(PI), &matrix::scale(minus_i, &pauli_z()).unwrap()));
        assert!(nearly_eq_matrix(&ry(0.0), &identity()));
    }

    #[test]
    fn test_fourier_two_is_hadamard() {
        assert!(nearly_eq_matrix(&discrete_fourier(2).unwrap(), &hadamard()));
    }

    #[test]
    fn test_fourier_entries_and_unitarity() {
        let f = discrete_fourier(4).unwrap();
        assert!(f[1][1].approx_eq(&Complex::new(0.0, 0.5), 1e-12));
        // w^6 = w^2 = -1
        assert!(f[2][3].approx_eq(&Complex::new(-0.5, 0.0), 1e-12));

        let adjoint: Matrix = (0..4).map(|r| (0..4).map(|c| f[c][r].conj()).collect()).collect();
        assert!(nearly_eq_matrix(&multiply(&f, &adjoint).unwrap(), &matrix::identity(4)));
        assert!(discrete_fourier(6).is_err());
        assert!(discrete_fourier(1).is_err());
    }
}
