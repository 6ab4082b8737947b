/// Dense complex matrix primitives.
///
/// Matrices are row-major `Vec<Vec<Complex>>` so that caller-built gates can
/// be ragged or mis-sized and still be rejected here rather than trusted.
/// Unitarity is never checked; dimension is.
///
/// Kronecker layout: entry `(i, j)` of `kron(A, B)` is
/// `A[i / dim(B)][j / dim(B)] * B[i % dim(B)][j % dim(B)]`.
use super::complex::Complex;
use crate::error::{QuantumError, Result};

/// Row-major square complex matrix: `matrix[row][col]`.
pub type Matrix = Vec<Vec<Complex>>;

// ── Validation ─────────────────────────────────────────────────────────────

/// Check that `u` is square with a power-of-two dimension. Returns the dimension.
pub fn validate_matrix(u: &[Vec<Complex>]) -> Result<usize> {
    let n = u.len();
    if !n.is_power_of_two() {
        return Err(QuantumError::dimension(format!(
            "matrix dimension {n} is not a power of two"
        )));
    }
    if let Some((row, r)) = u.iter().enumerate().find(|(_, r)| r.len() != n) {
        return Err(QuantumError::dimension(format!(
            "row {row} has {} columns, expected {n}",
            r.len()
        )));
    }
    Ok(n)
}

/// Check that `v` is a state vector: power-of-two length of at least 2.
pub fn validate_state(v: &[Complex]) -> Result<usize> {
    let n = v.len();
    if n < 2 || !n.is_power_of_two() {
        return Err(QuantumError::dimension(format!(
            "state vector length {n} is not a power of two >= 2"
        )));
    }
    Ok(n)
}

// ── Algebra ────────────────────────────────────────────────────────────────

/// `dim × dim` identity.
pub fn identity(dim: usize) -> Matrix {
    (0..dim)
        .map(|r| {
            (0..dim)
                .map(|c| if r == c { Complex::ONE } else { Complex::ZERO })
                .collect()
        })
        .collect()
}

/// Pointwise scalar multiply.
pub fn scale(c: Complex, u: &[Vec<Complex>]) -> Result<Matrix> {
    validate_matrix(u)?;
    Ok(u.iter()
        .map(|row| row.iter().map(|&e| c * e).collect())
        .collect())
}

/// Standard matrix product `a · b`.
pub fn multiply(a: &[Vec<Complex>], b: &[Vec<Complex>]) -> Result<Matrix> {
    let n = validate_matrix(a)?;
    let m = validate_matrix(b)?;
    if n != m {
        return Err(QuantumError::dimension(format!(
            "cannot multiply {n}x{n} by {m}x{m}"
        )));
    }
    Ok((0..n)
        .map(|r| {
            (0..n)
                .map(|c| (0..n).map(|k| a[r][k] * b[k][c]).sum())
                .collect()
        })
        .collect())
}

/// Kronecker (tensor) product of two square matrices.
pub fn kron(a: &[Vec<Complex>], b: &[Vec<Complex>]) -> Result<Matrix> {
    let na = validate_matrix(a)?;
    let nb = validate_matrix(b)?;
    let n = na * nb;
    Ok((0..n)
        .map(|i| {
            let (ia, ib) = (i / nb, i % nb);
            (0..n)
                .map(|j| a[ia][j / nb] * b[ib][j % nb])
                .collect()
        })
        .collect())
}

/// Kronecker product of two state vectors: `v[i] = a[i / len(b)] * b[i % len(b)]`.
pub fn kron_vec(a: &[Complex], b: &[Complex]) -> Result<Vec<Complex>> {
    validate_state(a)?;
    validate_state(b)?;
    Ok(a.iter()
        .flat_map(|&x| b.iter().map(move |&y| x * y))
        .collect())
}

/// Matrix-vector product into a fresh buffer: `new[r] = Σ_c u[r][c]·v[c]`.
pub fn apply(u: &[Vec<Complex>], v: &[Complex]) -> Result<Vec<Complex>> {
    let n = validate_matrix(u)?;
    let len = validate_state(v)?;
    if n != len {
        return Err(QuantumError::dimension(format!(
            "{n}x{n} operator cannot act on a vector of length {len}"
        )));
    }
    Ok(u.iter()
        .map(|row| row.iter().zip(v).map(|(&e, &x)| e * x).sum())
        .collect())
}

// ── Operator padding ───────────────────────────────────────────────────────

/// A gate right-padded with identity: `U ⊗ I ⊗ … ⊗ I` up to `dim`.
///
/// The padding acts only on the qubits after the ones `U` targets, so a gate
/// applied to the leading qubits of a group keeps its meaning. The padded
/// operator is never materialized unless [`PaddedGate::to_matrix`] is called;
/// [`PaddedGate::apply`] visits only the structurally non-zero entries, which
/// yields the same sums as a dense multiply by the padded matrix.
#[derive(Debug, Clone, Copy)]
pub struct PaddedGate<'a> {
    gate: &'a [Vec<Complex>],
    gate_dim: usize,
    dim: usize,
}

impl<'a> PaddedGate<'a> {
    /// Pad `gate` to act on a `dim`-dimensional space.
    pub fn new(gate: &'a [Vec<Complex>], dim: usize) -> Result<Self> {
        let gate_dim = validate_matrix(gate)?;
        if !dim.is_power_of_two() || dim < gate_dim {
            return Err(QuantumError::dimension(format!(
                "cannot pad a {gate_dim}x{gate_dim} operator to dimension {dim}"
            )));
        }
        Ok(Self { gate, gate_dim, dim })
    }

    /// Dimension after padding.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Size of the identity factor.
    fn block(&self) -> usize {
        self.dim / self.gate_dim
    }

    /// Entry `(r, c)` of `U ⊗ I_block`.
    pub fn entry(&self, r: usize, c: usize) -> Complex {
        let k = self.block();
        if r % k == c % k {
            self.gate[r / k][c / k]
        } else {
            Complex::ZERO
        }
    }

    /// Apply the padded operator to `v` into a fresh buffer.
    pub fn apply(&self, v: &[Complex]) -> Result<Vec<Complex>> {
        let len = validate_state(v)?;
        if len != self.dim {
            return Err(QuantumError::dimension(format!(
                "padded {0}x{0} operator cannot act on a vector of length {len}",
                self.dim
            )));
        }
        let k = self.block();
        Ok((0..self.dim)
            .map(|r| {
                let (row, low) = (&self.gate[r / k], r % k);
                row.iter()
                    .enumerate()
                    .map(|(ch, &e)| e * v[ch * k + low])
                    .sum()
            })
            .collect())
    }

    /// Materialize via repeated right-Kronecker with the 2×2 identity.
    pub fn to_matrix(&self) -> Result<Matrix> {
        let i2 = identity(2);
        let mut m: Matrix = self.gate.to_vec();
        let mut n = self.gate_dim;
        while n < self.dim {
            m = kron(&m, &i2)?;
            n <<= 1;
        }
        Ok(m)
    }
}

/// Pad `gate` to a dense operator on `num_qubits` qubits.
pub fn pad_operator(gate: &[Vec<Complex>], num_qubits: usize) -> Result<Matrix> {
    let dim = u32::try_from(num_qubits)
        .ok()
        .and_then(|n| 1usize.checked_shl(n))
        .ok_or_else(|| QuantumError::dimension(format!("cannot pad to {num_qubits} qubits")))?;
    PaddedGate::new(gate, dim)?.to_matrix()
}
