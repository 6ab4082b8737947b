/// Qubit groups: a joint state vector plus the names packed into it.
///
/// A group of n qubits holds 2^n amplitudes. Bit i of a basis index,
/// counted from the most-significant end, belongs to `names[i]`, so the
/// front name is the most-significant qubit.
///
/// Every operation here is pure: it borrows the group and returns a new
/// one. The registry swaps results in only after all of them succeed.
use super::complex::Complex;
use super::matrix::{self, PaddedGate};
use crate::error::{QuantumError, Result};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct QubitGroup {
    names: Vec<String>,
    amplitudes: Vec<Complex>,
}

impl QubitGroup {
    /// One qubit in state a0|0⟩ + a1|1⟩. Normalization is the caller's check.
    pub fn singleton(name: impl Into<String>, a0: Complex, a1: Complex) -> Self {
        Self {
            names: vec![name.into()],
            amplitudes: vec![a0, a1],
        }
    }

    /// Build a group from an explicit name order and amplitude vector.
    ///
    /// The vector must have exactly 2^len(names) entries and the names must
    /// be distinct.
    pub fn from_parts(names: Vec<String>, amplitudes: Vec<Complex>) -> Result<Self> {
        let len = matrix::validate_state(&amplitudes)?;
        let n = names.len();
        if n >= usize::BITS as usize || len != 1usize << n {
            return Err(QuantumError::dimension(format!(
                "{n} names need 2^{n} amplitudes, got {len}"
            )));
        }
        for (i, name) in names.iter().enumerate() {
            if names[..i].contains(name) {
                return Err(QuantumError::DuplicateQubit(name.clone()));
            }
        }
        Ok(Self { names, amplitudes })
    }

    /// Qubit names, most-significant first.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn amplitudes(&self) -> &[Complex] {
        &self.amplitudes
    }

    pub fn num_qubits(&self) -> usize {
        self.names.len()
    }

    /// Dimension of the joint state space: 2^n
    #[inline(always)]
    pub fn dim(&self) -> usize {
        self.amplitudes.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Index of `name` in the name order.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Σ|αᵢ|², ≈ 1 for any valid state.
    pub fn total_probability(&self) -> f64 {
        self.amplitudes.iter().map(Complex::norm_sq).sum()
    }

    /// Bit position of name index `i`, counted from the least-significant end.
    #[inline(always)]
    fn bit_of(&self, i: usize) -> usize {
        self.names.len() - 1 - i
    }

    /// Probability that `name` measures as |1⟩, marginalized over the rest.
    pub fn marginal_probability_one(&self, name: &str) -> Option<f64> {
        let bit = self.bit_of(self.position(name)?);
        Some(
            self.amplitudes
                .iter()
                .enumerate()
                .filter(|(i, _)| (i >> bit) & 1 == 1)
                .map(|(_, a)| a.norm_sq())
                .sum(),
        )
    }

    /// Ket label of basis state `index`, front name leftmost.
    pub fn basis_label(&self, index: usize) -> String {
        (0..self.names.len())
            .map(|i| if (index >> self.bit_of(i)) & 1 == 1 { '1' } else { '0' })
            .collect()
    }

    // ── Merge ─────────────────────────────────────────────────────────────

    /// Tensor product `self ⊗ other`: other's names follow self's.
    pub fn tensor(&self, other: &Self) -> Result<Self> {
        let amplitudes = matrix::kron_vec(&self.amplitudes, &other.amplitudes)?;
        let names = self.names.iter().chain(&other.names).cloned().collect();
        Ok(Self { names, amplitudes })
    }

    // ── Reorder ───────────────────────────────────────────────────────────

    /// Permute the group so that `prefix` occupies the front, in order.
    ///
    /// The remaining names keep their relative order. Only positions change;
    /// every amplitude value is moved bit-for-bit, so reordering back to the
    /// original order reproduces the original vector exactly.
    pub fn reordered(&self, prefix: &[&str]) -> Result<Self> {
        let n = self.names.len();
        let mut target: Vec<usize> = Vec::with_capacity(n);
        for &name in prefix {
            let idx = self
                .position(name)
                .ok_or_else(|| QuantumError::UnknownQubit(name.to_string()))?;
            if target.contains(&idx) {
                return Err(QuantumError::DuplicateQubit(name.to_string()));
            }
            target.push(idx);
        }

        if target.iter().enumerate().all(|(i, &idx)| i == idx) {
            return Ok(self.clone());
        }

        let rest: Vec<usize> = (0..n).filter(|i| !target.contains(i)).collect();
        target.extend(rest);

        // (old bit, new bit) for every qubit, both counted from the LSB end
        let moves: Vec<(usize, usize)> = target
            .iter()
            .enumerate()
            .map(|(new_idx, &old_idx)| (self.bit_of(old_idx), self.bit_of(new_idx)))
            .collect();

        let mut amplitudes = vec![Complex::ZERO; self.dim()];
        for (old, &amp) in self.amplitudes.iter().enumerate() {
            let new = moves
                .iter()
                .fold(0usize, |acc, &(from, to)| acc | (((old >> from) & 1) << to));
            amplitudes[new] = amp;
        }

        let names: Vec<String> = target.iter().map(|&i| self.names[i].clone()).collect();
        tracing::trace!(from = ?self.names, to = ?names, "reordered group");
        Ok(Self { names, amplitudes })
    }

    // ── Transform ─────────────────────────────────────────────────────────

    /// Apply `gate` to the leading log2(dim(gate)) qubits.
    pub fn transformed(&self, gate: &[Vec<Complex>]) -> Result<Self> {
        let amplitudes = PaddedGate::new(gate, self.dim())?.apply(&self.amplitudes)?;
        tracing::trace!(names = ?self.names, dim = self.dim(), "transformed group");
        Ok(Self {
            names: self.names.clone(),
            amplitudes,
        })
    }

    // ── Measurement ───────────────────────────────────────────────────────

    /// (prob0, prob1) for the front qubit: squared norms of the two halves.
    pub fn branch_probabilities(&self) -> (f64, f64) {
        let (lo, hi) = self.amplitudes.split_at(self.dim() / 2);
        let p = |half: &[Complex]| half.iter().map(Complex::norm_sq).sum::<f64>();
        (p(lo), p(hi))
    }

    /// Keep the half of the vector consistent with the front qubit reading
    /// `outcome` and renormalize it by its own L2 norm.
    ///
    /// Returns the remaining group, or `None` when the front qubit was the
    /// only member. The retained half must have non-zero norm.
    pub fn collapse_front(&self, outcome: u8) -> Option<Self> {
        if self.names.len() == 1 {
            return None;
        }
        let half = self.dim() / 2;
        let retained = if outcome == 0 {
            &self.amplitudes[..half]
        } else {
            &self.amplitudes[half..]
        };
        let norm = retained.iter().map(Complex::norm_sq).sum::<f64>().sqrt();
        Some(Self {
            names: self.names[1..].to_vec(),
            amplitudes: retained.iter().map(|&a| a / norm).collect(),
        })
    }
}

impl fmt::Display for QubitGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({} qubits, dim={}):", self.names.join(","), self.num_qubits(), self.dim())?;
        for (i, amp) in self.amplitudes.iter().enumerate() {
            let prob = amp.norm_sq();
            if prob > 1e-12 {
                writeln!(
                    f,
                    "  |{}⟩  amplitude: {}  probability: {:.4}",
                    self.basis_label(i),
                    amp,
                    prob
                )?;
            }
        }
        Ok(())
    }
}
