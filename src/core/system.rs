/// Named-qubit registry and state engine.
///
/// `QuantumSystem` is the simulation context. It owns every live qubit
/// group and maps each live name to exactly one of them. Groups are merged
/// lazily, the first time a gate touches names from different groups, and
/// split again only by measurement.
///
/// Every mutating call validates first, computes the new group(s) into
/// fresh buffers, and only then commits to the registry. A failed call
/// leaves the system exactly as it was.
use super::complex::Complex;
use super::gates;
use super::group::QubitGroup;
use super::matrix;
use crate::config::SimConfig;
use crate::error::{QuantumError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct GroupId(u64);

/// A measurement that passed its checks and is waiting for a sample.
struct PendingMeasurement {
    id: GroupId,
    /// Owning group reordered with the measured name in front.
    group: QubitGroup,
    prob0: f64,
    prob1: f64,
}

#[derive(Debug)]
pub struct QuantumSystem {
    config: SimConfig,
    /// Ordered by creation so inspection output is stable.
    groups: BTreeMap<GroupId, QubitGroup>,
    owners: HashMap<String, GroupId>,
    next_group: u64,
    rng: StdRng,
}

impl Default for QuantumSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl QuantumSystem {
    /// Empty system measuring with OS entropy.
    pub fn new() -> Self {
        Self::with_config(SimConfig::default())
    }

    /// Empty system with a fixed measurement seed.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_config(SimConfig::with_seed(seed))
    }

    pub fn with_config(config: SimConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            groups: BTreeMap::new(),
            owners: HashMap::new(),
            next_group: 0,
            rng,
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Restart the internal generator from `seed`.
    pub fn reseed(&mut self, seed: u64) {
        self.config.seed = Some(seed);
        self.rng = StdRng::seed_from_u64(seed);
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Create `name` in state a0|0⟩ + a1|1⟩ as a fresh singleton group.
    pub fn create_qubit(
        &mut self,
        name: &str,
        a0: impl Into<Complex>,
        a1: impl Into<Complex>,
    ) -> Result<()> {
        if self.owners.contains_key(name) {
            return Err(QuantumError::NameCollision(name.to_string()));
        }
        let (a0, a1) = (a0.into(), a1.into());
        let total = a0.norm_sq() + a1.norm_sq();
        // negated so NaN fails too
        if !((total - 1.0).abs() <= self.config.normalization_tolerance) {
            return Err(QuantumError::Normalization {
                name: name.to_string(),
                total,
            });
        }
        let id = self.insert_group(QubitGroup::singleton(name, a0, a1));
        self.owners.insert(name.to_string(), id);
        debug!(qubit = name, a0 = %a0, a1 = %a1, "created qubit");
        Ok(())
    }

    /// Delete an unentangled qubit from the registry.
    pub fn remove_qubit(&mut self, name: &str) -> Result<()> {
        let id = self.owner(name)?;
        let size = self.groups[&id].num_qubits();
        if size != 1 {
            return Err(QuantumError::Entanglement {
                name: name.to_string(),
                partners: size - 1,
            });
        }
        self.groups.remove(&id);
        self.owners.remove(name);
        debug!(qubit = name, "removed qubit");
        Ok(())
    }

    /// Forget every qubit. The generator keeps its position.
    pub fn clear(&mut self) {
        self.groups.clear();
        self.owners.clear();
        debug!("cleared system");
    }

    // ── Gates ─────────────────────────────────────────────────────────────

    /// Apply `gate` to `qubits`, the first name being the most-significant.
    ///
    /// Names must be live and distinct, and `gate` must be 2^k × 2^k for k
    /// names. Groups holding the names are merged first (in the order the
    /// names appear), then reordered so the names lead, then transformed.
    pub fn apply_gate(&mut self, gate: &[Vec<Complex>], qubits: &[&str]) -> Result<()> {
        let dim = matrix::validate_matrix(gate)?;
        let k = qubits.len();
        if k == 0 || k >= usize::BITS as usize || dim != 1usize << k {
            return Err(QuantumError::dimension(format!(
                "{dim}x{dim} gate cannot act on {k} qubit(s)"
            )));
        }

        let mut ids: Vec<GroupId> = Vec::with_capacity(k);
        for (i, &name) in qubits.iter().enumerate() {
            if qubits[..i].contains(&name) {
                return Err(QuantumError::DuplicateQubit(name.to_string()));
            }
            let id = self.owner(name)?;
            if !ids.contains(&id) {
                ids.push(id);
            }
        }

        let next = self.merged(&ids)?.reordered(qubits)?.transformed(gate)?;
        self.commit_merge(&ids, next);
        Ok(())
    }

    /// Tensor the groups `ids` together, left to right, without committing.
    fn merged(&self, ids: &[GroupId]) -> Result<Cow<'_, QubitGroup>> {
        let first = &self.groups[&ids[0]];
        if ids.len() == 1 {
            return Ok(Cow::Borrowed(first));
        }
        let requested: usize = ids.iter().map(|id| self.groups[id].num_qubits()).sum();
        if requested > self.config.max_group_qubits {
            return Err(QuantumError::CapacityExceeded {
                requested,
                limit: self.config.max_group_qubits,
            });
        }
        let mut acc = first.tensor(&self.groups[&ids[1]])?;
        for id in &ids[2..] {
            acc = acc.tensor(&self.groups[id])?;
        }
        Ok(Cow::Owned(acc))
    }

    /// Install `next` under `ids[0]` and repoint the names of absorbed groups.
    fn commit_merge(&mut self, ids: &[GroupId], next: QubitGroup) {
        let keep = ids[0];
        for id in &ids[1..] {
            if let Some(absorbed) = self.groups.remove(id) {
                for name in absorbed.names() {
                    if let Some(owner) = self.owners.get_mut(name) {
                        *owner = keep;
                    }
                }
            }
        }
        if ids.len() > 1 {
            debug!(group = ?next.names(), "merged groups");
        }
        self.groups.insert(keep, next);
    }

    pub fn h(&mut self, qubit: &str) -> Result<&mut Self> {
        self.apply_gate(&gates::hadamard(), &[qubit])?;
        Ok(self)
    }

    pub fn x(&mut self, qubit: &str) -> Result<&mut Self> {
        self.apply_gate(&gates::pauli_x(), &[qubit])?;
        Ok(self)
    }

    pub fn y(&mut self, qubit: &str) -> Result<&mut Self> {
        self.apply_gate(&gates::pauli_y(), &[qubit])?;
        Ok(self)
    }

    pub fn z(&mut self, qubit: &str) -> Result<&mut Self> {
        self.apply_gate(&gates::pauli_z(), &[qubit])?;
        Ok(self)
    }

    pub fn phase(&mut self, qubit: &str, phi: f64) -> Result<&mut Self> {
        self.apply_gate(&gates::phase_shift(phi), &[qubit])?;
        Ok(self)
    }

    pub fn cnot(&mut self, control: &str, target: &str) -> Result<&mut Self> {
        self.apply_gate(&gates::controlled_not(), &[control, target])?;
        Ok(self)
    }

    pub fn swap(&mut self, a: &str, b: &str) -> Result<&mut Self> {
        self.apply_gate(&gates::swap(), &[a, b])?;
        Ok(self)
    }

    // ── Measurement ───────────────────────────────────────────────────────

    /// Measure `name` in the computational basis using the system generator.
    ///
    /// Returns 0 or 1. The qubit is left alone in a classical singleton
    /// group; the rest of its former group shrinks by half and is
    /// renormalized.
    pub fn measure_qubit(&mut self, name: &str) -> Result<u8> {
        let pending = self.prepare_measurement(name)?;
        let sample: f64 = self.rng.gen();
        Ok(self.commit_measurement(name, pending, sample))
    }

    /// Like [`measure_qubit`](Self::measure_qubit) but draws from `rng`.
    pub fn measure_qubit_with<R: Rng + ?Sized>(&mut self, name: &str, rng: &mut R) -> Result<u8> {
        let pending = self.prepare_measurement(name)?;
        let sample: f64 = rng.gen();
        Ok(self.commit_measurement(name, pending, sample))
    }

    fn prepare_measurement(&self, name: &str) -> Result<PendingMeasurement> {
        let id = self.owner(name)?;
        let group = self.groups[&id].reordered(&[name])?;
        let (prob0, prob1) = group.branch_probabilities();
        let total = prob0 + prob1;
        if !((total - 1.0).abs() <= self.config.probability_tolerance) {
            return Err(QuantumError::Probability {
                name: name.to_string(),
                total,
            });
        }
        Ok(PendingMeasurement {
            id,
            group,
            prob0,
            prob1,
        })
    }

    fn commit_measurement(&mut self, name: &str, pending: PendingMeasurement, sample: f64) -> u8 {
        let PendingMeasurement {
            id,
            group,
            prob0,
            prob1,
        } = pending;

        // a zero-probability branch is never selected
        let outcome: u8 = if sample >= prob0 && prob1 > 0.0 { 1 } else { 0 };
        let classical = if outcome == 0 {
            QubitGroup::singleton(name, Complex::ONE, Complex::ZERO)
        } else {
            QubitGroup::singleton(name, Complex::ZERO, Complex::ONE)
        };

        match group.collapse_front(outcome) {
            Some(rest) => {
                self.groups.insert(id, rest);
                let fresh = self.insert_group(classical);
                self.owners.insert(name.to_string(), fresh);
            }
            None => {
                self.groups.insert(id, classical);
            }
        }
        debug!(qubit = name, outcome, prob0, prob1, "measured qubit");
        outcome
    }

    // ── Introspection ─────────────────────────────────────────────────────

    pub fn is_live(&self, name: &str) -> bool {
        self.owners.contains_key(name)
    }

    /// Number of live qubits.
    pub fn num_qubits(&self) -> usize {
        self.owners.len()
    }

    pub fn num_groups(&self) -> usize {
        self.groups.len()
    }

    /// Live names, sorted.
    pub fn qubit_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.owners.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Live groups in creation order.
    pub fn groups(&self) -> impl Iterator<Item = &QubitGroup> {
        self.groups.values()
    }

    /// The group currently owning `name`.
    pub fn group_of(&self, name: &str) -> Result<&QubitGroup> {
        Ok(&self.groups[&self.owner(name)?])
    }

    /// Joint state vector of the group owning `name`.
    pub fn state_vector_of(&self, name: &str) -> Result<Vec<Complex>> {
        Ok(self.group_of(name)?.amplitudes().to_vec())
    }

    /// Name order of the group owning `name`, most-significant first.
    pub fn group_order_of(&self, name: &str) -> Result<Vec<String>> {
        Ok(self.group_of(name)?.names().to_vec())
    }

    /// Probability that measuring `name` now would give 1. Does not collapse.
    pub fn probability_of_one(&self, name: &str) -> Result<f64> {
        self.group_of(name)?
            .marginal_probability_one(name)
            .ok_or_else(|| QuantumError::UnknownQubit(name.to_string()))
    }

    /// True when every live name maps to a group listing it, every listed
    /// name maps back to its group, and no group is empty.
    pub fn is_consistent(&self) -> bool {
        let listed: usize = self.groups.values().map(QubitGroup::num_qubits).sum();
        listed == self.owners.len()
            && self.groups.iter().all(|(id, group)| {
                group.num_qubits() > 0
                    && group.names().iter().all(|n| self.owners.get(n) == Some(id))
            })
            && self
                .owners
                .iter()
                .all(|(name, id)| self.groups.get(id).is_some_and(|g| g.contains(name)))
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn owner(&self, name: &str) -> Result<GroupId> {
        self.owners
            .get(name)
            .copied()
            .ok_or_else(|| QuantumError::UnknownQubit(name.to_string()))
    }

    fn insert_group(&mut self, group: QubitGroup) -> GroupId {
        let id = GroupId(self.next_group);
        self.next_group += 1;
        self.groups.insert(id, group);
        id
    }
}

impl fmt::Display for QuantumSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "QuantumSystem ({} qubits in {} groups)",
            self.num_qubits(),
            self.num_groups()
        )?;
        for group in self.groups.values() {
            write!(f, "{group}")?;
        }
        Ok(())
    }
}
