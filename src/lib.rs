//! # entangle
//!
//! Quantum circuit simulation over named qubits.
//!
//! Qubits are created by name and start out independent. The first gate
//! that touches qubits from different groups merges their state vectors by
//! tensor product; measurement splits the measured qubit back out into a
//! classical singleton. Gates can target any subset of names in any order.
//!
//! ## Quick Start
//!
//! ```rust
//! use entangle::{gates, QuantumSystem};
//!
//! # fn main() -> entangle::Result<()> {
//! // Seeded so the measurement below is reproducible
//! let mut sys = QuantumSystem::with_seed(7);
//!
//! sys.create_qubit("A", 1.0, 0.0)?;
//! sys.create_qubit("B", 1.0, 0.0)?;
//!
//! // Bell state: (|00⟩ + |11⟩) / √2
//! sys.apply_gate(&gates::hadamard(), &["A"])?;
//! sys.apply_gate(&gates::controlled_not(), &["A", "B"])?;
//! assert_eq!(sys.group_order_of("B")?, vec!["A", "B"]);
//!
//! // Measure: collapses both
//! let a = sys.measure_qubit("A")?;
//! let b = sys.measure_qubit("B")?;
//! assert_eq!(a, b);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod protocols;

pub use crate::config::SimConfig;
pub use crate::core::{gates, matrix, Complex, Matrix, QuantumSystem, QubitGroup};
pub use crate::error::{QuantumError, Result};
