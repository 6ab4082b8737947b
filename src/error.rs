//! Error types for the qubit registry and its matrix primitives.
//!
//! Every variant is a precondition violation raised synchronously by the
//! offending call. Nothing is retried or recovered internally.

use thiserror::Error;

/// Result type alias for simulator operations.
pub type Result<T> = std::result::Result<T, QuantumError>;

/// Errors raised by the matrix layer, the gate library and the registry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QuantumError {
    /// Non-square, ragged or non-power-of-two matrix, or a gate whose size
    /// does not match the number of target qubits.
    #[error("Dimension error: {0}")]
    Dimension(String),

    /// A name that is not currently live was referenced.
    #[error("Unknown qubit '{0}'")]
    UnknownQubit(String),

    /// `create_qubit` was called with a name that is already live.
    #[error("Qubit '{0}' already exists")]
    NameCollision(String),

    /// Attempt to remove a qubit that still shares a group with others.
    #[error("Qubit '{name}' is entangled with {partners} other qubit(s)")]
    Entanglement {
        /// Qubit that was to be removed.
        name: String,
        /// Number of other qubits in its group.
        partners: usize,
    },

    /// Initial amplitudes do not satisfy |a0|² + |a1|² = 1.
    #[error("Amplitudes for qubit '{name}' are not normalized: |a0|^2 + |a1|^2 = {total}")]
    Normalization {
        /// Qubit being created.
        name: String,
        /// Squared norm actually supplied.
        total: f64,
    },

    /// Branch probabilities of a measurement do not sum to one.
    #[error("Measurement probabilities for qubit '{name}' sum to {total}")]
    Probability {
        /// Qubit being measured.
        name: String,
        /// prob0 + prob1.
        total: f64,
    },

    /// The same name appears more than once in a single gate application.
    #[error("Qubit '{0}' listed more than once")]
    DuplicateQubit(String),

    /// A merge would produce a group larger than the configured limit.
    #[error("Group of {requested} qubits exceeds the limit of {limit}")]
    CapacityExceeded {
        /// Size the merged group would have.
        requested: usize,
        /// Configured `max_group_qubits`.
        limit: usize,
    },

    /// Protocol argument out of range (Bell selector, classical bit).
    #[error("Invalid argument '{name}': {reason}")]
    InvalidArgument {
        /// Argument name.
        name: String,
        /// Why it was rejected.
        reason: String,
    },
}

impl QuantumError {
    /// Create a dimension error.
    pub fn dimension(msg: impl Into<String>) -> Self {
        Self::Dimension(msg.into())
    }

    /// Create an invalid argument error.
    pub fn invalid_argument(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = QuantumError::dimension("expected 4x4, got 2x2");
        assert!(err.to_string().contains("4x4"));

        let err = QuantumError::Entanglement {
            name: "A".into(),
            partners: 2,
        };
        assert!(err.to_string().contains("'A'"));
        assert!(err.to_string().contains('2'));

        let err = QuantumError::invalid_argument("selector", "must be in 0..=3");
        assert!(err.to_string().contains("selector"));
        assert!(err.to_string().contains("0..=3"));
    }

    #[test]
    fn test_error_clone_eq() {
        let err = QuantumError::UnknownQubit("Q".into());
        assert_eq!(err.clone(), err);
    }
}
