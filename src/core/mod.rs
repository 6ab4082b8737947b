pub mod complex;
pub mod gates;
pub mod group;
pub mod matrix;
pub mod system;

// Convenience re-exports for library users
pub use complex::Complex;
pub use group::QubitGroup;
pub use matrix::{Matrix, PaddedGate};
pub use system::QuantumSystem;
