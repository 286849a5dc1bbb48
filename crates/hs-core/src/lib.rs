//! hs-core: shared foundation for the hybrid storage simulator.
//!
//! Contains:
//! - numeric (Real + tolerances + float helpers)
//! - cut (validated power split point)
//! - strategy (inter-storage power flow policy)
//! - error (shared error types)
//!
//! State vectors of a storage pair are laid out `[base, peak]`, see
//! [`BASE`], [`PEAK`] and [`PAIR_DIM`].

pub mod cut;
pub mod error;
pub mod numeric;
pub mod strategy;

// Re-exports: nice ergonomics for downstream crates
pub use cut::Cut;
pub use error::{CoreError, CoreResult};
pub use numeric::*;
pub use strategy::Strategy;

/// Index of the base unit in a pair state vector.
pub const BASE: usize = 0;

/// Index of the peak unit in a pair state vector.
pub const PEAK: usize = 1;

/// Dimension of a pair state vector.
pub const PAIR_DIM: usize = 2;
