//! Storage pair descriptors and control laws.
//!
//! This crate supplies the two collaborators the operation simulator
//! consumes:
//!
//! - a [`PairBuilder`] that derives base/peak descriptors and a reference
//!   trajectory from a demand signal, a cut and a strategy
//! - a [`ControlLawFactory`] that turns descriptors into a pure
//!   [`ControlLaw`]
//!
//! The bundled implementations ([`ClippingPairBuilder`],
//! [`SaturatingLawFactory`]) split the demand by saturation at the cut and
//! use symmetric power limits.

pub mod error;
pub mod law;
pub mod pair;
pub mod reference;
pub mod unit;

pub use error::{ControlError, ControlResult};
pub use law::{
    ControlLaw, ControlLawFactory, InterchangeLaw, IsolatedLaw, LawSettings, SaturatingLawFactory,
    UnitPowers,
};
pub use pair::{ClippingPairBuilder, PairBuilder, PairSettings, StoragePair};
pub use reference::ReferenceSignal;
pub use unit::{StorageRole, StorageUnit};
