//! Rail-square solves the pose of a square body hung from four carriages.
//!
//! Each carriage slides on one of two vertical rails and is tied to a corner
//! of the square by a link of fixed length. Given the carriage heights, the
//! [`PoseSolver`] finds the center and rotation of the square that best fit
//! the four link lengths, and the [`Session`] keeps the mechanism coherent
//! while one carriage is moved at a time.
//!
//! ```
//! use rail_square::*;
//!
//! let mut session = Session::new(Mechanism::default(), PoseSolver::new());
//! session.displace(0, 1.).unwrap();
//! let snapshot = session.snapshot();
//! assert!(snapshot.cost.is_finite());
//! ```
#![cfg_attr(doc_cfg, feature(doc_cfg))]
#![warn(missing_docs)]
pub use crate::{mech::*, policy::*, session::*, solver::*};

macro_rules! impl_opt {
    ($($(#[$meta:meta])+ fn $name:ident($ty:ty))+) => {$(
        $(#[$meta])+
        pub fn $name(mut self, $name: $ty) -> Self {
            self.$name = $name;
            self
        }
    )+};
}

pub mod crossing;
#[cfg(feature = "csv")]
#[cfg_attr(doc_cfg, doc(cfg(feature = "csv")))]
pub mod csv;
mod mech;
#[cfg(feature = "plot")]
#[cfg_attr(doc_cfg, doc(cfg(feature = "plot")))]
pub mod plot;
mod policy;
mod session;
mod solver;
#[cfg(test)]
mod tests;
