//! pathwise-stats — Numeric primitives and the hypergeometric enrichment test.

pub mod numeric;
pub mod hypergeom;

pub use hypergeom::{score_pathway, upper_tail, HypergeometricParams, PathwayScore};
pub use numeric::{log_choose, log_factorial};
