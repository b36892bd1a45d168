//! Analysis modules.
//!
//! Pure computations over loaded rows: category aggregation, survey
//! statistics and axis scale planning.

pub mod aggregator;
pub mod scale;

pub use aggregator::*;
pub use scale::plan_scale;
