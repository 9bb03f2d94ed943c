//! Analysis modules.
//!
//! Records flow through coercion, grouping and aggregation to
//! produce the result rows handed to the report generator.

pub mod aggregator;
pub mod coerce;
pub mod grouping;

pub use aggregator::*;
