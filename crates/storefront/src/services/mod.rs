//! Service layer: the engagement ledger, the review validator, and the
//! read-side aggregator.

pub mod ledger;
pub mod review;
pub mod stats;

pub use ledger::EngagementLedger;
pub use review::{ReviewRejection, ValidationError, validate};
pub use stats::{Aggregator, ProductStats};
