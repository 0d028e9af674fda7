//! Domain types for the storefront.

pub mod engagement;

pub use engagement::{Review, ViewEvent};
