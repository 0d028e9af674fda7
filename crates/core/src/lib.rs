//! tgmarket Core - Shared types library.
//!
//! This crate provides common types used across all tgmarket components:
//! - `storefront` - The catalog and engagement service binary
//! - `integration-tests` - End-to-end test harness
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. The optional `sqlite` feature adds sqlx codec implementations for
//! the ID newtypes so repositories can bind them directly.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, and ratings

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
