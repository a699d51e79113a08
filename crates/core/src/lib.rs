//! Vendora Core - Shared types library.
//!
//! This crate provides common types used across all Vendora components:
//! - `storefront` - Customer- and operator-facing frontend service
//! - `integration-tests` - Black-box tests against a stub backend
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O and no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and roles

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
