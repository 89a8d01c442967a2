//! Larkspur Core - Shared types library.
//!
//! This crate provides common types used across the Larkspur components:
//! - `storefront` - Public-facing shop, cart and checkout flow
//! - `integration-tests` - End-to-end checks against a running storefront
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no sessions, no HTTP. This
//! keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
