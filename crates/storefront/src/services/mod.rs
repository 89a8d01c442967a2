//! Business logic services for storefront.
//!
//! # Services
//!
//! - `auth` - Simulated sign-in and the session auth store

pub mod auth;
