//! T-Express Core - Shared domain types.
//!
//! This crate provides the types shared by every T-Express component:
//! - `storefront` - API client, services, state stores and view adapters
//! - `cli` - Command-line front end driving the storefront library
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. Entity
//! records returned by the T-Express API live next to the services that
//! fetch them; this crate holds the identifiers, money and status values
//! those records are built from.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, emails, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
