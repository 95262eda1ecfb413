//! T-Express storefront client.
//!
//! Data-access and state layer between a front end and the T-Express REST
//! API:
//!
//! - [`api`]: HTTP gateway, response envelopes and the injectable session
//! - [`services`]: one typed service per API resource
//! - [`stores`]: observable cart, wishlist and auth state
//! - [`context`]: composition root wiring everything together
//! - [`adapters`]: pure API-record to view-model transforms

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod adapters;
pub mod api;
pub mod config;
pub mod context;
pub mod services;
pub mod stores;
pub mod types;

pub use api::{ApiClient, ApiError, Session};
pub use config::Config;
pub use context::AppContext;
