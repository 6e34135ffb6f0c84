//! Copperleaf Core - Shared types library.
//!
//! This crate provides common types used across all Copperleaf components:
//! - `storefront` - Client library for the store's REST API
//! - `cli` - Terminal storefront built on the client library
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps
//! it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs and the catalog/cart/order/review/user models

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
