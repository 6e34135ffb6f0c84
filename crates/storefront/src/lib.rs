//! Copperleaf Storefront client library.
//!
//! The client side of the Copperleaf store: a typed REST API client plus
//! the state containers a front end drives — session, cart, and the
//! checkout sequencer. All durable state (inventory, orders, payments,
//! reviews) lives server-side; the stores here hold server-authoritative
//! snapshots and never reconcile local edits against them.
//!
//! # Architecture
//!
//! - [`api::ApiClient`] - REST transport: bearer attachment, one-shot
//!   401 refresh-and-retry, catalog caching
//! - [`services::SessionStore`] - authentication state derived from the
//!   persisted access token's claims
//! - [`services::CartStore`] - cart snapshot with refetch-after-write
//! - [`services::CheckoutSequencer`] - the linear order/payment/confirm
//!   state machine
//! - [`payment::StripeGateway`] - card confirmation against the payment
//!   processor
//! - [`state::AppState`] - wires the above together from [`config`]

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod notify;
pub mod payment;
pub mod services;
pub mod state;
