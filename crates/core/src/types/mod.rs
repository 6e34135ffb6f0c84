//! Core types for Copperleaf.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod id;
pub mod order;
pub mod page;
pub mod product;
pub mod review;
pub mod user;

pub use cart::{CartItem, CartTotal};
pub use id::*;
pub use order::{Order, OrderItem, OrderStatus};
pub use page::Page;
pub use product::Product;
pub use review::{NewReview, Review, ReviewPatch};
pub use user::{AuthTokens, LoginCredentials, RegisterCredentials, User};
