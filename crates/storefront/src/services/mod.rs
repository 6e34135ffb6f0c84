//! State containers over the store API.
//!
//! Each store is a thin façade over network calls: it owns one slice of
//! client state, mutates it only through its own action methods, and
//! surfaces one user-visible notification per action. Stores are built by
//! explicit dependency injection - there are no ambient singletons.

pub mod cart;
pub mod checkout;
pub mod session;

pub use cart::{CartError, CartSnapshot, CartStore};
pub use checkout::{CheckoutError, CheckoutReceipt, CheckoutSequencer, CheckoutState};
pub use session::{AuthError, Session, SessionStore};
