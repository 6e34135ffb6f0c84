//! User-visible notifications.
//!
//! The stores surface exactly one notification per action. What "showing"
//! means belongs to the front end, so the stores talk to this trait: the
//! CLI installs a terminal notifier, tests install a recording one, and
//! [`TracingNotifier`] is the library default.

use std::sync::Arc;

/// Sink for user-visible notifications.
pub trait Notifier: Send + Sync {
    /// Surface a success message.
    fn success(&self, message: &str);

    /// Surface an error message.
    fn error(&self, message: &str);
}

/// Default notifier: routes notifications through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, message: &str) {
        tracing::info!(target: "copperleaf::notify", "{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!(target: "copperleaf::notify", "{message}");
    }
}

/// Shared handle to a notifier.
pub type SharedNotifier = Arc<dyn Notifier>;
