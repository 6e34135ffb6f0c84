//! Terminal notifier: the CLI's toast rail.

use copperleaf_storefront::notify::Notifier;

/// Prints notifications to the terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct TermNotifier;

impl Notifier for TermNotifier {
    fn success(&self, message: &str) {
        println!("✓ {message}");
    }

    fn error(&self, message: &str) {
        eprintln!("✗ {message}");
    }
}
