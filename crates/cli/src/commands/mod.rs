//! Command implementations.

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod orders;
pub mod products;
pub mod reviews;

use copperleaf_storefront::api::ApiError;
use copperleaf_storefront::state::AppState;

/// Marker error for failures already surfaced to the user as a
/// notification. `main` exits non-zero without printing it again.
#[derive(Debug)]
pub struct Reported;

impl std::fmt::Display for Reported {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "operation failed")
    }
}

impl std::error::Error for Reported {}

/// Handle a transport error from a direct API call: an expired session
/// drops the local session state and tells the user to sign in again.
pub fn api_failure(state: &AppState, err: ApiError) -> Box<dyn std::error::Error> {
    if matches!(err, ApiError::SessionExpired) {
        state.session().invalidate();
        eprintln!("Your session has expired. Please sign in again: copperleaf login");
        return Box::new(Reported);
    }
    Box::new(err)
}

/// Render a star rating like the storefront does (`★★★★☆`).
#[must_use]
pub fn stars(rating: f64) -> String {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let filled = (rating.round().clamp(0.0, 5.0)) as usize;
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

#[cfg(test)]
mod tests {
    use super::stars;

    #[test]
    fn test_stars_rounds_to_nearest() {
        assert_eq!(stars(4.4), "★★★★☆");
        assert_eq!(stars(4.5), "★★★★★");
        assert_eq!(stars(0.0), "☆☆☆☆☆");
    }
}
