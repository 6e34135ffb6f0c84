//! Checkout flow.

use copperleaf_storefront::error::StoreError;
use copperleaf_storefront::payment::CardDetails;
use copperleaf_storefront::state::AppState;

use super::{Reported, orders};

pub async fn run(
    state: &AppState,
    address: &str,
    card_number: &str,
    exp_month: u8,
    exp_year: u16,
    cvc: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    // The checkout view refuses to render unless signed in with a
    // non-empty cart; this is the terminal equivalent of that redirect.
    if !state.session().is_authenticated() {
        eprintln!("Sign in to check out: copperleaf login");
        return Err(Reported.into());
    }

    let cart = state.cart();
    cart.refresh().await;
    if cart.is_empty() {
        eprintln!("Your cart is empty. Add something first: copperleaf cart add <product-id>");
        return Err(Reported.into());
    }

    // Order summary before committing.
    let snapshot = cart.snapshot();
    println!("Order summary:");
    for item in &snapshot.items {
        println!(
            "  {:<32} x{:<3} ${:>9}",
            item.product.name, item.quantity, item.total_price
        );
    }
    if let Some(total) = &snapshot.total {
        println!("  total: ${}", total.total_amount);
    }
    println!("  ship to: {address}");
    println!();

    let card = CardDetails::new(card_number, exp_month, exp_year, cvc);
    let sequencer = state.stripe_checkout();

    let receipt = match sequencer.place_order(address, &card).await {
        Ok(receipt) => receipt,
        Err(err) => {
            // Already notified; just handle forced logout.
            if matches!(
                &err,
                StoreError::Network(copperleaf_storefront::api::ApiError::SessionExpired)
            ) {
                state.session().invalidate();
            }
            return Err(Reported.into());
        }
    };

    println!("Order #{} confirmed.", receipt.order_id);
    println!();

    // Land on order history, like the storefront does after paying.
    orders::list(state).await
}
