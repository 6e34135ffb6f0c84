//! Cart management.

use copperleaf_core::{CartItemId, ProductId};
use copperleaf_storefront::services::CartError;
use copperleaf_storefront::state::AppState;

use super::{Reported, api_failure};

/// Map a store error that was already notified; an expired session also
/// drops the local session state.
fn cart_failure(state: &AppState, err: &CartError) -> Reported {
    if matches!(
        err,
        CartError::Api(copperleaf_storefront::api::ApiError::SessionExpired)
    ) {
        state.session().invalidate();
        eprintln!("Your session has expired. Please sign in again: copperleaf login");
    }
    Reported
}

pub async fn show(state: &AppState) -> Result<(), Box<dyn std::error::Error>> {
    let cart = state.cart();
    cart.refresh().await;

    let snapshot = cart.snapshot();
    if snapshot.is_empty() {
        println!("Your cart is empty.");
        return Ok(());
    }

    for item in &snapshot.items {
        println!(
            "{:>5}  {:<32} x{:<3} ${:>9}",
            item.id, item.product.name, item.quantity, item.total_price
        );
    }

    if let Some(total) = &snapshot.total {
        println!();
        println!(
            "{} item(s) in {} line(s) - total ${}",
            total.total_items, total.item_count, total.total_amount
        );
    }
    Ok(())
}

pub async fn add(
    state: &AppState,
    product_id: i64,
    quantity: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    if quantity < 1 {
        eprintln!("Quantity must be at least 1.");
        return Err(Reported.into());
    }

    let product = state
        .api()
        .product(ProductId::new(product_id))
        .await
        .map_err(|err| api_failure(state, err))?;

    state
        .cart()
        .add_to_cart(&product, quantity)
        .await
        .map_err(|err| cart_failure(state, &err))?;
    Ok(())
}

pub async fn update(
    state: &AppState,
    item_id: i64,
    quantity: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    // The store forwards whatever it is given; the quantity floor is a
    // view-boundary rule.
    if quantity < 1 {
        eprintln!("Quantity must be at least 1. Use `cart remove` to drop a line.");
        return Err(Reported.into());
    }

    state
        .cart()
        .update_item(CartItemId::new(item_id), quantity)
        .await
        .map_err(|err| cart_failure(state, &err))?;
    Ok(())
}

pub async fn remove(state: &AppState, item_id: i64) -> Result<(), Box<dyn std::error::Error>> {
    state
        .cart()
        .remove_item(CartItemId::new(item_id))
        .await
        .map_err(|err| cart_failure(state, &err))?;
    Ok(())
}

pub async fn clear(state: &AppState) -> Result<(), Box<dyn std::error::Error>> {
    state
        .cart()
        .clear()
        .await
        .map_err(|err| cart_failure(state, &err))?;
    Ok(())
}
