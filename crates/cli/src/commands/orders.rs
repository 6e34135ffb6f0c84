//! Order history.

use copperleaf_core::OrderId;
use copperleaf_storefront::state::AppState;

use super::api_failure;

pub async fn list(state: &AppState) -> Result<(), Box<dyn std::error::Error>> {
    let orders = state
        .api()
        .orders()
        .await
        .map_err(|err| api_failure(state, err))?;

    if orders.is_empty() {
        println!("No orders yet.");
        return Ok(());
    }

    println!("Order history:");
    for order in &orders {
        println!(
            "{:>5}  {}  {:<10}  {:>3} item(s)  ${:>9}",
            order.id,
            order.created_at.format("%Y-%m-%d"),
            order.status,
            order.items_count,
            order.total_amount
        );
    }
    Ok(())
}

pub async fn show(state: &AppState, id: i64) -> Result<(), Box<dyn std::error::Error>> {
    let order = state
        .api()
        .order(OrderId::new(id))
        .await
        .map_err(|err| api_failure(state, err))?;

    println!("Order #{}  -  {}", order.id, order.status);
    println!("placed {}", order.created_at.format("%Y-%m-%d %H:%M"));
    println!("ship to: {}", order.shipping_address);
    println!();
    for item in &order.order_items {
        println!(
            "  {:<32} x{:<3} @ ${:>8}  ${:>9}",
            item.product.name, item.quantity, item.unit_price, item.total_price
        );
    }
    println!();
    println!("total: ${}", order.total_amount);
    Ok(())
}
