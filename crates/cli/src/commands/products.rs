//! Catalog browsing.

use copperleaf_core::ProductId;
use copperleaf_storefront::state::AppState;

use super::{api_failure, stars};

pub async fn list(
    state: &AppState,
    page: u32,
    search: Option<String>,
    ordering: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let listing = state
        .api()
        .products(page, search.as_deref(), ordering.as_deref())
        .await
        .map_err(|err| api_failure(state, err))?;

    if listing.results.is_empty() {
        println!("No products found.");
        return Ok(());
    }

    for product in &listing.results {
        let stock = if product.is_in_stock { "" } else { "  [out of stock]" };
        println!(
            "{:>5}  {:<32} ${:>9}  {} ({}){stock}",
            product.id,
            product.name,
            product.price,
            stars(product.average_rating),
            product.review_count,
        );
    }

    println!();
    println!(
        "page {page} - {} product(s) total{}",
        listing.count,
        if listing.has_next() {
            format!(", more on page {}", page + 1)
        } else {
            String::new()
        }
    );
    Ok(())
}

pub async fn show(state: &AppState, id: i64) -> Result<(), Box<dyn std::error::Error>> {
    let product = state
        .api()
        .product(ProductId::new(id))
        .await
        .map_err(|err| api_failure(state, err))?;

    println!("{}  (#{})", product.name, product.id);
    println!(
        "${}  -  {} {} ({} review(s))",
        product.price,
        stars(product.average_rating),
        product.average_rating,
        product.review_count
    );
    if product.is_in_stock {
        println!("In stock: {}", product.inventory_count);
    } else {
        println!("Out of stock");
    }
    println!();
    println!("{}", product.description);

    if let Some(reviews) = &product.reviews
        && !reviews.is_empty()
    {
        println!();
        println!("Reviews:");
        for review in reviews {
            println!(
                "  {} {} - {}",
                stars(f64::from(review.rating)),
                review.user,
                review.title
            );
            if !review.comment.is_empty() {
                println!("    {}", review.comment);
            }
        }
    }
    Ok(())
}
