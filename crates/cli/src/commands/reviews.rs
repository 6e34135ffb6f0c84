//! Review management.

use copperleaf_core::{NewReview, ProductId, ReviewId, ReviewPatch};
use copperleaf_storefront::state::AppState;

use super::{Reported, api_failure, stars};

pub async fn mine(state: &AppState) -> Result<(), Box<dyn std::error::Error>> {
    let reviews = state
        .api()
        .my_reviews()
        .await
        .map_err(|err| api_failure(state, err))?;

    if reviews.is_empty() {
        println!("You haven't reviewed anything yet.");
        return Ok(());
    }

    for review in &reviews {
        println!(
            "{:>5}  product #{:<5} {} - {}",
            review.id,
            review.product,
            stars(f64::from(review.rating)),
            review.title
        );
        if !review.comment.is_empty() {
            println!("       {}", review.comment);
        }
    }
    Ok(())
}

pub async fn for_product(
    state: &AppState,
    product_id: i64,
) -> Result<(), Box<dyn std::error::Error>> {
    let reviews = state
        .api()
        .product_reviews(ProductId::new(product_id))
        .await
        .map_err(|err| api_failure(state, err))?;

    if reviews.is_empty() {
        println!("No reviews yet.");
        return Ok(());
    }

    for review in &reviews {
        println!(
            "{} {} - {}",
            stars(f64::from(review.rating)),
            review.user,
            review.title
        );
        if !review.comment.is_empty() {
            println!("  {}", review.comment);
        }
    }
    Ok(())
}

pub async fn add(
    state: &AppState,
    product_id: i64,
    rating: u8,
    title: Option<String>,
    comment: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    if !(1..=5).contains(&rating) {
        eprintln!("Rating must be between 1 and 5.");
        return Err(Reported.into());
    }

    let product_id = ProductId::new(product_id);

    // One review per product per user; purchase status is not checked.
    let can_review = state
        .api()
        .can_review(product_id)
        .await
        .map_err(|err| api_failure(state, err))?;
    if !can_review {
        eprintln!("You have already reviewed this product. Use `reviews edit` instead.");
        return Err(Reported.into());
    }

    let review = state
        .api()
        .create_review(&NewReview {
            product: product_id,
            rating,
            title,
            comment,
        })
        .await
        .map_err(|err| api_failure(state, err))?;

    println!("Review #{} posted.", review.id);
    Ok(())
}

pub async fn edit(
    state: &AppState,
    review_id: i64,
    rating: Option<u8>,
    title: Option<String>,
    comment: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(rating) = rating
        && !(1..=5).contains(&rating)
    {
        eprintln!("Rating must be between 1 and 5.");
        return Err(Reported.into());
    }

    if rating.is_none() && title.is_none() && comment.is_none() {
        eprintln!("Nothing to change.");
        return Err(Reported.into());
    }

    state
        .api()
        .update_review(
            ReviewId::new(review_id),
            &ReviewPatch {
                rating,
                title,
                comment,
            },
        )
        .await
        .map_err(|err| api_failure(state, err))?;

    println!("Review updated.");
    Ok(())
}

pub async fn delete(state: &AppState, review_id: i64) -> Result<(), Box<dyn std::error::Error>> {
    state
        .api()
        .delete_review(ReviewId::new(review_id))
        .await
        .map_err(|err| api_failure(state, err))?;

    println!("Review deleted.");
    Ok(())
}
