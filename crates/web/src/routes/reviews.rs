//! Review route handlers.
//!
//! Adding, editing, and deleting reviews, all owner-scoped and redirecting
//! back to the product page. Validation failures carry an `?error=` code.

use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use omnimarket_core::{ProductId, ReviewId};

use crate::db::reviews::ReviewRepository;
use crate::middleware::RequireAuth;
use crate::models::review::validate_review;
use crate::state::AppState;

/// Review form data.
#[derive(Debug, Deserialize)]
pub struct ReviewForm {
    pub rating: i16,
    pub comment: String,
}

fn product_url(product_id: ProductId) -> String {
    format!("/products/{product_id}")
}

/// Add a review to a product. New reviews are visible immediately.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i32>,
    Form(form): Form<ReviewForm>,
) -> Response {
    let product_id = ProductId::new(id);

    if validate_review(form.rating, &form.comment).is_err() {
        return Redirect::to(&format!("{}?error=invalid_review", product_url(product_id)))
            .into_response();
    }

    let result = ReviewRepository::new(state.pool())
        .create(product_id, user.id, form.rating, form.comment.trim())
        .await;

    if let Err(e) = result {
        tracing::error!(error = %e, "failed to create review");
        return Redirect::to(&format!("{}?error=review_failed", product_url(product_id)))
            .into_response();
    }
    Redirect::to(&product_url(product_id)).into_response()
}

/// Edit an own review.
pub async fn edit(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i32>,
    Form(form): Form<ReviewForm>,
) -> Response {
    let review_id = ReviewId::new(id);
    let repo = ReviewRepository::new(state.pool());

    let Ok(Some(review)) = repo.get(review_id).await else {
        return Redirect::to("/").into_response();
    };
    let back = product_url(review.product_id);

    if validate_review(form.rating, &form.comment).is_err() {
        return Redirect::to(&format!("{back}?error=invalid_review")).into_response();
    }

    // The WHERE clause carries the ownership check; a non-owner edit is a
    // silent no-op redirect.
    match repo
        .update(review_id, user.id, form.rating, form.comment.trim())
        .await
    {
        Ok(_) => Redirect::to(&back).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "failed to update review");
            Redirect::to(&format!("{back}?error=review_failed")).into_response()
        }
    }
}

/// Delete an own review.
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i32>,
) -> Response {
    let review_id = ReviewId::new(id);
    let repo = ReviewRepository::new(state.pool());

    let Ok(Some(review)) = repo.get(review_id).await else {
        return Redirect::to("/").into_response();
    };
    let back = product_url(review.product_id);

    match repo.delete(review_id, user.id).await {
        Ok(_) => Redirect::to(&back).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "failed to delete review");
            Redirect::to(&format!("{back}?error=review_failed")).into_response()
        }
    }
}
