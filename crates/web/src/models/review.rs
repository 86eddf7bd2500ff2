//! Product review model and rating rules.

use chrono::{DateTime, Utc};
use serde::Serialize;

use omnimarket_core::{ProductId, ReviewId, UserId};

/// Minimum comment length in characters.
pub const MIN_COMMENT_LENGTH: usize = 10;

/// Valid rating range, inclusive.
pub const RATING_RANGE: std::ops::RangeInclusive<i16> = 1..=5;

/// A product review.
#[derive(Debug, Clone, Serialize)]
pub struct Review {
    pub id: ReviewId,
    pub product_id: ProductId,
    pub user_id: UserId,
    /// 1-5 stars.
    pub rating: i16,
    pub comment: String,
    /// Unapproved reviews are hidden from listings and averages.
    pub approved: bool,
    pub created_at: DateTime<Utc>,
    /// Author username, joined in for display.
    pub author: String,
}

/// Validation failures for a submitted review.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReviewValidationError {
    #[error("rating must be between 1 and 5")]
    RatingOutOfRange,
    #[error("comment must be at least {MIN_COMMENT_LENGTH} characters")]
    CommentTooShort,
}

/// Validate a submitted rating and comment.
///
/// # Errors
///
/// Returns the first failed check: rating outside 1-5, or a comment shorter
/// than [`MIN_COMMENT_LENGTH`] characters (after trimming).
pub fn validate_review(rating: i16, comment: &str) -> Result<(), ReviewValidationError> {
    if !RATING_RANGE.contains(&rating) {
        return Err(ReviewValidationError::RatingOutOfRange);
    }
    if comment.trim().chars().count() < MIN_COMMENT_LENGTH {
        return Err(ReviewValidationError::CommentTooShort);
    }
    Ok(())
}

/// Average rating over a set of ratings, or `None` if empty.
///
/// Recomputed on every read; callers pass approved ratings only.
#[must_use]
pub fn average_rating(ratings: &[i16]) -> Option<f64> {
    if ratings.is_empty() {
        return None;
    }
    #[allow(clippy::cast_precision_loss)] // review counts are tiny
    Some(ratings.iter().map(|&r| f64::from(r)).sum::<f64>() / ratings.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rating_range() {
        assert_eq!(
            validate_review(0, "a perfectly fine comment"),
            Err(ReviewValidationError::RatingOutOfRange)
        );
        assert_eq!(
            validate_review(6, "a perfectly fine comment"),
            Err(ReviewValidationError::RatingOutOfRange)
        );
        assert!(validate_review(1, "a perfectly fine comment").is_ok());
        assert!(validate_review(5, "a perfectly fine comment").is_ok());
    }

    #[test]
    fn test_validate_comment_length() {
        // 8 characters: rejected
        assert_eq!(
            validate_review(4, "too shor"),
            Err(ReviewValidationError::CommentTooShort)
        );
        // 10 characters: accepted
        assert!(validate_review(4, "just right").is_ok());
    }

    #[test]
    fn test_validate_comment_trims_whitespace() {
        assert_eq!(
            validate_review(4, "   padded   "),
            Err(ReviewValidationError::CommentTooShort)
        );
    }

    #[test]
    fn test_average_rating() {
        assert_eq!(average_rating(&[3, 4, 5]), Some(4.0));
        assert_eq!(average_rating(&[5]), Some(5.0));
        assert_eq!(average_rating(&[]), None);
    }
}
