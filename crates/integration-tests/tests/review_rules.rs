//! Integration tests for review validation and rating aggregation.

use omnimarket_web::models::review::{
    MIN_COMMENT_LENGTH, ReviewValidationError, average_rating, validate_review,
};

// =============================================================================
// Submission Validation
// =============================================================================

#[test]
fn test_full_rating_range_accepted() {
    for rating in 1..=5 {
        assert!(validate_review(rating, "solid product, would buy again").is_ok());
    }
}

#[test]
fn test_out_of_range_ratings_rejected() {
    for rating in [-1, 0, 6, 100] {
        assert_eq!(
            validate_review(rating, "solid product, would buy again"),
            Err(ReviewValidationError::RatingOutOfRange)
        );
    }
}

#[test]
fn test_comment_minimum_length_is_counted_in_chars() {
    // Multibyte characters count as one character each.
    let comment = "ł".repeat(MIN_COMMENT_LENGTH);
    assert!(validate_review(5, &comment).is_ok());

    let short = "ł".repeat(MIN_COMMENT_LENGTH - 1);
    assert_eq!(
        validate_review(5, &short),
        Err(ReviewValidationError::CommentTooShort)
    );
}

#[test]
fn test_whitespace_padding_does_not_satisfy_length() {
    assert_eq!(
        validate_review(4, "  short  \n\t"),
        Err(ReviewValidationError::CommentTooShort)
    );
}

#[test]
fn test_rating_checked_before_comment() {
    // Both invalid: the rating error wins.
    assert_eq!(
        validate_review(0, "x"),
        Err(ReviewValidationError::RatingOutOfRange)
    );
}

// =============================================================================
// Rating Aggregation
// =============================================================================

#[test]
fn test_average_over_approved_ratings() {
    assert_eq!(average_rating(&[5, 4, 3]), Some(4.0));
    assert_eq!(average_rating(&[1, 2]), Some(1.5));
}

#[test]
fn test_no_ratings_means_no_average() {
    assert_eq!(average_rating(&[]), None);
}

#[test]
fn test_average_is_not_rounded() {
    let avg = average_rating(&[5, 4]).unwrap_or(0.0);
    assert!((avg - 4.5).abs() < f64::EPSILON);
}
