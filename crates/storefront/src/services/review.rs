//! Review validation.
//!
//! A pure function layer: no storage, no side effects. The rules run in a
//! fixed order and the first failing rule determines the reported reason.

use thiserror::Error;

use tgmarket_core::{ProductId, Rating};

use crate::catalog::Catalog;

/// Minimum review length in characters, counted after trimming.
pub const MIN_CONTENT_CHARS: usize = 10;

/// Reasons a review fails content/rating validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Content, rating, or product reference is missing.
    #[error("all fields are required")]
    AllFieldsRequired,

    /// Trimmed content is shorter than [`MIN_CONTENT_CHARS`].
    #[error("review content must be at least {MIN_CONTENT_CHARS} characters")]
    ContentTooShort,

    /// Rating falls outside 1..=5.
    #[error("rating must be between {min} and {max}", min = Rating::MIN, max = Rating::MAX)]
    RatingOutOfRange,
}

/// Outcome of gating a review before it may enter the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReviewRejection {
    /// Content/rating constraint violated.
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// The referenced product has no catalog entry.
    #[error("product {0} not found")]
    ProductNotFound(ProductId),
}

/// Validate a review submission against the fixed rule order:
///
/// 1. content, rating, and product reference all present and non-zero
/// 2. trimmed content at least [`MIN_CONTENT_CHARS`] characters
/// 3. rating in 1..=5
/// 4. product resolves in the catalog
///
/// Returns the admitted [`Rating`] on success.
///
/// # Errors
///
/// Returns the first failing rule as a [`ReviewRejection`].
pub fn validate(
    catalog: &Catalog,
    product_id: ProductId,
    content: &str,
    rating: i64,
) -> Result<Rating, ReviewRejection> {
    let trimmed = content.trim();

    if trimmed.is_empty() || rating == 0 || product_id.as_i64() == 0 {
        return Err(ValidationError::AllFieldsRequired.into());
    }

    if trimmed.chars().count() < MIN_CONTENT_CHARS {
        return Err(ValidationError::ContentTooShort.into());
    }

    let rating = Rating::new(rating).map_err(|_| ValidationError::RatingOutOfRange)?;

    if !catalog.contains(product_id) {
        return Err(ReviewRejection::ProductNotFound(product_id));
    }

    Ok(rating)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::builtin()
    }

    const VALID_CONTENT: &str = "Great product, works well";

    #[test]
    fn admits_a_valid_review() {
        let rating = validate(&catalog(), ProductId::new(1), VALID_CONTENT, 5).unwrap();
        assert_eq!(rating.get(), 5);
    }

    #[test]
    fn empty_content_is_all_fields_required() {
        let result = validate(&catalog(), ProductId::new(1), "", 5);
        assert_eq!(
            result,
            Err(ReviewRejection::Invalid(ValidationError::AllFieldsRequired))
        );
    }

    #[test]
    fn whitespace_only_content_counts_as_missing() {
        let result = validate(&catalog(), ProductId::new(1), "   \t  ", 5);
        assert_eq!(
            result,
            Err(ReviewRejection::Invalid(ValidationError::AllFieldsRequired))
        );
    }

    #[test]
    fn zero_rating_counts_as_missing() {
        let result = validate(&catalog(), ProductId::new(1), VALID_CONTENT, 0);
        assert_eq!(
            result,
            Err(ReviewRejection::Invalid(ValidationError::AllFieldsRequired))
        );
    }

    #[test]
    fn zero_product_id_counts_as_missing() {
        let result = validate(&catalog(), ProductId::new(0), VALID_CONTENT, 5);
        assert_eq!(
            result,
            Err(ReviewRejection::Invalid(ValidationError::AllFieldsRequired))
        );
    }

    #[test]
    fn short_content_fails_regardless_of_other_fields() {
        // Rating and product are both invalid too; length still wins after
        // the presence check.
        let result = validate(&catalog(), ProductId::new(99), "bad", 77);
        assert_eq!(
            result,
            Err(ReviewRejection::Invalid(ValidationError::ContentTooShort))
        );
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        // Nine multibyte characters trim to fewer than ten chars.
        let result = validate(&catalog(), ProductId::new(1), "отличный!", 5);
        assert_eq!(
            result,
            Err(ReviewRejection::Invalid(ValidationError::ContentTooShort))
        );
    }

    #[test]
    fn out_of_range_rating_fails_before_catalog_lookup() {
        let result = validate(&catalog(), ProductId::new(99), VALID_CONTENT, 6);
        assert_eq!(
            result,
            Err(ReviewRejection::Invalid(ValidationError::RatingOutOfRange))
        );

        let result = validate(&catalog(), ProductId::new(1), VALID_CONTENT, -1);
        assert_eq!(
            result,
            Err(ReviewRejection::Invalid(ValidationError::RatingOutOfRange))
        );
    }

    #[test]
    fn unknown_product_is_the_last_rule() {
        let result = validate(&catalog(), ProductId::new(99), VALID_CONTENT, 5);
        assert_eq!(result, Err(ReviewRejection::ProductNotFound(ProductId::new(99))));
    }

    #[test]
    fn boundary_content_length_is_admitted() {
        // Exactly ten characters after trimming.
        let result = validate(&catalog(), ProductId::new(1), "  ten chars.  ", 3);
        assert!(result.is_ok());
    }
}
