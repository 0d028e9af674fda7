//! Review rating bounded to the 1..=5 star range.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A star rating in the closed range `1..=5`.
///
/// Serializes as a plain integer; deserialization goes through [`Rating::new`]
/// so an out-of-range value never enters the domain unchecked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Rating(u8);

/// Error returned when a rating value falls outside `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("rating must be between {min} and {max}, got {value}", min = Rating::MIN, max = Rating::MAX)]
pub struct RatingOutOfRange {
    /// The rejected value.
    pub value: i64,
}

impl Rating {
    /// Lowest admissible rating.
    pub const MIN: u8 = 1;
    /// Highest admissible rating.
    pub const MAX: u8 = 5;

    /// Create a rating, rejecting values outside `1..=5`.
    ///
    /// # Errors
    ///
    /// Returns [`RatingOutOfRange`] for any value outside the range.
    pub const fn new(value: i64) -> Result<Self, RatingOutOfRange> {
        if value >= Self::MIN as i64 && value <= Self::MAX as i64 {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let value = value as u8;
            Ok(Self(value))
        } else {
            Err(RatingOutOfRange { value })
        }
    }

    /// The rating as a small integer.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// The rating widened for database binds and arithmetic.
    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self.0 as i64
    }
}

impl From<Rating> for i64 {
    fn from(rating: Rating) -> Self {
        rating.as_i64()
    }
}

impl TryFrom<i64> for Rating {
    type Error = RatingOutOfRange;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_the_full_star_range() {
        for value in 1..=5 {
            assert_eq!(Rating::new(value).unwrap().as_i64(), value);
        }
    }

    #[test]
    fn rejects_out_of_range_values() {
        for value in [-1, 0, 6, 100] {
            assert_eq!(Rating::new(value), Err(RatingOutOfRange { value }));
        }
    }

    #[test]
    fn error_message_names_the_bounds() {
        let err = Rating::new(9).unwrap_err();
        assert_eq!(err.to_string(), "rating must be between 1 and 5, got 9");
    }
}
