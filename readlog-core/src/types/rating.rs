//! Half-star rating

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A star rating between 0.5 and 5, in half-star steps
///
/// Stored as a count of half stars so equality is exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Rating(u8);

/// Returned when a number is not a valid rating
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("invalid rating {0}: expected 0.5 to 5 in steps of 0.5")]
pub struct InvalidRating(pub f64);

impl Rating {
    pub const MIN: Rating = Rating(1);
    pub const MAX: Rating = Rating(10);

    pub fn new(value: f64) -> Result<Self, InvalidRating> {
        if !value.is_finite() || !(0.5..=5.0).contains(&value) {
            return Err(InvalidRating(value));
        }
        let halves = value * 2.0;
        if halves.fract() != 0.0 {
            return Err(InvalidRating(value));
        }
        Ok(Rating(halves as u8))
    }

    pub fn value(&self) -> f64 {
        f64::from(self.0) / 2.0
    }

    /// Number of half stars (1..=10)
    pub fn half_stars(&self) -> u8 {
        self.0
    }

    /// One or five stars: the ratings that demand a written justification
    pub fn is_extreme(&self) -> bool {
        self.0 == 2 || self.0 == 10
    }
}

impl TryFrom<f64> for Rating {
    type Error = InvalidRating;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Rating::new(value)
    }
}

impl From<Rating> for f64 {
    fn from(rating: Rating) -> Self {
        rating.value()
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}
