use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize};
use shelf_kernel::validation::{check_length, check_range, FieldViolation, Validate};

pub const TITLE_MAX_CHARS: usize = 200;
pub const AUTHOR_MAX_CHARS: usize = 100;
pub const GENRE_MAX_CHARS: usize = 50;
pub const COMMENT_MAX_CHARS: usize = 1000;
pub const RATING_MIN: i64 = 1;
pub const RATING_MAX: i64 = 5;

/// A catalog entry and the reviews attached to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Unique identifier for the book, assigned at creation
    pub id: String,
    /// Title of the book
    pub title: String,
    /// Author of the book
    pub author: String,
    /// Genre of the book
    pub genre: String,
    /// Reviews in the order they were added
    pub reviews: Vec<Review>,
}

/// A rating with a comment, owned by exactly one book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    /// Rating from 1 to 5
    pub rating: u8,
    /// Review comment
    pub comment: String,
}

/// Request model for creating a new book.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBook {
    pub title: String,
    pub author: String,
    pub genre: String,
}

impl Validate for CreateBook {
    fn violations(&self) -> Vec<FieldViolation> {
        let mut violations = Vec::new();
        check_length(&mut violations, "title", &self.title, 1, TITLE_MAX_CHARS);
        check_length(&mut violations, "author", &self.author, 1, AUTHOR_MAX_CHARS);
        check_length(&mut violations, "genre", &self.genre, 1, GENRE_MAX_CHARS);
        violations
    }
}

/// Request model for adding a review to a book.
///
/// `rating` is decoded wide so out-of-range integers reach validation
/// instead of failing to decode. Whole-valued floats (`5.0`) and numeric
/// strings (`"5"`) are read as integers; anything else fails to decode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReview {
    #[serde(deserialize_with = "lenient_integer")]
    pub rating: i64,
    pub comment: String,
}

impl Validate for CreateReview {
    fn violations(&self) -> Vec<FieldViolation> {
        let mut violations = Vec::new();
        check_range(&mut violations, "rating", self.rating, RATING_MIN, RATING_MAX);
        check_length(&mut violations, "comment", &self.comment, 1, COMMENT_MAX_CHARS);
        violations
    }
}

fn lenient_integer<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    struct LenientInteger;

    impl de::Visitor<'_> for LenientInteger {
        type Value = i64;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an integer, a whole-valued number, or a string holding an integer")
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<i64, E> {
            Ok(value)
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<i64, E> {
            i64::try_from(value)
                .map_err(|_| E::invalid_value(de::Unexpected::Unsigned(value), &self))
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<i64, E> {
            let whole = value.is_finite()
                && value.fract() == 0.0
                && value >= i64::MIN as f64
                && value < i64::MAX as f64;
            if whole {
                Ok(value as i64)
            } else {
                Err(E::invalid_value(de::Unexpected::Float(value), &self))
            }
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<i64, E> {
            value
                .trim()
                .parse()
                .map_err(|_| E::invalid_value(de::Unexpected::Str(value), &self))
        }
    }

    deserializer.deserialize_any(LenientInteger)
}
