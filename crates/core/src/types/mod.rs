//! Newtype wrappers and validated value types.

mod id;
mod rating;

pub use id::*;
pub use rating::Rating;

use chrono::Datelike;

use crate::error::CoreError;

/// Earliest release year the catalog accepts.
pub const MIN_RELEASE_YEAR: i32 = 1970;

/// Validate a game release year.
///
/// Accepts `1970..=current_year + 1` (next year covers pre-orders).
///
/// # Errors
///
/// Returns [`CoreError::InvalidArgument`] for years outside the range.
pub fn validate_release_year(year: i32) -> Result<(), CoreError> {
    let max_year = chrono::Utc::now().year() + 1;
    if year < MIN_RELEASE_YEAR || year > max_year {
        return Err(CoreError::invalid_argument(format!(
            "release year must be between {MIN_RELEASE_YEAR} and {max_year}, got {year}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_year_bounds() {
        assert!(validate_release_year(1970).is_ok());
        assert!(validate_release_year(2020).is_ok());
        assert!(validate_release_year(1969).is_err());
        assert!(validate_release_year(3000).is_err());
    }

    #[test]
    fn test_next_year_allowed_for_preorders() {
        let next_year = chrono::Utc::now().year() + 1;
        assert!(validate_release_year(next_year).is_ok());
        assert!(validate_release_year(next_year + 1).is_err());
    }
}
