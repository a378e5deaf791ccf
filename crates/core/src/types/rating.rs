//! Validated review rating.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A review rating, always within `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Rating(i32);

impl Rating {
    /// Smallest accepted rating.
    pub const MIN: i32 = 1;
    /// Largest accepted rating.
    pub const MAX: i32 = 5;

    /// Validate and wrap a raw rating value.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidArgument`] for values outside `1..=5`.
    pub fn new(value: i32) -> Result<Self, CoreError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(CoreError::invalid_argument(format!(
                "rating must be between {} and {}, got {value}",
                Self::MIN,
                Self::MAX
            )))
        }
    }

    /// Get the underlying value.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self.0
    }
}

impl<'de> Deserialize<'de> for Rating {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = i32::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_range() {
        for value in 1..=5 {
            assert_eq!(Rating::new(value).unwrap().as_i32(), value);
        }
    }

    #[test]
    fn test_out_of_range() {
        assert!(Rating::new(0).is_err());
        assert!(Rating::new(6).is_err());
        assert!(Rating::new(-3).is_err());
    }

    #[test]
    fn test_deserialize_rejects_out_of_range() {
        assert!(serde_json::from_str::<Rating>("3").is_ok());
        assert!(serde_json::from_str::<Rating>("9").is_err());
    }
}
