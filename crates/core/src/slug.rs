//! URL-safe unique slug allocation.
//!
//! A slug is derived from a display name (game title, publisher name, ...)
//! and must be unique within its entity type's namespace. Collisions are
//! resolved by deterministic suffixing: `base`, `base-2`, `base-3`, ...
//! No randomness and no hashing - determinism keeps re-seeding idempotent
//! and collision chains debuggable.
//!
//! The allocator is pure over an injected existence check; the caller
//! persists the result. The storage layer's unique constraint remains the
//! authoritative guard against check-then-set races: repositories retry
//! allocation when an insert reports a unique violation.

use crate::error::CoreError;

/// Placeholder used when normalization of the base text yields nothing.
pub const FALLBACK_SLUG: &str = "item";

/// Maximum number of slug candidates tried before giving up.
///
/// Human-authored names rarely collide more than once or twice; hitting
/// this bound means the namespace data is pathological.
pub const MAX_SLUG_ATTEMPTS: u32 = 50;

/// Normalize display text into a candidate base slug.
///
/// Lowercases, collapses runs of non-alphanumeric characters into single
/// hyphens, and trims leading/trailing hyphens. Falls back to
/// [`FALLBACK_SLUG`] when nothing survives normalization.
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    if slug.is_empty() {
        FALLBACK_SLUG.to_owned()
    } else {
        slug
    }
}

/// Iterator over the deterministic candidate sequence for a base slug.
///
/// Yields `base`, `base-2`, `base-3`, ... up to [`MAX_SLUG_ATTEMPTS`]
/// candidates. Async callers (repositories) drive this directly so the
/// existence check can be an awaited query; sync callers can use
/// [`allocate_slug`].
#[derive(Debug, Clone)]
pub struct SlugCandidates {
    base: String,
    attempt: u32,
}

impl SlugCandidates {
    /// Start the candidate sequence for already-normalized `base`.
    #[must_use]
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            attempt: 0,
        }
    }

    /// Start the candidate sequence for raw display text.
    #[must_use]
    pub fn for_text(text: &str) -> Self {
        Self::new(slugify(text))
    }

    /// The error returned when the sequence is exhausted without finding
    /// a free slug.
    #[must_use]
    pub fn exhausted(&self) -> CoreError {
        CoreError::ResourceExhausted(format!(
            "no free slug for '{}' after {MAX_SLUG_ATTEMPTS} attempts",
            self.base
        ))
    }
}

impl Iterator for SlugCandidates {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.attempt += 1;
        match self.attempt {
            1 => Some(self.base.clone()),
            n if n <= MAX_SLUG_ATTEMPTS => Some(format!("{}-{n}", self.base)),
            _ => None,
        }
    }
}

/// Allocate a unique slug for `base_text` against a synchronous lookup.
///
/// `exists` must report whether a candidate is already taken within the
/// entity type's namespace, excluding the entity's own current row when
/// re-checking on update (so renaming a record back to its own slug does
/// not false-positive).
///
/// # Errors
///
/// Returns [`CoreError::ResourceExhausted`] if no candidate is free
/// within [`MAX_SLUG_ATTEMPTS`] attempts.
pub fn allocate_slug<F>(base_text: &str, mut exists: F) -> Result<String, CoreError>
where
    F: FnMut(&str) -> bool,
{
    let mut candidates = SlugCandidates::for_text(base_text);
    let exhausted = candidates.exhausted();

    for candidate in candidates.by_ref() {
        if !exists(&candidate) {
            return Ok(candidate);
        }
    }

    Err(exhausted)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn taken(slugs: &[&str]) -> HashSet<String> {
        slugs.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Hollow Depths"), "hollow-depths");
        assert_eq!(slugify("  Night -- City!  "), "night-city");
        assert_eq!(slugify("DOOM 2016"), "doom-2016");
    }

    #[test]
    fn test_slugify_empty_falls_back() {
        assert_eq!(slugify(""), "item");
        assert_eq!(slugify("!!! ---"), "item");
    }

    #[test]
    fn test_slugify_is_url_safe() {
        for name in ["Ünïcode Tïtle", "a/b\\c", "100% Orange Juice"] {
            let slug = slugify(name);
            assert!(
                slug.chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'),
                "not url-safe: {slug}"
            );
            assert!(!slug.starts_with('-') && !slug.ends_with('-'));
            assert!(!slug.contains("--"));
        }
    }

    #[test]
    fn test_allocate_no_collision() {
        let existing = taken(&[]);
        let slug = allocate_slug("Hollow Depths", |s| existing.contains(s)).unwrap();
        assert_eq!(slug, "hollow-depths");
    }

    #[test]
    fn test_allocate_is_idempotent_over_empty_namespace() {
        // No hidden counters persist across calls.
        let existing = taken(&[]);
        let first = allocate_slug("Foo", |s| existing.contains(s)).unwrap();
        let second = allocate_slug("Foo", |s| existing.contains(s)).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, "foo");
    }

    #[test]
    fn test_allocate_collision_sequence() {
        let existing = taken(&["foo", "foo-2"]);
        let slug = allocate_slug("Foo", |s| existing.contains(s)).unwrap();
        assert_eq!(slug, "foo-3");
    }

    #[test]
    fn test_allocate_satisfies_lookup_at_return() {
        let existing = taken(&["item", "item-2", "item-3"]);
        let slug = allocate_slug("???", |s| existing.contains(s)).unwrap();
        assert_eq!(slug, "item-4");
        assert!(!existing.contains(&slug));
    }

    #[test]
    fn test_allocate_exhaustion() {
        let err = allocate_slug("Foo", |_| true).unwrap_err();
        assert!(matches!(err, CoreError::ResourceExhausted(_)));
    }

    #[test]
    fn test_candidates_sequence() {
        let mut candidates = SlugCandidates::for_text("Foo");
        assert_eq!(candidates.next().as_deref(), Some("foo"));
        assert_eq!(candidates.next().as_deref(), Some("foo-2"));
        assert_eq!(candidates.next().as_deref(), Some("foo-3"));
    }

    #[test]
    fn test_candidates_bounded() {
        let count = SlugCandidates::for_text("Foo").count();
        assert_eq!(count, MAX_SLUG_ATTEMPTS as usize);
    }
}
