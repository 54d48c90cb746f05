//! Slug derivation and validation.
//!
//! Slugs are assigned once, before a Tag, Project or Post is persisted.
//! Uniqueness is not decided here: the repositories reject duplicates with
//! `AppError::Conflict`.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::AppError;

pub const MAX_SLUG_LENGTH: usize = 200;

static SLUG_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[-a-zA-Z0-9_]+$").expect("slug pattern compiles")
});

/// Transliterates a title into a lowercase, hyphenated slug.
///
/// Output longer than [`MAX_SLUG_LENGTH`] is cut at the limit and any
/// trailing hyphen is dropped, so the same title always yields the same slug.
pub fn derive_slug(title: &str) -> String {
    let slug = slug::slugify(title);
    if slug.len() <= MAX_SLUG_LENGTH {
        return slug;
    }
    // slugify output is ASCII, byte slicing is safe
    slug[..MAX_SLUG_LENGTH].trim_end_matches('-').to_string()
}

/// Picks the explicit slug verbatim when one was supplied, otherwise derives
/// one from `title`. A blank explicit slug counts as absent.
pub fn resolve_slug(explicit: Option<&str>, title: &str) -> String {
    match explicit {
        Some(slug) if !slug.trim().is_empty() => slug.to_string(),
        _ => derive_slug(title),
    }
}

pub fn validate_slug(slug: &str) -> Result<(), AppError> {
    if slug.is_empty() {
        return Err(AppError::invalid_field(
            "slug",
            "Could not derive a slug from the title; please provide one.",
        ));
    }
    if slug.len() > MAX_SLUG_LENGTH {
        return Err(AppError::invalid_field(
            "slug",
            format!("Ensure this field has no more than {MAX_SLUG_LENGTH} characters."),
        ));
    }
    if !SLUG_PATTERN.is_match(slug) {
        return Err(AppError::invalid_field(
            "slug",
            "Enter a valid slug consisting of letters, numbers, underscores or hyphens.",
        ));
    }
    Ok(())
}

/// Pre-persist step shared by every slugged entity.
pub fn assign_slug(explicit: Option<&str>, title: &str) -> Result<String, AppError> {
    let slug = resolve_slug(explicit, title);
    validate_slug(&slug)?;
    Ok(slug)
}
