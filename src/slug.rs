//! Filesystem-safe identifiers for asset labels.
//!
//! Labels are mostly Arabic, so the character classes are Unicode-aware:
//! letters and numbers of any script survive, everything else except
//! underscore, whitespace and hyphen is dropped.

use crate::error::{AssetError, Result};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref DISALLOWED: Regex = Regex::new(r"[^\p{L}\p{N}_\s-]").unwrap();
    static ref SEPARATORS: Regex = Regex::new(r"[-\s]+").unwrap();
}

/// Converts a label into a stable file-name stem.
///
/// May return an empty string for punctuation-only input; use
/// [`checked_slug`] wherever the result names a file.
pub fn slugify(text: &str) -> String {
    // Lowercase first: some letters lowercase into a letter plus a mark,
    // and the mark must go through the filter too.
    let lowered = text.to_lowercase();
    let cleaned = DISALLOWED.replace_all(&lowered, "");
    let joined = SEPARATORS.replace_all(&cleaned, "-");
    joined.trim_matches('-').to_string()
}

/// Like [`slugify`], but rejects labels that reduce to nothing.
pub fn checked_slug(text: &str) -> Result<String> {
    let slug = slugify(text);
    if slug.is_empty() {
        return Err(AssetError::EmptySlug(text.to_string()));
    }
    Ok(slug)
}
