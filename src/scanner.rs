use crate::catalog::AssetLayout;
use crate::error::Result;
use std::collections::HashSet;
use std::io::ErrorKind;

/// Slugs that already have a file in the layout's directory.
///
/// A directory that does not exist yet counts as empty; backends create it
/// on first write.
pub fn scan_existing(layout: &AssetLayout) -> Result<HashSet<String>> {
    let entries = match std::fs::read_dir(&layout.dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!("{} does not exist yet", layout.dir.display());
            return Ok(HashSet::new());
        }
        Err(e) => return Err(e.into()),
    };

    let mut existing = HashSet::new();
    for entry in entries {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        if path.extension().and_then(|s| s.to_str()) != Some(layout.extension) {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            if let Some(slug) = layout.slug_from_stem(stem) {
                existing.insert(slug.to_string());
            }
        }
    }

    tracing::debug!(
        "{} existing assets in {}",
        existing.len(),
        layout.dir.display()
    );
    Ok(existing)
}
