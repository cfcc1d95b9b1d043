//! # Candidate File Discovery
//!
//! The candidate set for a module is the union of every file found under
//! the central template tree and every filename that appears as a key in
//! either configuration document. The second half matters for files that
//! exist only as configuration, such as entries carrying a `delete` flag
//! with no template behind them.
//!
//! Paths are returned relative to the template tree with the reserved
//! defaults key filtered out. The set is ordered so the sync loop visits
//! files in a stable lexicographic order.

use std::collections::BTreeSet;
use std::io;
use std::path::Path;

use walkdir::WalkDir;

use crate::config::ConfigDocument;
use crate::constants::GLOBAL_DEFAULTS_KEY;
use crate::error::{Error, Result};

/// Discover the candidate filenames for one module.
///
/// Fails with `DirectoryNotFound` when the template tree is missing. The
/// tool cannot know what it manages without one, so this aborts the run.
pub fn discover(
    templates_root: &Path,
    global: &ConfigDocument,
    module: &ConfigDocument,
) -> Result<BTreeSet<String>> {
    if !templates_root.is_dir() {
        return Err(Error::DirectoryNotFound {
            path: templates_root.display().to_string(),
            hint: Some(
                "check that you are working in your configs directory \
                 or that you have passed the correct --configs path"
                    .to_string(),
            ),
        });
    }

    let mut files = BTreeSet::new();
    for entry in WalkDir::new(templates_root) {
        let entry = entry.map_err(io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        if let Ok(relative) = entry.path().strip_prefix(templates_root) {
            files.insert(relative.to_string_lossy().into_owned());
        }
    }

    files.extend(
        global
            .keys()
            .chain(module.keys())
            .filter(|key| key.as_str() != GLOBAL_DEFAULTS_KEY)
            .cloned(),
    );

    Ok(files)
}
