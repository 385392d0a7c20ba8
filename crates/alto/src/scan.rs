//! Indexing of audio files under the source directory.

use std::path::{Path, PathBuf};

use tracing::{debug, trace};
use walkdir::{Error as WalkError, WalkDir};

/// Extensions of the audio formats alto copies, lowercase.
pub const SUPPORTED_EXTENSIONS: [&str; 8] =
    ["mp3", "m4a", "m4b", "m4p", "flac", "ogg", "opus", "dsf"];

/// Returns true if `path` has a supported extension, ignoring case.
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
}

/// Collect every supported file under `root`, in file name order.
///
/// Symlinks are not followed. An unreadable directory aborts the scan.
pub fn index_sources(root: &Path) -> Result<Vec<PathBuf>, WalkError> {
    let mut index = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name().follow_links(false) {
        let entry = entry?;
        if entry.file_type().is_dir() {
            continue;
        }
        let path = entry.path();
        if !is_supported(path) {
            trace!(path = %path.display(), "not an audio file");
            continue;
        }
        debug!(index = index.len() + 1, path = %path.display(), "indexed");
        index.push(entry.into_path());
    }
    Ok(index)
}
