//! Recursive file discovery over configured directories.

use std::path::PathBuf;

use walkdir::WalkDir;

use sigscout_core::sources::ScanConfig;

/// Discover candidate files under the configured directories.
///
/// Non-existent directories are skipped with a warning; unreadable entries
/// are skipped with a warning; files are filtered by extension and
/// `max_file_bytes`. The result is sorted so downstream ranking tie-breaks
/// are reproducible across runs.
#[must_use]
pub fn discover_files(scan: &ScanConfig) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for dir in &scan.directories {
        if !dir.is_dir() {
            tracing::warn!(dir = %dir.display(), "scan directory missing, skipping");
            continue;
        }

        for entry in WalkDir::new(dir).follow_links(false) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(error = %e, "unreadable entry, skipping");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();

            let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
                continue;
            };
            let ext = ext.to_lowercase();
            if !scan.extensions.iter().any(|allowed| allowed.eq_ignore_ascii_case(&ext)) {
                continue;
            }

            match entry.metadata() {
                Ok(meta) if meta.len() <= scan.max_file_bytes => {
                    files.push(path.to_path_buf());
                }
                Ok(meta) => {
                    tracing::debug!(
                        path = %path.display(),
                        size = meta.len(),
                        "file exceeds max_file_bytes, skipping"
                    );
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "metadata read failed, skipping");
                }
            }
        }
    }

    files.sort();
    files
}
