pub mod init;
pub mod make_api;

use std::path::Path;

/// `path` relative to `root` for display
pub fn display_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).display().to_string()
}
