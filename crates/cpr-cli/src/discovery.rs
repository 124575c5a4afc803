//! Finding project files under the paths given on the command line.

use crate::config::PathFilter;
use std::path::{Path, PathBuf};
use tracing::{trace, warn};
use walkdir::WalkDir;

/// Extension of Cubase project files
const PROJECT_EXTENSION: &str = "cpr";

/// Every project file under `root` not excluded by `filter`, in walk order.
///
/// `root` may also be a single file.
pub fn find_projects(root: &Path, filter: &PathFilter) -> Vec<PathBuf> {
    let mut projects = Vec::new();

    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Unable to walk {}: {}", root.display(), e);
                continue;
            }
        };

        let path = entry.path();
        if !entry.file_type().is_file() || !is_project(path) {
            continue;
        }

        if filter.is_ignored(path) {
            trace!("Ignoring {}", path.display());
            continue;
        }

        projects.push(path.to_path_buf());
    }

    projects
}

fn is_project(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(PROJECT_EXTENSION))
        .unwrap_or(false)
}
