//! Project root detection.

use std::path::{Path, PathBuf};

/// Files or directories whose presence marks a project root.
pub const ROOT_MARKERS: &[&str] = &[".git", "pyproject.toml"];

/// Nearest ancestor of `entry` holding a root marker, falling back to the
/// entry's own directory. A relative entry with no directory part resolves
/// to `.`, never to an empty path.
pub fn detect_project_root(entry: &Path) -> PathBuf {
    let fallback = entry
        .parent()
        .map(or_current_dir)
        .unwrap_or_else(|| PathBuf::from("."));

    entry
        .ancestors()
        .skip(1)
        .map(or_current_dir)
        .find(|dir| ROOT_MARKERS.iter().any(|m| dir.join(m).exists()))
        .unwrap_or(fallback)
}

fn or_current_dir(dir: &Path) -> PathBuf {
    if dir.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        dir.to_path_buf()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn finds_nearest_marker() {
        let tmp = tempfile::tempdir().unwrap();
        let project = tmp.path().join("project");
        fs::create_dir_all(project.join("src/app")).unwrap();
        fs::write(project.join("pyproject.toml"), "").unwrap();
        let entry = project.join("src/app/main.py");
        fs::write(&entry, "").unwrap();

        assert_eq!(detect_project_root(&entry), project);
    }

    #[test]
    fn git_directory_is_a_marker() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join(".git")).unwrap();
        fs::create_dir_all(tmp.path().join("pkg")).unwrap();
        let entry = tmp.path().join("pkg/main.py");
        fs::write(&entry, "").unwrap();

        assert_eq!(detect_project_root(&entry), tmp.path());
    }

    #[test]
    fn bare_file_name_uses_current_directory() {
        assert_eq!(detect_project_root(Path::new("main.py")), PathBuf::from("."));
    }

    #[test]
    fn relative_entry_keeps_its_directory() {
        assert_eq!(
            detect_project_root(Path::new("nonexistent-depmap-dir/main.py")),
            PathBuf::from("nonexistent-depmap-dir")
        );
    }

    #[test]
    fn falls_back_to_entry_directory() {
        assert_eq!(
            detect_project_root(Path::new("/nonexistent-depmap-dir/sub/main.py")),
            PathBuf::from("/nonexistent-depmap-dir/sub")
        );
    }
}
