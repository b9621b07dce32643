//! Import specifier → file resolution.

use std::path::{Path, PathBuf};

use crate::languages::{PACKAGE_INITIALIZER, SOURCE_EXTENSION};

/// Maps import specifiers to concrete files under a single project root.
#[derive(Debug, Clone)]
pub struct ModuleResolver {
    root: PathBuf,
}

impl ModuleResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve `specifier` as written in `origin_file`.
    ///
    /// Returns `None` when no candidate exists; callers record that and move on.
    pub fn resolve(&self, specifier: &str, origin_file: &Path) -> Option<PathBuf> {
        let base = self.base_path(specifier, origin_file)?;
        candidates(&base).into_iter().find(|c| c.is_file())
    }

    /// Path the specifier points at before any candidate suffix is applied.
    pub fn base_path(&self, specifier: &str, origin_file: &Path) -> Option<PathBuf> {
        if specifier.starts_with('.') {
            return relative_base(specifier, origin_file);
        }
        if specifier.is_empty() {
            return None;
        }
        Some(join_segments(self.root.clone(), specifier))
    }
}

/// `.` is the origin's directory; every further dot climbs one level.
fn relative_base(specifier: &str, origin_file: &Path) -> Option<PathBuf> {
    let dots = specifier.chars().take_while(|&c| c == '.').count();
    let remainder = &specifier[dots..];

    let mut base = origin_file.parent()?;
    for _ in 0..dots.saturating_sub(1) {
        base = base.parent()?;
    }

    Some(join_segments(base.to_path_buf(), remainder))
}

fn join_segments(mut base: PathBuf, dotted: &str) -> PathBuf {
    for segment in dotted.split('.').filter(|s| !s.is_empty()) {
        base.push(segment);
    }
    base
}

/// Direct module file first, then package initializer.
fn candidates(base: &Path) -> [PathBuf; 2] {
    let mut module_file = base.as_os_str().to_owned();
    module_file.push(".");
    module_file.push(SOURCE_EXTENSION);
    [PathBuf::from(module_file), base.join(PACKAGE_INITIALIZER)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(root: &Path, rel: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "").unwrap();
        path
    }

    #[test]
    fn absolute_specifier_resolves_from_root() {
        let tmp = tempfile::tempdir().unwrap();
        let main = touch(tmp.path(), "main.py");
        let target = touch(tmp.path(), "pkg/mod.py");
        let resolver = ModuleResolver::new(tmp.path());
        assert_eq!(resolver.resolve("pkg.mod", &main), Some(target));
    }

    #[test]
    fn package_initializer_candidate() {
        let tmp = tempfile::tempdir().unwrap();
        let main = touch(tmp.path(), "main.py");
        let init = touch(tmp.path(), "pkg/__init__.py");
        let resolver = ModuleResolver::new(tmp.path());
        assert_eq!(resolver.resolve("pkg", &main), Some(init));
    }

    #[test]
    fn direct_file_beats_package_initializer() {
        let tmp = tempfile::tempdir().unwrap();
        let main = touch(tmp.path(), "main.py");
        touch(tmp.path(), "pkg/__init__.py");
        let direct = touch(tmp.path(), "pkg.py");
        let resolver = ModuleResolver::new(tmp.path());
        assert_eq!(resolver.resolve("pkg", &main), Some(direct));
    }

    #[test]
    fn single_dot_stays_in_origin_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let origin = touch(tmp.path(), "app/views/page.py");
        let sibling = touch(tmp.path(), "app/views/widgets.py");
        let resolver = ModuleResolver::new(tmp.path());
        assert_eq!(resolver.resolve(".widgets", &origin), Some(sibling));
    }

    #[test]
    fn each_extra_dot_climbs_one_level() {
        let tmp = tempfile::tempdir().unwrap();
        let origin = touch(tmp.path(), "a/b/c/origin.py");
        let resolver = ModuleResolver::new(tmp.path());

        assert_eq!(
            resolver.base_path("..x", &origin),
            Some(tmp.path().join("a/b/x"))
        );
        assert_eq!(
            resolver.base_path("...x.y", &origin),
            Some(tmp.path().join("a/x/y"))
        );

        let target = touch(tmp.path(), "a/x/y.py");
        assert_eq!(resolver.resolve("...x.y", &origin), Some(target));
    }

    #[test]
    fn bare_dots_name_the_package() {
        let tmp = tempfile::tempdir().unwrap();
        let origin = touch(tmp.path(), "pkg/sub/mod.py");
        let init = touch(tmp.path(), "pkg/__init__.py");
        let resolver = ModuleResolver::new(tmp.path());
        assert_eq!(resolver.resolve("..", &origin), Some(init));
    }

    #[test]
    fn missing_module_is_unresolved() {
        let tmp = tempfile::tempdir().unwrap();
        let main = touch(tmp.path(), "main.py");
        let resolver = ModuleResolver::new(tmp.path());
        assert_eq!(resolver.resolve("requests", &main), None);
        assert_eq!(resolver.resolve(".nothing", &main), None);
    }

    #[test]
    fn directory_without_initializer_is_unresolved() {
        let tmp = tempfile::tempdir().unwrap();
        let main = touch(tmp.path(), "main.py");
        fs::create_dir_all(tmp.path().join("namespace_pkg")).unwrap();
        let resolver = ModuleResolver::new(tmp.path());
        assert_eq!(resolver.resolve("namespace_pkg", &main), None);
    }

    #[test]
    fn climbing_past_filesystem_root_is_unresolved() {
        let resolver = ModuleResolver::new("/");
        assert_eq!(
            resolver.base_path("......x", Path::new("/a/origin.py")),
            None
        );
    }
}
