use std::ffi::OsString;
use std::path::{self, Path, PathBuf};
use walkdir::WalkDir;

/// Native separator between classpath entries
pub const PATH_SEPARATOR: &str = if cfg!(windows) { ";" } else { ":" };

/// Ordered classpath: the explicit prefix, then every file in the libs directory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classpath {
    entries: Vec<PathBuf>,
}

impl Classpath {
    /// Build the classpath for an application rooted at `base_dir`
    ///
    /// `class_path` is an optional prefix entry and `libs_dir` the library
    /// directory, both relative to `base_dir`. A missing libs directory adds
    /// nothing. Subdirectories are not searched.
    pub fn build(base_dir: &Path, class_path: &str, libs_dir: &str) -> Self {
        let mut entries = Vec::new();

        if !class_path.is_empty() {
            entries.push(absolute(base_dir.join(class_path)));
        }

        let libs = absolute(base_dir.join(libs_dir));
        tracing::info!("libs dir: {:?}", libs);
        if libs.is_dir() {
            for entry in WalkDir::new(&libs)
                .min_depth(1)
                .max_depth(1)
                .follow_links(true)
            {
                match entry {
                    Ok(entry) if entry.file_type().is_file() => {
                        entries.push(entry.into_path());
                    }
                    Ok(_) => {}
                    Err(err) => tracing::warn!("skipping unreadable library entry: {err}"),
                }
            }
        }

        let classpath = Self { entries };
        tracing::info!("classpath = {:?}", classpath.join());
        classpath
    }

    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries joined with the platform separator, without escaping
    pub fn join(&self) -> OsString {
        let mut joined = OsString::new();
        for (idx, entry) in self.entries.iter().enumerate() {
            if idx > 0 {
                joined.push(PATH_SEPARATOR);
            }
            joined.push(entry.as_os_str());
        }
        joined
    }
}

impl FromIterator<PathBuf> for Classpath {
    fn from_iter<I: IntoIterator<Item = PathBuf>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

fn absolute(path: PathBuf) -> PathBuf {
    path::absolute(&path).unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::write(path, b"").unwrap();
    }

    #[test]
    fn test_build_lists_library_files() {
        let temp = TempDir::new().unwrap();
        let lib = temp.path().join("lib");
        fs::create_dir(&lib).unwrap();
        for name in ["a.jar", "b.jar", "c.jar"] {
            touch(&lib.join(name));
        }

        let classpath = Classpath::build(temp.path(), "", "lib");
        let found: HashSet<PathBuf> = classpath.entries().iter().cloned().collect();
        let expected: HashSet<PathBuf> = ["a.jar", "b.jar", "c.jar"]
            .iter()
            .map(|n| lib.join(n))
            .collect();

        assert_eq!(classpath.entries().len(), 3);
        assert_eq!(found, expected);
        assert!(classpath.entries().iter().all(|p| p.is_absolute()));
    }

    #[test]
    fn test_build_prefix_comes_first() {
        let temp = TempDir::new().unwrap();
        let lib = temp.path().join("lib");
        fs::create_dir(&lib).unwrap();
        touch(&lib.join("x.jar"));

        let classpath = Classpath::build(temp.path(), "classes", "lib");
        assert_eq!(
            classpath.entries(),
            &[temp.path().join("classes"), lib.join("x.jar")]
        );
    }

    #[test]
    fn test_build_missing_libs_dir_keeps_only_prefix() {
        let temp = TempDir::new().unwrap();

        let classpath = Classpath::build(temp.path(), "app.jar", "lib");
        assert_eq!(classpath.entries(), &[temp.path().join("app.jar")]);

        let classpath = Classpath::build(temp.path(), "", "lib");
        assert!(classpath.is_empty());
        assert!(classpath.join().is_empty());
    }

    #[test]
    fn test_build_libs_path_that_is_a_file_adds_nothing() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("lib"));

        let classpath = Classpath::build(temp.path(), "", "lib");
        assert!(classpath.is_empty());
    }

    #[test]
    fn test_build_does_not_recurse_into_subdirectories() {
        let temp = TempDir::new().unwrap();
        let lib = temp.path().join("jars");
        fs::create_dir_all(lib.join("nested")).unwrap();
        touch(&lib.join("top.jar"));
        touch(&lib.join("nested/deep.jar"));

        let classpath = Classpath::build(temp.path(), "", "jars");
        assert_eq!(classpath.entries(), &[lib.join("top.jar")]);
    }

    #[test]
    fn test_build_is_stable_within_a_run() {
        let temp = TempDir::new().unwrap();
        let lib = temp.path().join("lib");
        fs::create_dir(&lib).unwrap();
        for i in 0..10 {
            touch(&lib.join(format!("lib{i}.jar")));
        }

        let first = Classpath::build(temp.path(), "", "lib");
        let second = Classpath::build(temp.path(), "", "lib");
        assert_eq!(first, second);
    }

    #[test]
    fn test_join_uses_platform_separator() {
        let classpath: Classpath = [PathBuf::from("/a/one.jar"), PathBuf::from("/b/two.jar")]
            .into_iter()
            .collect();
        assert_eq!(
            classpath.join(),
            OsString::from(format!("/a/one.jar{PATH_SEPARATOR}/b/two.jar"))
        );
    }
}
