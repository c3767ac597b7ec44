use std::io::{self, Write};
use std::path::Path;

/// Abstraction over file system operations for testing
pub trait FileSystem: Send + Sync {
    /// Read file contents as a string
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Replace the contents of a file. Implementations must not leave a
    /// partially written file behind on failure.
    fn write(&self, path: &Path, contents: &str) -> io::Result<()>;

    /// Check if a path exists
    fn exists(&self, path: &Path) -> bool;

    /// Create a directory and all parent directories
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Read a file, mapping "not found" to `None`
    fn read_optional(&self, path: &Path) -> io::Result<Option<String>> {
        match self.read_to_string(path) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }
}

/// Real file system implementation using std::fs
#[derive(Debug, Default, Clone)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    /// Writes through a temp file in the target directory, then renames it
    /// over the destination.
    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(contents.as_bytes())?;
        tmp.flush()?;
        tmp.persist(path).map_err(|err| err.error)?;
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }
}

/// In-memory file system for testing
#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::{HashMap, HashSet};
    use std::path::PathBuf;
    use std::sync::{Arc, RwLock};

    #[derive(Debug, Default, Clone)]
    pub struct InMemoryFileSystem {
        files: Arc<RwLock<HashMap<PathBuf, String>>>,
        directories: Arc<RwLock<HashSet<PathBuf>>>,
        read_only: Arc<RwLock<HashSet<PathBuf>>>,
    }

    impl InMemoryFileSystem {
        pub fn new() -> Self {
            Self::default()
        }

        /// Add a file to the mock file system
        pub fn add_file(&self, path: impl AsRef<Path>, contents: impl Into<String>) {
            let path = path.as_ref().to_path_buf();
            if let Some(parent) = path.parent() {
                self.create_dir_all(parent).unwrap();
            }
            self.files.write().unwrap().insert(path, contents.into());
        }

        /// Make writes to `path` fail with `PermissionDenied`
        pub fn deny_writes(&self, path: impl AsRef<Path>) {
            self.read_only
                .write()
                .unwrap()
                .insert(path.as_ref().to_path_buf());
        }

        pub fn file(&self, path: impl AsRef<Path>) -> Option<String> {
            self.files.read().unwrap().get(path.as_ref()).cloned()
        }

        pub fn has_dir(&self, path: impl AsRef<Path>) -> bool {
            self.directories.read().unwrap().contains(path.as_ref())
        }
    }

    impl FileSystem for InMemoryFileSystem {
        fn read_to_string(&self, path: &Path) -> io::Result<String> {
            self.files.read().unwrap().get(path).cloned().ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("File not found: {}", path.display()),
                )
            })
        }

        fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
            if self.read_only.read().unwrap().contains(path) {
                return Err(io::Error::new(
                    io::ErrorKind::PermissionDenied,
                    format!("Read-only: {}", path.display()),
                ));
            }
            self.files
                .write()
                .unwrap()
                .insert(path.to_path_buf(), contents.to_string());
            Ok(())
        }

        fn exists(&self, path: &Path) -> bool {
            self.files.read().unwrap().contains_key(path)
                || self.directories.read().unwrap().contains(path)
        }

        fn create_dir_all(&self, path: &Path) -> io::Result<()> {
            let mut current = PathBuf::new();
            for component in path.components() {
                current.push(component);
                self.directories.write().unwrap().insert(current.clone());
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_real_write_replaces_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("en.json");
        let fs = RealFileSystem;

        fs.write(&path, "{}").unwrap();
        fs.write(&path, "{\n  \"a\": \"b\"\n}\n").unwrap();

        assert_eq!(
            fs.read_to_string(&path).unwrap(),
            "{\n  \"a\": \"b\"\n}\n"
        );
        // Only the target file remains; the temp file was renamed away
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_read_optional_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let fs = RealFileSystem;
        assert!(fs
            .read_optional(&tmp.path().join("missing.json"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_in_memory_file_system() {
        use mock::InMemoryFileSystem;

        let fs = InMemoryFileSystem::new();
        fs.add_file("assets/i18n/en.json", "{}");

        assert!(fs.exists(Path::new("assets/i18n/en.json")));
        assert!(fs.exists(Path::new("assets/i18n")));
        assert!(fs.has_dir("assets"));
        assert_eq!(
            fs.read_optional(Path::new("assets/i18n/fr.json")).unwrap(),
            None
        );

        fs.deny_writes("assets/i18n/en.json");
        let err = fs
            .write(Path::new("assets/i18n/en.json"), "[]")
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
        assert_eq!(fs.file("assets/i18n/en.json").as_deref(), Some("{}"));
    }
}
