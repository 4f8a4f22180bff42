//! Storage access for the generation engine
//!
//! Every component that touches files does so through the [`Storage`] trait,
//! which is passed in explicitly rather than held as process-wide state. Two
//! implementations are provided:
//!
//! - [`DiskFS`]: the host filesystem, with relative paths resolved against a
//!   root directory (normally the meta-repo root).
//! - [`MemoryFS`]: an in-memory filesystem, used to stage rendered manifests
//!   before they are flushed to disk, and as a test double.

use crate::error::{Error, Result};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Read/write capability over text and byte content.
pub trait Storage {
    /// Read a file's bytes.
    fn read(&self, path: &Path) -> Result<Vec<u8>>;

    /// Write a file, replacing any previous content.
    ///
    /// The parent directory must already exist on storages that track
    /// directories.
    fn write(&mut self, path: &Path, content: &[u8]) -> Result<()>;

    /// List the names of the regular files directly inside `path`, sorted.
    fn list_dir(&self, path: &Path) -> Result<Vec<String>>;

    /// Create a directory and all of its parents.
    fn create_dir_all(&mut self, path: &Path) -> Result<()>;

    /// Check if a file or directory exists.
    fn exists(&self, path: &Path) -> bool;

    /// Read a file as UTF-8 text.
    fn read_to_string(&self, path: &Path) -> Result<String> {
        let bytes = self.read(path)?;
        String::from_utf8(bytes).map_err(|e| Error::Filesystem {
            message: format!("File '{}' is not valid UTF-8: {}", path.display(), e),
        })
    }
}

/// Drop `.` components so `./a/b` and `a/b` address the same entry.
fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// Represents a file held in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    /// File content as bytes
    pub content: Vec<u8>,
}

impl File {
    /// Create a new file with content
    pub fn new(content: Vec<u8>) -> Self {
        Self { content }
    }

    /// Create a new file from string content
    pub fn from_string(content: &str) -> Self {
        Self::new(content.as_bytes().to_vec())
    }
}

/// In-memory filesystem
#[derive(Debug, Clone, Default)]
pub struct MemoryFS {
    files: HashMap<PathBuf, File>,
    dirs: HashSet<PathBuf>,
}

impl MemoryFS {
    /// Create a new empty filesystem
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or update a file, registering its parent directories
    pub fn add_file<P: AsRef<Path>>(&mut self, path: P, file: File) -> Result<()> {
        let path = normalize(path.as_ref());
        if let Some(parent) = path.parent() {
            self.register_dirs(parent);
        }
        self.files.insert(path, file);
        Ok(())
    }

    /// Add a file with string content
    pub fn add_file_string<P: AsRef<Path>>(&mut self, path: P, content: &str) -> Result<()> {
        self.add_file(path, File::from_string(content))
    }

    /// Get a file by path
    pub fn get_file<P: AsRef<Path>>(&self, path: P) -> Option<&File> {
        self.files.get(&normalize(path.as_ref()))
    }

    /// Get the number of files
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if filesystem is empty
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// All files as (path, file) pairs, sorted by path
    pub fn files(&self) -> Vec<(&PathBuf, &File)> {
        let mut files: Vec<_> = self.files.iter().collect();
        files.sort_by(|a, b| a.0.cmp(b.0));
        files
    }

    /// All known directories, sorted so parents precede children
    pub fn directories(&self) -> Vec<&PathBuf> {
        let mut dirs: Vec<&PathBuf> = self.dirs.iter().collect();
        dirs.sort();
        dirs
    }

    fn register_dirs(&mut self, dir: &Path) {
        for ancestor in dir.ancestors() {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            self.dirs.insert(ancestor.to_path_buf());
        }
    }
}

impl Storage for MemoryFS {
    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        self.get_file(path)
            .map(|f| f.content.clone())
            .ok_or_else(|| Error::Filesystem {
                message: format!("File not found: {}", path.display()),
            })
    }

    fn write(&mut self, path: &Path, content: &[u8]) -> Result<()> {
        let path = normalize(path);
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !self.dirs.contains(parent) {
                return Err(Error::Filesystem {
                    message: format!("Directory not found: {}", parent.display()),
                });
            }
        }
        self.files.insert(path, File::new(content.to_vec()));
        Ok(())
    }

    fn list_dir(&self, path: &Path) -> Result<Vec<String>> {
        let dir = normalize(path);
        if !self.dirs.contains(&dir) {
            return Err(Error::Filesystem {
                message: format!("Directory not found: {}", path.display()),
            });
        }

        let mut names: Vec<String> = self
            .files
            .keys()
            .filter(|p| p.parent() == Some(dir.as_path()))
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()).map(String::from))
            .collect();
        names.sort();
        Ok(names)
    }

    fn create_dir_all(&mut self, path: &Path) -> Result<()> {
        if self.files.contains_key(&normalize(path)) {
            return Err(Error::Filesystem {
                message: format!("Path exists and is a file: {}", path.display()),
            });
        }
        self.register_dirs(&normalize(path));
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        let path = normalize(path);
        self.files.contains_key(&path) || self.dirs.contains(&path)
    }
}

/// Host filesystem rooted at a directory
#[derive(Debug, Clone)]
pub struct DiskFS {
    root: PathBuf,
}

impl DiskFS {
    /// Create a disk storage resolving relative paths against `root`
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    /// The directory relative paths are resolved against
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }
}

impl Storage for DiskFS {
    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        let full_path = self.resolve(path);
        fs::read(&full_path).map_err(|e| Error::Filesystem {
            message: format!("Failed to read file '{}': {}", full_path.display(), e),
        })
    }

    fn write(&mut self, path: &Path, content: &[u8]) -> Result<()> {
        let full_path = self.resolve(path);
        fs::write(&full_path, content).map_err(|e| Error::Filesystem {
            message: format!("Failed to write file '{}': {}", full_path.display(), e),
        })
    }

    fn list_dir(&self, path: &Path) -> Result<Vec<String>> {
        let full_path = self.resolve(path);
        if !full_path.is_dir() {
            return Err(Error::Filesystem {
                message: format!("Not a directory: {}", full_path.display()),
            });
        }

        let mut names = Vec::new();

        for entry in WalkDir::new(&full_path)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| Error::Filesystem {
                message: format!("Failed to list directory '{}': {}", full_path.display(), e),
            })?;

            if !entry.file_type().is_file() {
                log::debug!("Skipping non-file entry {}", entry.path().display());
                continue;
            }

            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }

        Ok(names)
    }

    fn create_dir_all(&mut self, path: &Path) -> Result<()> {
        let full_path = self.resolve(path);
        fs::create_dir_all(&full_path).map_err(|e| Error::Filesystem {
            message: format!("Failed to create directory '{}': {}", full_path.display(), e),
        })
    }

    fn exists(&self, path: &Path) -> bool {
        self.resolve(path).exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_fs_add_and_read() {
        let mut fs = MemoryFS::new();
        fs.add_file_string("svc-a/deployment.yaml", "kind: Deployment")
            .unwrap();

        assert_eq!(fs.len(), 1);
        assert_eq!(
            fs.read_to_string(Path::new("svc-a/deployment.yaml")).unwrap(),
            "kind: Deployment"
        );
    }

    #[test]
    fn test_memory_fs_normalizes_current_dir() {
        let mut fs = MemoryFS::new();
        fs.add_file_string("./templates/svc-a/a.yaml", "a").unwrap();

        assert!(fs.exists(Path::new("templates/svc-a/a.yaml")));
        assert!(fs.exists(Path::new("templates/svc-a")));
        assert!(fs.exists(Path::new("templates")));
    }

    #[test]
    fn test_memory_fs_list_dir_sorted_and_shallow() {
        let mut fs = MemoryFS::new();
        fs.add_file_string("t/svc-a/service.yaml", "s").unwrap();
        fs.add_file_string("t/svc-a/deployment.yaml", "d").unwrap();
        fs.add_file_string("t/svc-a/nested/ignored.yaml", "n").unwrap();

        let names = fs.list_dir(Path::new("t/svc-a")).unwrap();
        assert_eq!(names, vec!["deployment.yaml", "service.yaml"]);
    }

    #[test]
    fn test_memory_fs_list_missing_dir_fails() {
        let fs = MemoryFS::new();
        let result = fs.list_dir(Path::new("templates/svc-c"));
        assert!(matches!(result, Err(Error::Filesystem { .. })));
    }

    #[test]
    fn test_memory_fs_write_requires_parent() {
        let mut fs = MemoryFS::new();
        assert!(fs.write(Path::new("out/svc-a/a.yaml"), b"a").is_err());

        fs.create_dir_all(Path::new("out/svc-a")).unwrap();
        fs.write(Path::new("out/svc-a/a.yaml"), b"a").unwrap();
        assert_eq!(fs.read(Path::new("out/svc-a/a.yaml")).unwrap(), b"a");
    }

    #[test]
    fn test_memory_fs_write_at_root() {
        let mut fs = MemoryFS::new();
        fs.write(Path::new("skaffold-story.yaml"), b"kind: Config")
            .unwrap();
        assert!(fs.exists(Path::new("skaffold-story.yaml")));
    }

    #[test]
    fn test_memory_fs_directories() {
        let mut fs = MemoryFS::new();
        fs.add_file_string("out/b/x.yaml", "x").unwrap();
        fs.create_dir_all(Path::new("out/a")).unwrap();
        fs.add_file_string("root.yaml", "r").unwrap();

        let dirs: Vec<&str> = fs
            .directories()
            .into_iter()
            .map(|d| d.to_str().unwrap())
            .collect();
        assert_eq!(dirs, vec!["out", "out/a", "out/b"]);
    }

    #[test]
    fn test_disk_fs_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let mut fs = DiskFS::new(temp_dir.path());

        fs.create_dir_all(Path::new("out/svc-a")).unwrap();
        fs.write(Path::new("out/svc-a/a.yaml"), b"namespace: x")
            .unwrap();

        assert!(temp_dir.path().join("out/svc-a/a.yaml").exists());
        assert_eq!(
            fs.read_to_string(Path::new("out/svc-a/a.yaml")).unwrap(),
            "namespace: x"
        );
    }

    #[test]
    fn test_disk_fs_list_dir_skips_directories() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("templates/svc-a");
        std::fs::create_dir_all(dir.join("nested")).unwrap();
        std::fs::write(dir.join("service.yaml"), "s").unwrap();
        std::fs::write(dir.join("deployment.yaml"), "d").unwrap();

        let fs = DiskFS::new(temp_dir.path());
        let names = fs.list_dir(Path::new("templates/svc-a")).unwrap();
        assert_eq!(names, vec!["deployment.yaml", "service.yaml"]);
    }

    #[test]
    #[cfg(unix)]
    fn test_disk_fs_list_dir_follows_symlinked_files() {
        let temp_dir = TempDir::new().unwrap();
        let shared = temp_dir.path().join("shared");
        let dir = temp_dir.path().join("templates/svc-a");
        std::fs::create_dir_all(shared.join("nested")).unwrap();
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(shared.join("deployment.yaml"), "d").unwrap();
        std::fs::write(dir.join("service.yaml"), "s").unwrap();
        std::os::unix::fs::symlink(shared.join("deployment.yaml"), dir.join("deployment.yaml"))
            .unwrap();
        std::os::unix::fs::symlink(shared.join("nested"), dir.join("nested")).unwrap();

        let fs = DiskFS::new(temp_dir.path());
        let names = fs.list_dir(Path::new("templates/svc-a")).unwrap();
        assert_eq!(names, vec!["deployment.yaml", "service.yaml"]);
        assert_eq!(
            fs.read_to_string(Path::new("templates/svc-a/deployment.yaml"))
                .unwrap(),
            "d"
        );
    }

    #[test]
    fn test_disk_fs_list_missing_dir_fails() {
        let temp_dir = TempDir::new().unwrap();
        let fs = DiskFS::new(temp_dir.path());
        assert!(fs.list_dir(Path::new("does-not-exist")).is_err());
    }
}
