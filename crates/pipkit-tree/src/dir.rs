use std::collections::VecDeque;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::path::{normalize_rel_path, normalize_subpath, not_found};
use crate::FileTree;

/// File tree rooted at a directory on disk.
#[derive(Debug, PartialEq, Eq)]
pub struct DirTree {
    root: PathBuf,
}

impl DirTree {
    /// Opens `root`, creating it (and missing parents) when absent.
    pub fn open(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Opens an existing directory without creating anything.
    pub fn existing(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(not_found(&root.display().to_string(), "directory"));
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> io::Result<PathBuf> {
        let path = normalize_rel_path(path)?;
        Ok(self.root.join(path))
    }

    fn collect(&self, subpath: &str, want_dirs: bool) -> io::Result<Vec<String>> {
        let start = match normalize_subpath(subpath)? {
            None => self.root.clone(),
            Some(rel) => {
                let start = self.root.join(&rel);
                if start.is_file() {
                    return Ok(if want_dirs { Vec::new() } else { vec![rel] });
                }
                if !start.is_dir() {
                    return Err(not_found(&rel, "directory"));
                }
                start
            }
        };

        let mut paths = Vec::new();
        let mut queue: VecDeque<PathBuf> = VecDeque::new();
        queue.push_back(start);

        while let Some(dir) = queue.pop_front() {
            for entry in fs::read_dir(&dir)? {
                let entry = entry?;
                let path = entry.path();
                let file_type = entry.file_type()?;
                if file_type.is_dir() {
                    if want_dirs {
                        paths.push(self.relative(&path)?);
                    }
                    queue.push_back(path);
                } else if file_type.is_file() && !want_dirs {
                    paths.push(self.relative(&path)?);
                }
            }
        }

        paths.sort();
        Ok(paths)
    }

    fn relative(&self, path: &Path) -> io::Result<String> {
        let relative = path.strip_prefix(&self.root).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "path {} escaped tree root {}",
                    path.display(),
                    self.root.display()
                ),
            )
        })?;
        Ok(relative
            .components()
            .map(|component| component.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/"))
    }
}

impl FileTree for DirTree {
    fn create_file(&mut self, path: &str) -> io::Result<()> {
        fs::File::create(self.resolve(path)?).map(|_| ())
    }

    fn create_dir(&mut self, path: &str) -> io::Result<()> {
        fs::create_dir(self.resolve(path)?)
    }

    fn read_file(&self, path: &str) -> io::Result<String> {
        fs::read_to_string(self.resolve(path)?)
    }

    fn write_file(&mut self, path: &str, content: &str) -> io::Result<()> {
        let target = self.resolve(path)?;
        if !target.is_file() {
            return Err(not_found(path, "file"));
        }
        fs::write(target, content)
    }

    fn append_file(&mut self, path: &str, content: &str) -> io::Result<()> {
        use std::io::Write;

        let target = self.resolve(path)?;
        if !target.is_file() {
            return Err(not_found(path, "file"));
        }
        let mut file = fs::OpenOptions::new().append(true).open(target)?;
        file.write_all(content.as_bytes())
    }

    fn list_files(&self, subpath: &str) -> io::Result<Vec<String>> {
        self.collect(subpath, false)
    }

    fn list_dirs(&self, subpath: &str) -> io::Result<Vec<String>> {
        self.collect(subpath, true)
    }

    fn exists(&self, path: &str) -> bool {
        self.resolve(path).is_ok_and(|target| target.exists())
    }

    fn remove(&mut self, path: &str) -> io::Result<()> {
        let target = self.resolve(path)?;
        match fs::symlink_metadata(&target) {
            Ok(metadata) if metadata.is_dir() => fs::remove_dir_all(&target),
            Ok(_) => fs::remove_file(&target),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err),
        }
    }
}
