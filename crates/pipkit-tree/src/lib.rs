//! File trees used as package workspaces and as fetched package contents.

mod dir;
mod memory;
mod path;

use std::io;

pub use dir::DirTree;
pub use memory::MemoryTree;
pub use path::normalize_rel_path;

/// Relative-path file tree.
///
/// Paths are `/`-separated and relative to the tree root. `write_file` and
/// `append_file` only operate on files that already exist; `remove` is
/// recursive and succeeds when the path is absent.
pub trait FileTree {
    /// Creates an empty file, truncating an existing one. The parent
    /// directory must exist.
    fn create_file(&mut self, path: &str) -> io::Result<()>;

    /// Creates one directory. Fails if it exists or its parent does not.
    fn create_dir(&mut self, path: &str) -> io::Result<()>;

    fn read_file(&self, path: &str) -> io::Result<String>;

    fn write_file(&mut self, path: &str, content: &str) -> io::Result<()>;

    fn append_file(&mut self, path: &str, content: &str) -> io::Result<()>;

    /// Root-relative paths of every file under `subpath` (`""` for the whole
    /// tree), sorted.
    fn list_files(&self, subpath: &str) -> io::Result<Vec<String>>;

    /// Root-relative paths of every directory under `subpath`, sorted so a
    /// parent always precedes its children.
    fn list_dirs(&self, subpath: &str) -> io::Result<Vec<String>>;

    fn exists(&self, path: &str) -> bool;

    fn remove(&mut self, path: &str) -> io::Result<()>;

    /// Creates `path` and deep-copies `other` into it.
    fn mount(&mut self, path: &str, other: &dyn FileTree) -> io::Result<()> {
        let path = normalize_rel_path(path)?;
        self.create_dir(&path)?;
        copy_tree(other, self, &path)
    }

    /// Independent in-memory copy of the whole tree.
    fn snapshot(&self) -> io::Result<MemoryTree> {
        let mut snapshot = MemoryTree::new();
        copy_tree(self, &mut snapshot, "")?;
        Ok(snapshot)
    }
}

/// Copies every directory and file of `src` under `prefix` in `dst`.
/// `prefix` must already exist in `dst` (or be `""` for the root).
pub fn copy_tree<S: FileTree + ?Sized, T: FileTree + ?Sized>(
    src: &S,
    dst: &mut T,
    prefix: &str,
) -> io::Result<()> {
    let target = |rel: &str| {
        if prefix.is_empty() {
            rel.to_string()
        } else {
            format!("{prefix}/{rel}")
        }
    };

    for dir in src.list_dirs("")? {
        dst.create_dir(&target(&dir))?;
    }
    for file in src.list_files("")? {
        let content = src.read_file(&file)?;
        let destination = target(&file);
        dst.create_file(&destination)?;
        dst.write_file(&destination, &content)?;
    }
    Ok(())
}
