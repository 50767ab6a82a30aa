use std::collections::BTreeMap;
use std::io;

use crate::path::{normalize_rel_path, normalize_subpath, not_found, parent_of};
use crate::FileTree;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Dir,
    File(String),
}

/// In-memory file tree. `Clone` yields a fully independent copy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryTree {
    nodes: BTreeMap<String, Node>,
}

impl MemoryTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn is_dir(&self, path: &str) -> bool {
        matches!(self.nodes.get(path), Some(Node::Dir))
    }

    fn ensure_parent_dir(&self, path: &str) -> io::Result<()> {
        match parent_of(path) {
            None => Ok(()),
            Some(parent) if self.is_dir(parent) => Ok(()),
            Some(parent) => Err(not_found(parent, "parent directory")),
        }
    }

    fn file_mut(&mut self, path: &str) -> io::Result<&mut String> {
        let path = normalize_rel_path(path)?;
        match self.nodes.get_mut(&path) {
            Some(Node::File(content)) => Ok(content),
            _ => Err(not_found(&path, "file")),
        }
    }

    fn collect(&self, subpath: &str, want_dirs: bool) -> io::Result<Vec<String>> {
        let keep = |node: &Node| match node {
            Node::Dir => want_dirs,
            Node::File(_) => !want_dirs,
        };

        let Some(subpath) = normalize_subpath(subpath)? else {
            return Ok(self
                .nodes
                .iter()
                .filter(|(_, node)| keep(node))
                .map(|(path, _)| path.clone())
                .collect());
        };

        match self.nodes.get(&subpath) {
            Some(Node::Dir) => {}
            Some(Node::File(_)) if !want_dirs => return Ok(vec![subpath]),
            Some(Node::File(_)) => return Ok(Vec::new()),
            None => return Err(not_found(&subpath, "directory")),
        }

        let prefix = format!("{subpath}/");
        Ok(self
            .nodes
            .range(prefix.clone()..)
            .take_while(|(path, _)| path.starts_with(&prefix))
            .filter(|(_, node)| keep(node))
            .map(|(path, _)| path.clone())
            .collect())
    }
}

impl FileTree for MemoryTree {
    fn create_file(&mut self, path: &str) -> io::Result<()> {
        let path = normalize_rel_path(path)?;
        self.ensure_parent_dir(&path)?;
        if self.is_dir(&path) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("a directory already exists at {path}"),
            ));
        }
        self.nodes.insert(path, Node::File(String::new()));
        Ok(())
    }

    fn create_dir(&mut self, path: &str) -> io::Result<()> {
        let path = normalize_rel_path(path)?;
        self.ensure_parent_dir(&path)?;
        if self.nodes.contains_key(&path) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("path already exists: {path}"),
            ));
        }
        self.nodes.insert(path, Node::Dir);
        Ok(())
    }

    fn read_file(&self, path: &str) -> io::Result<String> {
        let path = normalize_rel_path(path)?;
        match self.nodes.get(&path) {
            Some(Node::File(content)) => Ok(content.clone()),
            _ => Err(not_found(&path, "file")),
        }
    }

    fn write_file(&mut self, path: &str, content: &str) -> io::Result<()> {
        let file = self.file_mut(path)?;
        *file = content.to_string();
        Ok(())
    }

    fn append_file(&mut self, path: &str, content: &str) -> io::Result<()> {
        self.file_mut(path)?.push_str(content);
        Ok(())
    }

    fn list_files(&self, subpath: &str) -> io::Result<Vec<String>> {
        self.collect(subpath, false)
    }

    fn list_dirs(&self, subpath: &str) -> io::Result<Vec<String>> {
        self.collect(subpath, true)
    }

    fn exists(&self, path: &str) -> bool {
        normalize_rel_path(path).is_ok_and(|path| self.nodes.contains_key(&path))
    }

    fn remove(&mut self, path: &str) -> io::Result<()> {
        let path = normalize_rel_path(path)?;
        let prefix = format!("{path}/");
        self.nodes
            .retain(|existing, _| existing != &path && !existing.starts_with(&prefix));
        Ok(())
    }

    fn snapshot(&self) -> io::Result<MemoryTree> {
        Ok(self.clone())
    }
}
