use std::io;

/// Validates a tree-relative path and returns it without trailing `/`.
pub fn normalize_rel_path(path: &str) -> io::Result<String> {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(invalid_path(path, "path must not be empty"));
    }
    if trimmed.starts_with('/') {
        return Err(invalid_path(path, "path must be relative"));
    }
    if trimmed.contains('\\') {
        return Err(invalid_path(path, "path must use '/' separators"));
    }
    if trimmed
        .split('/')
        .any(|segment| segment.is_empty() || segment == "." || segment == "..")
    {
        return Err(invalid_path(
            path,
            "path must not include empty, '.' or '..' segments",
        ));
    }
    Ok(trimmed.to_string())
}

/// Like [`normalize_rel_path`] but maps `""` to the tree root.
pub(crate) fn normalize_subpath(path: &str) -> io::Result<Option<String>> {
    if path.is_empty() {
        return Ok(None);
    }
    normalize_rel_path(path).map(Some)
}

pub(crate) fn parent_of(path: &str) -> Option<&str> {
    path.rsplit_once('/').map(|(parent, _)| parent)
}

pub(crate) fn not_found(path: &str, what: &str) -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, format!("{what} not found: {path}"))
}

fn invalid_path(path: &str, reason: &str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, format!("{reason}: {path:?}"))
}
