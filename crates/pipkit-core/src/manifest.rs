use crate::error::Result;
use crate::PackageName;

/// File at the root of every package tree listing its direct dependencies.
pub const MANIFEST_FILE: &str = "requirements.txt";

/// Parses a requirements manifest: one dependency name per line.
///
/// Lines are trimmed and blank lines (including the one produced by a
/// trailing newline) are skipped. Duplicates are kept; deduplication is the
/// resolver's concern.
pub fn parse_requirements(content: &str) -> Result<Vec<PackageName>> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(PackageName::new)
        .collect()
}

pub fn render_requirements<'a>(names: impl IntoIterator<Item = &'a PackageName>) -> String {
    let mut rendered = String::new();
    for name in names {
        rendered.push_str(name.as_str());
        rendered.push('\n');
    }
    rendered
}
