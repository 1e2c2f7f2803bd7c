use std::iter::repeat;
use std::path::{Path, PathBuf};

pub fn find_first_subpath<P: AsRef<Path>, F: Fn(&Path) -> bool>(
    root: impl AsRef<Path>,
    subpaths: &[P],
    search: F,
) -> Option<PathBuf> {
    subpaths
        .iter()
        .zip(repeat(root.as_ref()))
        .map(|(b, a)| a.join(b))
        .find(|it: &PathBuf| search(it))
}

/// Keeps only characters that are safe in a single path segment.
pub fn sanitize_file_name(name: impl AsRef<str>) -> String {
    let cleaned: String = name
        .as_ref()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect();

    match cleaned.trim_start_matches('.') {
        "" => "document".to_string(),
        rest => rest.to_string(),
    }
}
