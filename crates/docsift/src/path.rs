//! Path helpers.

use std::cmp::Ordering;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

/// Resolves `raw` to an absolute, lexically normalized path.
///
/// A leading `~` is expanded to the home directory, relative paths are
/// joined onto the current directory, and `.`/`..` components are removed
/// without touching the filesystem. Returns the final file name (empty for
/// the root) together with the absolute path.
///
/// # Errors
///
/// Returns an error if the current directory cannot be determined.
///
/// # Examples
///
/// ```
/// use docsift::path::normalize_path;
/// use std::path::Path;
///
/// let (name, path) = normalize_path("/data/./in/../reports/q1.pdf")?;
/// assert_eq!(name, "q1.pdf");
/// assert_eq!(path, Path::new("/data/reports/q1.pdf"));
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn normalize_path(raw: impl AsRef<Path>) -> std::io::Result<(String, PathBuf)> {
    let raw = raw.as_ref();
    let expanded = expand_home(raw);

    let absolute = if expanded.is_absolute() {
        expanded
    } else {
        std::env::current_dir()?.join(expanded)
    };

    let normalized = lexical_normalize(&absolute);
    Ok((basename(&normalized), normalized))
}

fn expand_home(raw: &Path) -> PathBuf {
    let mut components = raw.components();
    match components.next() {
        Some(Component::Normal(first)) if first == "~" => match home::home_dir() {
            Some(home) => home.join(components.as_path()),
            None => raw.to_path_buf(),
        },
        _ => raw.to_path_buf(),
    }
}

fn lexical_normalize(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // `..` at the root stays at the root
                if result.file_name().is_some() {
                    result.pop();
                }
            }
            other => result.push(other.as_os_str()),
        }
    }
    result
}

/// Returns the final component of `path`, or an empty string.
#[must_use]
pub fn basename(path: impl AsRef<Path>) -> String {
    path.as_ref()
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Returns the final component of `path` without its last extension.
///
/// Dot files keep their full name: `.hidden` has no extension.
///
/// # Examples
///
/// ```
/// use docsift::path::basename_without_extension;
///
/// assert_eq!(basename_without_extension("dir/photo.JPG"), "photo");
/// assert_eq!(basename_without_extension("archive.tar.gz"), "archive.tar");
/// assert_eq!(basename_without_extension(".hidden"), ".hidden");
/// ```
#[must_use]
pub fn basename_without_extension(path: impl AsRef<Path>) -> String {
    path.as_ref()
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Sorts paths in natural order, so `page2` comes before `page10`.
#[must_use]
pub fn sort_paths<I, P>(paths: I) -> Vec<PathBuf>
where
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
{
    let mut sorted: Vec<PathBuf> = paths.into_iter().map(Into::into).collect();
    sorted.sort_by(|a, b| natural_cmp(&a.to_string_lossy(), &b.to_string_lossy()));
    sorted
}

/// Compares strings treating runs of ASCII digits as numbers.
#[must_use]
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let (mut i, mut j) = (0, 0);

    while i < a.len() && j < b.len() {
        if a[i].is_ascii_digit() && b[j].is_ascii_digit() {
            let a_end = digit_run_end(a, i);
            let b_end = digit_run_end(b, j);
            let ordering = compare_digit_runs(&a[i..a_end], &b[j..b_end]);
            if ordering != Ordering::Equal {
                return ordering;
            }
            i = a_end;
            j = b_end;
        } else {
            match a[i].cmp(&b[j]) {
                Ordering::Equal => {
                    i += 1;
                    j += 1;
                }
                ordering => return ordering,
            }
        }
    }

    (a.len() - i).cmp(&(b.len() - j))
}

fn digit_run_end(bytes: &[u8], start: usize) -> usize {
    bytes[start..]
        .iter()
        .position(|b| !b.is_ascii_digit())
        .map_or(bytes.len(), |offset| start + offset)
}

fn compare_digit_runs(a: &[u8], b: &[u8]) -> Ordering {
    let strip = |run: &[u8]| -> usize { run.iter().take_while(|&&d| d == b'0').count() };
    let (a_trimmed, b_trimmed) = (&a[strip(a)..], &b[strip(b)..]);
    a_trimmed
        .len()
        .cmp(&b_trimmed.len())
        .then_with(|| a_trimmed.cmp(b_trimmed))
        .then_with(|| a.len().cmp(&b.len()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_absolute() {
        let (name, path) = normalize_path("/a/b/../c/./d.txt").unwrap();
        assert_eq!(name, "d.txt");
        assert_eq!(path, PathBuf::from("/a/c/d.txt"));
    }

    #[test]
    fn test_normalize_relative_is_absolute() {
        let (name, path) = normalize_path("some/file.pdf").unwrap();
        assert_eq!(name, "file.pdf");
        assert!(path.is_absolute());
        assert!(path.ends_with("some/file.pdf"));
    }

    #[test]
    fn test_normalize_parent_above_root() {
        let (name, path) = normalize_path("/../../etc").unwrap();
        assert_eq!(name, "etc");
        assert_eq!(path, PathBuf::from("/etc"));
    }

    #[test]
    fn test_normalize_root() {
        let (name, path) = normalize_path("/").unwrap();
        assert_eq!(name, "");
        assert_eq!(path, PathBuf::from("/"));
    }

    #[test]
    fn test_normalize_home() {
        if let Some(home) = home::home_dir() {
            let (_, path) = normalize_path("~/docs").unwrap();
            assert_eq!(path, lexical_normalize(&home.join("docs")));
        }
    }

    #[test]
    fn test_basename() {
        assert_eq!(basename("/a/b/report.docx"), "report.docx");
        assert_eq!(basename("/"), "");
    }

    #[test]
    fn test_basename_without_extension() {
        assert_eq!(basename_without_extension("/a/b/report.docx"), "report");
        assert_eq!(basename_without_extension("noext"), "noext");
    }

    #[test]
    fn test_sort_paths_natural() {
        let sorted = sort_paths(["page10.pdf", "page2.pdf", "page1.pdf", "cover.pdf"]);
        let names: Vec<_> = sorted.iter().map(|p| p.to_string_lossy().into_owned()).collect();
        assert_eq!(names, ["cover.pdf", "page1.pdf", "page2.pdf", "page10.pdf"]);
    }

    #[test]
    fn test_natural_cmp_leading_zeros() {
        assert_eq!(natural_cmp("a01", "a1"), Ordering::Greater);
        assert_eq!(natural_cmp("a001", "a2"), Ordering::Less);
        assert_eq!(natural_cmp("abc", "abc"), Ordering::Equal);
        assert_eq!(natural_cmp("abc", "abcd"), Ordering::Less);
    }
}
