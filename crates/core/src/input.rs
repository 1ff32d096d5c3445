use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use globset::GlobBuilder;
use log::warn;
use thiserror::Error;
use tokio::fs;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum InputError {
    #[error("file not found: {0}")]
    NotFound(PathBuf),
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),
    #[error("not a regular file: {0}")]
    NotAFile(PathBuf),
    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl InputError {
    fn from_io(path: &Path, err: std::io::Error) -> Self {
        match err.kind() {
            ErrorKind::NotFound => InputError::NotFound(path.to_path_buf()),
            ErrorKind::PermissionDenied => InputError::PermissionDenied(path.to_path_buf()),
            _ => InputError::Io {
                path: path.to_path_buf(),
                source: err,
            },
        }
    }
}

/// Read a source map file, checking first that it is a regular file.
pub async fn read_input<P: AsRef<Path>>(path: P) -> Result<Vec<u8>, InputError> {
    let path = path.as_ref();
    let meta = fs::metadata(path)
        .await
        .map_err(|e| InputError::from_io(path, e))?;
    if !meta.is_file() {
        return Err(InputError::NotAFile(path.to_path_buf()));
    }
    fs::read(path).await.map_err(|e| InputError::from_io(path, e))
}

fn is_glob(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

/// Expand one command line argument into input paths.
///
/// An argument without glob metacharacters comes back untouched so that a
/// missing file gets reported later instead of vanishing here.
pub fn expand_pattern(pattern: &str) -> Result<Vec<PathBuf>, InputError> {
    if !is_glob(pattern) {
        return Ok(vec![PathBuf::from(pattern)]);
    }

    let meta_at = pattern.find(['*', '?', '[']).unwrap_or(0);
    let (base, rest) = match pattern[..meta_at].rfind('/') {
        Some(slash) => (&pattern[..=slash], &pattern[slash + 1..]),
        None => ("", pattern),
    };
    let matcher = GlobBuilder::new(rest)
        .literal_separator(true)
        .backslash_escape(true)
        .build()
        .map_err(|e| InputError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.kind().to_string(),
        })?
        .compile_matcher();

    let root = if base.is_empty() { Path::new(".") } else { Path::new(base) };
    let mut walker = WalkDir::new(root).min_depth(1).sort_by_file_name();
    if !rest.contains("**") {
        walker = walker.max_depth(rest.split('/').count());
    }

    let mut found = Vec::new();
    for entry in walker.into_iter().filter_map(Result::ok) {
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        let relative = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        if matcher.is_match(&relative) {
            found.push(if base.is_empty() {
                PathBuf::from(relative)
            } else {
                Path::new(base).join(relative)
            });
        }
    }
    Ok(found)
}

/// Expand every argument in order, dropping repeats of an already seen path.
/// A pattern that matches nothing is logged and otherwise ignored.
pub fn expand_patterns<I, S>(patterns: I) -> Result<Vec<PathBuf>, InputError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut paths = Vec::new();
    for pattern in patterns {
        let matched = expand_pattern(pattern.as_ref())?;
        if matched.is_empty() {
            warn!("no files matched pattern '{}'", pattern.as_ref());
        }
        for path in matched {
            if seen.insert(path.clone()) {
                paths.push(path);
            }
        }
    }
    Ok(paths)
}
