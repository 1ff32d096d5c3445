use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::config::ResolverConfig;

static DRIVE_SEGMENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z]:$").unwrap());

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("source path '{0}' resolves to nothing")]
    Empty(String),
    #[error("source path '{0}' escapes the output directory")]
    ParentTraversal(String),
    #[error("source path '{identifier}' has an unusable segment '{segment}'")]
    InvalidSegment { identifier: String, segment: String },
}

/// Maps recorded source identifiers onto paths below an output root.
///
/// Rules:
/// 1. Strip the first matching virtual-origin prefix (`webpack://` by default).
/// 2. Split on `/` and `\`; empty and `.` segments are dropped, so a leading
///    slash never makes the result absolute.
/// 3. Any `..` segment is rejected outright, as are drive letters and NULs.
#[derive(Debug, Clone)]
pub struct PathResolver {
    prefixes: Vec<String>,
}

impl PathResolver {
    pub fn new(config: &ResolverConfig) -> Self {
        Self {
            prefixes: config.virtual_prefixes.clone(),
        }
    }

    pub fn resolve(&self, identifier: &str, output_root: &Path) -> Result<PathBuf, ResolveError> {
        let stripped = self
            .prefixes
            .iter()
            .find_map(|prefix| identifier.strip_prefix(prefix.as_str()))
            .unwrap_or(identifier);

        let mut relative = PathBuf::new();
        for segment in stripped.split(['/', '\\']) {
            match segment {
                "" | "." => continue,
                ".." => return Err(ResolveError::ParentTraversal(identifier.to_string())),
                s if s.contains('\0') || DRIVE_SEGMENT_RE.is_match(s) => {
                    return Err(ResolveError::InvalidSegment {
                        identifier: identifier.to_string(),
                        segment: s.to_string(),
                    });
                }
                s => relative.push(s),
            }
        }

        if relative.as_os_str().is_empty() {
            return Err(ResolveError::Empty(identifier.to_string()));
        }
        Ok(output_root.join(relative))
    }
}

impl Default for PathResolver {
    fn default() -> Self {
        Self::new(&ResolverConfig::default())
    }
}
