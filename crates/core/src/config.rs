use std::path::PathBuf;

/// Directory name conventionally holding third-party packages.
pub const DEPENDENCY_DIR: &str = "node_modules";

/// Path segments that only ever name bundler-generated modules.
pub const BUNDLER_SEGMENTS: &[&str] = &["webpack", "(webpack)"];

/// Scheme-like prefixes bundlers put in front of the real relative path.
pub const VIRTUAL_PREFIXES: &[&str] = &["webpack://"];

/// Everything a restore run needs, built once at startup and passed by
/// reference into each job.
#[derive(Debug, Clone)]
pub struct RestoreConfig {
    pub output_dir: PathBuf,
    pub filter: FilterConfig,
    pub resolver: ResolverConfig,
    /// Upper bound on in-flight writes per job, and on input files processed
    /// at once.
    pub concurrency: usize,
}

impl Default for RestoreConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            filter: FilterConfig::default(),
            resolver: ResolverConfig::default(),
            concurrency: 8,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FilterConfig {
    pub excluded_segments: Vec<String>,
    pub dependency_segment: String,
    pub include_dependency_directories: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            excluded_segments: BUNDLER_SEGMENTS.iter().map(|s| s.to_string()).collect(),
            dependency_segment: DEPENDENCY_DIR.to_string(),
            include_dependency_directories: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolverConfig {
    pub virtual_prefixes: Vec<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            virtual_prefixes: VIRTUAL_PREFIXES.iter().map(|s| s.to_string()).collect(),
        }
    }
}
