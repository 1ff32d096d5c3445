use crate::config::FilterConfig;

/// Decides which recorded identifiers are real project files.
///
/// Matching works on the identifier exactly as recorded, split on `/` and
/// `\`, so a `webpack://` style prefix in front never changes the verdict.
#[derive(Debug, Clone)]
pub struct SourceFilter {
    excluded: Vec<String>,
}

impl SourceFilter {
    pub fn new(config: &FilterConfig) -> Self {
        let mut excluded = config.excluded_segments.clone();
        if !config.include_dependency_directories && !config.dependency_segment.is_empty() {
            excluded.push(config.dependency_segment.clone());
        }
        Self { excluded }
    }

    pub fn accepts(&self, identifier: &str) -> bool {
        !identifier
            .split(['/', '\\'])
            .any(|segment| self.excluded.iter().any(|marker| marker == segment))
    }
}

impl Default for SourceFilter {
    fn default() -> Self {
        Self::new(&FilterConfig::default())
    }
}
