use std::collections::HashMap;

use log::debug;
use serde_json::{Map, Value};
use sourcemap::{DecodedMap, SourceMap};
use thiserror::Error;

/// The only source map revision we know how to extract from.
pub const SUPPORTED_VERSION: u64 = 3;

#[derive(Error, Debug)]
pub enum MappingError {
    #[error("malformed source map: {0}")]
    Malformed(String),
    #[error("Invalid SourceMap Version {found}")]
    UnsupportedVersion { found: Value },
}

/// A parsed version 3 source map, reduced to what restoration needs: the
/// recorded source identifiers and their embedded contents. Only documents
/// whose `version` is 3 are ever constructed.
#[derive(Debug, Clone)]
pub struct MappingDocument {
    sources: Vec<String>,
    contents: HashMap<String, String>,
}

impl MappingDocument {
    /// Parse raw bytes of a source map.
    ///
    /// The `version` field is checked before the map is decoded, so a
    /// document of another revision is reported as such even if the rest of
    /// it would not decode. Sectioned (index) maps are flattened. A regular
    /// map whose `mappings` do not decode still yields its sources, since
    /// restoring them never looks at the mappings.
    pub fn parse(raw: &[u8]) -> Result<Self, MappingError> {
        let json: Value =
            serde_json::from_slice(raw).map_err(|e| MappingError::Malformed(e.to_string()))?;
        let object = json
            .as_object()
            .ok_or_else(|| MappingError::Malformed("top-level value is not an object".into()))?;

        let found = object.get("version").cloned().unwrap_or(Value::Null);
        if found.as_f64() != Some(SUPPORTED_VERSION as f64) {
            return Err(MappingError::UnsupportedVersion { found });
        }
        let is_index = object.contains_key("sections");
        if !object.contains_key("sources") && !is_index {
            return Err(MappingError::Malformed("missing `sources`".into()));
        }

        let sm = match sourcemap::decode_slice(raw) {
            Ok(DecodedMap::Regular(sm)) => sm,
            Ok(DecodedMap::Index(index)) => index
                .flatten()
                .map_err(|e| MappingError::Malformed(e.to_string()))?,
            Ok(DecodedMap::Hermes(hermes)) => SourceMap::clone(&hermes),
            Err(e) if !is_index => {
                debug!("mappings did not decode ({e}), reading sources directly");
                return Self::from_json(object);
            }
            Err(e) => return Err(MappingError::Malformed(e.to_string())),
        };
        Ok(Self::from_sourcemap(&sm))
    }

    fn from_sourcemap(sm: &SourceMap) -> Self {
        let mut doc = Self::empty();
        for idx in 0..sm.get_source_count() {
            doc.push(
                sm.get_source(idx).unwrap_or("").to_string(),
                sm.get_source_contents(idx),
            );
        }
        doc
    }

    fn from_json(object: &Map<String, Value>) -> Result<Self, MappingError> {
        let sources = object
            .get("sources")
            .and_then(Value::as_array)
            .ok_or_else(|| MappingError::Malformed("`sources` is not an array".into()))?;
        let contents = object
            .get("sourcesContent")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();
        let root = object
            .get("sourceRoot")
            .and_then(Value::as_str)
            .unwrap_or("");

        let mut doc = Self::empty();
        for (idx, source) in sources.iter().enumerate() {
            let source = source.as_str().unwrap_or("");
            let identifier = match root {
                "" => source.to_string(),
                r if r.ends_with('/') => format!("{r}{source}"),
                r => format!("{r}/{source}"),
            };
            doc.push(identifier, contents.get(idx).and_then(Value::as_str));
        }
        Ok(doc)
    }

    fn empty() -> Self {
        Self {
            sources: Vec::new(),
            contents: HashMap::new(),
        }
    }

    fn push(&mut self, source: String, content: Option<&str>) {
        if let Some(content) = content {
            // first embedded content recorded for an identifier wins
            self.contents
                .entry(source.clone())
                .or_insert_with(|| content.to_string());
        }
        self.sources.push(source);
    }

    /// Recorded source identifiers in document order, duplicates and
    /// bundler-internal entries included.
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// Embedded original content for `identifier`, if the map carried any.
    pub fn content_for(&self, identifier: &str) -> Option<&str> {
        self.contents.get(identifier).map(String::as_str)
    }
}
