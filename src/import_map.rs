//! Import map documents
//!
//! Thin boundary around deno.json-style files: pull out the `imports`
//! object for the engine, put it back afterwards, and leave every other
//! key of the document untouched.

use serde_json::Value;
use thiserror::Error;

use crate::update::DependencyMap;

#[derive(Debug, Error)]
pub enum ImportMapError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Document root is not an object")]
    NotAnObject,

    #[error("`imports` is not an object of strings")]
    InvalidImports,
}

/// A parsed deno.json / import map document.
pub struct ImportMapFile {
    document: Value,
}

impl ImportMapFile {
    pub fn parse(content: &str) -> Result<Self, ImportMapError> {
        let document: Value = serde_json::from_str(content)?;
        if !document.is_object() {
            return Err(ImportMapError::NotAnObject);
        }
        Ok(Self { document })
    }

    /// The `imports` object as a dependency map, in document order.
    /// A document without one yields an empty map.
    pub fn imports(&self) -> Result<DependencyMap, ImportMapError> {
        let Some(imports) = self.document.get("imports") else {
            return Ok(DependencyMap::new());
        };

        let object = imports.as_object().ok_or(ImportMapError::InvalidImports)?;
        object
            .iter()
            .map(|(alias, specifier)| {
                specifier
                    .as_str()
                    .map(|s| (alias.clone(), s.to_string()))
                    .ok_or(ImportMapError::InvalidImports)
            })
            .collect()
    }

    /// Replace the `imports` object with the (possibly rewritten) map.
    pub fn set_imports(&mut self, imports: &DependencyMap) {
        let object: serde_json::Map<String, Value> = imports
            .iter()
            .map(|(alias, specifier)| (alias.clone(), Value::String(specifier.clone())))
            .collect();
        self.document["imports"] = Value::Object(object);
    }

    /// Render the document back to pretty JSON with a trailing newline.
    pub fn to_json_string(&self) -> Result<String, ImportMapError> {
        let mut rendered = serde_json::to_string_pretty(&self.document)?;
        rendered.push('\n');
        Ok(rendered)
    }
}
