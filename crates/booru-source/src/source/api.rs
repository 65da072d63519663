use serde::Serialize;

use crate::document::Document;

/// One API exposed by a source model (`json`, `xml`, `html`...).
///
/// Only the identifier is interpreted here; the definition is kept as-is for
/// the request layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Api {
    name: String,
    #[serde(skip)]
    definition: Document,
}

impl Api {
    pub fn new(name: impl Into<String>, definition: Document) -> Self {
        Self {
            name: name.into(),
            definition,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The model node describing this API
    pub fn definition(&self) -> &Document {
        &self.definition
    }
}
