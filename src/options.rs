use serde::{Deserialize, Serialize};

use crate::jsx_lowerer::{JsxMarker, DEFAULT_MARKER_KEY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SourceMapMode {
    /// Append the map to the emitted code as a base64 data URL.
    #[default]
    Inline,
    None,
}

/// Options for one module compilation. Hosts pass these across the native
/// boundary as a JSON object; every field is optional there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompileOptions {
    /// Registry key of the marker symbol, `Symbol.for(markerKey)`.
    pub marker_key: String,
    pub source_map: SourceMapMode,
    /// Run the TypeScript stripping pass before lowering JSX.
    pub strip_types: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            marker_key: DEFAULT_MARKER_KEY.to_string(),
            source_map: SourceMapMode::Inline,
            strip_types: true,
        }
    }
}

impl CompileOptions {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn marker(&self) -> JsxMarker {
        JsxMarker::new(self.marker_key.as_str())
    }
}
