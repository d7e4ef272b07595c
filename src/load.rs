//! Load hook.
//!
//! Compiles `.ts`/`.tsx` modules on the way in and leaves every other URL to
//! the host loader.

#[cfg(feature = "napi")]
use napi_derive::napi;
use serde::{Deserialize, Serialize};
use std::fs;
use url::Url;

use crate::compile::compile_module;
use crate::error::HookError;
use crate::options::CompileOptions;

pub const TYPED_EXTENSIONS: [&str; 2] = [".tsx", ".ts"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleFormat {
    Module,
    Commonjs,
    Json,
    Builtin,
    Wasm,
}

impl ModuleFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleFormat::Module => "module",
            ModuleFormat::Commonjs => "commonjs",
            ModuleFormat::Json => "json",
            ModuleFormat::Builtin => "builtin",
            ModuleFormat::Wasm => "wasm",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadContext {
    pub format: Option<String>,
    #[serde(default)]
    pub conditions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadResult {
    pub short_circuit: bool,
    pub format: ModuleFormat,
    pub source: String,
}

/// The parsed URL when its path names a typed module. Query and fragment do
/// not count towards the extension.
pub fn typed_module_url(url: &str) -> Option<Url> {
    let parsed = Url::parse(url).ok()?;
    let is_typed = TYPED_EXTENSIONS
        .iter()
        .any(|extension| parsed.path().ends_with(extension));
    is_typed.then_some(parsed)
}

/// Read and compile a typed module from a `file:` URL.
pub fn load_typed_module<E>(url: &Url, options: &CompileOptions) -> Result<LoadResult, HookError<E>> {
    let path = url
        .to_file_path()
        .map_err(|_| HookError::InvalidUrl(url.to_string()))?;
    let source = fs::read_to_string(&path).map_err(|source| HookError::Io {
        path: path.clone(),
        source,
    })?;

    let compiled = compile_module(&source, &path, options)?;
    Ok(LoadResult {
        short_circuit: true,
        format: ModuleFormat::Module,
        source: compiled.code,
    })
}

pub fn load<F, E>(
    url: &str,
    context: &LoadContext,
    options: &CompileOptions,
    next: F,
) -> Result<LoadResult, HookError<E>>
where
    F: FnOnce(&str, &LoadContext) -> Result<LoadResult, E>,
{
    match typed_module_url(url) {
        Some(parsed) => load_typed_module(&parsed, options),
        None => {
            log::trace!("delegating load of {}", url);
            next(url, context).map_err(HookError::Delegate)
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// NAPI
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
#[cfg(feature = "napi")]
#[napi(object)]
pub struct NativeLoadResult {
    pub short_circuit: bool,
    pub format: String,
    pub source: String,
}

/// Compiled source for a typed module URL, or `null` so the JS hook falls
/// through to `nextLoad`.
#[cfg(feature = "napi")]
#[napi]
pub fn load_native(url: String, options_json: Option<String>) -> napi::Result<Option<NativeLoadResult>> {
    let Some(parsed) = typed_module_url(&url) else {
        return Ok(None);
    };
    let options = crate::compile::options_from_native(options_json)?;
    let loaded = load_typed_module::<std::convert::Infallible>(&parsed, &options)
        .map_err(|e| napi::Error::from_reason(e.to_string()))?;
    Ok(Some(NativeLoadResult {
        short_circuit: loaded.short_circuit,
        format: loaded.format.as_str().to_string(),
        source: loaded.source,
    }))
}
