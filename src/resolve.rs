//! Resolve hook.
//!
//! Lets `import "./widget.js"` find `widget.tsx` or `widget.ts` when no
//! `widget.js` exists. The host's own resolution always runs first; the
//! extension probe is only a fallback and never hides the host's error.

#[cfg(feature = "napi")]
use napi_derive::napi;
use serde::{Deserialize, Serialize};
use url::Url;

/// Extension the host failed to find.
pub const SCRIPT_EXTENSION: &str = ".js";

/// Substitutes, in priority order.
pub const PROBE_EXTENSIONS: [&str; 2] = [".tsx", ".ts"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveContext {
    /// URL of the importing module.
    pub parent_url: Option<String>,
    #[serde(default)]
    pub conditions: Vec<String>,
}

impl ResolveContext {
    pub fn from_parent(parent_url: impl Into<String>) -> Self {
        Self {
            parent_url: Some(parent_url.into()),
            conditions: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveResult {
    pub short_circuit: bool,
    pub url: String,
}

impl ResolveResult {
    pub fn short_circuit(url: impl Into<String>) -> Self {
        Self {
            short_circuit: true,
            url: url.into(),
        }
    }
}

/// Find a `.tsx`/`.ts` sibling standing in for a `.js` specifier, relative to
/// the importing module. Returns the first candidate that exists on disk.
pub fn probe_substitute(specifier: &str, parent_url: &str) -> Option<Url> {
    let stem = specifier.strip_suffix(SCRIPT_EXTENSION)?;
    let parent = match Url::parse(parent_url) {
        Ok(parent) => parent,
        Err(e) => {
            log::debug!("cannot probe {}: bad parent URL {}: {}", specifier, parent_url, e);
            return None;
        }
    };

    for extension in PROBE_EXTENSIONS {
        let Ok(candidate) = parent.join(&format!("{}{}", stem, extension)) else {
            continue;
        };
        let Ok(path) = candidate.to_file_path() else {
            continue;
        };
        if path.exists() {
            log::debug!("resolved {} to {}", specifier, candidate);
            return Some(candidate);
        }
        log::trace!("no {} at {}", extension, path.display());
    }
    None
}

/// Run the host resolution `next`; if it fails, try the extension probe and
/// otherwise hand back the host's error unchanged.
pub fn resolve<F, E>(specifier: &str, context: &ResolveContext, next: F) -> Result<ResolveResult, E>
where
    F: FnOnce(&str, &ResolveContext) -> Result<ResolveResult, E>,
{
    let original = match next(specifier, context) {
        Ok(resolved) => return Ok(resolved),
        Err(e) => e,
    };

    let substitute = context
        .parent_url
        .as_deref()
        .and_then(|parent| probe_substitute(specifier, parent));

    match substitute {
        Some(url) => Ok(ResolveResult::short_circuit(url)),
        None => Err(original),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// NAPI
// ═══════════════════════════════════════════════════════════════════════════════

/// For a JS resolve hook that has already seen `nextResolve` fail: the
/// substitute URL, or `null` to rethrow.
#[cfg(feature = "napi")]
#[napi]
pub fn resolve_substitute_native(specifier: String, parent_url: String) -> Option<String> {
    probe_substitute(&specifier, &parent_url).map(String::from)
}
