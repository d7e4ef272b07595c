#[cfg(feature = "napi")]
use napi_derive::napi;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

// ═══════════════════════════════════════════════════════════════════════════════
// ERROR CODES
// ═══════════════════════════════════════════════════════════════════════════════

pub const ERR_PARSE: &str = "VJSX-PARSE";
pub const ERR_SEMANTIC: &str = "VJSX-SEMANTIC";
pub const ERR_STRIP: &str = "VJSX-STRIP";

fn error_type_for(code: &str) -> &'static str {
    match code {
        ERR_PARSE => "SYNTAX_ERROR",
        ERR_SEMANTIC => "SEMANTIC_ERROR",
        ERR_STRIP => "TYPE_STRIP_ERROR",
        _ => "COMPILER_ERROR",
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// COMPILER ERROR
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "napi", napi(object))]
#[serde(rename_all = "camelCase")]
pub struct SourceLocation {
    pub line: u32,
    pub column: u32,
}

impl SourceLocation {
    /// 1-based line and column of a byte offset into `source`.
    pub fn from_offset(source: &str, offset: usize) -> Self {
        let offset = offset.min(source.len());
        let before = source.get(..offset).unwrap_or(source);
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let column = before[line_start..].chars().count() + 1;
        Self {
            line: line as u32,
            column: column as u32,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Error)]
#[cfg_attr(feature = "napi", napi(object))]
#[serde(rename_all = "camelCase")]
#[error("[{code}] {message} ({file}:{line}:{column})")]
pub struct CompilerError {
    pub code: String,
    pub error_type: String,
    pub message: String,
    pub file: String,
    pub line: u32,
    pub column: u32,
    pub context: Option<String>,
    pub hints: Vec<String>,
}

impl CompilerError {
    pub fn new(code: &str, message: &str, file: &str, line: u32, column: u32) -> Self {
        Self::with_details(code, message, file, line, column, None, vec![])
    }

    pub fn with_details(
        code: &str,
        message: &str,
        file: &str,
        line: u32,
        column: u32,
        context: Option<String>,
        hints: Vec<String>,
    ) -> Self {
        CompilerError {
            code: code.to_string(),
            error_type: error_type_for(code).to_string(),
            message: message.to_string(),
            file: file.to_string(),
            line,
            column,
            context,
            hints,
        }
    }

    pub fn at(code: &str, message: &str, file: &str, location: &SourceLocation) -> Self {
        Self::new(code, message, file, location.line, location.column)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// HOOK ERROR
// ═══════════════════════════════════════════════════════════════════════════════

/// Failure of the load hook. `E` is the error type of the host's own loader,
/// returned untouched when a URL is delegated.
#[derive(Debug, Error)]
pub enum HookError<E> {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("not a loadable file URL: {0}")]
    InvalidUrl(String),

    #[error(transparent)]
    Compile(#[from] CompilerError),

    #[error("{0}")]
    Delegate(E),
}
