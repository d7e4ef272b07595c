//! Module compilation pipeline.
//!
//! parse (TSX) → strip types → lower JSX → emit, with an optional inline
//! source map. Every diagnostic is fatal; no partial output is produced.

#[cfg(feature = "napi")]
use napi_derive::napi;
use oxc_allocator::Allocator;
use oxc_codegen::{Codegen, CodegenOptions};
use oxc_diagnostics::OxcDiagnostic;
use oxc_parser::Parser;
use oxc_semantic::SemanticBuilder;
use oxc_span::SourceType;
use oxc_transformer::{JsxOptions, TransformOptions, Transformer, TypeScriptOptions};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{CompilerError, SourceLocation, ERR_PARSE, ERR_SEMANTIC, ERR_STRIP};
use crate::jsx_lowerer::JsxLowerer;
use crate::options::{CompileOptions, SourceMapMode};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "napi", napi(object))]
#[serde(rename_all = "camelCase")]
pub struct CompileResult {
    pub code: String,
    /// Elements and fragments rewritten into object literals.
    pub lowered: u32,
}

/// Both `.ts` and `.tsx` are read as TSX so tags work in either.
fn module_source_type() -> SourceType {
    SourceType::default()
        .with_typescript(true)
        .with_jsx(true)
        .with_module(true)
}

/// TypeScript removal only. JSX must reach the lowering pass untouched.
fn strip_only_options() -> TransformOptions {
    TransformOptions {
        typescript: TypeScriptOptions::default(),
        jsx: JsxOptions {
            jsx_plugin: false,
            display_name_plugin: false,
            jsx_self_plugin: false,
            jsx_source_plugin: false,
            refresh: None,
            ..JsxOptions::default()
        },
        ..TransformOptions::default()
    }
}

/// Turn the first of a batch of oxc diagnostics into a positioned error; the
/// rest ride along as hints.
fn first_diagnostic(
    code: &str,
    diagnostics: &[OxcDiagnostic],
    source: &str,
    file: &str,
) -> Option<CompilerError> {
    let first = diagnostics.first()?;
    let location = first
        .labels
        .as_ref()
        .and_then(|labels| labels.first())
        .map(|label| SourceLocation::from_offset(source, label.offset()))
        .unwrap_or(SourceLocation { line: 0, column: 0 });
    let mut error = CompilerError::at(code, &first.to_string(), file, &location);
    error.hints = diagnostics.iter().skip(1).map(|d| d.to_string()).collect();
    Some(error)
}

pub fn compile_module(
    source: &str,
    path: &Path,
    options: &CompileOptions,
) -> Result<CompileResult, CompilerError> {
    let file = path.to_string_lossy().to_string();
    let allocator = Allocator::default();

    let parsed = Parser::new(&allocator, source, module_source_type()).parse();
    if let Some(err) = first_diagnostic(ERR_PARSE, &parsed.errors, source, &file) {
        return Err(err);
    }
    let mut program = parsed.program;

    if options.strip_types {
        let semantic = SemanticBuilder::new().build(&program);
        if let Some(err) = first_diagnostic(ERR_SEMANTIC, &semantic.errors, source, &file) {
            return Err(err);
        }
        let scoping = semantic.semantic.into_scoping();
        let stripped = Transformer::new(&allocator, path, &strip_only_options())
            .build_with_scoping(scoping, &mut program);
        if let Some(err) = first_diagnostic(ERR_STRIP, &stripped.errors, source, &file) {
            return Err(err);
        }
    }

    let marker = options.marker();
    let mut lowerer = JsxLowerer::new(&allocator, &marker);
    lowerer.lower_program(&mut program);
    let lowered = lowerer.lowered_count();

    let codegen_options = CodegenOptions {
        source_map_path: match options.source_map {
            SourceMapMode::Inline => Some(path.to_path_buf()),
            SourceMapMode::None => None,
        },
        ..CodegenOptions::default()
    };
    let emitted = Codegen::new().with_options(codegen_options).build(&program);

    let mut code = emitted.code;
    if let Some(map) = emitted.map {
        if !code.ends_with('\n') {
            code.push('\n');
        }
        code.push_str("//# sourceMappingURL=");
        code.push_str(&map.to_data_url());
        code.push('\n');
    }

    log::debug!(
        "compiled {} ({} bytes in, {} bytes out, {} tags lowered)",
        file,
        source.len(),
        code.len(),
        lowered
    );

    Ok(CompileResult {
        code,
        lowered: lowered as u32,
    })
}

// ═══════════════════════════════════════════════════════════════════════════════
// NAPI
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(feature = "napi")]
pub(crate) fn options_from_native(options_json: Option<String>) -> napi::Result<CompileOptions> {
    match options_json {
        Some(json) => CompileOptions::from_json(&json)
            .map_err(|e| napi::Error::from_reason(format!("invalid compile options: {}", e))),
        None => Ok(CompileOptions::default()),
    }
}

#[cfg(feature = "napi")]
#[napi]
pub fn compile_native(
    source: String,
    file_path: String,
    options_json: Option<String>,
) -> napi::Result<CompileResult> {
    let options = options_from_native(options_json)?;
    compile_module(&source, Path::new(&file_path), &options)
        .map_err(|e| napi::Error::from_reason(e.to_string()))
}
