//! # Vanilla JSX loader core
//!
//! Compiles JSX in `.ts`/`.tsx` modules into plain object literals at load
//! time, without a UI runtime:
//!
//! ```js
//! <a href="/">home</a>
//! // becomes
//! ({ [Symbol.for("jsx")]: "a", href: "/", children: "home" })
//! ```
//!
//! ## Pieces
//!
//! 1. **Resolve hook** (`resolve`): when the host cannot resolve `./x.js`,
//!    probe `./x.tsx` then `./x.ts` next to the importing module.
//! 2. **Load hook** (`load`): read a `.ts`/`.tsx` module, strip its types,
//!    lower its JSX and emit module source with an inline source map.
//! 3. **JSX lowering** (`jsx_lowerer`): the object-literal rewrite itself.
//!
//! ## Lowering rules
//!
//! - `<div>` → `"div"`, `<Card>` → `Card`, `<UI.Card>` → `UI.Card`,
//!   `<svg:use>` → `"svg:use"`, `<>` → `""`.
//! - Attributes keep source order; `{...spread}` stays a spread in place;
//!   a bare attribute is `true`.
//! - No children → no `children` key; one → the child itself; more → an array.
//! - Text that is only a line break plus indentation is dropped; other text has
//!   its line breaks and indentation collapsed to single spaces.
//!
//! Each call works on one specifier or one file; nothing is cached or shared
//! between calls except the immutable marker.

#[cfg(feature = "napi")]
use napi_derive::napi;

mod compile;
mod error;
mod jsx_lowerer;
mod load;
mod options;
mod resolve;
mod whitespace;

#[cfg(test)]
mod lowering_tests;

pub use compile::{compile_module, CompileResult};
pub use error::{CompilerError, HookError, SourceLocation, ERR_PARSE, ERR_SEMANTIC, ERR_STRIP};
pub use jsx_lowerer::{is_component_tag, JsxLowerer, JsxMarker, DEFAULT_MARKER_KEY};
pub use load::{
    load, load_typed_module, typed_module_url, LoadContext, LoadResult, ModuleFormat,
    TYPED_EXTENSIONS,
};
pub use options::{CompileOptions, SourceMapMode};
pub use resolve::{
    probe_substitute, resolve, ResolveContext, ResolveResult, PROBE_EXTENSIONS, SCRIPT_EXTENSION,
};
pub use whitespace::{is_layout_whitespace, trim_jsx_whitespace};

#[cfg(feature = "napi")]
pub use compile::compile_native;
#[cfg(feature = "napi")]
pub use load::{load_native, NativeLoadResult};
#[cfg(feature = "napi")]
pub use resolve::resolve_substitute_native;

#[cfg(feature = "napi")]
#[napi]
pub fn compile_bridge() -> String {
    "Vanilla JSX Native Bridge Connected".to_string()
}
