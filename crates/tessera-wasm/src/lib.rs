//! WASM bindings for the Tessera template engine.
//!
//! Exposes `render()`, `check()` and `version()` to JavaScript via
//! wasm-bindgen.

use tessera_parser::{Parser, Report};
use tessera_render::{Context, Functions, Template};
use wasm_bindgen::prelude::*;

/// Render a template against a plain JS object of values.
///
/// `values` may be `undefined` or `null` for an empty context. Throws a JS
/// error if parsing or rendering fails.
#[wasm_bindgen]
pub fn render(source: &str, values: JsValue) -> Result<String, JsError> {
    let ctx = if values.is_undefined() || values.is_null() {
        Context::new()
    } else {
        serde_wasm_bindgen::from_value(values).map_err(|e| JsError::new(&e.to_string()))?
    };
    render_source(source, ctx).map_err(|e| JsError::new(&e))
}

/// Parse a template and report its diagnostics without rendering.
///
/// Returns a JS object `{ ok: boolean, fatal: Diagnostic | null, warnings: Diagnostic[] }`.
#[wasm_bindgen]
pub fn check(source: &str) -> Result<JsValue, JsError> {
    let report = check_source(source);

    let js_obj = js_sys::Object::new();
    let fatal = serde_wasm_bindgen::to_value(&report.fatal())
        .map_err(|e| JsError::new(&e.to_string()))?;
    let warnings = serde_wasm_bindgen::to_value(report.warnings())
        .map_err(|e| JsError::new(&e.to_string()))?;

    js_sys::Reflect::set(&js_obj, &"ok".into(), &(!report.has_fatal()).into())
        .map_err(|_| JsError::new("Failed to set ok property"))?;
    js_sys::Reflect::set(&js_obj, &"fatal".into(), &fatal)
        .map_err(|_| JsError::new("Failed to set fatal property"))?;
    js_sys::Reflect::set(&js_obj, &"warnings".into(), &warnings)
        .map_err(|_| JsError::new("Failed to set warnings property"))?;

    Ok(js_obj.into())
}

/// Get the engine version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn render_source(source: &str, mut ctx: Context) -> Result<String, String> {
    let template = Template::parse(source).map_err(|e| e.to_string())?;
    template
        .render(&mut ctx, &Functions::new())
        .map_err(|e| e.to_string())
}

fn check_source(source: &str) -> Report {
    Parser::parse(source).report
}
