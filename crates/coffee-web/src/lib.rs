//! coffee-web: a small coffee order tracker.
//!
//! The server (`ssr` feature) renders pages and htmx fragments with Leptos
//! and stores products and orders in SQLite. The client (`hydrate` feature)
//! is a wasm module that wires the product-edit popup and button focus
//! handling into the server-rendered page.

pub mod popup;
pub mod price;

#[cfg(feature = "ssr")]
pub mod app;
#[cfg(feature = "ssr")]
pub mod components;
#[cfg(feature = "ssr")]
pub mod config;
#[cfg(feature = "ssr")]
pub mod db;
#[cfg(feature = "ssr")]
pub mod export;
#[cfg(feature = "ssr")]
pub mod routes;

/// Wasm entry point: installs the popup bindings once the module loads.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn hydrate() -> Result<(), wasm_bindgen::JsValue> {
    console_error_panic_hook::set_once();
    popup::web::install()
}
