//! # client
//!
//! Leptos + WASM single-page dashboard for live Coinbase quotes.
//!
//! Startup lives in `boot`: the `Dashboard` root is rendered into the
//! page's `#root` element and the offline service worker is registered
//! afterwards. Quotes come from the companion server's `/api` routes.

pub mod app;
pub mod boot;
pub mod components;
pub mod net;
pub mod state;
pub mod sw;

#[cfg(feature = "csr")]
use wasm_bindgen::prelude::*;

/// WASM entry point.
///
/// # Errors
///
/// Fails when there is no document or it lacks the mount point.
#[cfg(feature = "csr")]
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    use boot::{Bootstrapper, BrowserDocument, BrowserServiceWorker};

    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&JsValue::from_str(&format!("logger already installed: {e}")));
    }

    let document = BrowserDocument::new().ok_or_else(|| JsValue::from_str("no document"))?;
    let worker = BrowserServiceWorker::new(sw::ServiceWorkerConfig::default());
    Bootstrapper::new(document, worker)
        .run()
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Remove any installed service worker registration.
#[cfg(feature = "csr")]
#[wasm_bindgen]
pub fn unregister_service_worker() {
    sw::browser::unregister();
}
