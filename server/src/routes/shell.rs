//! HTML shell hosting the dashboard mount point.
//!
//! The built client bundle ships its own `index.html`; when `SITE_DIR` has
//! none, a minimal shell with the `root` mount point and the WASM loader is
//! served instead.

use axum::extract::State;
use axum::response::Html;

use crate::state::AppState;

pub const FALLBACK_SHELL: &str = r#"<!DOCTYPE html>
<html lang="en">
    <head>
        <meta charset="utf-8"/>
        <meta name="viewport" content="width=device-width, initial-scale=1"/>
        <title>Coinboard</title>
        <link rel="stylesheet" href="/pkg/client.css"/>
    </head>
    <body>
        <noscript>You need to enable JavaScript to run this app.</noscript>
        <div id="root"></div>
        <script type="module">import init from "/pkg/client.js"; init();</script>
    </body>
</html>
"#;

/// Serve `SITE_DIR/index.html`, falling back to the built-in shell.
pub async fn index(State(state): State<AppState>) -> Html<String> {
    let path = state.site_dir.join("index.html");
    match tokio::fs::read_to_string(&path).await {
        Ok(html) => Html(html),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "shell: serving built-in index");
            Html(FALLBACK_SHELL.to_string())
        }
    }
}
