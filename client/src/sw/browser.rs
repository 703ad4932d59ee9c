//! `navigator.serviceWorker` bindings. Requires a browser environment.
//!
//! Everything here runs on `spawn_local` after the window `load` event and
//! reports through `log`; nothing is returned to the caller.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{ServiceWorkerRegistration, ServiceWorkerState, Window};

use super::{InstallOutcome, OFFLINE_MESSAGE, PageEnv, RegistrationPlan, ScriptCheck, ServiceWorkerConfig};

/// Plan and, once the page has loaded, carry out registration.
pub fn register(config: ServiceWorkerConfig) {
    let Some(window) = web_sys::window() else { return };

    let plan = super::plan(&page_env(&window), &config);
    if let RegistrationPlan::Skip(reason) = plan {
        log::debug!("service worker: skipped ({reason:?})");
        return;
    }

    let script_url = config.script_url;
    let run = move || spawn_local(run_plan(plan, script_url));

    let loaded = window
        .document()
        .is_some_and(|doc| doc.ready_state() == "complete");
    if loaded {
        run();
        return;
    }

    let on_load = Closure::once_into_js(run);
    if let Err(e) = window.add_event_listener_with_callback("load", on_load.unchecked_ref()) {
        log::warn!("service worker: could not wait for load: {e:?}");
    }
}

/// Remove the active registration, if any.
pub fn unregister() {
    spawn_local(async {
        if let Err(e) = unregister_ready().await {
            log::warn!("service worker: unregister failed: {e:?}");
        }
    });
}

fn page_env(window: &Window) -> PageEnv {
    let location = window.location();
    let has_service_worker =
        js_sys::Reflect::has(&window.navigator(), &JsValue::from_str("serviceWorker")).unwrap_or(false);
    PageEnv {
        origin: location.origin().unwrap_or_default(),
        hostname: location.hostname().unwrap_or_default(),
        has_service_worker,
    }
}

async fn run_plan(plan: RegistrationPlan, script_url: String) {
    let result = match plan {
        RegistrationPlan::ValidateThenRegister => validate_then_register(&script_url).await,
        RegistrationPlan::Register => register_script(&script_url).await,
        RegistrationPlan::Skip(_) => Ok(()),
    };
    if let Err(e) = result {
        log::error!("Error during service worker registration: {e:?}");
    }
}

fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no window"))
}

async fn register_script(script_url: &str) -> Result<(), JsValue> {
    let container = window()?.navigator().service_worker();
    let registration: ServiceWorkerRegistration = JsFuture::from(container.register(script_url)).await?.dyn_into()?;
    log::debug!("service worker: registered {script_url}");
    watch_installation(&registration);
    Ok(())
}

/// Report when a newly found worker finishes installing.
fn watch_installation(registration: &ServiceWorkerRegistration) {
    let reg = registration.clone();
    let on_update_found = Closure::<dyn FnMut()>::new(move || {
        let Some(installing) = reg.installing() else { return };
        let worker = installing.clone();
        let on_state_change = Closure::<dyn FnMut()>::new(move || {
            if worker.state() != ServiceWorkerState::Installed {
                return;
            }
            let has_controller = web_sys::window().is_some_and(|w| w.navigator().service_worker().controller().is_some());
            log::info!("{}", InstallOutcome::on_installed(has_controller).message());
        });
        installing.set_onstatechange(Some(on_state_change.as_ref().unchecked_ref()));
        on_state_change.forget();
    });
    registration.set_onupdatefound(Some(on_update_found.as_ref().unchecked_ref()));
    on_update_found.forget();
}

async fn validate_then_register(script_url: &str) -> Result<(), JsValue> {
    let Ok(response) = gloo_net::http::Request::get(script_url).send().await else {
        log::info!("{OFFLINE_MESSAGE}");
        return Ok(());
    };

    let content_type = response.headers().get("content-type");
    match super::classify_script(response.status(), content_type.as_deref()) {
        ScriptCheck::Valid => register_script(script_url).await,
        ScriptCheck::Missing => {
            log::warn!("service worker: {script_url} not found, unregistering stale worker");
            unregister_ready().await?;
            window()?.location().reload()
        }
    }
}

async fn unregister_ready() -> Result<(), JsValue> {
    let ready = JsFuture::from(window()?.navigator().service_worker().ready()?).await?;
    let registration: ServiceWorkerRegistration = ready.dyn_into()?;
    JsFuture::from(registration.unregister()?).await?;
    Ok(())
}
