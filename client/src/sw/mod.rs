//! Service-worker registration helper.
//!
//! Registration is best effort and only happens in release builds, on
//! browsers that expose `navigator.serviceWorker`, and when the worker is
//! served from the page's own origin. On localhost the worker script is
//! probed first: a missing script means a stale worker from another app is
//! still installed, so it is unregistered and the page reloaded.
//!
//! The decisions are plain functions here; `browser` wires them to the DOM.

#[cfg(feature = "csr")]
pub mod browser;

use std::net::IpAddr;

pub const DEFAULT_SCRIPT_URL: &str = "/service-worker.js";
pub const OFFLINE_MESSAGE: &str = "No internet connection found. App is running in offline mode.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceWorkerConfig {
    pub enabled: bool,
    pub script_url: String,
    /// Origin the bundle is published under; `None` means same as the page.
    pub public_origin: Option<String>,
}

impl Default for ServiceWorkerConfig {
    fn default() -> Self {
        Self {
            enabled: !cfg!(debug_assertions),
            script_url: option_env!("COINBOARD_SW_URL").unwrap_or(DEFAULT_SCRIPT_URL).to_owned(),
            public_origin: option_env!("COINBOARD_PUBLIC_ORIGIN").map(str::to_owned),
        }
    }
}

/// What the page reports about itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageEnv {
    pub origin: String,
    pub hostname: String,
    pub has_service_worker: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    Disabled,
    Unsupported,
    CrossOrigin,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegistrationPlan {
    Skip(SkipReason),
    Register,
    ValidateThenRegister,
}

/// Decide how to register, checked in order: enabled, supported, same
/// origin, localhost.
pub fn plan(env: &PageEnv, config: &ServiceWorkerConfig) -> RegistrationPlan {
    if !config.enabled {
        return RegistrationPlan::Skip(SkipReason::Disabled);
    }
    if !env.has_service_worker {
        return RegistrationPlan::Skip(SkipReason::Unsupported);
    }
    if let Some(origin) = &config.public_origin {
        if origin.trim_end_matches('/') != env.origin {
            return RegistrationPlan::Skip(SkipReason::CrossOrigin);
        }
    }
    if is_localhost(&env.hostname) {
        RegistrationPlan::ValidateThenRegister
    } else {
        RegistrationPlan::Register
    }
}

/// `localhost`, `[::1]`, or any `127.0.0.0/8` address.
pub fn is_localhost(hostname: &str) -> bool {
    if hostname.eq_ignore_ascii_case("localhost") {
        return true;
    }
    let bare = hostname.strip_prefix('[').and_then(|h| h.strip_suffix(']')).unwrap_or(hostname);
    bare.parse::<IpAddr>().is_ok_and(|ip| ip.is_loopback())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScriptCheck {
    Valid,
    Missing,
}

/// A worker script is missing when it 404s or is not served as JavaScript.
pub fn classify_script(status: u16, content_type: Option<&str>) -> ScriptCheck {
    let is_javascript = content_type.is_some_and(|ct| ct.to_ascii_lowercase().contains("javascript"));
    if status == 404 || !is_javascript {
        ScriptCheck::Missing
    } else {
        ScriptCheck::Valid
    }
}

/// Result of a worker reaching the `installed` state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InstallOutcome {
    /// An older worker still controls the page; new assets wait for a reload.
    UpdateAvailable,
    /// First install; assets are now precached.
    CachedForOffline,
}

impl InstallOutcome {
    pub fn on_installed(has_controller: bool) -> Self {
        if has_controller { Self::UpdateAvailable } else { Self::CachedForOffline }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::UpdateAvailable => "New content is available; please refresh.",
            Self::CachedForOffline => "Content is cached for offline use.",
        }
    }
}
