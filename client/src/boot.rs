//! Application startup: mount the dashboard, then register the worker.
//!
//! DESIGN
//! ======
//! The hosting document and the service-worker helper are injected as
//! `MountHost` and `WorkerRegistrar`, so startup can be exercised against
//! an in-memory document. The browser implementations live behind the
//! `csr` feature.
//!
//! ORDERING
//! ========
//! `run` renders first and only then requests registration. A missing mount
//! point aborts before registration is requested.

use crate::sw::ServiceWorkerConfig;

/// Element id of the mount point the hosting HTML must provide.
pub const MOUNT_ID: &str = "root";

/// Fatal startup failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BootError {
    /// The document has no element with the expected id.
    #[error("mount point #{id} not found in document")]
    MountPointMissing { id: String },
}

/// Document able to resolve a mount point and render the root view into it.
pub trait MountHost {
    type Mount;

    /// Look up the element with `id`. Never creates one.
    fn find_mount(&self, id: &str) -> Option<Self::Mount>;

    /// Render the root `Dashboard` as the mount point's only child,
    /// replacing whatever it held before.
    fn attach(&mut self, mount: Self::Mount);
}

/// Background worker registration. Must not block; failures are the
/// implementor's to log.
pub trait WorkerRegistrar {
    fn register(&self);
}

/// One-shot startup sequence over an injected document and registrar.
pub struct Bootstrapper<H, W> {
    host: H,
    worker: W,
    mount_id: String,
}

impl<H: MountHost, W: WorkerRegistrar> Bootstrapper<H, W> {
    pub fn new(host: H, worker: W) -> Self {
        Self { host, worker, mount_id: MOUNT_ID.to_owned() }
    }

    #[must_use]
    pub fn with_mount_id(mut self, id: impl Into<String>) -> Self {
        self.mount_id = id.into();
        self
    }

    pub fn mount_id(&self) -> &str {
        &self.mount_id
    }

    /// Find the mount point and render the root component into it.
    ///
    /// # Errors
    ///
    /// Returns `BootError::MountPointMissing` if the document has no element
    /// with the configured id.
    pub fn start(&mut self) -> Result<(), BootError> {
        let Some(mount) = self.host.find_mount(&self.mount_id) else {
            log::error!("boot: mount point #{} missing", self.mount_id);
            return Err(BootError::MountPointMissing { id: self.mount_id.clone() });
        };
        self.host.attach(mount);
        log::info!("boot: dashboard mounted on #{}", self.mount_id);
        Ok(())
    }

    /// Request service-worker registration without waiting on it.
    pub fn register_service_worker(&self) {
        self.worker.register();
    }

    /// `start`, then `register_service_worker`.
    ///
    /// # Errors
    ///
    /// Propagates `start` failures; registration is skipped in that case.
    pub fn run(&mut self) -> Result<(), BootError> {
        self.start()?;
        self.register_service_worker();
        Ok(())
    }

    pub fn into_parts(self) -> (H, W) {
        (self.host, self.worker)
    }
}

// =============================================================================
// BROWSER BINDINGS
// =============================================================================

/// The page's `document`, rendering through Leptos.
#[cfg(feature = "csr")]
pub struct BrowserDocument {
    document: web_sys::Document,
}

#[cfg(feature = "csr")]
impl BrowserDocument {
    pub fn new() -> Option<Self> {
        let document = web_sys::window()?.document()?;
        Some(Self { document })
    }
}

#[cfg(feature = "csr")]
impl MountHost for BrowserDocument {
    type Mount = web_sys::HtmlElement;

    fn find_mount(&self, id: &str) -> Option<Self::Mount> {
        use wasm_bindgen::JsCast;

        self.document.get_element_by_id(id)?.dyn_into::<web_sys::HtmlElement>().ok()
    }

    fn attach(&mut self, mount: Self::Mount) {
        // Replace any placeholder markup shipped inside the mount point.
        mount.set_inner_html("");
        // The app lives for the page lifetime; never unmount.
        leptos::mount::mount_to(mount, crate::app::Dashboard).forget();
    }
}

/// Registrar backed by `navigator.serviceWorker`.
#[derive(Clone, Debug, Default)]
pub struct BrowserServiceWorker {
    config: ServiceWorkerConfig,
}

impl BrowserServiceWorker {
    pub fn new(config: ServiceWorkerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ServiceWorkerConfig {
        &self.config
    }
}

impl WorkerRegistrar for BrowserServiceWorker {
    fn register(&self) {
        #[cfg(feature = "csr")]
        {
            crate::sw::browser::register(self.config.clone());
        }
        #[cfg(not(feature = "csr"))]
        {
            log::debug!("service worker: no browser, skipping {}", self.config.script_url);
        }
    }
}

#[cfg(test)]
#[path = "boot_test.rs"]
mod boot_test;
