use include_dir::{Dir, include_dir};
use rand::Rng;
use romf_bus::Delivery;
use romf_plugin::{
    AppContext, Asset, AssetsPlugin, BundledAssets, ComponentRegistration, ComponentsPlugin,
    InventoryComponents, Module, ModuleKind, ToasterPlugin,
};
use romf_router::{Router, default_routes};
use serde::Serialize;
use serde_json::json;

use crate::config::AppConfig;
use crate::error::Result;

pub const COMPONENTS_NAMESPACE: &str = "components";
pub const GRILLS_NAMESPACE: &str = "grills";

static GRILLS: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/assets/grills");

// Submitted beside `bootstrap` so the linker keeps them in the binary.
inventory::submit! {
    ComponentRegistration::new(COMPONENTS_NAMESPACE, "app-shell", module_path!())
}

inventory::submit! {
    ComponentRegistration::new(COMPONENTS_NAMESPACE, "home-view", module_path!())
}

inventory::submit! {
    ComponentRegistration::new(COMPONENTS_NAMESPACE, "album-grid", module_path!())
}

inventory::submit! {
    ComponentRegistration::new(COMPONENTS_NAMESPACE, "album-card", module_path!())
}

inventory::submit! {
    ComponentRegistration::new(COMPONENTS_NAMESPACE, "upload-form", module_path!())
}

inventory::submit! {
    ComponentRegistration::new(COMPONENTS_NAMESPACE, "toast-stack", module_path!())
}

inventory::submit! {
    ComponentRegistration::new(COMPONENTS_NAMESPACE, "grill-banner", module_path!())
}

/// One line of `--list-capabilities` output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapabilitySummary {
    pub name: String,
    pub kind: ModuleKind,
    /// Declaring module for components, bundle path for assets.
    pub source: String,
}

/// A booted client: the populated context and the route table.
#[derive(Debug)]
pub struct App {
    pub ctx: AppContext,
    pub router: Router,
    mounted_at: Option<String>,
}

/// Build the application context from `config`.
///
/// Installs, in order: the compiled-in components, the bundled grill images
/// with their picker, and the toaster. Then attaches the environment and
/// HTTP settings and builds the router.
pub fn bootstrap(config: &AppConfig) -> Result<App> {
    config.validate()?;

    let mut ctx = AppContext::new();
    ctx.use_plugin(&ComponentsPlugin::new(
        COMPONENTS_NAMESPACE,
        InventoryComponents,
    ))?;
    ctx.use_plugin(&AssetsPlugin::new(
        GRILLS_NAMESPACE,
        BundledAssets::new(GRILLS_NAMESPACE, &GRILLS),
    ))?;
    ctx.use_plugin(&ToasterPlugin)?;
    ctx.env = config.env.clone();
    ctx.http = config.http_settings();

    let router = Router::new(config.router.mode, &config.router.base, default_routes());
    tracing::info!(
        plugins = ?ctx.plugins().installed_plugins(),
        capabilities = ctx.capabilities.len(),
        routes = router.routes().len(),
        "client context ready"
    );
    Ok(App {
        ctx,
        router,
        mounted_at: None,
    })
}

impl App {
    /// Mark the app mounted at `selector` and announce it on the toaster.
    pub fn mount(&mut self, selector: &str) -> Result<Delivery> {
        tracing::info!(selector, "mounting client");
        self.mounted_at = Some(selector.to_string());
        Ok(self.ctx.toast("mounted", &json!({ "selector": selector }))?)
    }

    pub fn mounted_at(&self) -> Option<&str> {
        self.mounted_at.as_deref()
    }

    pub fn random_grill(&self) -> Option<&Asset> {
        self.ctx.random_asset(GRILLS_NAMESPACE)
    }

    pub fn random_grill_with<R: Rng>(&self, rng: &mut R) -> Option<&Asset> {
        self.ctx.picker(GRILLS_NAMESPACE)?.pick(rng)
    }

    pub fn capability_summaries(&self) -> Vec<CapabilitySummary> {
        self.ctx
            .capabilities
            .iter()
            .map(|(name, module)| CapabilitySummary {
                name: name.to_string(),
                kind: module.kind(),
                source: match module {
                    Module::Component(c) => c.origin.clone(),
                    Module::Asset(a) => a.path.clone(),
                },
            })
            .collect()
    }
}
