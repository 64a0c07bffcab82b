use std::collections::HashSet;

use indexmap::IndexMap;
use romf_bus::{Delivery, Payload, Toaster};

use crate::discovery::ModuleSource;
use crate::env::{Env, HttpSettings};
use crate::error::{PluginError, Result};
use crate::lifecycle::{LifecycleTracker, PluginState};
use crate::module::{Asset, Module};
use crate::picker::AssetPicker;
use crate::registry::CapabilityRegistry;

/// Extends an [`AppContext`] with new capabilities.
pub trait Plugin {
    /// Stable name; a plugin with a given name is installed at most once.
    fn name(&self) -> &str;

    fn install(&self, ctx: &mut AppContext) -> Result<()>;
}

/// Application-wide services, built once at startup and passed explicitly
/// to whatever needs them.
#[derive(Debug, Default)]
pub struct AppContext {
    pub capabilities: CapabilityRegistry<Module>,
    pub env: Env,
    pub http: HttpSettings,
    toaster: Option<Toaster>,
    pickers: IndexMap<String, AssetPicker>,
    discovered: HashSet<String>,
    plugins: LifecycleTracker,
}

impl AppContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `plugin` unless a plugin with the same name already is.
    /// Returns whether the plugin ran.
    pub fn use_plugin(&mut self, plugin: &dyn Plugin) -> Result<bool> {
        let name = plugin.name().to_string();
        if self.plugins.is_installed(&name) {
            tracing::debug!(plugin = %name, "plugin already installed");
            return Ok(false);
        }
        self.plugins.transition(&name, PluginState::Installing);
        match plugin.install(self) {
            Ok(()) => {
                self.plugins.transition(&name, PluginState::Installed);
                tracing::info!(plugin = %name, "plugin installed");
                Ok(true)
            }
            Err(err) => {
                self.plugins.fail(&name, err.to_string());
                Err(err)
            }
        }
    }

    pub fn plugins(&self) -> &LifecycleTracker {
        &self.plugins
    }

    /// Discover `namespace` from `source`. Each namespace can be discovered
    /// once per context.
    pub fn discover(&mut self, source: &dyn ModuleSource, namespace: &str) -> Result<Vec<Module>> {
        if !self.discovered.insert(namespace.to_string()) {
            return Err(PluginError::NamespaceAlreadyDiscovered(namespace.to_string()));
        }
        let modules = source.discover(namespace)?;
        tracing::debug!(namespace, count = modules.len(), "namespace discovered");
        Ok(modules)
    }

    /// Register `value` under `name`; an existing binding is replaced.
    pub fn register(&mut self, name: impl Into<String>, value: Module) {
        self.capabilities.register(name, value);
    }

    /// Discover `namespace` and register every module under its derived
    /// name. Returns the number of modules registered.
    pub fn install_modules(&mut self, source: &dyn ModuleSource, namespace: &str) -> Result<usize> {
        let modules = self.discover(source, namespace)?;
        let count = modules.len();
        for (index, module) in modules.into_iter().enumerate() {
            let name = module.derive_name(namespace, index);
            self.register(name, module);
        }
        Ok(count)
    }

    pub fn attach_toaster(&mut self, toaster: Toaster) {
        self.toaster = Some(toaster);
    }

    pub fn toaster(&self) -> Result<&Toaster> {
        self.toaster
            .as_ref()
            .ok_or(PluginError::MissingService("toaster"))
    }

    pub fn toaster_mut(&mut self) -> Result<&mut Toaster> {
        self.toaster
            .as_mut()
            .ok_or(PluginError::MissingService("toaster"))
    }

    /// Publish a notification on the installed toaster.
    pub fn toast(&self, title: &str, payload: &Payload) -> Result<Delivery> {
        Ok(self.toaster()?.emit(title, payload))
    }

    pub fn attach_picker(&mut self, namespace: &str, picker: AssetPicker) {
        self.pickers.insert(namespace.to_string(), picker);
    }

    pub fn picker(&self, namespace: &str) -> Option<&AssetPicker> {
        self.pickers.get(namespace)
    }

    /// A random asset of `namespace`, if a picker for it is attached and
    /// non-empty.
    pub fn random_asset(&self, namespace: &str) -> Option<&Asset> {
        self.picker(namespace).and_then(AssetPicker::random)
    }
}

/// Registers every component of a namespace under its declared name.
///
/// Installs as `components:{namespace}`, so each namespace installs once.
pub struct ComponentsPlugin<S> {
    name: String,
    namespace: String,
    source: S,
}

impl<S: ModuleSource> ComponentsPlugin<S> {
    pub fn new(namespace: &str, source: S) -> Self {
        Self {
            name: format!("components:{namespace}"),
            namespace: namespace.to_string(),
            source,
        }
    }
}

impl<S: ModuleSource> Plugin for ComponentsPlugin<S> {
    fn name(&self) -> &str {
        &self.name
    }

    fn install(&self, ctx: &mut AppContext) -> Result<()> {
        let count = ctx.install_modules(&self.source, &self.namespace)?;
        tracing::debug!(namespace = %self.namespace, count, "components registered");
        Ok(())
    }
}

/// Registers the assets of a namespace by position and attaches a random
/// picker over them.
///
/// Installs as `assets:{namespace}`. The picker is attached even when the
/// namespace holds no assets: `picker(namespace)` is then `Some` and empty,
/// `random_asset(namespace)` is `None`, and no capability is registered.
pub struct AssetsPlugin<S> {
    name: String,
    namespace: String,
    source: S,
}

impl<S: ModuleSource> AssetsPlugin<S> {
    pub fn new(namespace: &str, source: S) -> Self {
        Self {
            name: format!("assets:{namespace}"),
            namespace: namespace.to_string(),
            source,
        }
    }
}

impl<S: ModuleSource> Plugin for AssetsPlugin<S> {
    fn name(&self) -> &str {
        &self.name
    }

    fn install(&self, ctx: &mut AppContext) -> Result<()> {
        let modules = ctx.discover(&self.source, &self.namespace)?;
        let assets = modules
            .iter()
            .filter_map(Module::as_asset)
            .cloned()
            .collect();
        for (index, module) in modules.into_iter().enumerate() {
            let name = module.derive_name(&self.namespace, index);
            ctx.register(name, module);
        }
        ctx.attach_picker(&self.namespace, AssetPicker::new(assets));
        Ok(())
    }
}

/// Attaches a fresh [`Toaster`] to the context.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToasterPlugin;

impl Plugin for ToasterPlugin {
    fn name(&self) -> &str {
        "toaster"
    }

    fn install(&self, ctx: &mut AppContext) -> Result<()> {
        ctx.attach_toaster(Toaster::new());
        Ok(())
    }
}
