pub mod context;
pub mod discovery;
pub mod env;
pub mod error;
pub mod lifecycle;
pub mod module;
pub mod picker;
pub mod registry;

// Re-export key types for convenience.
pub use context::{AppContext, AssetsPlugin, ComponentsPlugin, Plugin, ToasterPlugin};
pub use discovery::{
    BundledAssets, ComponentRegistration, InventoryComponents, ModuleSource, StaticManifest,
};
pub use env::{DEFAULT_HTTP_TIMEOUT, Env, HttpSettings};
pub use error::{PluginError, Result};
pub use lifecycle::{LifecycleEvent, LifecycleTracker, PluginState};
pub use module::{Asset, Component, Module, ModuleKind};
pub use picker::AssetPicker;
pub use registry::CapabilityRegistry;
