//! Build-time module sources.
//!
//! Nothing here scans the file system at runtime. Every source enumerates a
//! set that was fixed when the binary was compiled: an explicit manifest
//! table, components submitted through `inventory`, or files embedded with
//! `include_dir!`.

use include_dir::{Dir, DirEntry};
use indexmap::IndexMap;

use crate::error::Result;
use crate::module::{Asset, Component, Module};

/// Produces the modules living under a namespace.
pub trait ModuleSource {
    /// All modules under `namespace`, in registration order. An unknown
    /// namespace yields an empty list.
    fn discover(&self, namespace: &str) -> Result<Vec<Module>>;
}

/// Explicit table of namespace to module factories.
#[derive(Debug, Clone, Default)]
pub struct StaticManifest {
    namespaces: IndexMap<String, Vec<fn() -> Module>>,
}

impl StaticManifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, namespace: &str, factory: fn() -> Module) -> Self {
        self.namespaces
            .entry(namespace.to_string())
            .or_default()
            .push(factory);
        self
    }
}

impl ModuleSource for StaticManifest {
    fn discover(&self, namespace: &str) -> Result<Vec<Module>> {
        Ok(self
            .namespaces
            .get(namespace)
            .map(|factories| factories.iter().map(|make| make()).collect())
            .unwrap_or_default())
    }
}

/// A component submitted at compile time with [`inventory::submit!`].
///
/// ```ignore
/// inventory::submit! {
///     ComponentRegistration::new("components", "album-card", module_path!())
/// }
/// ```
#[derive(Debug)]
pub struct ComponentRegistration {
    pub namespace: &'static str,
    pub name: &'static str,
    pub origin: &'static str,
}

impl ComponentRegistration {
    pub const fn new(namespace: &'static str, name: &'static str, origin: &'static str) -> Self {
        Self {
            namespace,
            name,
            origin,
        }
    }
}

inventory::collect!(ComponentRegistration);

/// Every [`ComponentRegistration`] linked into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct InventoryComponents;

impl ModuleSource for InventoryComponents {
    fn discover(&self, namespace: &str) -> Result<Vec<Module>> {
        let mut found: Vec<&ComponentRegistration> = inventory::iter::<ComponentRegistration>
            .into_iter()
            .filter(|r| r.namespace == namespace)
            .collect();
        // Link order is unspecified.
        found.sort_by(|a, b| a.name.cmp(b.name).then(a.origin.cmp(b.origin)));
        Ok(found
            .into_iter()
            .map(|r| Module::Component(Component::new(r.name, r.origin)))
            .collect())
    }
}

/// Files embedded with `include_dir!`, exposed as assets of one namespace.
#[derive(Debug, Clone)]
pub struct BundledAssets {
    namespace: String,
    root: &'static Dir<'static>,
}

impl BundledAssets {
    pub fn new(namespace: &str, root: &'static Dir<'static>) -> Self {
        Self {
            namespace: namespace.to_string(),
            root,
        }
    }
}

impl ModuleSource for BundledAssets {
    fn discover(&self, namespace: &str) -> Result<Vec<Module>> {
        if namespace != self.namespace {
            return Ok(Vec::new());
        }
        let mut assets = Vec::new();
        collect_files(self.root, &mut assets);
        assets.sort_by(|a, b| a.path.cmp(&b.path));
        tracing::debug!(namespace, count = assets.len(), "bundled assets discovered");
        Ok(assets.into_iter().map(Module::Asset).collect())
    }
}

fn collect_files(dir: &'static Dir<'static>, out: &mut Vec<Asset>) {
    for entry in dir.entries() {
        match entry {
            DirEntry::Dir(sub) => collect_files(sub, out),
            DirEntry::File(file) => {
                let path = file
                    .path()
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");
                out.push(Asset::new(&path, file.contents()));
            }
        }
    }
}
