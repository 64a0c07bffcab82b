use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// A UI component known at build time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    /// Declared identifier; also the name the component is registered under.
    pub name: String,
    /// Rust module path of the declaration.
    pub origin: String,
}

impl Component {
    pub fn new(name: &str, origin: &str) -> Self {
        Self {
            name: name.into(),
            origin: origin.into(),
        }
    }
}

/// A static file bundled into the binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    /// Path relative to the bundle root, `/`-separated.
    pub path: String,
    pub mime: String,
    pub bytes: Cow<'static, [u8]>,
}

impl Asset {
    pub fn new(path: &str, bytes: impl Into<Cow<'static, [u8]>>) -> Self {
        Self {
            path: path.into(),
            mime: mime_guess::from_path(path)
                .first_or_octet_stream()
                .essence_str()
                .to_string(),
            bytes: bytes.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Kind of a discovered module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleKind {
    Component,
    Asset,
}

/// Anything a module source can yield.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Module {
    Component(Component),
    Asset(Asset),
}

impl Module {
    pub fn kind(&self) -> ModuleKind {
        match self {
            Module::Component(_) => ModuleKind::Component,
            Module::Asset(_) => ModuleKind::Asset,
        }
    }

    /// Name this module is registered under: the declared identifier for
    /// components, the position within the namespace for assets.
    pub fn derive_name(&self, namespace: &str, index: usize) -> String {
        match self {
            Module::Component(c) => c.name.clone(),
            Module::Asset(_) => format!("{namespace}/{index}"),
        }
    }

    pub fn as_asset(&self) -> Option<&Asset> {
        match self {
            Module::Asset(a) => Some(a),
            Module::Component(_) => None,
        }
    }

    pub fn as_component(&self) -> Option<&Component> {
        match self {
            Module::Component(c) => Some(c),
            Module::Asset(_) => None,
        }
    }
}
