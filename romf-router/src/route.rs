use std::fmt;

use once_cell::unsync::OnceCell;
use serde::{Deserialize, Serialize};

/// How locations are represented in the address bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryMode {
    Hash,
    #[default]
    History,
    Abstract,
}

/// A loaded view: the route's display name and the component rendering it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct View {
    pub name: String,
    pub component: String,
}

impl View {
    pub fn new(name: &str, component: &str) -> Self {
        Self {
            name: name.into(),
            component: component.into(),
        }
    }
}

/// A view whose loader runs on first use only.
pub struct LazyView {
    loader: fn() -> View,
    loaded: OnceCell<View>,
}

impl LazyView {
    pub fn new(loader: fn() -> View) -> Self {
        Self {
            loader,
            loaded: OnceCell::new(),
        }
    }

    pub fn load(&self) -> &View {
        self.loaded.get_or_init(|| {
            let view = (self.loader)();
            tracing::debug!(view = %view.name, "view loaded");
            view
        })
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.get().is_some()
    }
}

impl fmt::Debug for LazyView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyView")
            .field("loaded", &self.loaded.get())
            .finish()
    }
}

/// Where a redirect points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Redirect {
    Name(String),
    Path(String),
}

#[derive(Debug)]
pub enum RouteTarget {
    Redirect(Redirect),
    View(LazyView),
}

/// One entry of the route table.
///
/// `path` is a `/`-separated pattern. Segments starting with `:` capture a
/// parameter; the pattern `*` matches every location.
#[derive(Debug)]
pub struct RouteRecord {
    pub path: String,
    pub name: Option<String>,
    pub target: RouteTarget,
}

impl RouteRecord {
    pub fn view(path: &str, name: &str, loader: fn() -> View) -> Self {
        Self {
            path: path.into(),
            name: Some(name.into()),
            target: RouteTarget::View(LazyView::new(loader)),
        }
    }

    pub fn redirect(path: &str, to: Redirect) -> Self {
        Self {
            path: path.into(),
            name: None,
            target: RouteTarget::Redirect(to),
        }
    }

    pub fn is_wildcard(&self) -> bool {
        self.path == "*"
    }
}
