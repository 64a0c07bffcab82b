use std::collections::BTreeMap;

use crate::error::{Result, RouteError};
use crate::route::{HistoryMode, Redirect, RouteRecord, RouteTarget, View};

/// Redirect hops followed before giving up.
pub const MAX_REDIRECTS: usize = 8;

/// Outcome of resolving a location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoute<'a> {
    /// Location that matched, after redirects and base stripping.
    pub path: String,
    pub name: Option<&'a str>,
    pub params: BTreeMap<String, String>,
    pub view: &'a View,
    /// First location that was redirected, if any redirect happened.
    pub redirected_from: Option<String>,
}

#[derive(Debug)]
pub struct Router {
    mode: HistoryMode,
    base: String,
    routes: Vec<RouteRecord>,
}

impl Router {
    pub fn new(mode: HistoryMode, base: &str, routes: Vec<RouteRecord>) -> Self {
        Self {
            mode,
            base: base.trim_end_matches('/').to_string(),
            routes,
        }
    }

    pub fn mode(&self) -> HistoryMode {
        self.mode
    }

    pub fn routes(&self) -> &[RouteRecord] {
        &self.routes
    }

    pub fn by_name(&self, name: &str) -> Option<&RouteRecord> {
        self.routes
            .iter()
            .find(|r| r.name.as_deref() == Some(name))
    }

    /// Address-bar form of an application path.
    pub fn href(&self, path: &str) -> String {
        match self.mode {
            HistoryMode::Hash => format!("{}/#{path}", self.base),
            HistoryMode::History => format!("{}{path}", self.base),
            HistoryMode::Abstract => path.to_string(),
        }
    }

    /// Resolve `location` to a view, following redirects. Accepts what
    /// [`Router::href`] produces in every mode.
    ///
    /// Literal and parameter routes are tried in declaration order before any
    /// `*` route, wherever the wildcard was declared.
    pub fn resolve(&self, location: &str) -> Result<ResolvedRoute<'_>> {
        let start = self.route_path(location)?;
        let mut current = start.clone();
        let mut redirected_from = None;

        for _ in 0..=MAX_REDIRECTS {
            let (record, params) = self
                .match_path(&current)
                .ok_or_else(|| RouteError::NoMatch(current.clone()))?;
            match &record.target {
                RouteTarget::View(lazy) => {
                    return Ok(ResolvedRoute {
                        path: current,
                        name: record.name.as_deref(),
                        params,
                        view: lazy.load(),
                        redirected_from,
                    });
                }
                RouteTarget::Redirect(to) => {
                    let next = self.redirect_target(to)?;
                    tracing::debug!(from = %current, to = %next, "following redirect");
                    if redirected_from.is_none() {
                        redirected_from = Some(current);
                    }
                    current = next;
                }
            }
        }
        Err(RouteError::RedirectLoop(start))
    }

    fn redirect_target(&self, to: &Redirect) -> Result<String> {
        match to {
            Redirect::Path(path) => Ok(path.clone()),
            Redirect::Name(name) => match self.by_name(name) {
                // A named target has no parameters to fill in.
                Some(record)
                    if record.is_wildcard()
                        || segments(&record.path).any(|s| s.starts_with(':')) =>
                {
                    Err(RouteError::ParameterizedRedirect(name.clone()))
                }
                Some(record) => Ok(record.path.clone()),
                None => {
                    tracing::warn!(route = %name, "redirect to undefined route name");
                    Err(RouteError::UnknownRouteName(name.clone()))
                }
            },
        }
    }

    /// Application path addressed by `location`: the fragment in hash mode,
    /// the location minus the base in history mode, the location itself in
    /// abstract mode. Query strings are dropped.
    fn route_path(&self, location: &str) -> Result<String> {
        if !location.starts_with('/') {
            return Err(RouteError::InvalidPath(location.to_string()));
        }
        let path = match self.mode {
            HistoryMode::Hash => location
                .split_once('#')
                .map_or("", |(_, fragment)| fragment),
            HistoryMode::History => self.strip_base(location),
            HistoryMode::Abstract => location,
        };
        let path = path.split(['?', '#']).next().unwrap_or_default();
        Ok(match path {
            "" => "/".to_string(),
            p if p.starts_with('/') => p.to_string(),
            p => format!("/{p}"),
        })
    }

    fn strip_base<'a>(&self, location: &'a str) -> &'a str {
        let path = location.split(['?', '#']).next().unwrap_or_default();
        match path.strip_prefix(self.base.as_str()) {
            Some(rest)
                if !self.base.is_empty() && (rest.is_empty() || rest.starts_with('/')) =>
            {
                rest
            }
            _ => path,
        }
    }

    fn match_path(&self, path: &str) -> Option<(&RouteRecord, BTreeMap<String, String>)> {
        let literal = self.routes.iter().filter(|r| !r.is_wildcard());
        let wildcard = self.routes.iter().filter(|r| r.is_wildcard());
        literal
            .chain(wildcard)
            .find_map(|record| match_pattern(&record.path, path).map(|params| (record, params)))
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

fn match_pattern(pattern: &str, path: &str) -> Option<BTreeMap<String, String>> {
    if pattern == "*" {
        return Some(BTreeMap::new());
    }
    let expected: Vec<&str> = segments(pattern).collect();
    let actual: Vec<&str> = segments(path).collect();
    if expected.len() != actual.len() {
        return None;
    }
    let mut params = BTreeMap::new();
    for (want, got) in expected.iter().zip(&actual) {
        if let Some(param) = want.strip_prefix(':') {
            params.insert(param.to_string(), (*got).to_string());
        } else if want != got {
            return None;
        }
    }
    Some(params)
}

fn home_view() -> View {
    View::new("home", "home-view")
}

fn albums_view() -> View {
    View::new("albums", "album-grid")
}

/// The application's route table: unknown locations redirect to the album
/// list, `/` shows the home view.
pub fn default_routes() -> Vec<RouteRecord> {
    vec![
        RouteRecord::redirect("*", Redirect::Name("albums".into())),
        RouteRecord::view("/", "home", home_view),
        RouteRecord::view("/albums", "albums", albums_view),
    ]
}
