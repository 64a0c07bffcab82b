pub mod error;
pub mod route;
pub mod router;

pub use error::{Result, RouteError};
pub use route::{HistoryMode, LazyView, Redirect, RouteRecord, RouteTarget, View};
pub use router::{MAX_REDIRECTS, ResolvedRoute, Router, default_routes};
