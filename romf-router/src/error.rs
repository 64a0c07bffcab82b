/// Errors produced while resolving a location against the route table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    #[error("no route matches '{0}'")]
    NoMatch(String),

    #[error("route with name '{0}' does not exist")]
    UnknownRouteName(String),

    #[error("route '{0}' takes parameters and cannot be a named redirect target")]
    ParameterizedRedirect(String),

    #[error("too many redirects starting at '{0}'")]
    RedirectLoop(String),

    #[error("invalid path '{0}': must start with '/'")]
    InvalidPath(String),
}

pub type Result<T> = std::result::Result<T, RouteError>;
