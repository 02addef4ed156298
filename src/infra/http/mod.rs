mod function;
mod middleware;
pub mod registry;

pub use function::{FunctionState, MAIN_FUNCTION, markdown_to_html};
pub use middleware::Outcome;
pub use registry::{EntryPoint, FunctionRegistry, RegistryError};

use axum::{Router, extract::DefaultBodyLimit, middleware as axum_middleware};

/// Registry holding every entry point this binary ships.
pub fn default_registry() -> Result<FunctionRegistry, RegistryError> {
    let mut registry = FunctionRegistry::new();
    registry.register(MAIN_FUNCTION, markdown_to_html)?;
    Ok(registry)
}

/// Wrap a function router with the body limit and invocation tracking.
pub fn build_app(function: Router, body_limit: usize) -> Router {
    function
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(axum_middleware::from_fn(middleware::track_invocation))
}
