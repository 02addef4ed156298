use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    routing::{MethodRouter, get},
};
use bytes::Bytes;

use crate::application::{convert, error::HttpError, render::RenderService};

/// Name the markdown converter registers under.
pub const MAIN_FUNCTION: &str = "main";

const HEALTH_BODY: &str = "ok";

#[derive(Clone)]
pub struct FunctionState {
    pub renderer: Arc<dyn RenderService>,
}

impl FunctionState {
    pub fn new(renderer: Arc<dyn RenderService>) -> Self {
        Self { renderer }
    }
}

/// Entry point for the markdown converter. Every path answers GET as a
/// liveness probe and any other method as a conversion.
///
/// HEAD is routed to the conversion explicitly; axum would otherwise answer it
/// with the GET handler.
pub fn markdown_to_html(state: &FunctionState) -> Router {
    let endpoint: MethodRouter<FunctionState> = get(health_check)
        .head(convert_markdown)
        .fallback(convert_markdown);

    Router::new()
        .route("/", endpoint.clone())
        .route("/{*path}", endpoint)
        .with_state(state.clone())
}

async fn health_check() -> &'static str {
    HEALTH_BODY
}

async fn convert_markdown(
    State(state): State<FunctionState>,
    body: Bytes,
) -> Result<String, HttpError> {
    convert::convert_body(state.renderer.as_ref(), &body).map_err(HttpError::from)
}
