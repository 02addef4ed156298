//! Markdown rendering pipeline.
//!
//! The pipeline is pure: it accepts markdown, produces deterministic HTML and
//! reports structured errors. Transport concerns (decoding envelopes, writing
//! responses) stay with the caller.

mod service;
mod types;

pub use service::{ComrakRenderService, render_service};
pub use types::{RenderError, RenderOutput, RenderRequest, RenderService};
