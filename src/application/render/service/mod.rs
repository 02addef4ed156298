mod config;
mod headings;
mod post;

use std::sync::Arc;

use comrak::{Arena, format_html, nodes::AstNode, parse_document};
use once_cell::sync::Lazy;

use crate::application::render::types::{
    RenderError, RenderOutput, RenderRequest, RenderService,
};

use config::default_options;
use headings::{HeadingInfo, collect_headings};
use post::{ProcessedHtml, post_process};

/// Comrak-based rendering pipeline with a fixed extension profile, heading
/// anchors and new-context external links.
pub struct ComrakRenderService {
    options: comrak::Options<'static>,
}

impl ComrakRenderService {
    fn new() -> Self {
        Self {
            options: default_options(),
        }
    }
}

static RENDER_SERVICE: Lazy<Arc<ComrakRenderService>> =
    Lazy::new(|| Arc::new(ComrakRenderService::new()));

/// Access the shared render service instance, initialised on first use.
pub fn render_service() -> Arc<ComrakRenderService> {
    Arc::clone(&RENDER_SERVICE)
}

impl Default for ComrakRenderService {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderService for ComrakRenderService {
    fn render(&self, request: &RenderRequest) -> Result<RenderOutput, RenderError> {
        let arena = Arena::new();
        let root = parse_document(&arena, &request.markdown, &self.options);

        let headings = collect_headings(root);
        let rendered_html = render_html_stage(root, &self.options)?;

        let ProcessedHtml {
            html,
            anchored_headings,
            external_links,
        } = post_process_stage(&rendered_html, &headings)?;

        Ok(RenderOutput {
            html,
            anchored_headings,
            external_links,
        })
    }
}

fn render_html_stage<'a>(
    root: &'a AstNode<'a>,
    options: &comrak::Options<'static>,
) -> Result<String, RenderError> {
    let mut html = String::new();
    format_html(root, options, &mut html).map_err(|err| RenderError::Markdown {
        message: err.to_string(),
    })?;
    Ok(html)
}

fn post_process_stage(html: &str, headings: &[HeadingInfo]) -> Result<ProcessedHtml, RenderError> {
    post_process(html, headings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(markdown: &str) -> RenderOutput {
        ComrakRenderService::default()
            .render(&RenderRequest::new(markdown))
            .expect("render succeeds")
    }

    #[test]
    fn heading_gets_stable_id() {
        assert_eq!(render("# Hello").html, "<h1 id=\"hello\">Hello</h1>\n");
    }

    #[test]
    fn empty_markdown_renders_empty_html() {
        let output = render("");
        assert_eq!(output.html, "");
        assert_eq!(output.anchored_headings, 0);
        assert_eq!(output.external_links, 0);
    }

    #[test]
    fn counts_anchors_and_external_links() {
        let output = render("# A\n\n## B\n\n[x](https://example.com) and [y](/local)\n");
        assert_eq!(output.anchored_headings, 2);
        assert_eq!(output.external_links, 1);
        assert!(output.html.contains("<a href=\"/local\">y</a>"));
    }

    #[test]
    fn shared_instance_is_reused() {
        let first = render_service();
        let second = render_service();
        assert!(Arc::ptr_eq(&first, &second));
    }
}
