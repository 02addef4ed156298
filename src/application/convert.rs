//! The markdown-to-HTML conversion shared by the HTTP function and the CLI.
//!
//! One call decodes a [`ConvertRequest`], renders its `data` and encodes a
//! [`ConvertResponse`]. The rendered HTML is passed through unchanged.

use std::time::Instant;

use md2html_api_types::{ConvertRequest, ConvertResponse};
use metrics::histogram;
use thiserror::Error;
use tracing::debug;

use crate::{
    application::render::{RenderError, RenderRequest, RenderService},
    infra::telemetry::RENDER_MS,
};

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("request body is not a valid conversion request: {0}")]
    Decode(#[source] serde_json::Error),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("failed to encode conversion response: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Decode a request body. Anything other than a JSON object with a string
/// `data` key is rejected; unknown keys are ignored.
pub fn decode_request(body: &[u8]) -> Result<ConvertRequest, ConvertError> {
    serde_json::from_slice(body).map_err(ConvertError::Decode)
}

/// Render the request's markdown into a response envelope.
pub fn convert(
    renderer: &dyn RenderService,
    request: ConvertRequest,
) -> Result<ConvertResponse, ConvertError> {
    let started = Instant::now();
    let input_bytes = request.data.len();

    let output = renderer.render(&RenderRequest::new(request.data))?;

    histogram!(RENDER_MS).record(started.elapsed().as_secs_f64() * 1000.0);
    debug!(
        target = "md2html::convert",
        input_bytes,
        html_bytes = output.html.len(),
        anchored_headings = output.anchored_headings,
        external_links = output.external_links,
        "markdown rendered"
    );

    Ok(ConvertResponse::new(output.html))
}

pub fn encode_response(response: &ConvertResponse) -> Result<String, ConvertError> {
    serde_json::to_string(response).map_err(ConvertError::Encode)
}

/// Decode, render and encode in one step, returning the JSON response body.
pub fn convert_body(renderer: &dyn RenderService, body: &[u8]) -> Result<String, ConvertError> {
    let request = decode_request(body)?;
    let response = convert(renderer, request)?;
    encode_response(&response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::render::{RenderOutput, render_service};

    struct FailingRenderer;

    impl RenderService for FailingRenderer {
        fn render(&self, _request: &RenderRequest) -> Result<RenderOutput, RenderError> {
            Err(RenderError::Document {
                message: "boom".to_string(),
            })
        }
    }

    #[test]
    fn decode_accepts_empty_data() {
        let request = decode_request(br#"{"data":""}"#).expect("decode");
        assert_eq!(request.data, "");
    }

    #[test]
    fn decode_rejects_malformed_bodies() {
        let bodies: [&[u8]; 8] = [
            b"",
            b"not json",
            b"{}",
            b"null",
            b"[]",
            br#"{"data":null}"#,
            br#"{"data":42}"#,
            br#"{"data":"x"} trailing"#,
        ];

        for body in bodies {
            let err = decode_request(body).expect_err("should reject");
            assert!(
                matches!(err, ConvertError::Decode(_)),
                "unexpected error for {:?}",
                String::from_utf8_lossy(body)
            );
        }
    }

    #[test]
    fn convert_body_wraps_rendered_html() {
        let renderer = render_service();
        let body = convert_body(renderer.as_ref(), br##"{"data":"# Hello"}"##).expect("convert");
        assert_eq!(body, r#"{"Result":"<h1 id=\"hello\">Hello</h1>\n"}"#);
    }

    #[test]
    fn render_failures_are_reported() {
        let err = convert(&FailingRenderer, ConvertRequest::new("# x")).expect_err("fails");
        assert!(matches!(err, ConvertError::Render(_)));
    }
}
