use std::time::Instant;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    middleware::Next,
    response::Response,
};
use metrics::counter;
use tracing::{Instrument, debug, error, info_span, warn};
use uuid::Uuid;

use crate::{application::error::ErrorReport, infra::telemetry::REQUESTS_TOTAL};

/// How one invocation ended, as used for the `outcome` metric label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Health,
    Converted,
    Rejected,
    Failed,
}

impl Outcome {
    pub fn classify(method: &Method, status: StatusCode) -> Self {
        if status.is_server_error() {
            Self::Failed
        } else if status.is_client_error() {
            Self::Rejected
        } else if *method == Method::GET {
            Self::Health
        } else {
            Self::Converted
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Health => "health",
            Self::Converted => "converted",
            Self::Rejected => "rejected",
            Self::Failed => "failed",
        }
    }
}

/// Run one invocation inside a span carrying a fresh request id, then count
/// and log it by outcome. Rejections produced by axum itself (such as the body
/// limit) carry no [`ErrorReport`] and are logged with the status alone.
pub async fn track_invocation(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let span = info_span!(
        "invocation",
        request_id = %Uuid::new_v4(),
        method = %method,
        path = %path,
    );

    async move {
        let start = Instant::now();
        let mut response = next.run(request).await;
        let status = response.status();
        let elapsed_ms = start.elapsed().as_millis();

        let outcome = Outcome::classify(&method, status);
        counter!(REQUESTS_TOTAL, "outcome" => outcome.as_str()).increment(1);

        let report = response.extensions_mut().remove::<ErrorReport>();
        let (source, chain) = match report {
            Some(report) => (report.source, report.messages),
            None => ("framework", Vec::new()),
        };

        match outcome {
            Outcome::Failed => error!(
                target = "md2html::http::invocation",
                status = status.as_u16(),
                elapsed_ms,
                source,
                chain = ?chain,
                "invocation failed",
            ),
            Outcome::Rejected => warn!(
                target = "md2html::http::invocation",
                status = status.as_u16(),
                elapsed_ms,
                source,
                chain = ?chain,
                "invocation rejected",
            ),
            Outcome::Health | Outcome::Converted => debug!(
                target = "md2html::http::invocation",
                status = status.as_u16(),
                elapsed_ms,
                outcome = outcome.as_str(),
                "invocation complete",
            ),
        }

        response
    }
    .instrument(span)
    .await
}
