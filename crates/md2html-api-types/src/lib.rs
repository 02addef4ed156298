//! Wire envelopes exchanged with the md2html function.
//!
//! Both envelopes are request-scoped: the function decodes one
//! [`ConvertRequest`] per call and answers with exactly one
//! [`ConvertResponse`].

use serde::{Deserialize, Serialize};

/// Inbound payload carrying the markdown source.
///
/// `data` is required. An empty string is a valid document; an absent key is
/// not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertRequest {
    pub data: String,
}

impl ConvertRequest {
    pub fn new(data: impl Into<String>) -> Self {
        Self { data: data.into() }
    }
}

/// Outbound payload carrying the rendered HTML under the `Result` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertResponse {
    #[serde(rename = "Result")]
    pub result: String,
}

impl ConvertResponse {
    pub fn new(result: impl Into<String>) -> Self {
        Self {
            result: result.into(),
        }
    }
}
