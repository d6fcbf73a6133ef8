use futures_util::StreamExt;
use serde_json::Value;
use url::Url;

use super::SourceSettings;
use crate::{FailureKind, SourceError};

/// Thin reqwest wrapper shared by the job-board sources: GET a URL, enforce
/// the body limit, decode JSON.
#[derive(Debug, Clone)]
pub(crate) struct JsonClient {
    client: reqwest::Client,
    max_bytes: u64,
}

impl JsonClient {
    pub(crate) fn new(settings: &SourceSettings) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| SourceError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self {
            client,
            max_bytes: settings.max_bytes,
        })
    }

    pub(crate) async fn get_json(
        &self,
        url: Url,
        headers: &[(&str, &str)],
    ) -> Result<Value, SourceError> {
        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = request.send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.max_bytes {
                return Err(self.too_large(Some(content_len)));
            }
        }

        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = body.len() as u64 + chunk.len() as u64;
            if next_len > self.max_bytes {
                return Err(self.too_large(Some(next_len)));
            }
            body.extend_from_slice(&chunk);
        }

        serde_json::from_slice(&body)
            .map_err(|err| SourceError::new(FailureKind::Decode, err.to_string()))
    }

    fn too_large(&self, actual: Option<u64>) -> SourceError {
        SourceError::new(
            FailureKind::TooLarge {
                max_bytes: self.max_bytes,
                actual,
            },
            "response too large",
        )
    }
}

pub(crate) fn build_url(base: &str, params: &[(&str, String)]) -> Result<Url, SourceError> {
    Url::parse_with_params(base, params)
        .map_err(|err| SourceError::new(FailureKind::InvalidUrl, err.to_string()))
}

/// Pulls the listing array out of a page envelope such as `{"items": [...]}`.
pub(crate) fn take_items(mut page: Value, key: &str) -> Result<Vec<Value>, SourceError> {
    match page.get_mut(key).map(Value::take) {
        Some(Value::Array(items)) => Ok(items),
        Some(other) => Err(SourceError::new(
            FailureKind::Decode,
            format!("expected `{key}` to be an array, got {other}"),
        )),
        None => Err(SourceError::new(
            FailureKind::Decode,
            format!("response has no `{key}` field"),
        )),
    }
}

fn map_reqwest_error(err: reqwest::Error) -> SourceError {
    if err.is_timeout() {
        return SourceError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_builder() {
        return SourceError::new(FailureKind::InvalidUrl, err.to_string());
    }
    SourceError::new(FailureKind::Network, err.to_string())
}
