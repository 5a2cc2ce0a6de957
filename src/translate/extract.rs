//! Parameter extraction from HTTP requests.

use std::collections::HashMap;

use axum::body::{Body, Bytes};
use axum::http::{header, request::Parts, StatusCode};
use percent_encoding::percent_decode_str;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

/// Why a request could not be translated into a call.
#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("failed to read request body: {0}")]
    Body(#[from] axum::Error),

    #[error("error while decoding request body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("identifier is required in path")]
    MissingIdentifier,
    #[error("identifier in path is not valid UTF-8")]
    InvalidIdentifier,
}

impl TranslateError {
    pub fn status(&self) -> StatusCode {
        match self {
            TranslateError::Body(_)
            | TranslateError::Decode(_)
            | TranslateError::MissingIdentifier
            | TranslateError::InvalidIdentifier => StatusCode::BAD_REQUEST,
        }
    }
}

/// Buffer the request body up to `limit` bytes.
pub async fn read_body(body: Body, limit: usize) -> Result<Bytes, TranslateError> {
    Ok(axum::body::to_bytes(body, limit).await?)
}

/// Decode the first JSON value of a request body.
///
/// Unknown fields are ignored; missing fields take their defaults when the
/// target type is `#[serde(default)]`. A `null` body decodes to the default
/// value and anything after the first value is not read. An empty body is
/// a decode error.
pub async fn json_body<T>(body: Body, limit: usize) -> Result<T, TranslateError>
where
    T: DeserializeOwned + Default,
{
    let bytes = read_body(body, limit).await?;
    let mut de = serde_json::Deserializer::from_slice(&bytes);
    let value = Option::<T>::deserialize(&mut de)?;
    Ok(value.unwrap_or_default())
}

/// Form values from the URL query and, for urlencoded bodies, the body.
///
/// Body values shadow query values of the same name; the first value of a
/// repeated name wins. A body that cannot be read contributes nothing.
#[derive(Debug, Default)]
pub struct FormValues(HashMap<String, String>);

impl FormValues {
    pub async fn from_request(parts: &Parts, body: Body, limit: usize) -> Self {
        let mut values = HashMap::new();

        if is_urlencoded(parts) {
            if let Ok(bytes) = read_body(body, limit).await {
                collect(&mut values, &bytes);
            }
        }
        if let Some(query) = parts.uri.query() {
            collect(&mut values, query.as_bytes());
        }

        Self(values)
    }

    /// Value for `name`, empty when absent.
    pub fn value(&self, name: &str) -> String {
        self.0.get(name).cloned().unwrap_or_default()
    }
}

fn is_urlencoded(parts: &Parts) -> bool {
    parts
        .headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|mime| mime.trim().eq_ignore_ascii_case("application/x-www-form-urlencoded"))
        .unwrap_or(false)
}

fn collect(values: &mut HashMap<String, String>, input: &[u8]) {
    for (key, value) in url::form_urlencoded::parse(input) {
        values.entry(key.into_owned()).or_insert_with(|| value.into_owned());
    }
}

/// Percent-decoded identifier following `prefix/` in `path`, with one
/// optional trailing `/`.
pub fn path_identifier(path: &str, prefix: &str) -> Result<String, TranslateError> {
    let rest = path
        .strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('/'))
        .ok_or(TranslateError::MissingIdentifier)?;
    let decoded = percent_decode_str(rest)
        .decode_utf8()
        .map_err(|_| TranslateError::InvalidIdentifier)?;
    let id = decoded.strip_suffix('/').unwrap_or(&decoded);
    if id.is_empty() {
        return Err(TranslateError::MissingIdentifier);
    }
    Ok(id.to_string())
}
