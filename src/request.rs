use reqwest::Method;
use serde::Serialize;

use crate::{error::NetworkError, ManapoolError, Result};

const JSON_CONTENT_TYPE: &str = "application/json";

/// One logical API call: method, path relative to the base URL, query and
/// optional body.
///
/// Endpoint methods on [`crate::ManapoolClient`] build these internally; use
/// [`crate::ManapoolClient::call`] to reach routes without a dedicated method.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiRequest {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) query: Vec<(String, String)>,
    pub(crate) body: Option<RequestBody>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct RequestBody {
    pub(crate) bytes: Vec<u8>,
    pub(crate) content_type: String,
}

impl ApiRequest {
    /// Request with no query and no body.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    /// `GET` request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// `POST` request.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// `PUT` request.
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// `DELETE` request.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Path as given, relative to the base URL.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Appends a query pair. Repeated keys are kept in order.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Appends every pair from `pairs` in order.
    pub fn query_pairs<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(pairs.into_iter().map(|(key, value)| (key.into(), value.into())));
        self
    }

    /// Attaches a JSON-encoded body.
    pub fn json<T: Serialize + ?Sized>(self, payload: &T) -> Result<Self> {
        let bytes = serde_json::to_vec(payload)
            .map_err(|err| NetworkError::new("failed to encode request body", err))?;
        Ok(self.body(bytes, JSON_CONTENT_TYPE))
    }

    /// Attaches raw bytes sent with the given content type.
    pub fn body(mut self, bytes: impl Into<Vec<u8>>, content_type: impl Into<String>) -> Self {
        self.body = Some(RequestBody {
            bytes: bytes.into(),
            content_type: content_type.into(),
        });
        self
    }

    /// Path with one leading `/` removed, ready to join onto the base URL.
    pub(crate) fn relative_path(&self) -> &str {
        self.path.strip_prefix('/').unwrap_or(&self.path)
    }
}

/// Rejects an empty identifier before it is spliced into a path.
pub(crate) fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(ManapoolError::validation(
            field,
            format!("{field} cannot be empty"),
        ));
    }
    Ok(())
}
