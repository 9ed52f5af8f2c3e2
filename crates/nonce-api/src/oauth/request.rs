//! Immutable view of an inbound request for signature checking

use super::params::ParamMap;

/// One inbound HTTP call requiring verification
///
/// Built once by the HTTP layer and only read afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    http_method: String,
    request_path: String,
    scheme: String,
    host: String,
    oauth_parameters: ParamMap,
}

impl SignedRequest {
    pub fn new(
        http_method: &str,
        request_path: impl Into<String>,
        scheme: impl Into<String>,
        host: impl Into<String>,
        oauth_parameters: ParamMap,
    ) -> Self {
        Self {
            http_method: http_method.to_ascii_uppercase(),
            request_path: request_path.into(),
            scheme: scheme.into(),
            host: host.into(),
            oauth_parameters,
        }
    }

    /// Uppercase HTTP verb
    pub fn http_method(&self) -> &str {
        &self.http_method
    }

    /// URL path, without query
    pub fn request_path(&self) -> &str {
        &self.request_path
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Host, including the port when one was given
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn oauth_parameters(&self) -> &ParamMap {
        &self.oauth_parameters
    }

    /// Raw consumer key as supplied by the caller
    pub fn consumer_key(&self) -> Option<&str> {
        self.oauth_parameters.get_scalar("oauth_consumer_key")
    }
}
