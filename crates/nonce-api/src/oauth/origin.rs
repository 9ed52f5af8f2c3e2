//! Public origin of the site, used to rebuild the URL a client signed

use axum::http::{header, request::Parts, HeaderMap};
use common::ConfigurationError;
use url::Url;

use super::params::ParamMap;
use super::request::SignedRequest;
use crate::config::OAuthConfig;

const FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Where the site is publicly reachable
///
/// With `site_url` configured the scheme and host are fixed. Otherwise they
/// come from the request, honouring `X-Forwarded-Proto` only when trusted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteOrigin {
    scheme: Option<String>,
    host: Option<String>,
    base_path: String,
    default_scheme: String,
    trust_forwarded_proto: bool,
}

impl SiteOrigin {
    pub fn from_config(config: &OAuthConfig) -> Result<Self, ConfigurationError> {
        let Some(site_url) = config.site_url.as_deref() else {
            return Ok(Self {
                scheme: None,
                host: None,
                base_path: config.base_path.clone(),
                default_scheme: config.public_scheme.clone(),
                trust_forwarded_proto: config.trust_forwarded_proto,
            });
        };

        let url = Url::parse(site_url).map_err(|e| {
            ConfigurationError::invalid_value("oauth.site_url", site_url, e.to_string())
        })?;
        let host = url.host_str().ok_or_else(|| {
            ConfigurationError::invalid_value("oauth.site_url", site_url, "URL has no host")
        })?;
        let host = match url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };

        Ok(Self {
            scheme: Some(url.scheme().to_string()),
            host: Some(host),
            base_path: url.path().to_string(),
            default_scheme: url.scheme().to_string(),
            trust_forwarded_proto: false,
        })
    }

    /// Path the site is mounted under
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn scheme(&self, headers: &HeaderMap) -> String {
        if let Some(scheme) = &self.scheme {
            return scheme.clone();
        }

        if self.trust_forwarded_proto {
            let forwarded = headers
                .get(FORWARDED_PROTO)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.split(',').next())
                .map(|value| value.trim().to_ascii_lowercase());

            if let Some(proto @ ("http" | "https")) = forwarded.as_deref() {
                return proto.to_string();
            }
        }

        self.default_scheme.clone()
    }

    pub fn host(&self, parts: &Parts) -> String {
        if let Some(host) = &self.host {
            return host.clone();
        }

        parts
            .headers
            .get(header::HOST)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
            .or_else(|| parts.uri.authority().map(|a| a.to_string()))
            .unwrap_or_else(|| "localhost".to_string())
    }

    /// Snapshot the request for verification
    pub fn signed_request(&self, parts: &Parts, oauth_parameters: ParamMap) -> SignedRequest {
        SignedRequest::new(
            parts.method.as_str(),
            parts.uri.path(),
            self.scheme(&parts.headers),
            self.host(parts),
            oauth_parameters,
        )
    }
}
