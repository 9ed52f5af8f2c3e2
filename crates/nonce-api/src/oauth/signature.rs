//! Signing base string construction and HMAC signature verification

use std::fmt;
use std::str::FromStr;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use common::crypto::{hmac_digest, secure_compare, MacAlgorithm};
use percent_encoding::percent_decode_str;

use super::encoding::{join_with_equals_sign, normalize_parameters, rfc3986_encode, sort_parameters};
use super::params::ParamValue;
use super::request::SignedRequest;
use crate::credentials::CredentialRecord;

/// Why a request was rejected
///
/// Only used for logs and metrics. Callers always see the same response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectReason {
    MissingParameters,
    UnknownConsumer,
    MissingSignature,
    UnsortableParameters,
    UnsupportedSignatureMethod,
    SigningFailed,
    SignatureMismatch,
}

impl RejectReason {
    /// Stable label for metrics
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::MissingParameters => "missing_parameters",
            RejectReason::UnknownConsumer => "unknown_consumer",
            RejectReason::MissingSignature => "missing_signature",
            RejectReason::UnsortableParameters => "unsortable_parameters",
            RejectReason::UnsupportedSignatureMethod => "unsupported_signature_method",
            RejectReason::SigningFailed => "signing_failed",
            RejectReason::SignatureMismatch => "signature_mismatch",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Supported `oauth_signature_method` values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureMethod {
    HmacSha1,
    HmacSha256,
}

impl SignatureMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignatureMethod::HmacSha1 => "HMAC-SHA1",
            SignatureMethod::HmacSha256 => "HMAC-SHA256",
        }
    }

    fn algorithm(&self) -> MacAlgorithm {
        match self {
            SignatureMethod::HmacSha1 => MacAlgorithm::Sha1,
            SignatureMethod::HmacSha256 => MacAlgorithm::Sha256,
        }
    }
}

impl FromStr for SignatureMethod {
    type Err = RejectReason;

    /// Exact, case-sensitive match
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HMAC-SHA1" => Ok(SignatureMethod::HmacSha1),
            "HMAC-SHA256" => Ok(SignatureMethod::HmacSha256),
            _ => Err(RejectReason::UnsupportedSignatureMethod),
        }
    }
}

/// `METHOD&encodedURL&encodedParameters`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningBaseString(String);

impl SigningBaseString {
    /// Build from an uppercase method, an unencoded URL and the parameters
    /// to sign (which must not include `oauth_signature`)
    pub fn new(
        http_method: &str,
        url: &str,
        params: Vec<(String, ParamValue)>,
    ) -> Result<Self, RejectReason> {
        let sorted = sort_parameters(params)?;
        let normalized = normalize_parameters(&sorted);
        let joined = join_with_equals_sign(&normalized, None).join("%26");

        Ok(Self(format!(
            "{http_method}&{}&{joined}",
            rfc3986_encode(url)
        )))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SigningBaseString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Recover the base64 signature the caller sent
///
/// Form decoding turned any `+` into a space, so spaces are restored before
/// percent-decoding. A `+` is never turned into a space here.
pub fn claimed_signature(raw: &str) -> String {
    let restored = raw.replace(' ', "+");
    percent_decode_str(&restored).decode_utf8_lossy().into_owned()
}

/// Base64 HMAC of the base string keyed with `secret&`
pub fn compute_signature(
    method: SignatureMethod,
    consumer_secret: &str,
    base: &SigningBaseString,
) -> Result<String, RejectReason> {
    let key = format!("{consumer_secret}&");
    let digest = hmac_digest(method.algorithm(), key.as_bytes(), base.as_str().as_bytes())
        .map_err(|_| RejectReason::SigningFailed)?;

    Ok(STANDARD.encode(digest))
}

/// Checks OAuth1.0a HMAC signatures against stored consumer secrets
#[derive(Debug, Clone)]
pub struct SignatureVerifier {
    base_path: String,
}

impl Default for SignatureVerifier {
    fn default() -> Self {
        Self::new("/")
    }
}

impl SignatureVerifier {
    /// Create a verifier for a site mounted at `base_path`
    ///
    /// The path is normalized to start and end with `/`.
    pub fn new(base_path: &str) -> Self {
        let trimmed = base_path.trim_matches('/');
        let base_path = if trimmed.is_empty() {
            "/".to_string()
        } else {
            format!("/{trimmed}/")
        };

        Self { base_path }
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Rebuild the absolute URL the client signed
    pub fn request_url(&self, request: &SignedRequest) -> String {
        let path = request.request_path();
        let relative = path
            .strip_prefix(self.base_path.as_str())
            .unwrap_or(path)
            .trim_start_matches('/');

        let site = format!(
            "{}://{}{}",
            request.scheme(),
            request.host(),
            self.base_path.trim_end_matches('/')
        );

        if relative.is_empty() {
            site
        } else {
            format!("{site}/{relative}")
        }
    }

    /// Signing base string for a request, without its `oauth_signature`
    pub fn base_string(&self, request: &SignedRequest) -> Result<SigningBaseString, RejectReason> {
        let mut params = request.oauth_parameters().clone();
        params.remove("oauth_signature");

        SigningBaseString::new(
            request.http_method(),
            &self.request_url(request),
            params.into_pairs(),
        )
    }

    /// Accept or reject a request against the credential found for it
    pub fn verify(
        &self,
        record: Option<&CredentialRecord>,
        request: &SignedRequest,
    ) -> Result<(), RejectReason> {
        let record = record.ok_or(RejectReason::UnknownConsumer)?;

        let claimed = request
            .oauth_parameters()
            .get_scalar("oauth_signature")
            .map(claimed_signature)
            .ok_or(RejectReason::MissingSignature)?;

        let base = self.base_string(request)?;

        let method: SignatureMethod = request
            .oauth_parameters()
            .get_scalar("oauth_signature_method")
            .ok_or(RejectReason::UnsupportedSignatureMethod)?
            .parse()?;

        let expected = compute_signature(method, &record.consumer_secret, &base)?;

        if secure_compare(expected.as_bytes(), claimed.as_bytes()) {
            Ok(())
        } else {
            Err(RejectReason::SignatureMismatch)
        }
    }

    /// Boolean form of [`SignatureVerifier::verify`]
    pub fn is_valid(&self, record: Option<&CredentialRecord>, request: &SignedRequest) -> bool {
        self.verify(record, request).is_ok()
    }
}
