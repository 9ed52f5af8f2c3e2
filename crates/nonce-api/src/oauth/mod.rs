//! OAuth1.0a request signing
//!
//! Everything needed to turn an inbound request into a signing base string
//! and check the caller's HMAC signature against a stored consumer secret.

mod encoding;
mod extract;
mod origin;
mod params;
mod request;
mod signature;

pub use encoding::{join_with_equals_sign, normalize_parameters, rfc3986_encode, sort_parameters};
pub use extract::{
    collect_parameters, missing_required, parse_authorization_header, REQUIRED_PARAMETERS,
};
pub use origin::SiteOrigin;
pub use params::{parse_query, ParamMap, ParamValue};
pub use request::SignedRequest;
pub use signature::{
    claimed_signature, compute_signature, RejectReason, SignatureMethod, SignatureVerifier,
    SigningBaseString,
};
