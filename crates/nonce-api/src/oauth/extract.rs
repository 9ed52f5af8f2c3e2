//! Collecting OAuth parameters from the query string and `Authorization` header

use super::params::{form_decode, parse_query, ParamMap};

/// Parameters every signed request must carry
pub const REQUIRED_PARAMETERS: [&str; 5] = [
    "oauth_consumer_key",
    "oauth_timestamp",
    "oauth_nonce",
    "oauth_signature",
    "oauth_signature_method",
];

/// Parse `oauth_*` pairs from an `Authorization: OAuth ...` header
///
/// Values may be quoted or bare and are form-decoded. Any other scheme, and
/// any non-`oauth_` field such as `realm`, is ignored.
pub fn parse_authorization_header(header: &str) -> ParamMap {
    let mut params = ParamMap::new();

    let Some(fields) = header.trim().strip_prefix("OAuth ") else {
        return params;
    };

    for field in split_fields(fields) {
        let Some((name, raw_value)) = field.trim().split_once('=') else {
            continue;
        };
        let name = name.trim();
        if !is_oauth_name(name) {
            continue;
        }

        let raw_value = raw_value.trim();
        let value = match raw_value.strip_prefix('"') {
            Some(quoted) => quoted.split('"').next().unwrap_or_default(),
            None => raw_value,
        };
        params.insert(name, form_decode(value));
    }

    params
}

/// Split on commas that are not inside double quotes
fn split_fields(input: &str) -> Vec<&str> {
    let mut fields = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;

    for (index, c) in input.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(&input[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    fields.push(&input[start..]);

    fields
}

fn is_oauth_name(name: &str) -> bool {
    name.strip_prefix("oauth_").is_some_and(|suffix| {
        suffix
            .chars()
            .all(|c| c.is_ascii_lowercase() || c == '_' || c == '-')
    })
}

/// Merge query parameters with header parameters; the header wins
pub fn collect_parameters(query: Option<&str>, authorization: Option<&str>) -> ParamMap {
    let mut params = query.map(parse_query).unwrap_or_default();
    if let Some(header) = authorization {
        params.merge(parse_authorization_header(header));
    }
    params
}

/// Required parameters that are absent or empty
pub fn missing_required(params: &ParamMap) -> Vec<&'static str> {
    REQUIRED_PARAMETERS
        .iter()
        .copied()
        .filter(|name| params.get(name).map_or(true, |value| value.is_empty()))
        .collect()
}
