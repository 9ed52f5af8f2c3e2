//! Canonical parameter encoding for the signing base string

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use super::params::ParamValue;
use super::signature::RejectReason;

/// Everything except RFC 3986 unreserved characters
const RFC3986: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encode per RFC 3986 (spaces become `%20`, never `+`)
pub fn rfc3986_encode(input: &str) -> String {
    utf8_percent_encode(input, RFC3986).to_string()
}

/// Order top-level parameters by key, comparing raw bytes
///
/// Duplicate keys have no total order that is independent of input order,
/// so such a set is rejected.
pub fn sort_parameters(
    mut params: Vec<(String, ParamValue)>,
) -> Result<Vec<(String, ParamValue)>, RejectReason> {
    params.sort_by(|(a, _), (b, _)| a.as_bytes().cmp(b.as_bytes()));

    if params.windows(2).any(|pair| pair[0].0 == pair[1].0) {
        return Err(RejectReason::UnsortableParameters);
    }

    Ok(params)
}

/// Encode top-level keys and every scalar value
///
/// Keys of nested mappings are kept as-is; they are folded into the parent
/// key by [`join_with_equals_sign`].
pub fn normalize_parameters(params: &[(String, ParamValue)]) -> Vec<(String, ParamValue)> {
    params
        .iter()
        .map(|(key, value)| (rfc3986_encode(key), encode_value(value)))
        .collect()
}

fn encode_value(value: &ParamValue) -> ParamValue {
    match value {
        ParamValue::Scalar(scalar) => ParamValue::Scalar(rfc3986_encode(scalar)),
        ParamValue::Nested(children) => ParamValue::Nested(
            children
                .iter()
                .map(|(key, child)| (key.clone(), encode_value(child)))
                .collect(),
        ),
    }
}

/// Flatten parameters into encoded `key=value` strings
///
/// Nested values produce `parent%5Bchild%5D=value`. Each joined pair is
/// percent-encoded once more, so the `=` becomes `%3D`.
pub fn join_with_equals_sign(params: &[(String, ParamValue)], parent: Option<&str>) -> Vec<String> {
    params
        .iter()
        .flat_map(|(key, value)| {
            let key = match parent {
                Some(parent) => format!("{parent}%5B{key}%5D"),
                None => key.clone(),
            };

            match value {
                ParamValue::Scalar(scalar) => vec![rfc3986_encode(&format!("{key}={scalar}"))],
                ParamValue::Nested(children) => join_with_equals_sign(children, Some(&key)),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scalar(key: &str, value: &str) -> (String, ParamValue) {
        (key.to_string(), ParamValue::from(value))
    }

    #[test]
    fn test_rfc3986_unreserved_untouched() {
        assert_eq!(rfc3986_encode("AZaz09-._~"), "AZaz09-._~");
    }

    #[test]
    fn test_rfc3986_reserved_encoded() {
        assert_eq!(rfc3986_encode("a b+c&d=e/f"), "a%20b%2Bc%26d%3De%2Ff");
        assert_eq!(rfc3986_encode("é"), "%C3%A9");
        assert_eq!(rfc3986_encode("100%"), "100%25");
    }

    #[test]
    fn test_sort_is_bytewise() {
        let sorted = sort_parameters(vec![
            scalar("b", "1"),
            scalar("a", "2"),
            scalar("B", "3"),
            scalar("a_", "4"),
        ])
        .unwrap();
        let keys: Vec<_> = sorted.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["B", "a", "a_", "b"]);
    }

    #[test]
    fn test_sort_rejects_duplicate_keys() {
        let result = sort_parameters(vec![scalar("a", "1"), scalar("a", "2")]);
        assert_eq!(result, Err(RejectReason::UnsortableParameters));
    }

    #[test]
    fn test_normalize_keeps_nested_keys() {
        let params = vec![(
            "filter by".to_string(),
            ParamValue::Nested(vec![scalar("tag name", "a&b")]),
        )];
        let normalized = normalize_parameters(&params);
        assert_eq!(
            normalized,
            vec![(
                "filter%20by".to_string(),
                ParamValue::Nested(vec![scalar("tag name", "a%26b")]),
            )]
        );
    }

    #[test]
    fn test_join_flattens_nested_values() {
        let params = vec![
            (
                "filter".to_string(),
                ParamValue::Nested(vec![
                    scalar("status", "on%20hold"),
                    (
                        "range".to_string(),
                        ParamValue::Nested(vec![scalar("min", "1")]),
                    ),
                ]),
            ),
            scalar("page", "2"),
        ];

        assert_eq!(
            join_with_equals_sign(&params, None),
            vec![
                "filter%255Bstatus%255D%3Don%2520hold",
                "filter%255Brange%255D%255Bmin%255D%3D1",
                "page%3D2",
            ]
        );
    }
}
