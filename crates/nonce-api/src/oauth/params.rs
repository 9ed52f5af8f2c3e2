//! Request parameter model
//!
//! Query strings may carry nested values using bracket syntax
//! (`filter[status]=pending`), so a parameter is either a scalar string or an
//! ordered mapping of child parameters.

use percent_encoding::percent_decode_str;

/// A single parameter value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Scalar(String),
    Nested(Vec<(String, ParamValue)>),
}

impl ParamValue {
    /// Scalar value, if this is one
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            ParamValue::Scalar(value) => Some(value),
            ParamValue::Nested(_) => None,
        }
    }

    /// Empty string or empty mapping
    pub fn is_empty(&self) -> bool {
        match self {
            ParamValue::Scalar(value) => value.is_empty(),
            ParamValue::Nested(children) => children.is_empty(),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Scalar(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Scalar(value)
    }
}

/// Top-level parameters in insertion order, with unique keys
///
/// Inserting an existing key replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamMap {
    entries: Vec<(String, ParamValue)>,
}

impl ParamMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a parameter
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        upsert(&mut self.entries, key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Scalar value of a parameter, if present and not nested
    pub fn get_scalar(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(ParamValue::as_scalar)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn remove(&mut self, key: &str) -> Option<ParamValue> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    /// Merge `other` into `self`; values from `other` win
    pub fn merge(&mut self, other: ParamMap) {
        for (key, value) in other.entries {
            upsert(&mut self.entries, key, value);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn into_pairs(self) -> Vec<(String, ParamValue)> {
        self.entries
    }
}

impl<K, V> FromIterator<(K, V)> for ParamMap
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = ParamMap::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

fn upsert(entries: &mut Vec<(String, ParamValue)>, key: String, value: ParamValue) {
    match entries.iter_mut().find(|(k, _)| *k == key) {
        Some(entry) => entry.1 = value,
        None => entries.push((key, value)),
    }
}

/// Parse a URL query string the way form handlers do
///
/// `+` decodes to a space, later keys replace earlier ones, and bracketed
/// names build nested values: `a[b]=1` nests `b` under `a`, `a[]=1` appends
/// with the next numeric index. Names that start with `[` are dropped.
/// Dots and spaces in names are kept as sent.
pub fn parse_query(query: &str) -> ParamMap {
    let mut entries = Vec::new();

    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (raw_name, raw_value) = pair.split_once('=').unwrap_or((pair, ""));
        let name = form_decode(raw_name);
        let value = form_decode(raw_value);

        let Some((base, path)) = split_bracket_name(&name) else {
            continue;
        };
        insert_path(&mut entries, base, &path, value);
    }

    ParamMap { entries }
}

/// Decode `application/x-www-form-urlencoded` text
pub(crate) fn form_decode(input: &str) -> String {
    let spaced = input.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

/// Split `a[b][c]` into `("a", ["b", "c"])`
fn split_bracket_name(name: &str) -> Option<(String, Vec<String>)> {
    let Some(open) = name.find('[') else {
        return (!name.is_empty()).then(|| (name.to_string(), Vec::new()));
    };

    let base = &name[..open];
    if base.is_empty() {
        return None;
    }

    let mut path = Vec::new();
    let mut rest = &name[open..];
    while let Some(inner) = rest.strip_prefix('[') {
        match inner.find(']') {
            Some(close) => {
                path.push(inner[..close].to_string());
                rest = &inner[close + 1..];
            }
            None => break,
        }
    }

    // An unterminated bracket makes the whole name literal
    if path.is_empty() {
        return Some((name.to_string(), Vec::new()));
    }

    Some((base.to_string(), path))
}

fn insert_path(entries: &mut Vec<(String, ParamValue)>, key: String, path: &[String], value: String) {
    let key = if key.is_empty() {
        next_index(entries)
    } else {
        key
    };

    let Some((next, rest)) = path.split_first() else {
        upsert(entries, key, ParamValue::Scalar(value));
        return;
    };

    let position = match entries.iter().position(|(k, _)| *k == key) {
        Some(position) => position,
        None => {
            entries.push((key, ParamValue::Nested(Vec::new())));
            entries.len() - 1
        }
    };

    let slot = &mut entries[position].1;
    if !matches!(slot, ParamValue::Nested(_)) {
        *slot = ParamValue::Nested(Vec::new());
    }
    if let ParamValue::Nested(children) = slot {
        insert_path(children, next.clone(), rest, value);
    }
}

fn next_index(entries: &[(String, ParamValue)]) -> String {
    entries
        .iter()
        .filter_map(|(k, _)| k.parse::<u64>().ok())
        .max()
        .map_or(0, |max| max + 1)
        .to_string()
}
