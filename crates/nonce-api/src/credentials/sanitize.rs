//! Text field sanitization applied to consumer keys before hashing

/// Clean untrusted single-line text
///
/// Removes HTML tags (dropping `<script>`/`<style>` bodies entirely),
/// collapses runs of whitespace and line breaks to one space, trims, then
/// strips percent-encoded octets such as `%0a`.
pub fn sanitize_text_field(input: &str) -> String {
    let mut text = if input.contains('<') {
        strip_tags(input)
    } else {
        input.to_string()
    };

    text = collapse_whitespace(&text, |c| matches!(c, '\r' | '\n' | '\t' | ' '));
    text = trim(&text).to_string();

    let (stripped, found) = strip_octets(&text);
    if found {
        text = collapse_whitespace(&stripped, |c| c == ' ');
        text = trim(&text).to_string();
    }

    text
}

fn trim(text: &str) -> &str {
    text.trim_matches(|c| matches!(c, ' ' | '\t' | '\n' | '\r' | '\0' | '\x0B'))
}

fn collapse_whitespace(text: &str, is_space: impl Fn(char) -> bool) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_run = false;
    for c in text.chars() {
        if is_space(c) {
            if !in_run {
                out.push(' ');
            }
            in_run = true;
        } else {
            out.push(c);
            in_run = false;
        }
    }
    out
}

/// Remove `%xx` hex octets until none remain
fn strip_octets(text: &str) -> (String, bool) {
    let mut current = text.to_string();
    let mut found = false;

    loop {
        let bytes = current.as_bytes();
        let mut out = Vec::with_capacity(bytes.len());
        let mut changed = false;
        let mut i = 0;

        while i < bytes.len() {
            if bytes[i] == b'%'
                && i + 2 < bytes.len()
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit()
            {
                i += 3;
                changed = true;
            } else {
                out.push(bytes[i]);
                i += 1;
            }
        }

        if !changed {
            return (current, found);
        }
        found = true;
        current = String::from_utf8_lossy(&out).into_owned();
    }
}

fn strip_tags(input: &str) -> String {
    let without_blocks = strip_blocks(input, "script");
    let without_blocks = strip_blocks(&without_blocks, "style");

    let mut out = String::with_capacity(without_blocks.len());
    let mut rest = without_blocks.as_str();

    while let Some(open) = rest.find('<') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let starts_tag = after
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || matches!(c, '/' | '!' | '?'));

        if !starts_tag {
            out.push_str("&lt;");
            rest = after;
            continue;
        }

        match after.find('>') {
            Some(close) => rest = &after[close + 1..],
            None => rest = "",
        }
    }
    out.push_str(rest);

    out
}

/// Drop `<name ...>...</name>` blocks, matching the name case-insensitively
fn strip_blocks(input: &str, name: &str) -> String {
    let lower = input.to_ascii_lowercase();
    let open_tag = format!("<{name}");
    let close_tag = format!("</{name}>");

    let mut out = String::with_capacity(input.len());
    let mut cursor = 0;

    while let Some(start) = lower[cursor..].find(&open_tag).map(|i| i + cursor) {
        let Some(end) = lower[start..].find(&close_tag).map(|i| i + start) else {
            break;
        };
        out.push_str(&input[cursor..start]);
        cursor = end + close_tag.len();
    }
    out.push_str(&input[cursor..]);

    out
}
