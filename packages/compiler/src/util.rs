//! Common utility functions shared across the code generators.

use once_cell::sync::Lazy;
use regex::Regex;

static DASH_CASE_REGEXP: Lazy<Regex> = Lazy::new(|| Regex::new(r"-+([a-z0-9])").unwrap());
static LEGAL_IDENTIFIER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z_$][0-9a-zA-Z_$]*$").unwrap());

/// Convert dash-case to camelCase.
pub fn dash_case_to_camel_case(input: &str) -> String {
    DASH_CASE_REGEXP
        .replace_all(input, |caps: &regex::Captures| {
            caps.get(1).unwrap().as_str().to_uppercase()
        })
        .to_string()
}

/// Uppercase the first character, leaving the rest untouched.
pub fn capitalize(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Whether `input` can be emitted verbatim as a JS identifier.
pub fn is_legal_identifier(input: &str) -> bool {
    LEGAL_IDENTIFIER_RE.is_match(input)
}

/// Quote a string as a JS single-quoted literal.
pub fn quote_string(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len() + 2);
    escaped.push('\'');
    for ch in input.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '\'' => escaped.push_str("\\'"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            _ => escaped.push(ch),
        }
    }
    escaped.push('\'');
    escaped
}

/// Quote a string literal if it is not already a legal identifier,
/// for use as a JS object key.
pub fn quote_object_key(input: &str) -> String {
    if is_legal_identifier(input) {
        input.to_string()
    } else {
        quote_string(input)
    }
}

/// Render a property access, falling back to bracket syntax for keys
/// that are not legal identifiers.
pub fn property_access(object: &str, key: &str) -> String {
    if is_legal_identifier(key) {
        format!("{}.{}", object, key)
    } else {
        format!("{}[{}]", object, quote_string(key))
    }
}

/// UTF-8 encode a string through UTF-16 code units, decoding surrogate
/// pairs the way JS `charCodeAt` consumers do. Source-map base64 payloads
/// must byte-match what JS tooling produces.
pub fn utf8_encode(input: &str) -> Vec<u8> {
    let mut encoded = Vec::new();
    let utf16: Vec<u16> = input.encode_utf16().collect();
    let mut index = 0;

    while index < utf16.len() {
        let mut code_point = utf16[index] as u32;

        if (0xD800..=0xDBFF).contains(&code_point) && index + 1 < utf16.len() {
            let low = utf16[index + 1] as u32;
            if (0xDC00..=0xDFFF).contains(&low) {
                index += 1;
                code_point = ((code_point - 0xD800) << 10) + low - 0xDC00 + 0x10000;
            }
        }

        if code_point <= 0x7f {
            encoded.push(code_point as u8);
        } else if code_point <= 0x7ff {
            encoded.push(((code_point >> 6) & 0x1f | 0xc0) as u8);
            encoded.push((code_point & 0x3f | 0x80) as u8);
        } else if code_point <= 0xffff {
            encoded.push((code_point >> 12 | 0xe0) as u8);
            encoded.push(((code_point >> 6) & 0x3f | 0x80) as u8);
            encoded.push((code_point & 0x3f | 0x80) as u8);
        } else if code_point <= 0x1fffff {
            encoded.push(((code_point >> 18) & 0x07 | 0xf0) as u8);
            encoded.push(((code_point >> 12) & 0x3f | 0x80) as u8);
            encoded.push(((code_point >> 6) & 0x3f | 0x80) as u8);
            encoded.push((code_point & 0x3f | 0x80) as u8);
        }

        index += 1;
    }

    encoded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dash_case_conversion() {
        assert_eq!(dash_case_to_camel_case("my-sub-component"), "mySubComponent");
    }

    #[test]
    fn quoting() {
        assert_eq!(quote_string("it's"), "'it\\'s'");
        assert_eq!(quote_object_key("foo"), "foo");
        assert_eq!(quote_object_key("foo-bar"), "'foo-bar'");
        assert_eq!(property_access("host.props", "a-b"), "host.props['a-b']");
    }
}
