//! Minimal character-reference decoding: a small named-entity table plus
//! well-formed, semicolon-terminated numeric references. Anything else
//! (unknown names, missing semicolons, malformed numerics, references to
//! invalid Unicode scalar values) passes through unchanged. Not HTML5-spec
//! complete by design — the tokenizer that calls this is a pragmatic
//! tag-soup parser, not a conformance suite.

fn named_entity(name: &str) -> Option<&'static str> {
    Some(match name {
        "amp" => "&",
        "lt" => "<",
        "gt" => ">",
        "quot" => "\"",
        "apos" => "'",
        "nbsp" => "\u{a0}",
        "copy" => "\u{a9}",
        "reg" => "\u{ae}",
        "mdash" => "\u{2014}",
        "ndash" => "\u{2013}",
        "hellip" => "\u{2026}",
        "trade" => "\u{2122}",
        "laquo" => "\u{ab}",
        "raquo" => "\u{bb}",
        "middot" => "\u{b7}",
        "eacute" => "\u{e9}",
        "egrave" => "\u{e8}",
        "agrave" => "\u{e0}",
        "ccedil" => "\u{e7}",
        "euro" => "\u{20ac}",
        _ => return None,
    })
}

/// Decode character references in `input`, returning a borrowed slice when
/// nothing changed so callers (the tokenizer) avoid allocating per run of
/// plain text.
pub fn decode_entities(input: &str) -> std::borrow::Cow<'_, str> {
    if !input.contains('&') {
        return std::borrow::Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let bytes = input.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'&' {
            // Advance by one char (not one byte) to stay on UTF-8 boundaries.
            let ch_len = input[i..].chars().next().map(|c| c.len_utf8()).unwrap_or(1);
            out.push_str(&input[i..i + ch_len]);
            i += ch_len;
            continue;
        }

        if let Some((decoded, consumed)) = decode_one(&input[i..]) {
            out.push_str(&decoded);
            i += consumed;
        } else {
            out.push('&');
            i += 1;
        }
    }
    std::borrow::Cow::Owned(out)
}

/// Attempt to decode a single reference starting at `s[0] == '&'`. Returns
/// the decoded text and the number of bytes consumed from `s`.
fn decode_one(s: &str) -> Option<(String, usize)> {
    let rest = &s[1..];
    if let Some(numeric) = rest.strip_prefix('#') {
        let (is_hex, digits_start) = if numeric.starts_with(['x', 'X']) {
            (true, 1)
        } else {
            (false, 0)
        };
        let digits = &numeric[digits_start..];
        let end = digits
            .find(|c: char| !c.is_ascii_hexdigit())
            .unwrap_or(digits.len());
        if end == 0 {
            return None;
        }
        let (num_str, after) = digits.split_at(end);
        if !after.starts_with(';') {
            return None;
        }
        let value = if is_hex {
            u32::from_str_radix(num_str, 16).ok()?
        } else {
            num_str.parse::<u32>().ok()?
        };
        let ch = char::from_u32(value)?;
        let consumed = 1 + 1 + digits_start + end + 1;
        return Some((ch.to_string(), consumed));
    }

    let end = rest.find(|c: char| !c.is_ascii_alphanumeric())?;
    if end == 0 || rest.as_bytes().get(end) != Some(&b';') {
        return None;
    }
    let name = &rest[..end];
    let decoded = named_entity(name)?;
    Some((decoded.to_string(), 1 + end + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_named_and_numeric() {
        assert_eq!(decode_entities("a &amp; b"), "a & b");
        assert_eq!(decode_entities("&#65;&#x42;"), "AB");
    }

    #[test]
    fn leaves_malformed_references_alone() {
        assert_eq!(decode_entities("a & b"), "a & b");
        assert_eq!(decode_entities("&unknown;"), "&unknown;");
        assert_eq!(decode_entities("&amp b"), "&amp b");
    }

    #[test]
    fn borrows_when_no_ampersand() {
        assert!(matches!(decode_entities("plain"), std::borrow::Cow::Borrowed(_)));
    }
}
