//! Values of number, character and escape tokens.

use crate::parser::cst::SyntaxKind;

/// Integer value of a number token. Values beyond `i128` saturate.
pub(crate) fn integer_value(kind: SyntaxKind, text: &str) -> i128 {
    let (digits, radix) = match kind {
        SyntaxKind::HexInteger => (&text[2..], 16),
        SyntaxKind::OctalInteger => (&text[2..], 8),
        SyntaxKind::BinaryInteger => (&text[2..], 2),
        _ => (text, 10),
    };
    digits
        .chars()
        .filter_map(|c| c.to_digit(radix))
        .fold(0i128, |acc, d| {
            acc.saturating_mul(i128::from(radix))
                .saturating_add(i128::from(d))
        })
}

pub(crate) fn float_value(text: &str) -> f64 {
    let cleaned: String = text.chars().filter(|&c| c != '_').collect();
    cleaned.parse().unwrap_or(f64::INFINITY)
}

/// Codepoint of `?a` or `?\n`.
pub(crate) fn char_value(text: &str) -> u32 {
    let body = &text[1..];
    let decoded;
    let value = if body.starts_with('\\') && body.len() > 1 {
        decoded = unescape(body);
        decoded.chars().next()
    } else {
        body.chars().next()
    };
    value.map_or(0, u32::from)
}

/// Decodes one escape sequence as found in an interpolating body.
pub(crate) fn unescape(escape: &str) -> String {
    let Some(rest) = escape.strip_prefix('\\') else {
        return escape.to_string();
    };
    let mut chars = rest.chars();
    let Some(c) = chars.next() else {
        return String::new();
    };
    let simple = match c {
        '0' => '\0',
        'a' => '\u{7}',
        'b' => '\u{8}',
        'd' => '\u{7f}',
        'e' => '\u{1b}',
        'f' => '\u{c}',
        'n' => '\n',
        'r' => '\r',
        's' => ' ',
        't' => '\t',
        'v' => '\u{b}',
        // Line continuation
        '\n' | '\r' => return String::new(),
        'x' | 'u' => return hex_escape(c, chars.as_str()),
        other => other,
    };
    simple.to_string()
}

/// `\x41`, `\x{41}`, `\u00e9`, `\u{1F600}`. Invalid code points decode to U+FFFD.
fn hex_escape(marker: char, digits: &str) -> String {
    let hex = digits
        .strip_prefix('{')
        .and_then(|d| d.strip_suffix('}'))
        .unwrap_or(digits);
    if hex.is_empty() {
        return marker.to_string();
    }
    u32::from_str_radix(hex, 16)
        .ok()
        .and_then(char::from_u32)
        .unwrap_or(char::REPLACEMENT_CHARACTER)
        .to_string()
}
