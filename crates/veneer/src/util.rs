//! Hashing and CSS text helpers.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use phf::phf_set;

use crate::value::{StyleValue, format_number};

/// djb2-xor string hash, folded from the last character to the first.
pub fn string_hash(s: &str) -> u32 {
    let mut hash: u32 = 5381;
    for &byte in s.as_bytes().iter().rev() {
        hash = hash.wrapping_mul(33) ^ u32::from(byte);
    }
    hash
}

/// Hashes a string into a short base-36 identifier.
pub fn hash_string(s: &str) -> String {
    to_base36(string_hash(s))
}

pub fn to_base36(mut n: u32) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while n > 0 {
        let digit = (n % 36) as u32;
        digits.push(char::from_digit(digit, 36).unwrap_or('0'));
        n /= 36;
    }
    digits.iter().rev().collect()
}

/// Converts a camelCase style name to its kebab-case CSS form.
///
/// A leading `ms` vendor prefix gains a leading hyphen (`msTransform`
/// becomes `-ms-transform`), matching vendor convention.
pub fn kebabify(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for ch in name.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    if out.starts_with("ms-") {
        out.insert(0, '-');
    }
    out
}

pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// CSS properties which accept numbers but are not in units of "px".
static UNITLESS_BASE: phf::Set<&'static str> = phf_set! {
    "animationIterationCount",
    "borderImageOutset",
    "borderImageSlice",
    "borderImageWidth",
    "boxFlex",
    "boxFlexGroup",
    "boxOrdinalGroup",
    "columnCount",
    "flex",
    "flexGrow",
    "flexPositive",
    "flexShrink",
    "flexNegative",
    "flexOrder",
    "gridRow",
    "gridColumn",
    "fontWeight",
    "lineClamp",
    "lineHeight",
    "opacity",
    "order",
    "orphans",
    "tabSize",
    "widows",
    "zIndex",
    "zoom",
    // SVG-related properties
    "fillOpacity",
    "floodOpacity",
    "stopOpacity",
    "strokeDasharray",
    "strokeDashoffset",
    "strokeMiterlimit",
    "strokeOpacity",
    "strokeWidth",
};

/// The base set plus every vendor-prefixed permutation, built once at
/// first use.
static UNITLESS: Lazy<HashSet<String>> = Lazy::new(|| {
    let mut set: HashSet<String> = UNITLESS_BASE.iter().map(|s| s.to_string()).collect();
    for prop in UNITLESS_BASE.iter() {
        for prefix in ["Webkit", "ms", "Moz", "O"] {
            set.insert(format!("{prefix}{}", capitalize(prop)));
        }
    }
    set
});

pub fn is_unitless(property: &str) -> bool {
    UNITLESS.contains(property)
}

/// Stringifies a single declaration value. Numbers are suffixed with
/// `px` unless the property is unit-less; everything else stringifies
/// as-is.
pub fn stringify_value(property: &str, value: &StyleValue) -> String {
    match value {
        StyleValue::Number(n) => {
            if is_unitless(property) {
                format_number(*n)
            } else {
                format!("{}px", format_number(*n))
            }
        }
        StyleValue::Str(s) => s.clone(),
        StyleValue::Null => "null".to_string(),
        StyleValue::Sequence(items) => items
            .iter()
            .map(|v| stringify_value(property, v))
            .collect::<Vec<_>>()
            .join(","),
        StyleValue::Mapping(_) => value.canonical(),
    }
}

/// Appends ` !important` to a declaration value, unless it already ends
/// with it. The byte probe 10 characters from the end skips the full
/// suffix comparison in the common case.
pub fn importantify(value: String) -> String {
    let bytes = value.as_bytes();
    if bytes.len() >= 11
        && bytes[bytes.len() - 10] == b'!'
        && value.ends_with(" !important")
    {
        return value;
    }
    value + " !important"
}

pub fn stringify_and_importantify(property: &str, value: &StyleValue) -> String {
    importantify(stringify_value(property, value))
}
