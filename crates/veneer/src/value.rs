//! The style value model.
//!
//! Style definitions are nested key/value structures where a value is
//! either a scalar (string or number), a sequence of values, or a nested
//! mapping (used for pseudo-selector and at-rule blocks). Modeling this
//! as a tagged variant lets the merge and generation code dispatch on the
//! shape of a value instead of inspecting runtime types.

use crate::ordered::OrderedMap;

/// A single value inside a style definition.
#[derive(Debug, Clone, PartialEq)]
pub enum StyleValue {
    /// An explicitly null value. Stored as-is, never merged.
    Null,
    /// A string value, e.g. `"red"` or `"rotate(45deg)"`.
    Str(String),
    /// A numeric value. Stringified with a `px` suffix unless the
    /// property is registered as unit-less.
    Number(f64),
    /// Multiple values for one property, emitted as one declaration per
    /// element (used for vendor-prefixed value fallbacks).
    Sequence(Vec<StyleValue>),
    /// A nested style block, e.g. the body of a `:hover` entry.
    Mapping(OrderedMap),
}

impl StyleValue {
    pub fn is_mapping(&self) -> bool {
        matches!(self, StyleValue::Mapping(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            StyleValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&OrderedMap> {
        match self {
            StyleValue::Mapping(m) => Some(m),
            _ => None,
        }
    }

    /// Deterministic, JSON-shaped rendering of this value.
    ///
    /// Used as content-addressing input for hashing. The output follows
    /// insertion order for mappings, so content-equal definitions always
    /// serialize identically.
    pub fn canonical(&self) -> String {
        let mut out = String::new();
        self.write_canonical(&mut out);
        out
    }

    fn write_canonical(&self, out: &mut String) {
        match self {
            StyleValue::Null => out.push_str("null"),
            StyleValue::Str(s) => {
                out.push('"');
                for ch in s.chars() {
                    match ch {
                        '"' => out.push_str("\\\""),
                        '\\' => out.push_str("\\\\"),
                        _ => out.push(ch),
                    }
                }
                out.push('"');
            }
            StyleValue::Number(n) => out.push_str(&format_number(*n)),
            StyleValue::Sequence(items) => {
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    item.write_canonical(out);
                }
                out.push(']');
            }
            StyleValue::Mapping(map) => {
                out.push('{');
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    out.push('"');
                    out.push_str(key);
                    out.push_str("\":");
                    value.write_canonical(out);
                }
                out.push('}');
            }
        }
    }
}

/// Formats a number the way style output expects: integral values print
/// without a fractional part (`20`, not `20.0`).
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

impl From<&str> for StyleValue {
    fn from(s: &str) -> Self {
        StyleValue::Str(s.to_string())
    }
}

impl From<String> for StyleValue {
    fn from(s: String) -> Self {
        StyleValue::Str(s)
    }
}

impl From<f64> for StyleValue {
    fn from(n: f64) -> Self {
        StyleValue::Number(n)
    }
}

impl From<i32> for StyleValue {
    fn from(n: i32) -> Self {
        StyleValue::Number(n as f64)
    }
}

impl From<u32> for StyleValue {
    fn from(n: u32) -> Self {
        StyleValue::Number(n as f64)
    }
}

impl From<OrderedMap> for StyleValue {
    fn from(map: OrderedMap) -> Self {
        StyleValue::Mapping(map)
    }
}

impl<T: Into<StyleValue>> From<Vec<T>> for StyleValue {
    fn from(items: Vec<T>) -> Self {
        StyleValue::Sequence(items.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_is_ordered_and_json_shaped() {
        let mut inner = OrderedMap::new();
        inner.set("color", "blue", false);

        let mut map = OrderedMap::new();
        map.set("color", "red", false);
        map.set("zIndex", 3, false);
        map.set(":hover", inner, false);

        assert_eq!(
            StyleValue::from(map).canonical(),
            r#"{"color":"red","zIndex":3,":hover":{"color":"blue"}}"#
        );
    }

    #[test]
    fn numbers_drop_integral_fraction() {
        assert_eq!(format_number(20.0), "20");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(-3.0), "-3");
    }
}
