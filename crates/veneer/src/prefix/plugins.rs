//! Value-transform plugins for vendor prefixing.
//!
//! Each plugin inspects one property/value pair and may produce a
//! replacement value, a list of fallback values, or mutate sibling
//! properties (the legacy flexbox shims). Plugins run in a fixed
//! priority order; the first one to produce a result wins.

use phf::phf_map;

use crate::ordered::OrderedMap;
use crate::prefix::data::{PREFIX_MAP, Prefix};
use crate::util::{capitalize, kebabify};
use crate::value::{StyleValue, format_number};

/// The outcome of a plugin that handled a value.
#[derive(Debug, Clone, PartialEq)]
pub enum PluginResult {
    One(StyleValue),
    Many(Vec<StyleValue>),
}

impl PluginResult {
    pub fn into_value(self) -> StyleValue {
        match self {
            PluginResult::One(v) => v,
            PluginResult::Many(vs) => StyleValue::Sequence(vs),
        }
    }
}

/// A value-transform plugin. `style` is the surrounding declaration map,
/// which legacy shims mutate to add sibling properties.
pub type Plugin = fn(&str, &StyleValue, &mut OrderedMap) -> Option<PluginResult>;

/// All plugins, in priority order.
pub static PLUGINS: &[Plugin] = &[
    calc, cross_fade, cursor, filter, flex, flexbox_ie, flexbox_old, gradient, image_set,
    position, sizing, transition,
];

/// Runs the plugin chain; the first non-`None` result wins.
pub fn run_plugins(property: &str, value: &StyleValue, style: &mut OrderedMap) -> Option<PluginResult> {
    for plugin in PLUGINS {
        if let Some(result) = plugin(property, value, style) {
            return Some(result);
        }
    }
    None
}

fn is_prefixed_value(value: &str) -> bool {
    value.contains("-webkit-") || value.contains("-moz-") || value.contains("-ms-")
}

fn str_value(value: &StyleValue) -> Option<&str> {
    value.as_str()
}

/// String form of a scalar, for plugins that accept numbers too.
fn scalar_str(value: &StyleValue) -> Option<String> {
    match value {
        StyleValue::Str(s) => Some(s.clone()),
        StyleValue::Number(n) => Some(format_number(*n)),
        _ => None,
    }
}

fn many_str(values: impl IntoIterator<Item = String>) -> PluginResult {
    PluginResult::Many(values.into_iter().map(StyleValue::Str).collect())
}

/// Prefixes every occurrence of a function-like token, e.g. `calc(`.
fn prefix_function(value: &str, token: &str, prefixes: &[&str]) -> PluginResult {
    many_str(prefixes.iter().map(|p| {
        value.replace(token, &format!("{p}{token}"))
    }))
}

fn calc(_property: &str, value: &StyleValue, _style: &mut OrderedMap) -> Option<PluginResult> {
    let value = str_value(value)?;
    if !is_prefixed_value(value) && value.contains("calc(") {
        return Some(prefix_function(value, "calc(", &["-webkit-", "-moz-", ""]));
    }
    None
}

fn cross_fade(_property: &str, value: &StyleValue, _style: &mut OrderedMap) -> Option<PluginResult> {
    let value = str_value(value)?;
    if !is_prefixed_value(value) && value.contains("cross-fade(") {
        return Some(prefix_function(value, "cross-fade(", &["-webkit-", ""]));
    }
    None
}

fn cursor(property: &str, value: &StyleValue, _style: &mut OrderedMap) -> Option<PluginResult> {
    const CURSOR_VALUES: &[&str] = &["zoom-in", "zoom-out", "grab", "grabbing"];
    let value = str_value(value)?;
    if property == "cursor" && CURSOR_VALUES.contains(&value) {
        return Some(many_str(
            ["-webkit-", "-moz-", ""].iter().map(|p| format!("{p}{value}")),
        ));
    }
    None
}

fn filter(_property: &str, value: &StyleValue, _style: &mut OrderedMap) -> Option<PluginResult> {
    let value = str_value(value)?;
    if !is_prefixed_value(value) && value.contains("filter(") {
        return Some(prefix_function(value, "filter(", &["-webkit-", ""]));
    }
    None
}

static FLEX_VALUES: phf::Map<&'static str, &'static [&'static str]> = phf_map! {
    "flex" => &["-webkit-box", "-moz-box", "-ms-flexbox", "-webkit-flex", "flex"],
    "inline-flex" => &[
        "-webkit-inline-box",
        "-moz-inline-box",
        "-ms-inline-flexbox",
        "-webkit-inline-flex",
        "inline-flex",
    ],
};

fn flex(property: &str, value: &StyleValue, _style: &mut OrderedMap) -> Option<PluginResult> {
    let value = str_value(value)?;
    if property == "display" {
        if let Some(values) = FLEX_VALUES.get(value) {
            return Some(many_str(values.iter().map(|v| v.to_string())));
        }
    }
    None
}

static FLEXBOX_IE_PROPS: phf::Map<&'static str, &'static str> = phf_map! {
    "alignContent" => "msFlexLinePack",
    "alignSelf" => "msFlexItemAlign",
    "alignItems" => "msFlexAlign",
    "justifyContent" => "msFlexPack",
    "order" => "msFlexOrder",
    "flexGrow" => "msFlexPositive",
    "flexShrink" => "msFlexNegative",
    "flexBasis" => "msFlexPreferredSize",
};

static FLEXBOX_IE_VALUES: phf::Map<&'static str, &'static str> = phf_map! {
    "space-around" => "distribute",
    "space-between" => "justify",
    "flex-start" => "start",
    "flex-end" => "end",
};

static FLEX_SHORTHANDS: phf::Map<&'static str, &'static str> = phf_map! {
    "auto" => "1 1 auto",
    "inherit" => "inherit",
    "initial" => "0 1 auto",
    "none" => "0 0 auto",
    "unset" => "unset",
};

fn is_plain_number(s: &str) -> bool {
    !s.is_empty() && s.parse::<f64>().is_ok() && !s.contains(|c: char| c.is_ascii_alphabetic() || c == '%')
}

fn flexbox_ie(property: &str, value: &StyleValue, style: &mut OrderedMap) -> Option<PluginResult> {
    if let Some(alt) = FLEXBOX_IE_PROPS.get(property) {
        let raw = scalar_str(value)?;
        let mapped = FLEXBOX_IE_VALUES
            .get(raw.as_str())
            .map(|v| v.to_string())
            .unwrap_or(raw);
        style.set(*alt, mapped, false);
        return None;
    }

    if property == "flex" {
        let raw = scalar_str(value)?;
        if let Some(mapped) = FLEX_SHORTHANDS.get(raw.as_str()) {
            style.set("msFlex", *mapped, false);
            return None;
        }
        if is_plain_number(&raw) {
            style.set("msFlex", format!("{raw} 1 0%"), false);
            return None;
        }
        let parts: Vec<&str> = raw.split_whitespace().collect();
        let expanded = match parts.as_slice() {
            [single] => format!("1 1 {single}"),
            [grow, second] => {
                if is_plain_number(second) {
                    format!("{grow} {second} 0%")
                } else {
                    format!("{grow} 1 {second}")
                }
            }
            _ => raw,
        };
        style.set("msFlex", expanded, false);
    }
    None
}

static FLEXBOX_OLD_PROPS: phf::Map<&'static str, &'static str> = phf_map! {
    "alignItems" => "WebkitBoxAlign",
    "justifyContent" => "WebkitBoxPack",
    "flexWrap" => "WebkitBoxLines",
    "flexGrow" => "WebkitBoxFlex",
};

static FLEXBOX_OLD_VALUES: phf::Map<&'static str, &'static str> = phf_map! {
    "space-around" => "justify",
    "space-between" => "justify",
    "flex-start" => "start",
    "flex-end" => "end",
    "wrap-reverse" => "multiple",
    "wrap" => "multiple",
};

fn flexbox_old(property: &str, value: &StyleValue, style: &mut OrderedMap) -> Option<PluginResult> {
    if property == "flexDirection" {
        if let Some(direction) = str_value(value) {
            let orient = if direction.contains("column") { "vertical" } else { "horizontal" };
            let box_direction = if direction.contains("reverse") { "reverse" } else { "normal" };
            style.set("WebkitBoxOrient", orient, false);
            style.set("WebkitBoxDirection", box_direction, false);
        }
    }
    if let Some(alt) = FLEXBOX_OLD_PROPS.get(property) {
        if let Some(raw) = scalar_str(value) {
            let mapped = FLEXBOX_OLD_VALUES
                .get(raw.as_str())
                .map(|v| v.to_string())
                .unwrap_or(raw);
            style.set(*alt, mapped, false);
        }
    }
    None
}

const GRADIENT_NAMES: &[&str] = &[
    "repeating-linear-gradient",
    "repeating-radial-gradient",
    "linear-gradient",
    "radial-gradient",
];

fn contains_gradient(value: &str) -> bool {
    GRADIENT_NAMES.iter().any(|name| value.contains(name))
}

/// Prefixes every gradient function in the value, matching the longest
/// name first so `repeating-linear-gradient` is not split apart.
fn prefix_gradients(value: &str, prefix: &str) -> String {
    let mut out = String::with_capacity(value.len() + 16);
    let mut rest = value;
    loop {
        let next = GRADIENT_NAMES
            .iter()
            .filter_map(|name| rest.find(name).map(|i| (i, *name)))
            .min_by_key(|(i, name)| (*i, std::cmp::Reverse(name.len())));
        match next {
            Some((index, name)) => {
                out.push_str(&rest[..index]);
                out.push_str(prefix);
                out.push_str(name);
                rest = &rest[index + name.len()..];
            }
            None => {
                out.push_str(rest);
                return out;
            }
        }
    }
}

fn gradient(_property: &str, value: &StyleValue, _style: &mut OrderedMap) -> Option<PluginResult> {
    let value = str_value(value)?;
    if !is_prefixed_value(value) && contains_gradient(value) {
        return Some(many_str(
            ["-webkit-", "-moz-", ""].iter().map(|p| prefix_gradients(value, p)),
        ));
    }
    None
}

fn image_set(_property: &str, value: &StyleValue, _style: &mut OrderedMap) -> Option<PluginResult> {
    let value = str_value(value)?;
    if !is_prefixed_value(value) && value.contains("image-set(") {
        return Some(prefix_function(value, "image-set(", &["-webkit-", ""]));
    }
    None
}

fn position(property: &str, value: &StyleValue, _style: &mut OrderedMap) -> Option<PluginResult> {
    if property == "position" && str_value(value) == Some("sticky") {
        return Some(many_str(["-webkit-sticky".to_string(), "sticky".to_string()]));
    }
    None
}

const SIZING_PROPERTIES: &[&str] = &[
    "maxHeight", "maxWidth", "width", "height", "columnWidth", "minWidth", "minHeight",
];
const SIZING_VALUES: &[&str] = &[
    "min-content", "max-content", "fill-available", "fit-content", "contain-floats",
];

fn sizing(property: &str, value: &StyleValue, _style: &mut OrderedMap) -> Option<PluginResult> {
    let value = str_value(value)?;
    if SIZING_PROPERTIES.contains(&property) && SIZING_VALUES.contains(&value) {
        return Some(many_str(
            ["-webkit-", "-moz-", ""].iter().map(|p| format!("{p}{value}")),
        ));
    }
    None
}

const TRANSITION_PROPERTIES: &[&str] = &[
    "transition",
    "transitionProperty",
    "WebkitTransition",
    "WebkitTransitionProperty",
    "MozTransition",
    "MozTransitionProperty",
];

/// Splits on commas that are not nested inside parentheses, so
/// cubic-bezier arguments stay intact.
fn split_top_level_commas(value: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (i, ch) in value.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&value[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&value[start..]);
    parts
}

/// Expands prefixable property names inside a transition value, e.g.
/// `transform 1s` gains `-webkit-transform 1s` fallbacks.
fn transition_prefix_value(value: &str) -> String {
    if is_prefixed_value(value) {
        return value.to_string();
    }

    let mut expanded = Vec::new();
    for single in split_top_level_commas(value) {
        let mut values = vec![single.to_string()];
        for (property, prefixes) in PREFIX_MAP.entries() {
            let dashed = kebabify(property);
            if dashed != "order" && single.contains(&dashed) {
                for prefix in prefixes.iter() {
                    values.insert(
                        0,
                        single.replace(&dashed, &format!("{}{dashed}", prefix.as_dashed())),
                    );
                }
            }
        }
        expanded.push(values.join(","));
    }
    expanded.join(",")
}

fn without_prefixes(value: &str, excluded: &[Prefix]) -> String {
    split_top_level_commas(value)
        .into_iter()
        .filter(|v| !excluded.iter().any(|p| v.contains(p.as_dashed())))
        .collect::<Vec<_>>()
        .join(",")
}

fn transition(property: &str, value: &StyleValue, style: &mut OrderedMap) -> Option<PluginResult> {
    let value = str_value(value)?;
    if !TRANSITION_PROPERTIES.contains(&property) {
        return None;
    }

    let output = transition_prefix_value(value);
    let webkit_output = without_prefixes(&output, &[Prefix::Moz, Prefix::Ms]);
    if property.contains("Webkit") {
        return Some(PluginResult::One(StyleValue::Str(webkit_output)));
    }

    let moz_output = without_prefixes(&output, &[Prefix::Webkit, Prefix::Ms]);
    if property.contains("Moz") {
        return Some(PluginResult::One(StyleValue::Str(moz_output)));
    }

    style.set(format!("Webkit{}", capitalize(property)), webkit_output, false);
    style.set(format!("Moz{}", capitalize(property)), moz_output, false);
    Some(PluginResult::One(StyleValue::Str(output)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(property: &str, value: &str) -> (Option<PluginResult>, OrderedMap) {
        let mut style = OrderedMap::new();
        let result = run_plugins(property, &StyleValue::from(value), &mut style);
        (result, style)
    }

    #[test]
    fn calc_produces_prefixed_fallbacks() {
        let (result, _) = run("width", "calc(100% - 10px)");
        assert_eq!(
            result,
            Some(PluginResult::Many(vec![
                StyleValue::Str("-webkit-calc(100% - 10px)".into()),
                StyleValue::Str("-moz-calc(100% - 10px)".into()),
                StyleValue::Str("calc(100% - 10px)".into()),
            ]))
        );
    }

    #[test]
    fn display_flex_expands() {
        let (result, _) = run("display", "flex");
        let Some(PluginResult::Many(values)) = result else {
            panic!("expected expansion");
        };
        assert_eq!(values.len(), 5);
        assert_eq!(values[0], StyleValue::Str("-webkit-box".into()));
        assert_eq!(values[4], StyleValue::Str("flex".into()));
    }

    #[test]
    fn sticky_position_gets_webkit_fallback() {
        let (result, _) = run("position", "sticky");
        assert_eq!(
            result,
            Some(PluginResult::Many(vec![
                StyleValue::Str("-webkit-sticky".into()),
                StyleValue::Str("sticky".into()),
            ]))
        );
    }

    #[test]
    fn flex_direction_adds_old_flexbox_siblings() {
        let (result, style) = run("flexDirection", "column-reverse");
        assert!(result.is_none());
        assert_eq!(style.get("WebkitBoxOrient"), Some(&StyleValue::Str("vertical".into())));
        assert_eq!(style.get("WebkitBoxDirection"), Some(&StyleValue::Str("reverse".into())));
    }

    #[test]
    fn flex_shorthand_maps_to_ms_flex() {
        let mut style = OrderedMap::new();
        run_plugins("flex", &StyleValue::Number(1.0), &mut style);
        assert_eq!(style.get("msFlex"), Some(&StyleValue::Str("1 1 0%".into())));
    }

    #[test]
    fn gradients_are_prefixed_without_splitting_repeating() {
        let (result, _) = run("background", "repeating-linear-gradient(red, blue)");
        let Some(PluginResult::Many(values)) = result else {
            panic!("expected expansion");
        };
        assert_eq!(
            values[0],
            StyleValue::Str("-webkit-repeating-linear-gradient(red, blue)".into())
        );
        assert_eq!(
            values[2],
            StyleValue::Str("repeating-linear-gradient(red, blue)".into())
        );
    }

    #[test]
    fn transition_expands_prefixable_inner_properties() {
        let mut style = OrderedMap::new();
        let result = run_plugins(
            "transition",
            &StyleValue::from("transform 200ms ease"),
            &mut style,
        );
        let Some(PluginResult::One(StyleValue::Str(output))) = result else {
            panic!("expected a combined value");
        };
        assert!(output.contains("-webkit-transform 200ms ease"));
        assert!(output.ends_with("transform 200ms ease"));

        let webkit = style.get("WebkitTransition").and_then(StyleValue::as_str).unwrap();
        assert!(!webkit.contains("-ms-"));
        assert!(webkit.contains("-webkit-transform"));
    }

    #[test]
    fn commas_inside_parens_are_not_split() {
        let parts = split_top_level_commas("margin 1s cubic-bezier(0.1, 0.7, 1.0), padding 2s");
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[1].trim(), "padding 2s");
    }
}
