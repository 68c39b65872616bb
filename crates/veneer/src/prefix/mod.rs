//! Vendor-prefix expansion.
//!
//! Expands a flat property/value map into one that additionally carries
//! vendor-prefixed variants: value plugins rewrite or fan out individual
//! values, and the static property database duplicates declarations under
//! prefixed property names (`transform` also emits `WebkitTransform` and
//! `msTransform`). Newly introduced keys are appended here; the ruleset
//! generator reinserts them adjacent to their unprefixed source property.

pub mod data;
pub mod plugins;

pub use data::{PREFIX_MAP, Prefix};
pub use plugins::{Plugin, PluginResult, run_plugins};

use crate::ordered::OrderedMap;
use crate::util::capitalize;
use crate::value::StyleValue;

/// Returns a copy of `style` with vendor-prefixed variants added.
///
/// Nested mappings are prefixed recursively. Sequence values run every
/// plugin against each element and merge newly produced values without
/// duplicates. Scalar values run the plugin chain once (first result
/// wins), then the property is duplicated under each required prefixed
/// name with the same value; the unprefixed original is kept.
pub fn prefix_all(style: &OrderedMap) -> OrderedMap {
    let mut out = style.clone();
    let keys: Vec<String> = out.keys().map(str::to_string).collect();

    for key in keys {
        let value = match out.get(&key) {
            Some(v) => v.clone(),
            None => continue,
        };

        match value {
            StyleValue::Mapping(nested) => {
                out.replace(&key, StyleValue::Mapping(prefix_all(&nested)));
            }
            StyleValue::Sequence(elements) => {
                let mut combined: Vec<StyleValue> = Vec::new();
                for element in &elements {
                    match run_plugins(&key, element, &mut out) {
                        Some(PluginResult::One(v)) => add_if_new(&mut combined, v),
                        Some(PluginResult::Many(vs)) => {
                            for v in vs {
                                add_if_new(&mut combined, v);
                            }
                        }
                        None => add_if_new(&mut combined, element.clone()),
                    }
                }
                if !combined.is_empty() {
                    out.replace(&key, StyleValue::Sequence(combined));
                }
            }
            scalar => {
                if let Some(result) = run_plugins(&key, &scalar, &mut out) {
                    out.replace(&key, result.into_value());
                }
                if let Some(prefixes) = PREFIX_MAP.get(key.as_str()) {
                    let current = match out.get(&key) {
                        Some(v) => v.clone(),
                        None => continue,
                    };
                    let capitalized = capitalize(&key);
                    for prefix in prefixes.iter() {
                        let prefixed_key = format!("{}{capitalized}", prefix.as_camel());
                        // A plugin may already have set this sibling with
                        // a filtered value; that value wins.
                        if !out.has(&prefixed_key) {
                            out.replace(prefixed_key, current.clone());
                        }
                    }
                }
            }
        }
    }

    out
}

fn add_if_new(list: &mut Vec<StyleValue>, value: StyleValue) {
    if !list.contains(&value) {
        list.push(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicates_properties_under_prefixed_names() {
        let style: OrderedMap = [("transform", "rotate(45deg)")].into_iter().collect();
        let prefixed = prefix_all(&style);

        assert_eq!(prefixed.len(), 3);
        assert_eq!(
            prefixed.get("WebkitTransform"),
            Some(&StyleValue::Str("rotate(45deg)".into()))
        );
        assert_eq!(
            prefixed.get("msTransform"),
            Some(&StyleValue::Str("rotate(45deg)".into()))
        );
        assert_eq!(
            prefixed.get("transform"),
            Some(&StyleValue::Str("rotate(45deg)".into()))
        );
    }

    #[test]
    fn untouched_properties_pass_through() {
        let style: OrderedMap = [("color", "red")].into_iter().collect();
        let prefixed = prefix_all(&style);
        assert_eq!(prefixed.len(), 1);
        assert_eq!(prefixed.get("color"), Some(&StyleValue::Str("red".into())));
    }

    #[test]
    fn sequence_values_merge_plugin_output_without_duplicates() {
        let style: OrderedMap = [(
            "display",
            StyleValue::Sequence(vec![
                StyleValue::Str("flex".into()),
                StyleValue::Str("block".into()),
            ]),
        )]
        .into_iter()
        .collect();
        let prefixed = prefix_all(&style);

        let Some(StyleValue::Sequence(values)) = prefixed.get("display") else {
            panic!("expected a sequence");
        };
        // 5 flex fallbacks plus the untouched "block".
        assert_eq!(values.len(), 6);
        assert_eq!(values[0], StyleValue::Str("-webkit-box".into()));
        assert_eq!(values[5], StyleValue::Str("block".into()));
    }

    #[test]
    fn plugin_set_siblings_survive_property_duplication() {
        let style: OrderedMap = [("flex", 1)].into_iter().collect();
        let prefixed = prefix_all(&style);

        // The ms shorthand expansion comes from the plugin chain and
        // must not be clobbered by the database duplication pass.
        assert_eq!(
            prefixed.get("msFlex"),
            Some(&StyleValue::Str("1 1 0%".into()))
        );
        assert_eq!(prefixed.get("WebkitFlex"), Some(&StyleValue::Number(1.0)));
        assert_eq!(prefixed.get("flex"), Some(&StyleValue::Number(1.0)));
    }

    #[test]
    fn transition_property_keeps_filtered_webkit_value() {
        let style: OrderedMap = [("transitionProperty", "transform")].into_iter().collect();
        let prefixed = prefix_all(&style);

        let webkit = prefixed
            .get("WebkitTransitionProperty")
            .and_then(StyleValue::as_str)
            .unwrap();
        assert!(webkit.contains("-webkit-transform"));
        assert!(!webkit.contains("-ms-"));
        assert!(!webkit.contains("-moz-"));

        let standard = prefixed
            .get("transitionProperty")
            .and_then(StyleValue::as_str)
            .unwrap();
        assert!(standard.contains("-ms-transform"));
        assert!(standard.ends_with("transform"));
    }

    #[test]
    fn nested_mappings_are_prefixed_recursively() {
        let inner: OrderedMap = [("userSelect", "none")].into_iter().collect();
        let mut style = OrderedMap::new();
        style.set("nested", inner, false);

        let prefixed = prefix_all(&style);
        let nested = prefixed.get("nested").and_then(StyleValue::as_mapping).unwrap();
        assert!(nested.has("WebkitUserSelect"));
        assert!(nested.has("MozUserSelect"));
        assert!(nested.has("msUserSelect"));
        assert!(nested.has("userSelect"));
    }
}
