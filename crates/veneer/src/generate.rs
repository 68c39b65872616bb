//! CSS generation: selector resolution and ruleset emission.
//!
//! [`generate_css`] walks a merged style tree and dispatches special
//! keys (pseudo-selectors, at-rules) to a chain of selector handlers,
//! recursing with an adjusted base selector. Plain declarations fall
//! through to [`generate_ruleset`], which prefixes, stringifies, and
//! emits one literal CSS rule.
//!
//! For a base selector of `.foo` and the tree
//!
//! ```text
//! { color: "red", "@media screen": { height: 20 } }
//! ```
//!
//! generation produces two fragments: `.foo{color:red;}` followed by
//! `@media screen{.foo{height:20px;}}`.

use std::collections::HashSet;

use log::warn;

use crate::error::Result;
use crate::inject::StyleRegistry;
use crate::ordered::OrderedMap;
use crate::prefix;
use crate::util::{kebabify, stringify_and_importantify, stringify_value};
use crate::value::StyleValue;

/// What a selector handler produced for a key it recognized.
pub enum HandlerOutput {
    /// An ordered sequence of complete CSS rules.
    Rules(Vec<String>),
    /// Legacy shape: a single string of rules. Accepted in a degraded
    /// compatibility mode; see [`generate_css`].
    Raw(String),
}

/// Re-invokes the resolution pipeline on a subtree with a new base
/// selector.
pub type Recurse<'a> = dyn FnMut(&str) -> Result<Vec<String>> + 'a;

/// A pluggable resolver for special style keys.
///
/// Given the current key and base selector, a handler either returns
/// `None` (key not recognized, try the next handler) or generates the
/// CSS for the key's subtree, usually by calling `recurse` with an
/// adjusted selector.
pub type SelectorHandler = fn(key: &str, base: &str, recurse: &mut Recurse) -> Option<Result<HandlerOutput>>;

/// Rewrites one property's value before stringification. String handlers
/// may inject auxiliary rule blocks (font faces, keyframes) through the
/// registry as a side effect.
pub type StringHandler = fn(&StyleValue, &Handlers, &mut StyleRegistry) -> Result<StyleValue>;

/// The handler chains consulted during generation.
#[derive(Clone, Default)]
pub struct Handlers {
    /// Selector handlers, tried in registration order; first match wins.
    pub selector: Vec<SelectorHandler>,
    /// Property name to value-rewrite handler, run in registration order.
    pub string: Vec<(&'static str, StringHandler)>,
}

impl Handlers {
    /// Handlers with the selector chain emptied and the string chain
    /// kept, used for auxiliary blocks like `@font-face` whose bodies
    /// hold no nested selectors but whose values still need rewriting.
    pub fn without_selector_handlers(&self) -> Handlers {
        Handlers {
            selector: Vec::new(),
            string: self.string.clone(),
        }
    }
}

/// Handles pseudo-selector keys like `:hover` by recursing with the key
/// appended to the base selector.
pub fn pseudo_selectors(key: &str, base: &str, recurse: &mut Recurse) -> Option<Result<HandlerOutput>> {
    if !key.starts_with(':') {
        return None;
    }
    Some(recurse(&format!("{base}{key}")).map(HandlerOutput::Rules))
}

/// Handles at-rule keys like `@media screen` by recursing with the same
/// base selector and wrapping the joined output in the at-rule block.
pub fn at_rules(key: &str, base: &str, recurse: &mut Recurse) -> Option<Result<HandlerOutput>> {
    if !key.starts_with('@') {
        return None;
    }
    Some(recurse(base).map(|rules| HandlerOutput::Rules(vec![format!("{key}{{{}}}", rules.concat())])))
}

/// The built-in selector-handler chain, in dispatch order.
pub fn default_selector_handlers() -> Vec<SelectorHandler> {
    vec![pseudo_selectors, at_rules]
}

/// Generates CSS fragments for `selector` from a list of style objects.
///
/// The styles are merged in order (later objects win), then each
/// top-level entry is either resolved by a selector handler or collected
/// into the plain-declaration ruleset, which is emitted first.
pub fn generate_css(
    selector: &str,
    style_list: &[&OrderedMap],
    handlers: &Handlers,
    registry: &mut StyleRegistry,
    use_important: bool,
) -> Result<Vec<String>> {
    let mut merged = OrderedMap::new();
    for style in style_list {
        merged.merge_style(style);
    }

    let mut plain_declarations = OrderedMap::new();
    let mut generated: Vec<String> = Vec::new();

    for (key, value) in merged {
        let mut handled = false;
        for handler in &handlers.selector {
            let mut recurse = |new_base: &str| -> Result<Vec<String>> {
                match &value {
                    StyleValue::Mapping(subtree) => generate_css(
                        new_base,
                        std::slice::from_ref(&subtree),
                        handlers,
                        registry,
                        use_important,
                    ),
                    _ => Ok(Vec::new()),
                }
            };
            let Some(output) = handler(&key, selector, &mut recurse) else {
                continue;
            };
            match output? {
                HandlerOutput::Rules(mut rules) => generated.append(&mut rules),
                HandlerOutput::Raw(raw) => {
                    warn!(
                        "selector handlers should return a list of rules; \
                         a bare string is deprecated (key {key:?})"
                    );
                    generated.push(format!("@media all {{{raw}}}"));
                }
            }
            handled = true;
            break;
        }
        if !handled {
            plain_declarations.set(key, value, true);
        }
    }

    let ruleset = generate_ruleset(selector, plain_declarations, handlers, registry, use_important)?;
    if !ruleset.is_empty() {
        generated.insert(0, ruleset);
    }
    Ok(generated)
}

/// Generates one CSS ruleset for `selector` from flat declarations.
///
/// Declarations are assumed to hold no special children; nesting is the
/// responsibility of [`generate_css`]. Returns an empty string when no
/// declarations are emitted, so empty rules are omitted entirely.
pub fn generate_ruleset(
    selector: &str,
    mut declarations: OrderedMap,
    handlers: &Handlers,
    registry: &mut StyleRegistry,
    use_important: bool,
) -> Result<String> {
    for (property, handler) in &handlers.string {
        if declarations.has(property) {
            let value = match declarations.get(property) {
                Some(v) => v.clone(),
                None => continue,
            };
            let rewritten = handler(&value, handlers, registry)?;
            // Replacing an unprocessed value with a processed one, not
            // overriding an earlier style, so the position is preserved.
            declarations.set(*property, rewritten, false);
        }
    }

    let original_keys: HashSet<String> = declarations.keys().map(str::to_string).collect();
    let prefixed = prefix::prefix_all(&declarations);

    let mut order: Vec<String> = declarations.keys().map(str::to_string).collect();
    if prefixed.len() != order.len() {
        // Prefixing introduced new properties. Reinsert each one
        // immediately before its unprefixed source so prefixed fallbacks
        // come first; properties with no identifiable source go to the
        // front.
        for key in prefixed.keys() {
            if original_keys.contains(key) {
                continue;
            }
            let source = recover_source_property(key);
            let position = source
                .filter(|s| original_keys.contains(s))
                .and_then(|s| order.iter().position(|k| *k == s));
            match position {
                Some(index) => order.insert(index, key.to_string()),
                None => order.insert(0, key.to_string()),
            }
        }
    }

    let transform: fn(&str, &StyleValue) -> String = if use_important {
        stringify_and_importantify
    } else {
        stringify_value
    };

    let mut rules = String::new();
    for key in &order {
        match prefixed.get(key) {
            Some(StyleValue::Sequence(values)) => {
                // One declaration per fallback value, same property.
                for value in values {
                    push_declaration(&mut rules, key, value, transform);
                }
            }
            Some(value) => push_declaration(&mut rules, key, value, transform),
            None => {}
        }
    }

    if rules.is_empty() {
        Ok(String::new())
    } else {
        Ok(format!("{selector}{{{rules}}}"))
    }
}

fn push_declaration(
    out: &mut String,
    property: &str,
    value: &StyleValue,
    transform: fn(&str, &StyleValue) -> String,
) {
    out.push_str(&kebabify(property));
    out.push(':');
    out.push_str(&transform(property, value));
    out.push(';');
}

/// Recovers the unprefixed property name a prefixed property was
/// generated from, by undoing the `Webkit`/`Moz`/`ms` naming convention.
fn recover_source_property(prefixed: &str) -> Option<String> {
    let rest = if let Some(rest) = prefixed.strip_prefix("Webkit") {
        rest
    } else if let Some(rest) = prefixed.strip_prefix("Moz") {
        rest
    } else if let Some(rest) = prefixed.strip_prefix("ms") {
        rest
    } else {
        return None;
    };

    let mut chars = rest.chars();
    let first = chars.next()?;
    if !first.is_ascii_uppercase() {
        return None;
    }
    Some(first.to_ascii_lowercase().to_string() + chars.as_str())
}
