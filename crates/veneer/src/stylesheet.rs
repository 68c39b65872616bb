//! Compiled styles and the built-in string handlers.
//!
//! A [`CompiledStyle`] is the content-addressed form of one style
//! definition: its short name is derived from a hash of the canonical
//! serialization, so content-equal definitions always compile to the
//! same name. String handlers rewrite individual property values before
//! stringification and may inject auxiliary rule blocks (`@font-face`,
//! `@keyframes`) as a side effect.

use crate::error::Result;
use crate::generate::{Handlers, generate_css};
use crate::inject::StyleRegistry;
use crate::ordered::OrderedMap;
use crate::util::hash_string;
use crate::value::StyleValue;

/// A style definition compiled to a content-addressed name.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledStyle {
    /// Short identifier derived from the definition's content hash.
    pub name: String,
    /// The raw definition, kept for generation at injection time.
    pub definition: OrderedMap,
    /// Serialized length of the definition, used as a collision-reducing
    /// suffix when several styles combine into one class name.
    pub len: usize,
}

/// One argument to a class-name request: a compiled style, a nested
/// group of arguments, or a skipped slot.
///
/// `Skip` is what makes conditional composition work: an entry guarded
/// by a false condition contributes nothing.
#[derive(Clone)]
pub enum StyleArg<'a> {
    Compiled(&'a CompiledStyle),
    Group(Vec<StyleArg<'a>>),
    Skip,
}

impl<'a> From<&'a CompiledStyle> for StyleArg<'a> {
    fn from(style: &'a CompiledStyle) -> Self {
        StyleArg::Compiled(style)
    }
}

impl<'a> From<Option<&'a CompiledStyle>> for StyleArg<'a> {
    fn from(style: Option<&'a CompiledStyle>) -> Self {
        match style {
            Some(style) => StyleArg::Compiled(style),
            None => StyleArg::Skip,
        }
    }
}

/// Flattens nested argument groups, collecting names, definitions, and
/// the running serialized length.
pub(crate) fn process_style_args<'a>(
    args: &'a [StyleArg<'a>],
    names: &mut Vec<&'a str>,
    definitions: &mut Vec<&'a OrderedMap>,
    total_len: &mut usize,
) {
    for arg in args {
        match arg {
            StyleArg::Compiled(style) => {
                names.push(&style.name);
                definitions.push(&style.definition);
                *total_len += style.len;
            }
            StyleArg::Group(group) => {
                process_style_args(group, names, definitions, total_len);
            }
            StyleArg::Skip => {}
        }
    }
}

/// Generates and buffers the CSS for `key`, at most once per ledger
/// lifetime. The generation step is skipped entirely when the key is
/// already in the ledger.
pub fn inject_style_once(
    key: &str,
    selector: &str,
    definitions: &[&OrderedMap],
    use_important: bool,
    handlers: &Handlers,
    registry: &mut StyleRegistry,
) -> Result<()> {
    if registry.is_injected(key) {
        return Ok(());
    }
    let generated = generate_css(selector, definitions, handlers, registry, use_important)?;
    registry.inject_generated_once(key, generated)
}

/// The built-in string-handler chain.
pub fn default_string_handlers() -> Vec<(&'static str, crate::generate::StringHandler)> {
    vec![("fontFamily", font_family), ("animationName", animation_name)]
}

/// Interprets mapping-valued `fontFamily` entries as `@font-face` rules
/// to inject, keyed by the font source, and rewrites the value to the
/// quoted family name. Sequences handle each element and join the
/// resulting names, deduplicated.
fn font_family(
    value: &StyleValue,
    handlers: &Handlers,
    registry: &mut StyleRegistry,
) -> Result<StyleValue> {
    match value {
        StyleValue::Sequence(fonts) => {
            let mut names: Vec<String> = Vec::new();
            for font in fonts {
                let resolved = font_family(font, handlers, registry)?;
                let name = match resolved {
                    StyleValue::Str(s) => s,
                    other => other.canonical(),
                };
                if !names.contains(&name) {
                    names.push(name);
                }
            }
            Ok(StyleValue::Str(names.join(",")))
        }
        StyleValue::Mapping(font) => {
            let key = font
                .get("src")
                .and_then(StyleValue::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| value.canonical());
            inject_style_once(
                &key,
                "@font-face",
                &[font],
                false,
                &handlers.without_selector_handlers(),
                registry,
            )?;
            let family = font
                .get("fontFamily")
                .and_then(StyleValue::as_str)
                .unwrap_or_default();
            Ok(StyleValue::Str(format!("\"{family}\"")))
        }
        other => Ok(other.clone()),
    }
}

/// Interprets mapping-valued `animationName` entries as keyframe blocks:
/// injects `@keyframes <generated name>{...}` and rewrites the value to
/// the generated name. Sequences handle each element and join the names.
fn animation_name(
    value: &StyleValue,
    handlers: &Handlers,
    registry: &mut StyleRegistry,
) -> Result<StyleValue> {
    match value {
        StyleValue::Sequence(animations) => {
            let mut names: Vec<String> = Vec::new();
            for animation in animations {
                let resolved = animation_name(animation, handlers, registry)?;
                names.push(match resolved {
                    StyleValue::Str(s) => s,
                    other => other.canonical(),
                });
            }
            Ok(StyleValue::Str(names.join(",")))
        }
        StyleValue::Mapping(keyframes) => {
            // The name can't start with a number, so the hash gets a
            // readable prefix.
            let name = format!("keyframe_{}", hash_string(&value.canonical()));

            let mut block = format!("@keyframes {name}{{");
            for (frame_selector, frame) in keyframes.iter() {
                if let StyleValue::Mapping(frame) = frame {
                    let fragments = generate_css(
                        frame_selector,
                        std::slice::from_ref(&frame),
                        handlers,
                        registry,
                        false,
                    )?;
                    block.push_str(&fragments.concat());
                }
            }
            block.push('}');

            registry.inject_generated_once(&name, vec![block])?;
            Ok(StyleValue::Str(name))
        }
        other => Ok(other.clone()),
    }
}
