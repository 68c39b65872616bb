//! Authoring layer over the [`veneer`] styling engine.
//!
//! Re-exports the engine API and adds the [`style!`] and [`sheet!`]
//! macros, which turn braced style literals into the engine's ordered
//! definitions without the `set` boilerplate.

pub use veneer::{
    CompiledStyle, Engine, FlushScheduler, FlushTarget, HandlerOutput, Handlers, HashMode,
    ManualScheduler, OrderedMap, RenderedCss, Result, Sheet, StaticRender, StyleArg,
    StyleRegistry, StyleSink, StyleValue, VeneerError,
};

/// Builds an [`OrderedMap`] style definition from a braced literal.
///
/// Identifier keys are taken verbatim (`fontSize` stays `fontSize`);
/// pseudo-selector and at-rule keys are written as string literals.
/// Braced values nest, bracketed values become sequences.
///
/// ```
/// use veneer_rs::{style, Engine};
///
/// let engine = Engine::no_important();
/// engine.suppress_injection().unwrap();
///
/// let button = style! {
///     color: "red",
///     height: 20,
///     ":hover": {
///         color: "blue",
///     },
/// };
///
/// let sheet = engine.compile(vec![("button".to_string(), button)]);
/// let class = engine.class_name(&[sheet.get("button").into()]).unwrap();
/// let css = engine.buffered_styles().concat();
/// assert!(css.contains(&format!(".{class}{{color:red;height:20px;}}")));
/// assert!(css.contains(&format!(".{class}:hover{{color:blue;}}")));
/// ```
#[macro_export]
macro_rules! style {
    // === The Collector (Muncher) ===

    (@munch $map:ident $(,)?) => {};

    // 1. Nested blocks (pseudo-selectors, at-rules, keyframes)
    (@munch $map:ident, $key:ident : { $($inner:tt)* } $(, $($rest:tt)*)?) => {
        $map.set(stringify!($key), $crate::style! { $($inner)* }, false);
        $crate::style!(@munch $map $(, $($rest)*)?);
    };
    (@munch $map:ident, $key:literal : { $($inner:tt)* } $(, $($rest:tt)*)?) => {
        $map.set($key, $crate::style! { $($inner)* }, false);
        $crate::style!(@munch $map $(, $($rest)*)?);
    };

    // 2. Sequence values (value fallbacks, font stacks)
    (@munch $map:ident, $key:ident : [ $($elem:expr),* $(,)? ] $(, $($rest:tt)*)?) => {
        $map.set(
            stringify!($key),
            $crate::StyleValue::Sequence(vec![$($crate::StyleValue::from($elem)),*]),
            false,
        );
        $crate::style!(@munch $map $(, $($rest)*)?);
    };
    (@munch $map:ident, $key:literal : [ $($elem:expr),* $(,)? ] $(, $($rest:tt)*)?) => {
        $map.set(
            $key,
            $crate::StyleValue::Sequence(vec![$($crate::StyleValue::from($elem)),*]),
            false,
        );
        $crate::style!(@munch $map $(, $($rest)*)?);
    };

    // 3. Scalar values
    (@munch $map:ident, $key:ident : $value:expr $(, $($rest:tt)*)?) => {
        $map.set(stringify!($key), $value, false);
        $crate::style!(@munch $map $(, $($rest)*)?);
    };
    (@munch $map:ident, $key:literal : $value:expr $(, $($rest:tt)*)?) => {
        $map.set($key, $value, false);
        $crate::style!(@munch $map $(, $($rest)*)?);
    };

    // === Entry Point ===
    ($($body:tt)*) => {{
        let mut map = $crate::OrderedMap::new();
        $crate::style!(@munch map, $($body)*);
        map
    }};
}

/// Builds the named-definition list [`Engine::compile`] expects.
///
/// ```
/// use veneer_rs::{sheet, Engine};
///
/// let engine = Engine::no_important();
/// let styles = engine.compile(sheet! {
///     red: { color: "red" },
///     blue: { color: "blue" },
/// });
/// assert_eq!(styles.len(), 2);
/// ```
#[macro_export]
macro_rules! sheet {
    ($($name:ident : { $($body:tt)* }),* $(,)?) => {
        vec![$((stringify!($name).to_string(), $crate::style! { $($body)* })),*]
    };
}
