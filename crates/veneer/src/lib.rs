//! veneer is a styling engine that turns nested, code-authored style
//! definitions into deduplicated CSS with content-addressed class names.
//!
//! Style definitions are ordered key/value trees ([`OrderedMap`] of
//! [`StyleValue`]) supporting pseudo-selector and at-rule nesting.
//! Compiling a set of definitions produces a [`Sheet`] of
//! [`CompiledStyle`]s whose names derive from a content hash, so equal
//! definitions share one name and one injected rule. Requesting a class
//! name for a combination of styles merges them deterministically
//! (later styles win), vendor-prefixes the result, and buffers the
//! generated CSS exactly once per distinct combination.
//!
//! # Example
//!
//! ```
//! use veneer::{Engine, OrderedMap};
//!
//! let engine = Engine::no_important();
//! engine.suppress_injection().unwrap();
//!
//! let mut hover = OrderedMap::new();
//! hover.set("color", "blue", false);
//! let mut button: OrderedMap = [("color", "red"), ("height", "20px")]
//!     .into_iter()
//!     .collect();
//! button.set(":hover", hover, false);
//!
//! let sheet = engine.compile(vec![("button".to_string(), button)]);
//! let class = engine.class_name(&[sheet.get("button").into()]).unwrap();
//!
//! let css = engine.buffered_styles().concat();
//! assert!(css.contains(&format!(".{class}{{color:red;height:20px;}}")));
//! assert!(css.contains(&format!(".{class}:hover{{color:blue;}}")));
//! ```
//!
//! # Architecture
//!
//! - [`ordered`]: insertion-ordered maps with the deterministic merge
//!   rules (reorder-on-override, recursive mapping merge).
//! - [`prefix`]: vendor prefixing, split into a static property database
//!   and a chain of value plugins.
//! - [`generate`]: selector resolution and ruleset emission, extensible
//!   through selector and string handlers.
//! - [`inject`]: the [`StyleRegistry`] ledger and buffer, plus the
//!   [`FlushTarget`] and [`FlushScheduler`] environment traits.
//! - [`stylesheet`]: compiled styles and the built-in `fontFamily` and
//!   `animationName` handlers.
//! - [`engine`]: the [`Engine`] facade tying everything together.

pub mod engine;
pub mod error;
pub mod generate;
pub mod inject;
pub mod ordered;
pub mod prefix;
pub mod stylesheet;
pub mod util;
pub mod value;

pub use engine::{Engine, HashMode, RenderedCss, Sheet, StaticRender};
pub use error::{Result, VeneerError};
pub use generate::{
    HandlerOutput, Handlers, Recurse, SelectorHandler, StringHandler, generate_css,
    generate_ruleset,
};
pub use inject::{FlushScheduler, FlushTarget, ManualScheduler, StyleRegistry, StyleSink};
pub use ordered::OrderedMap;
pub use stylesheet::{CompiledStyle, StyleArg, inject_style_once};
pub use util::{hash_string, kebabify};
pub use value::StyleValue;
