//! The styling engine: compilation, class-name assignment, and the
//! server-rendering entry points.
//!
//! An [`Engine`] bundles the pieces the rest of the crate provides: a
//! handler chain, an importance policy, a naming mode, and a private
//! [`StyleRegistry`]. Engines are independent of one another, so a test
//! or a server request can own a fresh one without global state leaking
//! across.
//!
//! ```
//! use veneer::{Engine, OrderedMap};
//!
//! let engine = Engine::no_important();
//! engine.suppress_injection().unwrap();
//!
//! let red: OrderedMap = [("color", "red")].into_iter().collect();
//! let sheet = engine.compile(vec![("red".to_string(), red)]);
//! let class = engine
//!     .class_name(&[sheet.get("red").into()])
//!     .unwrap();
//! assert!(!class.is_empty());
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::Result;
use crate::generate::{Handlers, SelectorHandler, default_selector_handlers};
use crate::inject::{FlushScheduler, FlushTarget, StyleRegistry};
use crate::ordered::OrderedMap;
use crate::stylesheet::{
    CompiledStyle, StyleArg, default_string_handlers, inject_style_once, process_style_args,
};
use crate::util::{hash_string, to_base36};
use crate::value::StyleValue;

/// How compiled styles and combined class names are spelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashMode {
    /// Content hashes only. Stable and short; the default.
    Minified,
    /// Definition keys prefixed onto the hashes, for readable class
    /// names during development.
    Debug,
}

/// A compiled set of named style definitions.
pub struct Sheet {
    styles: Vec<(String, CompiledStyle)>,
}

impl Sheet {
    /// Looks a compiled style up by its definition key. Returns `None`
    /// for unknown keys, which composes directly with conditional
    /// [`StyleArg`] slots.
    pub fn get(&self, key: &str) -> Option<&CompiledStyle> {
        self.styles
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, style)| style)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.styles.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

/// The CSS a static render produced, alongside the ledger keys needed to
/// rehydrate a client-side engine.
pub struct RenderedCss {
    pub content: String,
    pub rendered_keys: Vec<String>,
}

/// The result of [`Engine::render_static`]: the closure's output plus
/// the CSS it caused to be generated.
pub struct StaticRender<T> {
    pub output: T,
    pub css: RenderedCss,
}

/// The top-level styling engine.
pub struct Engine {
    use_important: bool,
    handlers: Handlers,
    hash_mode: HashMode,
    registry: Rc<RefCell<StyleRegistry>>,
}

impl Engine {
    pub fn new(use_important: bool) -> Self {
        Engine {
            use_important,
            handlers: Handlers {
                selector: default_selector_handlers(),
                string: default_string_handlers(),
            },
            hash_mode: HashMode::Minified,
            registry: StyleRegistry::shared(),
        }
    }

    /// An engine that marks every declaration `!important`, so injected
    /// styles win against broader stylesheets already on the page.
    pub fn important() -> Self {
        Self::new(true)
    }

    /// An engine that emits declarations verbatim.
    pub fn no_important() -> Self {
        Self::new(false)
    }

    /// Returns the engine extended with an additional selector handler,
    /// consulted after the built-in pseudo-selector and at-rule handlers.
    pub fn with_selector_handler(mut self, handler: SelectorHandler) -> Self {
        self.handlers.selector.push(handler);
        self
    }

    /// Switches between minified and debug class names. Affects styles
    /// compiled after the call.
    pub fn minify(&mut self, minify: bool) {
        self.hash_mode = if minify {
            HashMode::Minified
        } else {
            HashMode::Debug
        };
    }

    pub fn hash_mode(&self) -> HashMode {
        self.hash_mode
    }

    /// Compiles named style definitions into content-addressed styles.
    ///
    /// Compilation is pure: nothing is generated or injected until a
    /// class name is requested. Content-equal definitions compile to the
    /// same name regardless of their key, so they later share one
    /// injected rule.
    pub fn compile(&self, definitions: Vec<(String, OrderedMap)>) -> Sheet {
        let styles = definitions
            .into_iter()
            .map(|(key, definition)| {
                let content = StyleValue::Mapping(definition.clone()).canonical();
                let name = match self.hash_mode {
                    HashMode::Minified => hash_string(&content),
                    HashMode::Debug => format!("{key}_{}", hash_string(&content)),
                };
                let compiled = CompiledStyle {
                    name,
                    definition,
                    len: content.len(),
                };
                (key, compiled)
            })
            .collect();
        Sheet { styles }
    }

    /// Combines styles into a single class name and injects the combined
    /// rule if this registry has not seen it before.
    ///
    /// Skipped slots contribute nothing, so `&[style.into(), None.into()]`
    /// and `&[style.into()]` produce the same class. All-skipped input
    /// returns an empty class name and injects nothing.
    pub fn class_name(&self, args: &[StyleArg]) -> Result<String> {
        let mut names: Vec<&str> = Vec::new();
        let mut definitions: Vec<&OrderedMap> = Vec::new();
        let mut total_len = 0usize;
        process_style_args(args, &mut names, &mut definitions, &mut total_len);

        if definitions.is_empty() {
            return Ok(String::new());
        }

        let class = match self.hash_mode {
            HashMode::Minified if names.len() == 1 => format!("_{}", names[0]),
            HashMode::Minified => format!(
                "_{}{}",
                hash_string(&names.join(",")),
                to_base36((total_len % 36) as u32)
            ),
            HashMode::Debug => names.join("-o_O-"),
        };

        self.inject_once(&class, &format!(".{class}"), &definitions)?;
        Ok(class)
    }

    /// Generates and buffers the CSS for `key` at most once, using this
    /// engine's handlers and importance policy.
    pub fn inject_once(&self, key: &str, selector: &str, definitions: &[&OrderedMap]) -> Result<()> {
        let mut registry = self.registry.borrow_mut();
        inject_style_once(
            key,
            selector,
            definitions,
            self.use_important,
            &self.handlers,
            &mut registry,
        )
    }

    /// Runs `render` with a fresh ledger and buffering on, and returns
    /// its output together with the CSS the render produced.
    ///
    /// The rendered keys travel with the CSS so a client-side engine can
    /// [`rehydrate`](Engine::rehydrate) from them.
    pub fn render_static<T>(&self, render: impl FnOnce() -> T) -> Result<StaticRender<T>> {
        {
            let mut registry = self.registry.borrow_mut();
            registry.reset();
            registry.start_buffering()?;
        }
        let output = render();

        let mut registry = self.registry.borrow_mut();
        let content = registry.flush_to_string();
        let rendered_keys = registry.rendered_keys().to_vec();
        Ok(StaticRender {
            output,
            css: RenderedCss {
                content,
                rendered_keys,
            },
        })
    }

    /// Seeds the ledger with keys a static render already injected, so
    /// the first client-side render does not duplicate them.
    pub fn rehydrate<I, S>(&self, rendered_keys: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.registry.borrow_mut().mark_as_injected(rendered_keys);
    }

    /// Redirects generated CSS into the buffer instead of a flush
    /// environment, after clearing all current state. Intended for tests.
    pub fn suppress_injection(&self) -> Result<()> {
        let mut registry = self.registry.borrow_mut();
        registry.reset();
        registry.start_buffering()
    }

    /// Ends a suppressed pass and discards everything it buffered.
    pub fn resume_injection(&self) {
        self.registry.borrow_mut().reset();
    }

    /// CSS fragments buffered but not yet flushed.
    pub fn buffered_styles(&self) -> Vec<String> {
        self.registry.borrow().buffered_styles().to_vec()
    }

    /// Attaches the flush environment used for automatic injection.
    pub fn attach_environment(
        &self,
        target: Rc<RefCell<dyn FlushTarget>>,
        scheduler: Rc<dyn FlushScheduler>,
    ) {
        self.registry
            .borrow_mut()
            .attach_environment(target, scheduler);
    }

    /// Synchronously drains pending rules to the flush target.
    pub fn flush_to_target(&self) {
        self.registry.borrow_mut().flush_to_target();
    }

    /// The engine's registry handle, for collaborators that need direct
    /// access (schedulers, custom flush drivers).
    pub fn registry(&self) -> Rc<RefCell<StyleRegistry>> {
        Rc::clone(&self.registry)
    }
}
