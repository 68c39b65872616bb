//! Deduplicated buffering and injection of generated CSS.
//!
//! A [`StyleRegistry`] owns all injection state: the ledger of content
//! keys already injected, the buffer of pending CSS fragments, and the
//! buffering flag. Registries are explicit values rather than process
//! globals, so independent registries can coexist (one per server-render
//! request, for example).
//!
//! Two collaborator traits mark the asynchronous and environment
//! boundaries: [`FlushTarget`] stands in for the live stylesheet (DOM
//! insertion in a browser runtime) and [`FlushScheduler`] defers the
//! flush into a future turn of the event loop.

use std::cell::RefCell;
use std::collections::{HashSet, VecDeque};
use std::panic::{AssertUnwindSafe, catch_unwind, resume_unwind};
use std::rc::{Rc, Weak};

use crate::error::{Result, VeneerError};

/// Receives flushed CSS rules. Implementations are best-effort: a rule
/// the runtime cannot apply is dropped without affecting the rest of the
/// batch.
pub trait FlushTarget {
    fn insert_rules(&mut self, rules: &[String]);
}

/// Defers a flush callback into the soonest available future turn,
/// with priority over I/O and redraw work.
///
/// Implementations must not run the task synchronously from `schedule`;
/// the registry is still borrowed at that point.
pub trait FlushScheduler {
    fn schedule(&self, task: Box<dyn FnOnce()>);
}

struct Environment {
    target: Rc<RefCell<dyn FlushTarget>>,
    scheduler: Rc<dyn FlushScheduler>,
}

/// Process-scoped injection state: ledger, buffer, and buffering flag.
pub struct StyleRegistry {
    injected: HashSet<String>,
    injected_order: Vec<String>,
    buffer: Vec<String>,
    buffering: bool,
    environment: Option<Environment>,
    self_ref: Weak<RefCell<StyleRegistry>>,
}

impl StyleRegistry {
    /// Creates a registry behind a shared handle. The handle is what
    /// allows a scheduled flush to find its way back to the registry.
    pub fn shared() -> Rc<RefCell<Self>> {
        Rc::new_cyclic(|weak| {
            RefCell::new(StyleRegistry {
                injected: HashSet::new(),
                injected_order: Vec::new(),
                buffer: Vec::new(),
                buffering: false,
                environment: None,
                self_ref: weak.clone(),
            })
        })
    }

    /// Attaches the flush environment: where rules go and how the
    /// deferred flush is scheduled.
    pub fn attach_environment(
        &mut self,
        target: Rc<RefCell<dyn FlushTarget>>,
        scheduler: Rc<dyn FlushScheduler>,
    ) {
        self.environment = Some(Environment { target, scheduler });
    }

    pub fn has_environment(&self) -> bool {
        self.environment.is_some()
    }

    /// Appends already-generated CSS under `key`, at most once per key
    /// for the lifetime of the ledger.
    ///
    /// When not buffering, an attached environment starts an implicit
    /// buffering pass and schedules exactly one deferred flush; without
    /// an environment this is a fatal configuration error.
    pub fn inject_generated_once(&mut self, key: &str, fragments: Vec<String>) -> Result<()> {
        if self.injected.contains(key) {
            return Ok(());
        }

        if !self.buffering {
            let environment = self
                .environment
                .as_ref()
                .ok_or(VeneerError::NoInjectionEnvironment)?;
            self.buffering = true;
            let registry = self.self_ref.clone();
            environment.scheduler.schedule(Box::new(move || {
                if let Some(registry) = registry.upgrade() {
                    registry.borrow_mut().flush_to_target();
                }
            }));
        }

        self.buffer.extend(fragments);
        self.injected.insert(key.to_string());
        self.injected_order.push(key.to_string());
        Ok(())
    }

    pub fn is_injected(&self, key: &str) -> bool {
        self.injected.contains(key)
    }

    /// Starts an explicit buffering pass (server rendering, tests).
    pub fn start_buffering(&mut self) -> Result<()> {
        if self.buffering {
            return Err(VeneerError::AlreadyBuffering);
        }
        self.buffering = true;
        Ok(())
    }

    pub fn is_buffering(&self) -> bool {
        self.buffering
    }

    fn drain(&mut self) -> Vec<String> {
        self.buffering = false;
        std::mem::take(&mut self.buffer)
    }

    /// Drains the buffer into a single string, leaving buffering off.
    pub fn flush_to_string(&mut self) -> String {
        self.drain().concat()
    }

    /// Drains the buffer and forwards the pending rules to the flush
    /// target. Later injections each re-trigger buffering and a new
    /// scheduled flush.
    pub fn flush_to_target(&mut self) {
        let rules = self.drain();
        if rules.is_empty() {
            return;
        }
        if let Some(environment) = &self.environment {
            let target = Rc::clone(&environment.target);
            target.borrow_mut().insert_rules(&rules);
        }
    }

    /// Clears the ledger, buffer, and buffering flag. Pending scheduled
    /// flushes find an empty buffer and do nothing.
    pub fn reset(&mut self) {
        self.injected.clear();
        self.injected_order.clear();
        self.buffer.clear();
        self.buffering = false;
    }

    /// CSS fragments buffered but not yet flushed.
    pub fn buffered_styles(&self) -> &[String] {
        &self.buffer
    }

    /// Content keys injected so far, in injection order.
    pub fn rendered_keys(&self) -> &[String] {
        &self.injected_order
    }

    /// Pre-populates the ledger so a client bootstrap does not re-inject
    /// styles a server-rendered pass already produced.
    pub fn mark_as_injected<I, S>(&mut self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for key in keys {
            let key = key.into();
            if self.injected.insert(key.clone()) {
                self.injected_order.push(key);
            }
        }
    }
}

/// An accumulating [`FlushTarget`], standing in for a live stylesheet.
///
/// An optional per-rule filter emulates a runtime rejecting individual
/// rules; rejected rules are dropped while the rest of the batch still
/// applies.
#[derive(Default)]
pub struct StyleSink {
    rules: Vec<String>,
    rejected: usize,
    filter: Option<fn(&str) -> bool>,
}

impl StyleSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rules for which `accepts` returns false are dropped.
    pub fn with_filter(accepts: fn(&str) -> bool) -> Self {
        StyleSink {
            filter: Some(accepts),
            ..Self::default()
        }
    }

    pub fn rules(&self) -> &[String] {
        &self.rules
    }

    pub fn rejected(&self) -> usize {
        self.rejected
    }

    pub fn css_text(&self) -> String {
        self.rules.concat()
    }
}

impl FlushTarget for StyleSink {
    fn insert_rules(&mut self, rules: &[String]) {
        for rule in rules {
            match self.filter {
                Some(accepts) if !accepts(rule) => self.rejected += 1,
                _ => self.rules.push(rule.clone()),
            }
        }
    }
}

/// A [`FlushScheduler`] that queues tasks until explicitly pumped.
///
/// `run_pending` drains the queue in FIFO order. A panicking task does
/// not prevent the remaining tasks from running; the first panic is
/// re-raised once the queue is empty.
#[derive(Default)]
pub struct ManualScheduler {
    tasks: RefCell<VecDeque<Box<dyn FnOnce()>>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.tasks.borrow().len()
    }

    pub fn run_pending(&self) {
        let mut first_panic = None;
        loop {
            let task = self.tasks.borrow_mut().pop_front();
            let Some(task) = task else { break };
            if let Err(payload) = catch_unwind(AssertUnwindSafe(task)) {
                if first_panic.is_none() {
                    first_panic = Some(payload);
                }
            }
        }
        if let Some(payload) = first_panic {
            resume_unwind(payload);
        }
    }
}

impl FlushScheduler for ManualScheduler {
    fn schedule(&self, task: Box<dyn FnOnce()>) {
        self.tasks.borrow_mut().push_back(task);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn injection_is_deduplicated_by_key() {
        let registry = StyleRegistry::shared();
        let mut registry = registry.borrow_mut();
        registry.start_buffering().unwrap();

        registry
            .inject_generated_once("a", vec![".a{color:red;}".into()])
            .unwrap();
        registry
            .inject_generated_once("a", vec![".a{color:red;}".into()])
            .unwrap();

        assert_eq!(registry.buffered_styles().len(), 1);
        assert_eq!(registry.rendered_keys(), ["a"]);
    }

    #[test]
    fn injecting_without_environment_or_buffering_fails() {
        let registry = StyleRegistry::shared();
        let err = registry
            .borrow_mut()
            .inject_generated_once("a", vec![".a{}".into()])
            .unwrap_err();
        assert_eq!(err, VeneerError::NoInjectionEnvironment);
    }

    #[test]
    fn double_buffering_is_an_error() {
        let registry = StyleRegistry::shared();
        let mut registry = registry.borrow_mut();
        registry.start_buffering().unwrap();
        assert_eq!(registry.start_buffering(), Err(VeneerError::AlreadyBuffering));
    }

    #[test]
    fn scheduled_flush_reaches_the_target_once() {
        let registry = StyleRegistry::shared();
        let sink = Rc::new(RefCell::new(StyleSink::new()));
        let scheduler = Rc::new(ManualScheduler::new());
        registry
            .borrow_mut()
            .attach_environment(sink.clone(), scheduler.clone());

        registry
            .borrow_mut()
            .inject_generated_once("a", vec![".a{color:red;}".into()])
            .unwrap();
        registry
            .borrow_mut()
            .inject_generated_once("b", vec![".b{color:blue;}".into()])
            .unwrap();

        // One implicit buffering pass, one scheduled flush.
        assert_eq!(scheduler.pending(), 1);
        scheduler.run_pending();

        assert_eq!(sink.borrow().rules(), [".a{color:red;}", ".b{color:blue;}"]);
        assert!(!registry.borrow().is_buffering());

        // The next injection starts a fresh pass.
        registry
            .borrow_mut()
            .inject_generated_once("c", vec![".c{}".into()])
            .unwrap();
        assert_eq!(scheduler.pending(), 1);
    }

    #[test]
    fn rejected_rules_do_not_block_the_batch() {
        let registry = StyleRegistry::shared();
        let sink = Rc::new(RefCell::new(StyleSink::with_filter(|rule| {
            !rule.contains(":bogus")
        })));
        let scheduler = Rc::new(ManualScheduler::new());
        registry
            .borrow_mut()
            .attach_environment(sink.clone(), scheduler.clone());

        registry
            .borrow_mut()
            .inject_generated_once("x", vec![".x:bogus{}".into(), ".x{color:red;}".into()])
            .unwrap();
        scheduler.run_pending();

        assert_eq!(sink.borrow().rules(), [".x{color:red;}"]);
        assert_eq!(sink.borrow().rejected(), 1);
    }

    #[test]
    fn mark_as_injected_prevents_reinjection() {
        let registry = StyleRegistry::shared();
        let mut registry = registry.borrow_mut();
        registry.start_buffering().unwrap();
        registry.mark_as_injected(["server_a"]);

        registry
            .inject_generated_once("server_a", vec![".a{}".into()])
            .unwrap();
        assert!(registry.buffered_styles().is_empty());
    }

    #[test]
    fn panicking_task_does_not_starve_later_tasks() {
        let scheduler = ManualScheduler::new();
        let ran = Rc::new(RefCell::new(false));
        scheduler.schedule(Box::new(|| panic!("boom")));
        let ran_clone = ran.clone();
        scheduler.schedule(Box::new(move || *ran_clone.borrow_mut() = true));

        let result = catch_unwind(AssertUnwindSafe(|| scheduler.run_pending()));
        assert!(result.is_err());
        assert!(*ran.borrow());
        assert_eq!(scheduler.pending(), 0);
    }
}
