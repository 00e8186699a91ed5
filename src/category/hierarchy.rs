//! Category logger registry.
//!
//! # Responsibilities
//! - Create loggers lazily by name and keep them for the registry's lifetime
//! - Compute effective levels by walking dot-separated ancestors
//! - Deliver events to the appenders of a logger and its ancestors
//!
//! # Design Decisions
//! - Loggers live in a `DashMap`; lookups never take a registry-wide lock
//! - Appender lists are copy-on-write `ArcSwap` snapshots so delivery is lock-free
//! - Ancestors are found by name, so a parent created after its child is still seen
//! - Native delivery reaches every appender; injected delivery skips bridging
//!   appenders so forwarded events never leave through another bridge

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, OnceLock};

use arc_swap::ArcSwap;
use dashmap::DashMap;

use super::{Level, LoggingEvent};

const UNSET: i64 = i64::MIN;

/// Root level after construction and after a configuration reset.
pub const DEFAULT_ROOT_LEVEL: Level = Level::DEBUG;

/// A destination for category events.
pub trait Appender: Send + Sync {
    /// Deliver one event. Level checks have already happened.
    fn append(&self, event: &LoggingEvent);

    /// Optional appender name, used in diagnostics.
    fn name(&self) -> Option<&str> {
        None
    }

    /// True for appenders that forward into another logging system.
    ///
    /// Injected events are never handed to a bridging appender.
    fn bridges(&self) -> bool {
        false
    }

    /// Release resources. Called when the appender is dropped by a reset.
    fn close(&self) {}
}

/// Renders an event to text. Supplied by the host; the bridge never formats.
pub trait Layout: Send + Sync {
    fn format(&self, event: &LoggingEvent) -> String;
}

impl<F> Layout for F
where
    F: Fn(&LoggingEvent) -> String + Send + Sync,
{
    fn format(&self, event: &LoggingEvent) -> String {
        self(event)
    }
}

/// How an event entered the appender chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dispatch {
    Native,
    Injected,
}

struct Node {
    name: String,
    level: AtomicI64,
    additive: AtomicBool,
    appenders: ArcSwap<Vec<Arc<dyn Appender>>>,
}

impl Node {
    fn new(name: &str, level: Option<Level>) -> Self {
        Self {
            name: name.to_string(),
            level: AtomicI64::new(encode(level)),
            additive: AtomicBool::new(true),
            appenders: ArcSwap::from_pointee(Vec::new()),
        }
    }

    fn level(&self) -> Option<Level> {
        decode(self.level.load(Ordering::Acquire))
    }

    fn clear(&self, level: Option<Level>) {
        self.level.store(encode(level), Ordering::Release);
        self.additive.store(true, Ordering::Release);
        let previous = self.appenders.swap(Arc::new(Vec::new()));
        for appender in previous.iter() {
            appender.close();
        }
    }
}

fn encode(level: Option<Level>) -> i64 {
    level.map_or(UNSET, |l| i64::from(l.rank()))
}

fn decode(raw: i64) -> Option<Level> {
    if raw == UNSET {
        None
    } else {
        // Only values produced by `encode` are ever stored.
        i32::try_from(raw).ok().map(Level::custom)
    }
}

pub(crate) fn same_sink<T: ?Sized>(a: &Arc<T>, b: &Arc<T>) -> bool {
    Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
}

/// Parent names of a dotted logger name, nearest first. The root is not included.
pub(crate) fn parent_names(name: &str) -> impl Iterator<Item = &str> {
    name.char_indices()
        .rev()
        .filter(|(_, c)| *c == '.')
        .map(move |(i, _)| &name[..i])
        .filter(|parent| !parent.is_empty())
}

struct HierarchyInner {
    root: Arc<Node>,
    loggers: DashMap<String, Arc<Node>>,
}

/// Registry of category loggers. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct Hierarchy {
    inner: Arc<HierarchyInner>,
}

impl Hierarchy {
    /// Create an empty registry with the root at [`DEFAULT_ROOT_LEVEL`].
    pub fn new() -> Self {
        Self {
            inner: Arc::new(HierarchyInner {
                root: Arc::new(Node::new("", Some(DEFAULT_ROOT_LEVEL))),
                loggers: DashMap::new(),
            }),
        }
    }

    /// The process-wide registry.
    pub fn global() -> &'static Hierarchy {
        static GLOBAL: OnceLock<Hierarchy> = OnceLock::new();
        GLOBAL.get_or_init(Hierarchy::new)
    }

    pub fn root_logger(&self) -> Logger {
        self.handle(self.inner.root.clone())
    }

    /// Get or create the logger with exactly this name. The empty name is the root.
    pub fn get_logger(&self, name: &str) -> Logger {
        if name.is_empty() {
            return self.root_logger();
        }
        if let Some(node) = self.inner.loggers.get(name) {
            return self.handle(node.clone());
        }
        let node = self
            .inner
            .loggers
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(Node::new(name, None)))
            .clone();
        self.handle(node)
    }

    /// Look up a logger without creating it.
    pub fn exists(&self, name: &str) -> Option<Logger> {
        if name.is_empty() {
            return Some(self.root_logger());
        }
        self.inner
            .loggers
            .get(name)
            .map(|node| self.handle(node.clone()))
    }

    /// Every non-root logger created so far.
    pub fn current_loggers(&self) -> Vec<Logger> {
        self.inner
            .loggers
            .iter()
            .map(|entry| self.handle(entry.value().clone()))
            .collect()
    }

    /// Restore the freshly-constructed state: root at the default level, every
    /// logger unset and additive, all appenders closed and removed.
    pub fn reset_configuration(&self) {
        self.inner.root.clear(Some(DEFAULT_ROOT_LEVEL));
        let nodes = self.nodes();
        for node in &nodes {
            node.clear(None);
        }
        tracing::debug!(loggers = nodes.len(), "Category hierarchy reset");
    }

    /// Snapshot of every non-root node. Appenders may log while being closed,
    /// so no shard guard may be held when they run.
    fn nodes(&self) -> Vec<Arc<Node>> {
        self.inner
            .loggers
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    fn handle(&self, node: Arc<Node>) -> Logger {
        Logger {
            node,
            hierarchy: self.clone(),
        }
    }

    fn is_root(&self, node: &Arc<Node>) -> bool {
        Arc::ptr_eq(node, &self.inner.root)
    }

    /// The node, its existing ancestors, then the root.
    fn chain(&self, node: &Arc<Node>) -> Vec<Arc<Node>> {
        let mut chain = vec![node.clone()];
        if self.is_root(node) {
            return chain;
        }
        chain.extend(
            parent_names(&node.name).filter_map(|parent| self.inner.loggers.get(parent).map(|n| n.clone())),
        );
        chain.push(self.inner.root.clone());
        chain
    }

    fn effective_level(&self, node: &Arc<Node>) -> Level {
        if let Some(level) = node.level() {
            return level;
        }
        for parent in parent_names(&node.name) {
            if let Some(level) = self.inner.loggers.get(parent).and_then(|n| n.level()) {
                return level;
            }
        }
        self.inner.root.level().unwrap_or(DEFAULT_ROOT_LEVEL)
    }

    fn dispatch(&self, node: &Arc<Node>, event: &LoggingEvent, dispatch: Dispatch) -> usize {
        let mut delivered = 0;
        for link in self.chain(node) {
            let appenders = link.appenders.load_full();
            for appender in appenders.iter() {
                if dispatch == Dispatch::Injected && appender.bridges() {
                    continue;
                }
                appender.append(event);
                delivered += 1;
            }
            if !link.additive.load(Ordering::Acquire) {
                break;
            }
        }
        delivered
    }
}

impl Default for Hierarchy {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Hierarchy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hierarchy")
            .field("loggers", &self.inner.loggers.len())
            .finish()
    }
}

/// Handle to a named category logger.
#[derive(Clone)]
pub struct Logger {
    node: Arc<Node>,
    hierarchy: Hierarchy,
}

impl Logger {
    pub fn name(&self) -> &str {
        &self.node.name
    }

    /// The explicitly configured level, if any.
    pub fn level(&self) -> Option<Level> {
        self.node.level()
    }

    /// Set or clear the level. The root always keeps a level; clearing it is ignored.
    pub fn set_level(&self, level: Option<Level>) {
        if level.is_none() && self.hierarchy.is_root(&self.node) {
            tracing::debug!("Ignoring attempt to clear the category root level");
            return;
        }
        self.node.level.store(encode(level), Ordering::Release);
    }

    /// Own level, else the nearest configured ancestor's, else the root's.
    pub fn effective_level(&self) -> Level {
        self.hierarchy.effective_level(&self.node)
    }

    pub fn is_enabled_for(&self, level: Level) -> bool {
        level != Level::OFF && level.is_greater_or_equal(self.effective_level())
    }

    pub fn additivity(&self) -> bool {
        self.node.additive.load(Ordering::Acquire)
    }

    /// Whether events continue to ancestor appenders after this logger's.
    pub fn set_additivity(&self, additive: bool) {
        self.node.additive.store(additive, Ordering::Release);
    }

    pub fn add_appender(&self, appender: Arc<dyn Appender>) {
        self.node.appenders.rcu(|current| {
            let mut next = Vec::with_capacity(current.len() + 1);
            next.extend(current.iter().cloned());
            next.push(appender.clone());
            next
        });
    }

    /// Detach an appender by identity. Returns true if it was attached.
    pub fn remove_appender(&self, appender: &Arc<dyn Appender>) -> bool {
        let previous = self.node.appenders.rcu(|current| {
            current
                .iter()
                .filter(|a| !same_sink(*a, appender))
                .cloned()
                .collect::<Vec<_>>()
        });
        previous.iter().any(|a| same_sink(a, appender))
    }

    pub fn remove_all_appenders(&self) {
        self.node.appenders.store(Arc::new(Vec::new()));
    }

    /// Snapshot of the appenders attached directly to this logger.
    pub fn appenders(&self) -> Vec<Arc<dyn Appender>> {
        self.node.appenders.load().iter().cloned().collect()
    }

    /// Emit through this logger, subject to its effective level.
    pub fn log(&self, level: Level, message: impl Into<String>) {
        if self.is_enabled_for(level) {
            self.call_appenders(&LoggingEvent::new(self.name(), level, message));
        }
    }

    pub fn trace(&self, message: impl Into<String>) {
        self.log(Level::TRACE, message);
    }

    pub fn debug(&self, message: impl Into<String>) {
        self.log(Level::DEBUG, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.log(Level::INFO, message);
    }

    pub fn warn(&self, message: impl Into<String>) {
        self.log(Level::WARN, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.log(Level::ERROR, message);
    }

    pub fn fatal(&self, message: impl Into<String>) {
        self.log(Level::FATAL, message);
    }

    /// Native delivery: every appender of this logger and its additive ancestors.
    /// Returns the number of appenders reached.
    pub fn call_appenders(&self, event: &LoggingEvent) -> usize {
        self.hierarchy.dispatch(&self.node, event, Dispatch::Native)
    }

    /// Delivery of an event forwarded from another logging system. No level
    /// check is applied and bridging appenders are skipped.
    pub fn inject(&self, event: &LoggingEvent) -> usize {
        self.hierarchy.dispatch(&self.node, event, Dispatch::Injected)
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.node.name)
            .field("level", &self.level())
            .finish()
    }
}
