//! Platform logger registry.
//!
//! # Responsibilities
//! - Create platform loggers lazily by name
//! - Gate records on effective level, then on the logger's filter
//! - Publish records to the handlers of a logger and its parents
//!
//! # Design Decisions
//! - Same storage scheme as the category hierarchy: `DashMap` registry,
//!   atomics for levels and flags, `ArcSwap` snapshots for handlers and filters
//! - A closed manager hands out no loggers; callers treat that as "logging
//!   system inactive" rather than an error
//! - Injected records skip bridging handlers and get the injected decision of
//!   the logger's filter, so they can never be forwarded back out

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use arc_swap::ArcSwap;
use dashmap::DashMap;

use super::{Level, LogRecord};
use crate::category::hierarchy::{parent_names, same_sink};

const UNSET: i64 = i64::MIN;

/// Root level after construction and after a reset.
pub const DEFAULT_ROOT_LEVEL: Level = Level::INFO;

/// A destination for platform records.
pub trait Handler: Send + Sync {
    fn publish(&self, record: &LogRecord);

    fn flush(&self) {}

    fn close(&self) {}

    /// True for handlers that forward into another logging system.
    ///
    /// Injected records are never published to a bridging handler.
    fn bridges(&self) -> bool {
        false
    }
}

/// Per-logger accept/reject hook, consulted after the level gate.
pub trait Filter: Send + Sync {
    fn is_loggable(&self, record: &LogRecord) -> bool;

    /// Decision for a record injected from another logging system.
    ///
    /// Bridging filters override this to answer without forwarding.
    fn is_loggable_injected(&self, record: &LogRecord) -> bool {
        self.is_loggable(record)
    }
}

impl<F> Filter for F
where
    F: Fn(&LogRecord) -> bool + Send + Sync,
{
    fn is_loggable(&self, record: &LogRecord) -> bool {
        self(record)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dispatch {
    Native,
    Injected,
}

struct Node {
    name: String,
    level: AtomicI64,
    use_parent_handlers: AtomicBool,
    filter: ArcSwap<Option<Arc<dyn Filter>>>,
    handlers: ArcSwap<Vec<Arc<dyn Handler>>>,
}

impl Node {
    fn new(name: &str, level: Option<Level>) -> Self {
        Self {
            name: name.to_string(),
            level: AtomicI64::new(encode(level)),
            use_parent_handlers: AtomicBool::new(true),
            filter: ArcSwap::from_pointee(None),
            handlers: ArcSwap::from_pointee(Vec::new()),
        }
    }

    fn level(&self) -> Option<Level> {
        let raw = self.level.load(Ordering::Acquire);
        if raw == UNSET {
            None
        } else {
            i32::try_from(raw).ok().map(Level::custom)
        }
    }

    fn close_handlers(&self) {
        let previous = self.handlers.swap(Arc::new(Vec::new()));
        for handler in previous.iter() {
            handler.flush();
            handler.close();
        }
    }

    fn clear(&self, level: Option<Level>) {
        self.level.store(encode(level), Ordering::Release);
        self.use_parent_handlers.store(true, Ordering::Release);
        self.filter.store(Arc::new(None));
        self.close_handlers();
    }
}

fn encode(level: Option<Level>) -> i64 {
    level.map_or(UNSET, |l| i64::from(l.rank()))
}

/// The inbound bridge attached to the root, with what it displaced.
pub(crate) struct RootBridge {
    pub(crate) handler: Arc<dyn Handler>,
    pub(crate) displaced: Vec<Arc<dyn Handler>>,
    pub(crate) previous_root_level: Option<Level>,
}

struct ManagerInner {
    root: Arc<Node>,
    loggers: DashMap<String, Arc<Node>>,
    closed: AtomicBool,
    /// At most one inbound bridge per manager, whoever installed it.
    root_bridge: Mutex<Option<RootBridge>>,
    bridged: AtomicBool,
}

/// Registry of platform loggers. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct LogManager {
    inner: Arc<ManagerInner>,
}

impl LogManager {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(ManagerInner {
                root: Arc::new(Node::new("", Some(DEFAULT_ROOT_LEVEL))),
                loggers: DashMap::new(),
                closed: AtomicBool::new(false),
                root_bridge: Mutex::new(None),
                bridged: AtomicBool::new(false),
            }),
        }
    }

    /// The process-wide manager.
    pub fn global() -> &'static LogManager {
        static GLOBAL: OnceLock<LogManager> = OnceLock::new();
        GLOBAL.get_or_init(LogManager::new)
    }

    pub fn root_logger(&self) -> Logger {
        self.handle(self.inner.root.clone())
    }

    /// Get or create a logger. `None` once the manager has been closed.
    pub fn get_logger(&self, name: &str) -> Option<Logger> {
        if !self.is_active() {
            return None;
        }
        if name.is_empty() {
            return Some(self.root_logger());
        }
        if let Some(node) = self.inner.loggers.get(name) {
            return Some(self.handle(node.clone()));
        }
        let node = self
            .inner
            .loggers
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(Node::new(name, None)))
            .clone();
        Some(self.handle(node))
    }

    pub fn is_active(&self) -> bool {
        !self.inner.closed.load(Ordering::Acquire)
    }

    /// Flush and close every handler and stop handing out loggers.
    pub fn close(&self) {
        self.inner.closed.store(true, Ordering::Release);
        self.inner.root.close_handlers();
        for node in self.nodes() {
            node.close_handlers();
        }
        tracing::debug!("Platform log manager closed");
    }

    /// Return to the freshly-constructed state and reopen if closed.
    pub fn reset(&self) {
        self.inner.root.clear(Some(DEFAULT_ROOT_LEVEL));
        let nodes = self.nodes();
        for node in &nodes {
            node.clear(None);
        }
        self.inner.closed.store(false, Ordering::Release);

        let bridge = self.root_bridge().take();
        self.set_bridged(false);
        if let Some(bridge) = bridge {
            for handler in bridge.displaced {
                handler.flush();
                handler.close();
            }
        }
        tracing::debug!(loggers = nodes.len(), "Platform log manager reset");
    }

    /// Whether an inbound bridge is attached to the root.
    pub fn has_root_bridge(&self) -> bool {
        self.inner.bridged.load(Ordering::Acquire)
    }

    /// Installation slot shared by every bridge over this manager.
    pub(crate) fn root_bridge(&self) -> MutexGuard<'_, Option<RootBridge>> {
        self.inner
            .root_bridge
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn set_bridged(&self, bridged: bool) {
        self.inner.bridged.store(bridged, Ordering::Release);
    }

    /// Snapshot of every non-root node, so handlers run without shard guards held.
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
            manager: self.clone(),
        }
    }

    fn is_root(&self, node: &Arc<Node>) -> bool {
        Arc::ptr_eq(node, &self.inner.root)
    }

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

    fn dispatch(&self, node: &Arc<Node>, record: &LogRecord, dispatch: Dispatch) -> usize {
        let filter = node.filter.load_full();
        if let Some(filter) = &*filter {
            let accepted = match dispatch {
                Dispatch::Native => filter.is_loggable(record),
                Dispatch::Injected => filter.is_loggable_injected(record),
            };
            if !accepted {
                return 0;
            }
        }

        let mut published = 0;
        for link in self.chain(node) {
            let handlers = link.handlers.load_full();
            for handler in handlers.iter() {
                if dispatch == Dispatch::Injected && handler.bridges() {
                    continue;
                }
                handler.publish(record);
                published += 1;
            }
            if !link.use_parent_handlers.load(Ordering::Acquire) {
                break;
            }
        }
        published
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LogManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogManager")
            .field("loggers", &self.inner.loggers.len())
            .field("active", &self.is_active())
            .finish()
    }
}

/// Handle to a named platform logger.
#[derive(Clone)]
pub struct Logger {
    node: Arc<Node>,
    manager: LogManager,
}

impl Logger {
    pub fn name(&self) -> &str {
        &self.node.name
    }

    pub fn level(&self) -> Option<Level> {
        self.node.level()
    }

    /// Set or clear the level. Clearing the root level is ignored.
    pub fn set_level(&self, level: Option<Level>) {
        if level.is_none() && self.manager.is_root(&self.node) {
            return;
        }
        self.node.level.store(encode(level), Ordering::Release);
    }

    pub fn effective_level(&self) -> Level {
        self.manager.effective_level(&self.node)
    }

    /// Whether a record at `level` passes this logger's level gate.
    pub fn is_loggable(&self, level: Level) -> bool {
        let effective = self.effective_level();
        effective != Level::OFF && level >= effective
    }

    pub fn filter(&self) -> Option<Arc<dyn Filter>> {
        let current = self.node.filter.load();
        Option::clone(&current)
    }

    /// Replace the filter, returning the previous one.
    pub fn set_filter(&self, filter: Option<Arc<dyn Filter>>) -> Option<Arc<dyn Filter>> {
        let previous = self.node.filter.swap(Arc::new(filter));
        Option::clone(&previous)
    }

    pub fn use_parent_handlers(&self) -> bool {
        self.node.use_parent_handlers.load(Ordering::Acquire)
    }

    pub fn set_use_parent_handlers(&self, value: bool) {
        self.node.use_parent_handlers.store(value, Ordering::Release);
    }

    pub fn add_handler(&self, handler: Arc<dyn Handler>) {
        self.node.handlers.rcu(|current| {
            let mut next = Vec::with_capacity(current.len() + 1);
            next.extend(current.iter().cloned());
            next.push(handler.clone());
            next
        });
    }

    /// Detach a handler by identity. Returns true if it was attached.
    pub fn remove_handler(&self, handler: &Arc<dyn Handler>) -> bool {
        let previous = self.node.handlers.rcu(|current| {
            current
                .iter()
                .filter(|h| !same_sink(*h, handler))
                .cloned()
                .collect::<Vec<_>>()
        });
        previous.iter().any(|h| same_sink(h, handler))
    }

    /// Detach and return every handler attached directly to this logger.
    pub fn take_handlers(&self) -> Vec<Arc<dyn Handler>> {
        let previous = self.node.handlers.swap(Arc::new(Vec::new()));
        previous.iter().cloned().collect()
    }

    /// Detach and return the handlers matching `pred`; the rest keep their order.
    pub fn take_handlers_matching<P>(&self, pred: P) -> Vec<Arc<dyn Handler>>
    where
        P: Fn(&Arc<dyn Handler>) -> bool,
    {
        let previous = self.node.handlers.rcu(|current| {
            current
                .iter()
                .filter(|h| !pred(*h))
                .cloned()
                .collect::<Vec<_>>()
        });
        previous.iter().filter(|h| pred(*h)).cloned().collect()
    }

    pub fn handlers(&self) -> Vec<Arc<dyn Handler>> {
        self.node.handlers.load().iter().cloned().collect()
    }

    /// Emit through this logger, subject to its level gate and filter.
    pub fn log(&self, level: Level, message: impl Into<String>) {
        if !self.is_loggable(level) {
            return;
        }
        self.log_record(LogRecord::new(level, message).with_logger_name(self.name()));
    }

    pub fn finest(&self, message: impl Into<String>) {
        self.log(Level::FINEST, message);
    }

    pub fn finer(&self, message: impl Into<String>) {
        self.log(Level::FINER, message);
    }

    pub fn fine(&self, message: impl Into<String>) {
        self.log(Level::FINE, message);
    }

    pub fn config(&self, message: impl Into<String>) {
        self.log(Level::CONFIG, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.log(Level::INFO, message);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.log(Level::WARNING, message);
    }

    pub fn severe(&self, message: impl Into<String>) {
        self.log(Level::SEVERE, message);
    }

    /// Native publication of a prepared record: filter, then handlers of this
    /// logger and its parents. The level gate is the caller's job.
    pub fn log_record(&self, record: LogRecord) -> usize {
        self.manager.dispatch(&self.node, &record, Dispatch::Native)
    }

    /// Publication of a record forwarded from another logging system.
    ///
    /// The level gate and filter still apply; bridging handlers are skipped.
    pub fn inject(&self, record: LogRecord) -> usize {
        if !self.is_loggable(record.level) {
            return 0;
        }
        self.manager.dispatch(&self.node, &record, Dispatch::Injected)
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
