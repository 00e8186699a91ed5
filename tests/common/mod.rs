//! Shared utilities for integration testing.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use logbridge::category::{self, Appender, Hierarchy, LoggingEvent};
use logbridge::observability::diagnostics;
use logbridge::platform::{Handler, LogManager, LogRecord};
use logbridge::Bridge;
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

/// Category appender that keeps every event it receives.
#[derive(Default)]
pub struct MockAppender {
    events: Mutex<Vec<LoggingEvent>>,
}

#[allow(dead_code)]
impl MockAppender {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<LoggingEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.events().into_iter().map(|e| e.message).collect()
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap().len()
    }
}

impl Appender for MockAppender {
    fn append(&self, event: &LoggingEvent) {
        self.events.lock().unwrap().push(event.clone());
    }

    fn name(&self) -> Option<&str> {
        Some("mock")
    }
}

/// Platform handler that keeps every record it receives.
#[derive(Default)]
pub struct AssertionHandler {
    records: Mutex<Vec<LogRecord>>,
}

#[allow(dead_code)]
impl AssertionHandler {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn assert_messages(&self, expected: &[&str]) {
        let actual: Vec<String> = self.records().into_iter().map(|r| r.message).collect();
        assert_eq!(actual, expected);
    }
}

impl Handler for AssertionHandler {
    fn publish(&self, record: &LogRecord) {
        self.records.lock().unwrap().push(record.clone());
    }
}

/// Private registries with a bridge over them and a mock appender on the
/// category root.
#[allow(dead_code)]
pub struct Fixture {
    pub hierarchy: Hierarchy,
    pub manager: LogManager,
    pub bridge: Bridge,
    pub appender: Arc<MockAppender>,
}

#[allow(dead_code)]
impl Fixture {
    pub fn new() -> Self {
        let hierarchy = Hierarchy::new();
        let manager = LogManager::new();
        let appender = MockAppender::new();
        hierarchy.root_logger().add_appender(appender.clone());
        let bridge = Bridge::new(hierarchy.clone(), manager.clone());
        Self {
            hierarchy,
            manager,
            bridge,
            appender,
        }
    }

    pub fn platform_logger(&self, name: &str) -> logbridge::platform::Logger {
        self.manager.get_logger(name).unwrap()
    }

    pub fn category_logger(&self, name: &str) -> category::Logger {
        self.hierarchy.get_logger(name)
    }
}

struct DiagnosticCounter {
    count: Arc<AtomicUsize>,
}

impl<S: Subscriber> Layer<S> for DiagnosticCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if event.metadata().target() == diagnostics::TARGET {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// Run `f` on this thread and count the diagnostics it reports.
#[allow(dead_code)]
pub fn count_diagnostics<R>(f: impl FnOnce() -> R) -> (R, usize) {
    let count = Arc::new(AtomicUsize::new(0));
    let subscriber = tracing_subscriber::registry().with(DiagnosticCounter {
        count: count.clone(),
    });
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, count.load(Ordering::SeqCst))
}
