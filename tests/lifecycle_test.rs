//! Installation, removal and configuration-driven startup.

use std::fs;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use logbridge::category::Hierarchy;
use logbridge::config::parse_config_with;
use logbridge::convert::ConverterRegistry;
use logbridge::lifecycle::{self, InstallMode};
use logbridge::platform::{self, Handler, LogManager};
use logbridge::{Bridge, Installation};

mod common;

use common::{AssertionHandler, Fixture, MockAppender};

/// Serializes tests that touch the global bridge.
static GLOBAL: Mutex<()> = Mutex::new(());

fn global_lock() -> MutexGuard<'static, ()> {
    GLOBAL.lock().unwrap_or_else(PoisonError::into_inner)
}

fn handler_ptrs(handlers: &[Arc<dyn Handler>]) -> Vec<*const ()> {
    handlers.iter().map(|h| Arc::as_ptr(h) as *const ()).collect()
}

#[test]
fn test_double_install_attaches_one_handler() {
    let fixture = Fixture::new();

    assert_eq!(fixture.bridge.assimilate(), Installation::Installed);
    assert_eq!(fixture.bridge.assimilate(), Installation::AlreadyInstalled);

    fixture.platform_logger("svc").info("once");
    assert_eq!(fixture.appender.messages(), vec!["once"]);
    assert_eq!(fixture.manager.root_logger().handlers().len(), 1);
}

#[test]
fn test_uninstall_when_not_installed_is_noop() {
    let fixture = Fixture::new();
    let existing = AssertionHandler::new();
    fixture.manager.root_logger().add_handler(existing.clone());

    assert!(!fixture.bridge.repatriate());
    assert_eq!(fixture.manager.root_logger().handlers().len(), 1);
}

#[test]
fn test_install_cycles_restore_root_handlers() {
    let fixture = Fixture::new();
    let root = fixture.manager.root_logger();
    let first = AssertionHandler::new();
    let second = AssertionHandler::new();
    root.add_handler(first.clone());
    root.add_handler(second.clone());
    let before = handler_ptrs(&root.handlers());

    for _ in 0..3 {
        fixture.bridge.assimilate();
        fixture.platform_logger("cycle").severe("while installed");
        assert!(fixture.bridge.repatriate());
        assert_eq!(handler_ptrs(&root.handlers()), before);
        assert_eq!(root.level(), Some(platform::Level::INFO));
    }

    // The displaced handlers saw nothing while the bridge was exclusive.
    assert_eq!(first.len(), 0);
    assert_eq!(fixture.appender.len(), 3);

    fixture.platform_logger("cycle").severe("after");
    first.assert_messages(&["after"]);
    second.assert_messages(&["after"]);
    assert_eq!(fixture.appender.len(), 3);
}

#[test]
fn test_replace_keeps_single_handler() {
    let fixture = Fixture::new();
    fixture.bridge.assimilate();

    assert_eq!(fixture.bridge.install(InstallMode::Replace), Installation::Replaced);

    fixture.platform_logger("svc").info("one copy");
    assert_eq!(fixture.appender.len(), 1);
    assert!(fixture.bridge.repatriate());
    assert!(fixture.manager.root_logger().handlers().is_empty());
}

#[test]
fn test_second_bridge_over_same_manager_sees_installation() {
    let fixture = Fixture::new();
    let other = Bridge::new(fixture.hierarchy.clone(), fixture.manager.clone());
    let existing = AssertionHandler::new();
    fixture.manager.root_logger().add_handler(existing.clone());

    assert_eq!(fixture.bridge.assimilate(), Installation::Installed);
    assert_eq!(other.assimilate(), Installation::AlreadyInstalled);
    assert!(other.is_installed());

    fixture.platform_logger("svc").warning("once");
    assert_eq!(fixture.appender.messages(), vec!["once"]);

    // Either bridge may remove the shared installation, but only once.
    assert!(other.repatriate());
    assert!(!fixture.bridge.repatriate());
    assert!(!fixture.bridge.is_installed());

    fixture.platform_logger("svc").warning("direct");
    assert_eq!(fixture.appender.len(), 1);
    existing.assert_messages(&["direct"]);
    assert_eq!(fixture.manager.root_logger().handlers().len(), 1);
}

#[test]
fn test_concurrent_installs_attach_one_handler() {
    let fixture = Arc::new(Fixture::new());

    let results: Vec<Installation> = (0..8)
        .map(|_| {
            let fixture = fixture.clone();
            std::thread::spawn(move || fixture.bridge.assimilate())
        })
        .collect::<Vec<_>>()
        .into_iter()
        .map(|h| h.join().unwrap())
        .collect();

    assert_eq!(results.iter().filter(|r| **r == Installation::Installed).count(), 1);
    assert_eq!(fixture.manager.root_logger().handlers().len(), 1);
}

#[test]
fn test_config_driven_startup() {
    let registry = ConverterRegistry::new();
    let config = parse_config_with(
        r#"
        [inbound]
        enabled = true
        level_converter = "default"

        [[outbound]]
        logger = "app"
        "#,
        &registry,
    )
    .unwrap();

    let hierarchy = Hierarchy::new();
    let manager = LogManager::new();
    let appender = MockAppender::new();
    hierarchy.root_logger().add_appender(appender.clone());
    let bridge = Bridge::new(hierarchy.clone(), manager.clone());

    let applied = lifecycle::apply_with(&config, &bridge, &registry).unwrap();
    assert_eq!(applied.inbound, Some(Installation::Installed));

    manager.get_logger("foo").unwrap().info("boo");

    let events = appender.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].logger_name, "foo");
    assert_eq!(events[0].message, "boo");
}

#[test]
fn test_start_from_file() {
    let path = std::env::temp_dir().join(format!("logbridge-start-{}.toml", std::process::id()));
    fs::write(&path, "[inbound]\ninstall_mode = \"keep-existing\"\n").unwrap();

    let fixture = Fixture::new();
    let applied = lifecycle::start(&path, &fixture.bridge);
    let _ = fs::remove_file(&path);

    assert_eq!(applied.unwrap().inbound, Some(Installation::Installed));
    fixture.platform_logger("foo").info("boo");
    assert_eq!(fixture.appender.len(), 1);
}

#[test]
fn test_global_bridge_round_trip() {
    let _guard = global_lock();
    let appender = MockAppender::new();
    let category_logger = Hierarchy::global().get_logger("global.roundtrip");
    category_logger.add_appender(appender.clone());
    let platform_logger = LogManager::global().get_logger("global.roundtrip").unwrap();

    assert_eq!(lifecycle::assimilate(), Installation::Installed);
    assert_eq!(lifecycle::assimilate(), Installation::AlreadyInstalled);
    assert!(lifecycle::global_bridge().is_installed());

    platform_logger.warning("bridged");
    assert_eq!(appender.messages(), vec!["bridged"]);

    assert!(lifecycle::repatriate());
    assert!(!lifecycle::repatriate());

    platform_logger.warning("not bridged");
    assert_eq!(appender.len(), 1);
    category_logger.remove_all_appenders();
}
