//! Installation state of the inbound bridge.
//!
//! # Responsibilities
//! - Attach one [`InboundHandler`] to the platform root, at most once
//! - Optionally detach the root's existing handlers and override its level
//! - Put everything back on repatriation
//!
//! # Design Decisions
//! - The installation slot lives on the `LogManager`, so bridges built over
//!   the same manager can never attach two handlers
//! - One mutex (the slot's) serializes install and uninstall; `is_installed`
//!   reads an atomic and never blocks
//! - The manager remembers exactly what was displaced, so an install/uninstall
//!   cycle leaves the platform root as it found it
//! - Bridges over private registries are independent of the global one

use std::fmt;
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};

use crate::bridge::InboundHandler;
use crate::category::Hierarchy;
use crate::convert::EventConverter;
use crate::observability::metrics;
use crate::platform::manager::RootBridge;
use crate::platform::{self, Handler, LogManager};

/// Behaviour of an install request when the bridge is already installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum InstallMode {
    /// Leave the current handler in place.
    #[default]
    KeepExisting,
    /// Swap in a freshly built handler.
    Replace,
}

/// What an install request did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Installation {
    Installed,
    AlreadyInstalled,
    Replaced,
}

/// Settings applied at installation.
#[derive(Debug, Clone)]
pub struct BridgeOptions {
    /// Detach the platform root's handlers while installed.
    pub exclusive: bool,

    /// Platform root level while installed; `None` leaves it alone.
    pub platform_root_level: Option<platform::Level>,

    /// Converter used by the inbound handler.
    pub converter: EventConverter,
}

impl Default for BridgeOptions {
    fn default() -> Self {
        Self {
            exclusive: true,
            platform_root_level: Some(platform::Level::ALL),
            converter: EventConverter::default(),
        }
    }
}

/// Installs and removes the inbound bridge for one pair of registries.
///
/// The installation itself belongs to the log manager: every `Bridge` over
/// the same manager sees and controls the same root handler.
pub struct Bridge {
    hierarchy: Hierarchy,
    manager: LogManager,
    options: BridgeOptions,
}

impl Bridge {
    pub fn new(hierarchy: Hierarchy, manager: LogManager) -> Self {
        Self::with_options(hierarchy, manager, BridgeOptions::default())
    }

    pub fn with_options(hierarchy: Hierarchy, manager: LogManager, options: BridgeOptions) -> Self {
        Self {
            hierarchy,
            manager,
            options,
        }
    }

    pub fn hierarchy(&self) -> &Hierarchy {
        &self.hierarchy
    }

    pub fn manager(&self) -> &LogManager {
        &self.manager
    }

    pub fn options(&self) -> &BridgeOptions {
        &self.options
    }

    /// Whether an inbound bridge is attached to this bridge's platform root.
    pub fn is_installed(&self) -> bool {
        self.manager.has_root_bridge()
    }

    /// The handler currently attached to the platform root, if installed.
    pub fn handler(&self) -> Option<Arc<dyn Handler>> {
        self.manager
            .root_bridge()
            .as_ref()
            .map(|installed| installed.handler.clone())
    }

    /// Install with the bridge's own options, keeping an existing installation.
    pub fn assimilate(&self) -> Installation {
        self.install(InstallMode::KeepExisting)
    }

    pub fn install(&self, mode: InstallMode) -> Installation {
        let options = self.options.clone();
        self.install_with(mode, &options)
    }

    /// Install using `options` instead of the bridge's own.
    ///
    /// On [`InstallMode::Replace`] only the converter of `options` is used;
    /// what the first installation displaced stays remembered.
    pub fn install_with(&self, mode: InstallMode, options: &BridgeOptions) -> Installation {
        let mut slot = self.manager.root_bridge();
        let root = self.manager.root_logger();

        if let Some(current) = slot.as_mut() {
            if mode == InstallMode::KeepExisting {
                tracing::debug!("Inbound bridge already installed");
                return Installation::AlreadyInstalled;
            }
            let handler = self.build_handler(options);
            root.remove_handler(&current.handler);
            root.add_handler(handler.clone());
            current.handler = handler;
            tracing::info!("Inbound bridge handler replaced");
            return Installation::Replaced;
        }

        // Bridging handlers stay: displacing one would resurrect it on repatriation.
        let displaced = if options.exclusive {
            root.take_handlers_matching(|h| !h.bridges())
        } else {
            Vec::new()
        };
        let previous_root_level = options.platform_root_level.map(|level| {
            let previous = root.effective_level();
            root.set_level(Some(level));
            previous
        });

        let handler = self.build_handler(options);
        root.add_handler(handler.clone());
        let displaced_count = displaced.len();
        *slot = Some(RootBridge {
            handler,
            displaced,
            previous_root_level,
        });
        self.manager.set_bridged(true);
        metrics::record_installed(true);

        tracing::info!(
            exclusive = options.exclusive,
            displaced = displaced_count,
            root_level = ?options.platform_root_level,
            "Inbound bridge installed"
        );
        Installation::Installed
    }

    /// Remove the bridge and restore what it displaced. False if not installed.
    pub fn repatriate(&self) -> bool {
        let mut slot = self.manager.root_bridge();
        let Some(installed) = slot.take() else {
            return false;
        };

        let root = self.manager.root_logger();
        root.remove_handler(&installed.handler);
        let restored = installed.displaced.len();
        for handler in installed.displaced {
            root.add_handler(handler);
        }
        if let Some(level) = installed.previous_root_level {
            root.set_level(Some(level));
        }

        self.manager.set_bridged(false);
        metrics::record_installed(false);
        tracing::info!(restored_handlers = restored, "Inbound bridge removed");
        true
    }

    fn build_handler(&self, options: &BridgeOptions) -> Arc<dyn Handler> {
        Arc::new(InboundHandler::new(self.hierarchy.clone(), options.converter.clone()))
    }
}

impl fmt::Debug for Bridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bridge")
            .field("installed", &self.is_installed())
            .field("options", &self.options)
            .finish()
    }
}

/// The bridge over the global hierarchy and log manager.
pub fn global_bridge() -> &'static Bridge {
    static GLOBAL: OnceLock<Bridge> = OnceLock::new();
    GLOBAL.get_or_init(|| Bridge::new(Hierarchy::global().clone(), LogManager::global().clone()))
}

/// Install the global bridge if it is not installed yet.
pub fn assimilate() -> Installation {
    global_bridge().assimilate()
}

/// Remove the global bridge. False if it was not installed.
pub fn repatriate() -> bool {
    global_bridge().repatriate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::{Appender, LoggingEvent};
    use crate::platform::LogRecord;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Noop;

    impl Handler for Noop {
        fn publish(&self, _record: &LogRecord) {}
    }

    struct ForeignBridge;

    impl Handler for ForeignBridge {
        fn publish(&self, _record: &LogRecord) {}

        fn bridges(&self) -> bool {
            true
        }
    }

    #[derive(Default)]
    struct Count(AtomicUsize);

    impl Appender for Count {
        fn append(&self, _event: &LoggingEvent) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn bridging_handlers(manager: &LogManager) -> usize {
        manager
            .root_logger()
            .handlers()
            .iter()
            .filter(|h| h.bridges())
            .count()
    }

    fn bridge() -> Bridge {
        Bridge::new(Hierarchy::new(), LogManager::new())
    }

    #[test]
    fn test_install_is_idempotent() {
        let bridge = bridge();
        assert_eq!(bridge.assimilate(), Installation::Installed);
        assert_eq!(bridge.assimilate(), Installation::AlreadyInstalled);
        assert!(bridge.is_installed());
        assert_eq!(bridge.manager().root_logger().handlers().len(), 1);
    }

    #[test]
    fn test_repatriate_without_install_is_noop() {
        let bridge = bridge();
        assert!(!bridge.repatriate());
        assert!(!bridge.is_installed());
    }

    #[test]
    fn test_cycle_restores_root() {
        let bridge = bridge();
        let root = bridge.manager().root_logger();
        let original: Arc<dyn Handler> = Arc::new(Noop);
        root.add_handler(original.clone());

        bridge.assimilate();
        assert_eq!(root.handlers().len(), 1);
        assert!(root.handlers()[0].bridges());
        assert_eq!(root.level(), Some(platform::Level::ALL));

        assert!(bridge.repatriate());
        let handlers = root.handlers();
        assert_eq!(handlers.len(), 1);
        assert!(Arc::as_ptr(&handlers[0]) as *const () == Arc::as_ptr(&original) as *const ());
        assert_eq!(root.level(), Some(platform::Level::INFO));
    }

    #[test]
    fn test_non_exclusive_keeps_existing_handlers() {
        let options = BridgeOptions {
            exclusive: false,
            platform_root_level: None,
            ..BridgeOptions::default()
        };
        let bridge = Bridge::with_options(Hierarchy::new(), LogManager::new(), options);
        let root = bridge.manager().root_logger();
        root.add_handler(Arc::new(Noop));

        bridge.assimilate();

        assert_eq!(root.handlers().len(), 2);
        assert_eq!(root.level(), Some(platform::Level::INFO));
    }

    #[test]
    fn test_replace_swaps_handler() {
        let bridge = bridge();
        bridge.assimilate();
        let first = bridge.handler().unwrap();

        assert_eq!(bridge.install(InstallMode::Replace), Installation::Replaced);

        let second = bridge.handler().unwrap();
        assert!(Arc::as_ptr(&first) as *const () != Arc::as_ptr(&second) as *const ());
        assert_eq!(bridge.manager().root_logger().handlers().len(), 1);
    }

    #[test]
    fn test_replace_when_not_installed_installs() {
        let bridge = bridge();
        assert_eq!(bridge.install(InstallMode::Replace), Installation::Installed);
    }

    #[test]
    fn test_bridges_over_one_manager_share_installation() {
        let hierarchy = Hierarchy::new();
        let manager = LogManager::new();
        let count = Arc::new(Count::default());
        hierarchy.root_logger().add_appender(count.clone());
        let options = BridgeOptions {
            exclusive: false,
            ..BridgeOptions::default()
        };
        let first = Bridge::with_options(hierarchy.clone(), manager.clone(), options.clone());
        let second = Bridge::with_options(hierarchy.clone(), manager.clone(), options);

        assert_eq!(first.assimilate(), Installation::Installed);
        assert_eq!(second.assimilate(), Installation::AlreadyInstalled);
        assert!(second.is_installed());

        manager.get_logger("shared").unwrap().warning("once");

        assert_eq!(count.0.load(Ordering::SeqCst), 1);
        assert_eq!(bridging_handlers(&manager), 1);
    }

    #[test]
    fn test_exclusive_bridges_over_one_manager_leave_nothing_behind() {
        let hierarchy = Hierarchy::new();
        let manager = LogManager::new();
        let count = Arc::new(Count::default());
        hierarchy.root_logger().add_appender(count.clone());
        let first = Bridge::new(hierarchy.clone(), manager.clone());
        let second = Bridge::new(hierarchy.clone(), manager.clone());

        first.assimilate();
        second.assimilate();
        assert!(first.repatriate());
        assert!(!second.repatriate());

        assert!(!first.is_installed());
        assert!(!second.is_installed());
        assert_eq!(bridging_handlers(&manager), 0);
        manager.get_logger("after").unwrap().severe("not forwarded");
        assert_eq!(count.0.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_exclusive_install_keeps_other_bridging_handlers() {
        let bridge = bridge();
        let root = bridge.manager().root_logger();
        root.add_handler(Arc::new(ForeignBridge));
        root.add_handler(Arc::new(Noop));

        bridge.assimilate();
        assert_eq!(root.handlers().len(), 2);
        assert_eq!(bridging_handlers(bridge.manager()), 2);

        bridge.repatriate();
        let handlers = root.handlers();
        assert_eq!(handlers.len(), 2);
        assert_eq!(bridging_handlers(bridge.manager()), 1);
    }

    #[test]
    fn test_manager_reset_clears_installation() {
        let bridge = bridge();
        bridge.assimilate();

        bridge.manager().reset();

        assert!(!bridge.is_installed());
        assert!(!bridge.repatriate());
        assert_eq!(bridge.assimilate(), Installation::Installed);
    }
}
