//! The ambient deploy context used by deploys invoked without an explicit
//! state and host, as happens when they are driven from the command line.
//!
//! There is a single slot per process. It is filled with [`activate`] and
//! emptied when the returned guard is dropped (or by [`clear`]).

use crate::api::host::Host;
use crate::api::state::State;
use log::debug;
use std::sync::{Arc, PoisonError, RwLock};

#[derive(Clone)]
pub struct DeployContext {
    pub state: Arc<State>,
    pub host: Arc<Host>,
}

static CURRENT: RwLock<Option<DeployContext>> = RwLock::new(None);

pub fn set(state: Arc<State>, host: Arc<Host>) {
    debug!("Setting deploy context to {}", host.name);
    *CURRENT.write().unwrap_or_else(PoisonError::into_inner) = Some(DeployContext { state, host });
}

pub fn clear() {
    *CURRENT.write().unwrap_or_else(PoisonError::into_inner) = None;
}

pub fn current() -> Option<DeployContext> {
    CURRENT
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

pub fn is_active() -> bool {
    CURRENT
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .is_some()
}

pub fn activate(state: Arc<State>, host: Arc<Host>) -> ContextGuard {
    set(state, host);
    ContextGuard { _private: () }
}

#[must_use = "the ambient context is cleared as soon as this guard is dropped"]
pub struct ContextGuard {
    _private: (),
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        clear();
    }
}

/// Serializes unit tests that touch the process-wide slot.
#[cfg(test)]
pub(crate) fn test_lock() -> std::sync::MutexGuard<'static, ()> {
    static LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
    LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::inventory::Inventory;

    #[test]
    fn test_activate_and_drop() {
        let _lock = test_lock();
        let state = Arc::new(State::new(Inventory::default()));
        let host = Arc::new(Host::new("web1"));

        assert!(!is_active());
        {
            let _context = activate(state.clone(), host.clone());
            let context = current().unwrap();
            assert!(Arc::ptr_eq(&context.state, &state));
            assert_eq!(context.host.name, "web1");
        }
        assert!(!is_active());
        assert!(current().is_none());
    }

    #[test]
    fn test_set_replaces_previous_context() {
        let _lock = test_lock();
        let state = Arc::new(State::new(Inventory::default()));

        set(state.clone(), Arc::new(Host::new("web1")));
        set(state, Arc::new(Host::new("web2")));
        assert_eq!(current().unwrap().host.name, "web2");

        clear();
        assert!(!is_active());
    }
}
