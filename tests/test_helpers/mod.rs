//! Scoped process-environment overrides for integration tests.

use std::env;
use std::ffi::OsString;
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

static ENV_MUTEX: OnceLock<Mutex<()>> = OnceLock::new();

/// Holds the environment lock and restores overridden variables on drop.
pub struct ScopedEnv {
    saved: Vec<(OsString, Option<OsString>)>,
    _lock: MutexGuard<'static, ()>,
}

impl ScopedEnv {
    /// Applies `overrides`; `None` removes the variable.
    pub fn apply(overrides: &[(&str, Option<&str>)]) -> Self {
        let lock = ENV_MUTEX
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let saved = overrides
            .iter()
            .map(|(key, value)| {
                let previous = env::var_os(key);
                // SAFETY: the global mutex serializes environment mutations in tests.
                unsafe { write_var(OsString::from(key), value.map(OsString::from)) };
                (OsString::from(key), previous)
            })
            .collect();
        Self { saved, _lock: lock }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (key, previous) in self.saved.drain(..).rev() {
            // SAFETY: the lock is still held while the guard is alive.
            unsafe { write_var(key, previous) };
        }
    }
}

unsafe fn write_var(key: OsString, value: Option<OsString>) {
    // SAFETY: callers hold the environment mutex.
    unsafe {
        match value {
            Some(inner) => env::set_var(&key, inner),
            None => env::remove_var(&key),
        }
    }
}
