//! Thread-local diagnostic contexts.
//!
//! A nested diagnostic context ([`Ndc`]) is a stack of strings, a mapped diagnostic context
//! ([`Mdc`]) is a key-value map. Both belong to the current thread, and are captured
//! into each [`LogEvent`](crate::LogEvent) that is created from a `log::Record` on that thread.
//! They are rendered with `%x` and `%X{key}`.
//!
//! ```rust
//! use secure_layout::diagnostic::{Mdc, Ndc};
//!
//! Mdc::put("user", "karl");
//! let _guard = Ndc::push("request 42");
//! log::info!("handling request");   // renders "request 42" for %x, "karl" for %X{user}
//! ```
use std::{cell::RefCell, collections::BTreeMap};

thread_local! {
    static NDC: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
    static MDC: RefCell<BTreeMap<String, String>> = const { RefCell::new(BTreeMap::new()) };
}

/// Nested diagnostic context of the current thread.
pub struct Ndc;
impl Ndc {
    /// Pushes a new context level; it is popped when the returned guard is dropped.
    #[must_use = "the context is popped immediately if the guard is not kept"]
    pub fn push<S: Into<String>>(context: S) -> NdcGuard {
        let depth = NDC.with(|ndc| {
            let mut ndc = ndc.borrow_mut();
            ndc.push(context.into());
            ndc.len()
        });
        NdcGuard { depth }
    }

    /// Returns the context levels, separated by a single space.
    #[must_use]
    pub fn get() -> String {
        NDC.with(|ndc| ndc.borrow().join(" "))
    }

    /// Returns the number of context levels.
    #[must_use]
    pub fn depth() -> usize {
        NDC.with(|ndc| ndc.borrow().len())
    }

    /// Removes all context levels.
    pub fn clear() {
        NDC.with(|ndc| ndc.borrow_mut().clear());
    }
}

/// Pops its level from the [`Ndc`] when dropped.
pub struct NdcGuard {
    depth: usize,
}
impl Drop for NdcGuard {
    fn drop(&mut self) {
        NDC.with(|ndc| ndc.borrow_mut().truncate(self.depth - 1));
    }
}

/// Mapped diagnostic context of the current thread.
pub struct Mdc;
impl Mdc {
    /// Sets a value, and returns the previous value for this key.
    pub fn put<K: Into<String>, V: Into<String>>(key: K, value: V) -> Option<String> {
        MDC.with(|mdc| mdc.borrow_mut().insert(key.into(), value.into()))
    }

    /// Returns the value for the given key.
    #[must_use]
    pub fn get(key: &str) -> Option<String> {
        MDC.with(|mdc| mdc.borrow().get(key).cloned())
    }

    /// Removes the value for the given key, and returns it.
    pub fn remove(key: &str) -> Option<String> {
        MDC.with(|mdc| mdc.borrow_mut().remove(key))
    }

    /// Removes all values.
    pub fn clear() {
        MDC.with(|mdc| mdc.borrow_mut().clear());
    }

    pub(crate) fn snapshot() -> BTreeMap<String, String> {
        MDC.with(|mdc| mdc.borrow().clone())
    }
}
