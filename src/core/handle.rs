//! Runtime environment handle seen by the logging facade
//!
//! The facade reads a handle through [`RuntimeEnv`] only. [`EnvHandle`] is a
//! ready-made implementation for hosts that do not bring their own.

use std::borrow::Cow;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;
use std::thread::{self, ThreadId};

/// Whether the calling thread must own the handle.
///
/// `UnenforcedForAddonBootstrap` exists for one case only: handles attached
/// to an add-on that has no owning thread yet. Anything else must use
/// `Enforced`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadCheck {
    Enforced,
    UnenforcedForAddonBootstrap,
}

impl ThreadCheck {
    #[inline]
    pub fn is_enforced(self) -> bool {
        matches!(self, ThreadCheck::Enforced)
    }
}

/// Capabilities the facade needs from a runtime environment handle
pub trait RuntimeEnv {
    /// Whether the handle has begun closing. Must not touch other state.
    fn is_closed(&self) -> bool;

    /// Whether the calling thread is the handle's owning thread
    fn current_thread_matches(&self) -> bool;

    /// Human-readable name of the instance this handle is attached to.
    ///
    /// The facade has already passed `check` through the thread gate before
    /// calling this; `check` is forwarded for implementations that guard
    /// further state of their own.
    fn attached_instance_name(&self, check: ThreadCheck) -> Cow<'_, str>;
}

type NameResolver = Box<dyn Fn() -> String + Send + Sync>;

/// Thread-affine handle with a monotonic closed flag
pub struct EnvHandle {
    name: OnceLock<String>,
    resolver: Option<NameResolver>,
    owner: Option<ThreadId>,
    closed: AtomicBool,
}

impl EnvHandle {
    /// Handle owned by the calling thread
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_owner(name, Some(thread::current().id()))
    }

    pub fn with_owner(name: impl Into<String>, owner: Option<ThreadId>) -> Self {
        Self {
            name: OnceLock::from(name.into()),
            resolver: None,
            owner,
            closed: AtomicBool::new(false),
        }
    }

    /// Handle for an add-on that has no owning thread yet
    pub fn for_addon(name: impl Into<String>) -> Self {
        Self::with_owner(name, None)
    }

    /// Handle owned by the calling thread whose name is resolved on first use
    pub fn with_name_resolver<F>(resolver: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        Self {
            name: OnceLock::new(),
            resolver: Some(Box::new(resolver)),
            owner: Some(thread::current().id()),
            closed: AtomicBool::new(false),
        }
    }

    pub fn owner(&self) -> Option<ThreadId> {
        self.owner
    }

    /// Start closing. Irreversible.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }
}

impl RuntimeEnv for EnvHandle {
    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn current_thread_matches(&self) -> bool {
        self.owner == Some(thread::current().id())
    }

    fn attached_instance_name(&self, _check: ThreadCheck) -> Cow<'_, str> {
        let name = self.name.get_or_init(|| {
            self.resolver
                .as_ref()
                .map(|resolve| resolve())
                .unwrap_or_default()
        });
        Cow::Borrowed(name.as_str())
    }
}

impl fmt::Debug for EnvHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvHandle")
            .field("name", &self.name.get())
            .field("owner", &self.owner)
            .field("closed", &self.closed.load(Ordering::Relaxed))
            .finish()
    }
}
