//! Thread-local registry: one scratch stack per thread.
//!
//! Every thread that stages a native call gets its own
//! [`ThreadLocals`] bundle, constructed on first access and torn down
//! at thread exit. Access goes through the closure-based
//! [`with_stack`] / [`with_locals`] accessors over `std::thread_local!`
//! — the platform's native thread-local path, which needs no fallback
//! strategy.
//!
//! The process-wide configuration is decided exactly once, even when
//! first accesses race across threads: either explicitly through
//! [`init`] before any stack is used, or lazily from the environment
//! on first use. An invalid environment value fails fast rather than
//! silently defaulting.

use std::cell::RefCell;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;

use scrim_core::{ConfigError, StackConfig};

use crate::report::{self, StackUsage};
use crate::stack::ScratchStack;

/// Process-wide stack configuration, set exactly once.
static CONFIG: OnceLock<StackConfig> = OnceLock::new();

/// Monotonic bundle IDs, keys of the usage report.
static NEXT_BUNDLE_ID: AtomicU64 = AtomicU64::new(0);

thread_local! {
    static LOCALS: ThreadLocals = ThreadLocals::for_current_thread();
}

/// The per-thread state bundle.
///
/// Owns the thread's [`ScratchStack`]. Other per-thread caches that
/// share this lifecycle (e.g. capability tables for wrapped APIs)
/// belong here too; the stack is the only member this crate defines.
pub struct ThreadLocals {
    /// The thread's scratch stack.
    pub stack: RefCell<ScratchStack>,
    /// Stable key into the usage report.
    id: u64,
    /// Thread name captured at construction, for the usage report.
    thread: String,
}

impl ThreadLocals {
    /// Build the calling thread's bundle from the process-wide config.
    fn for_current_thread() -> Self {
        let config = active_config();
        let id = NEXT_BUNDLE_ID.fetch_add(1, Ordering::Relaxed);
        let thread = std::thread::current()
            .name()
            .unwrap_or("<unnamed>")
            .to_string();
        let locals = Self {
            stack: RefCell::new(ScratchStack::from_config(config)),
            id,
            thread,
        };
        locals.publish_usage();
        locals
    }

    /// Merge this bundle's stack statistics into the usage report.
    fn publish_usage(&self) {
        let stack = self.stack.borrow();
        report::record(
            self.id,
            StackUsage {
                thread: self.thread.clone(),
                capacity: stack.capacity(),
                peak: stack.peak_used(),
                grow_count: stack.grow_count(),
            },
        );
    }
}

impl Drop for ThreadLocals {
    fn drop(&mut self) {
        // Final statistics, recorded at thread teardown.
        self.publish_usage();
    }
}

/// Set the process-wide stack configuration.
///
/// Must run before any thread touches its stack; the configuration is
/// read exactly once. Returns `Err(ConfigError::AlreadyInitialized)`
/// if it was already decided — by an earlier `init` call or by a
/// first use that read the environment.
pub fn init(config: StackConfig) -> Result<(), ConfigError> {
    CONFIG
        .set(config)
        .map_err(|_| ConfigError::AlreadyInitialized)
}

/// The active configuration, deciding it from the environment if
/// nothing was set explicitly.
///
/// # Panics
///
/// Panics on an invalid `SCRIM_STACK_SIZE` value — a configuration
/// error is fatal at first use, never silently defaulted.
fn active_config() -> &'static StackConfig {
    CONFIG.get_or_init(|| match StackConfig::from_env() {
        Ok(config) => config,
        Err(err) => panic!("scrim: invalid configuration: {err}"),
    })
}

/// Run `f` with the calling thread's bundle.
///
/// The bundle is constructed on the first call from each thread and
/// lives until the thread exits.
pub fn with_locals<F, R>(f: F) -> R
where
    F: FnOnce(&ThreadLocals) -> R,
{
    LOCALS.with(|locals| f(locals))
}

/// Run `f` with exclusive access to the calling thread's stack.
///
/// This is the accessor the binding layer calls around every staged
/// native call. Nesting `with_stack` inside `f` on the same thread is
/// a misuse and panics (the stack is exclusively borrowed).
pub fn with_stack<F, R>(f: F) -> R
where
    F: FnOnce(&mut ScratchStack) -> R,
{
    LOCALS.with(|locals| f(&mut locals.stack.borrow_mut()))
}
