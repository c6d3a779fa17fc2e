//! Scrim: per-thread scratch stack allocation for native interop.
//!
//! This is the top-level facade crate that re-exports the public API
//! from the scrim sub-crates. For most users, adding `scrim` as a
//! single dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use scrim::prelude::*;
//!
//! // Each thread gets its own stack from the registry; a frame
//! // releases everything staged inside it, on every exit path.
//! with_stack(|stack| {
//!     let mut frame = stack.frame();
//!     let extent = frame.ints(2);
//!     // SAFETY: extent points at 2 freshly reserved i32s, valid
//!     // until the frame closes.
//!     unsafe {
//!         extent.as_ptr().write(640);
//!         extent.as_ptr().add(1).write(480);
//!     }
//!     // ... hand extent to a native call here ...
//!     assert_eq!(frame.used(), 8);
//! });
//! with_stack(|stack| assert_eq!(stack.used(), 0));
//! ```
//!
//! Standalone stacks (without the registry) work too, which is how
//! most of the test suite drives the allocator:
//!
//! ```rust
//! use scrim::prelude::*;
//!
//! let mut stack = ScratchStack::with_capacity(4096);
//! {
//!     let mut frame = stack.frame();
//!     let _staged = frame.alloc(256, 16);
//!     assert_eq!(frame.used(), 256);
//! }
//! assert_eq!(stack.used(), 0);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`stack`] | `scrim-stack` | The scratch stack, frame guard, TLS registry, usage report |
//! | [`types`] | `scrim-core` | Configuration and error types |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Scratch stack, frame guard, registry, and usage report (`scrim-stack`).
pub use scrim_stack as stack;

/// Configuration and error types (`scrim-core`).
pub use scrim_core as types;

/// The commonly used subset of the API.
pub mod prelude {
    pub use scrim_core::{ConfigError, StackConfig};
    pub use scrim_stack::{
        init, usage_report, with_locals, with_stack, FrameGuard, ScratchStack, StackUsage,
        ThreadLocals,
    };
}
