//! Per-thread off-heap scratch allocation for staging native calls.
//!
//! Native APIs constantly need short-lived buffers — argument arrays,
//! out-parameters, encoded strings — that would otherwise cost a heap
//! allocation per call. This crate provides a bump-pointer arena per
//! thread with stack-disciplined (LIFO) release, plus the thread-local
//! registry that hosts it.
//!
//! # Architecture
//!
//! ```text
//! tls (registry)
//! └── ThreadLocals (one per thread, construct-on-first-use)
//!     └── ScratchStack (bump arena + frame list)
//!         ├── ArenaBlock (contiguous native memory, lazy)
//!         └── FrameGuard (RAII push/pop)
//! report: cross-thread usage table (cold path, diagnostics)
//! ```
//!
//! There is no shared mutable state on the allocation path: each
//! thread owns its stack outright, so `push`/`pop`/`alloc` take no
//! locks. The only cross-thread state is the once-set configuration
//! and the cold-path usage table.
//!
//! # Safety
//!
//! This crate contains the workspace's only `unsafe` code, confined to
//! [`block`] and the private raw-allocation module it sits on. The
//! pointers handed out by [`ScratchStack::alloc`] are raw by design —
//! their lifetime is the enclosing frame, which the borrow checker
//! cannot see; the frame discipline is documented on every operation.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod block;
pub mod frame;
mod raw;
pub mod report;
pub mod stack;
pub mod tls;

pub use block::ArenaBlock;
pub use frame::FrameGuard;
pub use report::{usage_report, StackUsage};
pub use stack::ScratchStack;
pub use tls::{init, with_locals, with_stack, ThreadLocals};
