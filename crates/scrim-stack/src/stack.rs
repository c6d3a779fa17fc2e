//! Per-thread bump-pointer scratch stack.
//!
//! [`ScratchStack`] serves the short-lived buffers that native calls
//! need for argument staging and out-parameters. Allocation advances a
//! single bump offset; release is bulk, by closing the innermost frame.
//!
//! ```text
//! ScratchStack
//! ├── ArenaBlock            current backing region (lazy, owned)
//! ├── pointer               bump offset: [0, capacity]
//! ├── frames                saved offsets, innermost last (LIFO)
//! └── retired               blocks superseded by growth, freed once
//!                           the bump offset returns to zero
//! ```
//!
//! The frame lifecycle is:
//! 1. [`ScratchStack::push`] — save the bump offset
//! 2. One or more [`ScratchStack::alloc`] calls — stage data, call native code
//! 3. [`ScratchStack::pop`] — restore the offset, releasing every
//!    allocation made since the matching push at once
//!
//! Prefer [`ScratchStack::frame`], which returns an RAII guard that
//! pops on every exit path.
//!
//! # Growth
//!
//! A request that does not fit the current block allocates a new block
//! at least twice the old capacity (and large enough for the request),
//! copies nothing, and retries. Old blocks are retired, not freed:
//! addresses handed out before the grow stay valid until the bump
//! offset returns to zero or the stack is dropped. Relying on an
//! address across a grow is a design smell — size the initial arena so
//! the grow path never runs in steady state.
//!
//! # Misuse
//!
//! Popping with no open frame, restoring an offset never observed from
//! this stack, or touching an address after its frame closed are
//! precondition violations. Debug builds panic on the first two;
//! release builds leave them unchecked for performance.

use std::ptr::NonNull;

use scrim_core::StackConfig;
use smallvec::SmallVec;

use crate::block::ArenaBlock;
use crate::frame::FrameGuard;

/// A per-thread bump allocator with stack-disciplined release.
///
/// One instance per thread, never shared; obtain the calling thread's
/// instance through [`crate::tls::with_stack`]. Standalone instances
/// can also be created directly, which is how the tests use it.
pub struct ScratchStack {
    /// Current backing block. `None` until the first push or
    /// allocation (the *uninitialized* state).
    block: Option<ArenaBlock>,
    /// Blocks superseded by growth, kept until no address into them
    /// can be live (bump offset back at zero) or the stack drops.
    retired: Vec<ArenaBlock>,
    /// Bump offset from the block base. Bytes below are in use.
    pointer: usize,
    /// Saved offsets, one per open frame, innermost last.
    frames: SmallVec<[usize; 8]>,
    /// Capacity of the first block, from configuration.
    initial_capacity: usize,
    /// High-water mark of the bump offset, for usage reporting.
    peak: usize,
    /// Number of times the arena grew.
    grow_count: u32,
}

impl ScratchStack {
    /// Create a stack with the default configuration (64 KiB arena).
    ///
    /// The arena block itself is not allocated until first use.
    pub fn new() -> Self {
        Self::from_config(&StackConfig::default())
    }

    /// Create a stack sized from the given configuration.
    pub fn from_config(config: &StackConfig) -> Self {
        Self {
            block: None,
            retired: Vec::new(),
            pointer: 0,
            frames: SmallVec::new(),
            initial_capacity: config.initial_capacity,
            peak: 0,
            grow_count: 0,
        }
    }

    /// Create a stack with the given initial arena capacity in bytes.
    ///
    /// # Panics
    ///
    /// Panics if `initial_capacity` is zero.
    pub fn with_capacity(initial_capacity: usize) -> Self {
        assert!(initial_capacity > 0, "stack capacity must be non-zero");
        Self {
            block: None,
            retired: Vec::new(),
            pointer: 0,
            frames: SmallVec::new(),
            initial_capacity,
            peak: 0,
            grow_count: 0,
        }
    }

    /// Open a frame, saving the current bump offset.
    ///
    /// Always succeeds; growing the frame list is amortized O(1).
    pub fn push(&mut self) {
        self.activate();
        self.frames.push(self.pointer);
    }

    /// Close the innermost frame, restoring the offset saved by the
    /// matching [`ScratchStack::push`].
    ///
    /// Every address returned by allocations since that push becomes
    /// invalid. The memory is not zeroed or reused eagerly — the next
    /// allocation simply overwrites it — but touching such an address
    /// afterwards is a precondition violation, not a recoverable state.
    ///
    /// # Panics
    ///
    /// Debug builds panic when no frame is open. Release builds leave
    /// the misuse unchecked and do nothing.
    pub fn pop(&mut self) {
        debug_assert!(!self.frames.is_empty(), "pop called with no open frame");
        if let Some(saved) = self.frames.pop() {
            self.pointer = saved;
        }
        self.reclaim_retired();
    }

    /// Open a frame and return a guard that closes it on drop.
    ///
    /// The guard dereferences to the stack, so allocations go through
    /// it directly. This is the preferred pattern: the frame closes on
    /// every exit path, including early returns and panics.
    pub fn frame(&mut self) -> FrameGuard<'_> {
        FrameGuard::new(self)
    }

    /// Reserve `size` bytes aligned to `align` and return their address.
    ///
    /// The returned region is uninitialized. Never null on success;
    /// exhaustion of the process allocator during growth is fatal
    /// (out-of-memory abort), not an error value.
    ///
    /// `align` must be a power of two (debug-asserted; 1, 4, 8 and 16
    /// are what native ABIs ask for in practice).
    pub fn alloc(&mut self, size: usize, align: usize) -> NonNull<u8> {
        debug_assert!(align.is_power_of_two(), "alignment must be a power of two");
        self.activate();
        loop {
            let block = self.block.as_ref().expect("stack is active");
            if let Some((offset, end)) = fit(block.base_addr(), self.pointer, block.capacity(), size, align)
            {
                self.pointer = end;
                self.peak = self.peak.max(end);
                return block.offset_ptr(offset);
            }
            self.grow(size, align);
        }
    }

    /// Reserve `size` zero-filled bytes aligned to `align`.
    pub fn alloc_zeroed(&mut self, size: usize, align: usize) -> NonNull<u8> {
        let ptr = self.alloc(size, align);
        let offset = self.pointer - size;
        self.block
            .as_mut()
            .expect("stack is active after alloc")
            .zero_range(offset, size);
        ptr
    }

    /// Reserve space for `len` values of `T`, aligned for `T`.
    ///
    /// The contents are uninitialized; the caller stages data through
    /// the returned pointer before handing it to native code.
    pub fn alloc_array<T>(&mut self, len: usize) -> NonNull<T> {
        let size = std::mem::size_of::<T>()
            .checked_mul(len)
            .expect("array size overflows usize");
        self.alloc(size, std::mem::align_of::<T>()).cast()
    }

    /// Reserve space for `len` 32-bit integers.
    pub fn ints(&mut self, len: usize) -> NonNull<i32> {
        self.alloc_array(len)
    }

    /// Reserve space for `len` 64-bit integers.
    pub fn longs(&mut self, len: usize) -> NonNull<i64> {
        self.alloc_array(len)
    }

    /// Reserve space for `len` untyped pointers, for staging pointer
    /// arrays (e.g. lists of native object handles).
    pub fn pointers(&mut self, len: usize) -> NonNull<*mut std::ffi::c_void> {
        self.alloc_array(len)
    }

    /// The raw bump offset.
    ///
    /// Pair with [`ScratchStack::set_pointer`] for manual scoped
    /// save/restore in hot call sites that want to skip the frame
    /// list entirely.
    pub fn pointer(&self) -> usize {
        self.pointer
    }

    /// Restore the bump offset to a previously observed value.
    ///
    /// `value` must come from an earlier [`ScratchStack::pointer`]
    /// call on this same stack — forward jumps are a precondition
    /// violation (debug-asserted, unchecked in release).
    pub fn set_pointer(&mut self, value: usize) {
        debug_assert!(
            value <= self.pointer,
            "set_pointer may only restore a previously observed offset",
        );
        self.pointer = value;
        self.reclaim_retired();
    }

    /// Bytes currently in use (the bump offset).
    pub fn used(&self) -> usize {
        self.pointer
    }

    /// Capacity of the current block, or 0 before first use.
    pub fn capacity(&self) -> usize {
        self.block.as_ref().map_or(0, ArenaBlock::capacity)
    }

    /// Free bytes remaining in the current block.
    pub fn remaining(&self) -> usize {
        self.capacity() - self.pointer
    }

    /// Number of open frames.
    pub fn frame_depth(&self) -> usize {
        self.frames.len()
    }

    /// High-water mark of the bump offset over the stack's lifetime.
    pub fn peak_used(&self) -> usize {
        self.peak
    }

    /// Number of times the arena grew.
    pub fn grow_count(&self) -> u32 {
        self.grow_count
    }

    /// Number of superseded blocks not yet released.
    pub fn retired_count(&self) -> usize {
        self.retired.len()
    }

    /// Total memory held by this stack in bytes, retired blocks
    /// included.
    pub fn memory_bytes(&self) -> usize {
        self.capacity() + self.retired.iter().map(ArenaBlock::capacity).sum::<usize>()
    }

    /// Allocate the first block if the stack is still uninitialized.
    fn activate(&mut self) {
        if self.block.is_none() {
            self.block = Some(ArenaBlock::new(self.initial_capacity));
        }
    }

    /// Replace the current block with one big enough for the pending
    /// request and at least double the old capacity. Nothing is
    /// copied; the bump offset carries over into the new block.
    fn grow(&mut self, size: usize, align: usize) {
        // Worst-case padding for the retried request is align - 1.
        let required = self
            .pointer
            .checked_add(align - 1)
            .and_then(|p| p.checked_add(size))
            .expect("allocation request overflows usize");
        let old_capacity = self.block.as_ref().map_or(0, ArenaBlock::capacity);
        let new_capacity = required
            .max(old_capacity.saturating_mul(2))
            .max(self.initial_capacity);
        let new_block = ArenaBlock::new(new_capacity);
        if let Some(old) = self.block.replace(new_block) {
            if self.pointer == 0 {
                // No live allocation can reference the old block.
                drop(old);
            } else {
                self.retired.push(old);
            }
        }
        self.grow_count += 1;
    }

    /// Release retired blocks once no address into them can be live.
    fn reclaim_retired(&mut self) {
        if self.pointer == 0 && !self.retired.is_empty() {
            self.retired.clear();
        }
    }
}

impl Default for ScratchStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(debug_assertions)]
impl Drop for ScratchStack {
    fn drop(&mut self) {
        if !self.frames.is_empty() {
            eprintln!(
                "scrim: stack dropped with {} open frame(s) — missing pop?",
                self.frames.len(),
            );
        }
    }
}

/// Compute the aligned offset and end for a request against a block,
/// or `None` if it does not fit.
fn fit(base: usize, pointer: usize, capacity: usize, size: usize, align: usize) -> Option<(usize, usize)> {
    let addr = base.checked_add(pointer)?;
    let mask = align - 1;
    let aligned = addr.checked_add(mask)? & !mask;
    let offset = aligned - base;
    let end = offset.checked_add(size)?;
    (end <= capacity).then_some((offset, end))
}
