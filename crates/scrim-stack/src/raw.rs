//! Raw memory primitive over the process allocator.
//!
//! Thin allocate/free/zero wrappers around `std::alloc`. All `unsafe`
//! in this crate is confined to this module and [`crate::block`];
//! everything above works in terms of [`crate::block::ArenaBlock`].

#![allow(unsafe_code)]

use std::alloc::{self, Layout};
use std::ptr::NonNull;

/// Allocate `size` bytes aligned to `align`.
///
/// Allocation failure is fatal: the global allocator's OOM handler is
/// invoked and the process aborts. Callers never observe a null block.
pub(crate) fn alloc_block(size: usize, align: usize) -> NonNull<u8> {
    let layout =
        Layout::from_size_align(size, align).expect("size and align form a valid layout");
    // SAFETY: layout has non-zero size (callers uphold size > 0).
    let ptr = unsafe { alloc::alloc(layout) };
    match NonNull::new(ptr) {
        Some(ptr) => ptr,
        None => alloc::handle_alloc_error(layout),
    }
}

/// Release a block previously returned by [`alloc_block`].
///
/// # Safety
///
/// `ptr` must have been returned by [`alloc_block`] with exactly this
/// `size` and `align`, and must not be freed twice.
pub(crate) unsafe fn free_block(ptr: NonNull<u8>, size: usize, align: usize) {
    let layout =
        Layout::from_size_align(size, align).expect("size and align form a valid layout");
    // SAFETY: caller guarantees the pointer/layout pairing.
    unsafe { alloc::dealloc(ptr.as_ptr(), layout) };
}

/// Zero `len` bytes starting at `ptr`.
///
/// # Safety
///
/// `ptr..ptr+len` must lie within a single live allocation.
pub(crate) unsafe fn zero(ptr: *mut u8, len: usize) {
    // SAFETY: caller guarantees the range is in-bounds and writable.
    unsafe { std::ptr::write_bytes(ptr, 0, len) };
}
