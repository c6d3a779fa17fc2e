//! Benchmark workloads and utilities for the scrim allocator.
//!
//! Provides staging profiles shared by the criterion benches:
//!
//! - [`reference_sizes`]: the (size, alignment) mix of a typical
//!   native-call staging sequence
//! - [`run_staging_cycle`]: one frame worth of that mix

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use scrim_stack::ScratchStack;

/// The (size, alignment) mix of a typical staged native call:
/// a couple of out-parameters, a pointer array, a small 16-aligned
/// struct, and a short encoded string.
pub fn reference_sizes() -> Vec<(usize, usize)> {
    vec![
        (4, 4),   // GLint out-parameter
        (4, 4),   // second out-parameter
        (8, 8),   // pointer slot
        (32, 8),  // pointer array
        (48, 16), // small struct
        (24, 1),  // encoded string bytes
    ]
}

/// Open a frame, perform the given allocations, and close it.
///
/// Returns the bytes in use at the frame's high point, so callers can
/// keep the result live and the work observable.
pub fn run_staging_cycle(stack: &mut ScratchStack, sizes: &[(usize, usize)]) -> usize {
    let mut frame = stack.frame();
    for &(size, align) in sizes {
        let _ = frame.alloc(size, align);
    }
    frame.used()
}
