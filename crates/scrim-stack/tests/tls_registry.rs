//! Integration test: registry initialisation and lifecycle.
//!
//! The registry's configuration is process-wide and decided once, so
//! everything order-sensitive lives in this single test function —
//! integration test binaries own their process, which unit tests in
//! the library (running threaded in one process) do not.

use scrim_core::{ConfigError, StackConfig};
use scrim_stack::{init, usage_report, with_stack};

#[test]
fn registry_lifecycle() {
    // Explicit init decides the configuration for every thread.
    let config = StackConfig::new(128 * 1024).unwrap();
    init(config).unwrap();

    // The decision is final.
    assert_eq!(init(StackConfig::default()), Err(ConfigError::AlreadyInitialized));

    // The calling thread's stack is sized from the configuration.
    let capacity = with_stack(|stack| {
        let mut frame = stack.frame();
        let _ = frame.alloc(64, 8);
        frame.capacity()
    });
    assert_eq!(capacity, 128 * 1024);

    // So is every other thread's.
    let worker = std::thread::Builder::new()
        .name("staging-worker".into())
        .spawn(|| {
            with_stack(|stack| {
                let mut frame = stack.frame();
                let _ = frame.alloc(400, 8);
                frame.capacity()
            })
        })
        .unwrap();
    assert_eq!(worker.join().unwrap(), 128 * 1024);

    // The terminated worker left its final statistics in the report.
    let report = usage_report();
    let entry = report
        .iter()
        .find(|usage| usage.thread == "staging-worker")
        .expect("worker thread missing from usage report");
    assert_eq!(entry.capacity, 128 * 1024);
    assert!(entry.peak >= 400);
    assert_eq!(entry.grow_count, 0);
}
