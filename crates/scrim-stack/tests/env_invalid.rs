//! Integration test: invalid configuration fails fast.
//!
//! An unparseable `SCRIM_STACK_SIZE` is a fatal configuration error at
//! first use — never silently replaced by the default. Owns its
//! process so the poisoned value cannot leak into other tests.

use scrim_core::config::ENV_STACK_SIZE;
use scrim_stack::with_stack;

#[test]
fn invalid_environment_fails_fast() {
    std::env::set_var(ENV_STACK_SIZE, "lots");

    let attempt = std::panic::catch_unwind(|| with_stack(|stack| stack.capacity()));
    assert!(attempt.is_err(), "invalid stack size must not be defaulted");

    // Still fatal on retry; the bad configuration is never cached as valid.
    let retry = std::panic::catch_unwind(|| with_stack(|stack| stack.capacity()));
    assert!(retry.is_err());
}
