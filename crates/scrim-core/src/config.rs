//! Stack allocator configuration.
//!
//! The configuration surface is deliberately small: one numeric setting
//! for the initial per-thread arena capacity. It is read once, at
//! thread-local registry initialisation, either explicitly via
//! [`StackConfig::new`] or from the environment via
//! [`StackConfig::from_env`]. An invalid value is a hard error — the
//! registry fails fast rather than silently substituting a default.

use crate::error::ConfigError;

/// Environment variable holding the initial stack capacity, in KiB.
pub const ENV_STACK_SIZE: &str = "SCRIM_STACK_SIZE";

/// Configuration for per-thread scratch stacks.
///
/// Validated at construction; immutable afterwards. Every thread's
/// stack is created from the same process-wide config, so the values
/// here are decided before the first native call on any thread.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StackConfig {
    /// Initial capacity of each thread's arena block, in bytes.
    ///
    /// Default: 64 KiB. Steady-state workloads should size this so the
    /// grow path never runs; growth is correct but cold.
    pub initial_capacity: usize,
}

impl StackConfig {
    /// Default arena capacity: 64 KiB per thread.
    pub const DEFAULT_CAPACITY: usize = 64 * 1024;

    /// Upper bound on the configurable capacity: 2 GiB.
    ///
    /// A per-thread scratch arena beyond this is almost certainly a
    /// misconfigured unit (bytes where KiB were meant).
    pub const MAX_CAPACITY: usize = 1 << 31;

    /// Create a config with the given initial capacity in bytes.
    ///
    /// Returns `Err(ConfigError::InvalidCapacity)` if the capacity is
    /// zero or exceeds [`StackConfig::MAX_CAPACITY`].
    pub fn new(initial_capacity: usize) -> Result<Self, ConfigError> {
        if initial_capacity == 0 {
            return Err(ConfigError::InvalidCapacity {
                value: initial_capacity.to_string(),
                reason: "capacity must be non-zero",
            });
        }
        if initial_capacity > Self::MAX_CAPACITY {
            return Err(ConfigError::InvalidCapacity {
                value: initial_capacity.to_string(),
                reason: "capacity exceeds the 2 GiB bound",
            });
        }
        Ok(Self { initial_capacity })
    }

    /// Read the config from the environment.
    ///
    /// `SCRIM_STACK_SIZE` holds the initial capacity in KiB. Unset
    /// means the default; anything that does not parse to a usable
    /// capacity is a hard `ConfigError`.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var(ENV_STACK_SIZE) {
            Ok(raw) => Self::parse_kib(&raw),
            Err(_) => Ok(Self::default()),
        }
    }

    /// Parse a capacity given in KiB (the unit of `SCRIM_STACK_SIZE`).
    pub fn parse_kib(raw: &str) -> Result<Self, ConfigError> {
        let kib: usize = raw.trim().parse().map_err(|_| ConfigError::InvalidCapacity {
            value: raw.to_string(),
            reason: "not a non-negative integer",
        })?;
        let bytes = kib.checked_mul(1024).ok_or(ConfigError::InvalidCapacity {
            value: raw.to_string(),
            reason: "capacity overflows",
        })?;
        Self::new(bytes)
    }
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            initial_capacity: Self::DEFAULT_CAPACITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_64_kib() {
        assert_eq!(StackConfig::default().initial_capacity, 64 * 1024);
    }

    #[test]
    fn zero_capacity_rejected() {
        assert!(matches!(
            StackConfig::new(0),
            Err(ConfigError::InvalidCapacity { .. })
        ));
    }

    #[test]
    fn oversized_capacity_rejected() {
        assert!(StackConfig::new(StackConfig::MAX_CAPACITY).is_ok());
        assert!(StackConfig::new(StackConfig::MAX_CAPACITY + 1).is_err());
    }

    #[test]
    fn parse_kib_converts_to_bytes() {
        let config = StackConfig::parse_kib("128").unwrap();
        assert_eq!(config.initial_capacity, 128 * 1024);
    }

    #[test]
    fn parse_kib_trims_whitespace() {
        let config = StackConfig::parse_kib(" 64\n").unwrap();
        assert_eq!(config.initial_capacity, 64 * 1024);
    }

    #[test]
    fn parse_kib_rejects_garbage() {
        for raw in ["", "abc", "-1", "64k", "1.5"] {
            assert!(
                matches!(
                    StackConfig::parse_kib(raw),
                    Err(ConfigError::InvalidCapacity { .. })
                ),
                "expected rejection for {raw:?}",
            );
        }
    }

    #[test]
    fn parse_kib_rejects_zero() {
        assert!(StackConfig::parse_kib("0").is_err());
    }

    #[test]
    fn parse_kib_rejects_overflow() {
        let raw = usize::MAX.to_string();
        assert!(matches!(
            StackConfig::parse_kib(&raw),
            Err(ConfigError::InvalidCapacity { .. })
        ));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn valid_kib_values_convert_exactly(
                kib in 1usize..=StackConfig::MAX_CAPACITY / 1024,
            ) {
                let config = StackConfig::parse_kib(&kib.to_string()).unwrap();
                prop_assert_eq!(config.initial_capacity, kib * 1024);
            }

            #[test]
            fn arbitrary_strings_never_panic(raw in ".*") {
                // Parsing either succeeds or returns InvalidCapacity.
                let _ = StackConfig::parse_kib(&raw);
            }
        }
    }
}
