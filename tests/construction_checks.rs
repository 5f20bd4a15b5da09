#![allow(missing_docs)]
//! Host-level tests for the resource checks each stepper runs before touching hardware.

use stepper_envoy::ConfigError;
use stepper_envoy::stepper::{TimerClaim, ensure_distinct_gpios};

// ============================================================================
// Distinct coil GPIOs
// ============================================================================

#[test]
fn distinct_gpios_are_accepted() {
    assert_eq!(ensure_distinct_gpios([2, 3, 4, 5]), Ok(()));
    assert_eq!(ensure_distinct_gpios([29, 0, 17, 1]), Ok(()));
}

#[test]
fn duplicate_in_first_two_coils_is_rejected() {
    assert_eq!(
        ensure_distinct_gpios([6, 6, 7, 8]),
        Err(ConfigError::DuplicatePin { gpio: 6 })
    );
}

#[test]
fn duplicate_in_middle_coils_is_rejected() {
    assert_eq!(
        ensure_distinct_gpios([2, 9, 9, 5]),
        Err(ConfigError::DuplicatePin { gpio: 9 })
    );
}

#[test]
fn duplicate_in_last_two_coils_is_rejected() {
    assert_eq!(
        ensure_distinct_gpios([2, 3, 11, 11]),
        Err(ConfigError::DuplicatePin { gpio: 11 })
    );
}

#[test]
fn duplicate_of_first_coil_in_last_coil_is_rejected() {
    assert_eq!(
        ensure_distinct_gpios([14, 3, 4, 14]),
        Err(ConfigError::DuplicatePin { gpio: 14 })
    );
}

#[test]
fn first_repeated_gpio_is_reported() {
    // Both 2 and 3 repeat; 2 appears first.
    assert_eq!(
        ensure_distinct_gpios([2, 3, 2, 3]),
        Err(ConfigError::DuplicatePin { gpio: 2 })
    );
    assert_eq!(
        ensure_distinct_gpios([4, 4, 4, 4]),
        Err(ConfigError::DuplicatePin { gpio: 4 })
    );
}

#[test]
fn duplicate_pin_error_names_the_gpio() {
    let err = ensure_distinct_gpios([2, 3, 4, 3]).unwrap_err();
    assert_eq!(err.to_string(), "GPIO 3 is used for more than one coil");
}

// ============================================================================
// Timer claim
// ============================================================================

#[test]
fn first_timer_claim_succeeds() {
    let claim = TimerClaim::new();
    assert!(!claim.is_claimed());
    assert_eq!(claim.claim(), Ok(()));
    assert!(claim.is_claimed());
}

#[test]
fn second_timer_claim_is_unavailable() {
    let claim = TimerClaim::new();
    claim.claim().unwrap();
    assert_eq!(claim.claim(), Err(ConfigError::TimerUnavailable));
    assert_eq!(claim.claim(), Err(ConfigError::TimerUnavailable));
    assert!(claim.is_claimed());
}

#[test]
fn separate_timers_are_claimed_independently() {
    static FIRST: TimerClaim = TimerClaim::new();
    static SECOND: TimerClaim = TimerClaim::new();
    assert_eq!(FIRST.claim(), Ok(()));
    assert_eq!(SECOND.claim(), Ok(()));
    assert_eq!(FIRST.claim(), Err(ConfigError::TimerUnavailable));
}
