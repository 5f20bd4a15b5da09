//! Interrupt-driven half-step driver for 4-phase unipolar stepper motors (28BYJ-48 class)
//! on Pico 1 and 2.
//!
//! # Glossary
//!
//! - **Half-step:** one of 8 rotor positions per electrical cycle, reached by alternating
//!   single-coil and dual-coil energization (wave drive).
//! - **Phase:** index in `0..8` naming the current half-step position.
//! - **Pending:** signed count of half-steps still to execute. The sign is the direction.
//! - **Tick:** one timer-driven call to [`Stepper::tick`](stepper::Stepper::tick), which
//!   executes at most one half-step.
#![cfg_attr(not(any(test, feature = "host")), no_std)]
#![cfg_attr(not(any(test, feature = "host")), no_main)]

#[cfg(all(feature = "pico1", feature = "pico2"))]
compile_error!("Cannot enable both 'pico1' and 'pico2' features simultaneously");

// Compile-time check: a board needs its architecture
#[cfg(all(any(feature = "pico1", feature = "pico2"), not(feature = "arm")))]
compile_error!("Board features 'pico1'/'pico2' require the 'arm' architecture feature");

#[cfg(all(feature = "arm", not(any(feature = "pico1", feature = "pico2"))))]
compile_error!("Must enable exactly one board feature with 'arm': 'pico1' or 'pico2'");

mod error;
pub mod stepper;

// Re-export error types and result (used throughout)
pub use crate::error::{ConfigError, Error, Result};
