//! Crate-wide error types.

use derive_more::{Display, Error, From};

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Errors returned by stepper construction.
///
/// Once a [`Stepper`](crate::stepper::Stepper) exists, no operation can fail.
#[derive(Debug, Display, Error, From)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The pins or the timer handed to the constructor cannot drive a motor.
    #[display("stepper configuration rejected: {_0}")]
    Config(ConfigError),

    /// The background tick task could not be spawned.
    #[cfg(any(feature = "pico1", feature = "pico2"))]
    #[display("tick task spawn failed: {_0:?}")]
    TaskSpawn(#[error(not(source))] embassy_executor::SpawnError),
}

/// Construction-time resource problems.
#[derive(Clone, Copy, Debug, Display, Error, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// The same GPIO was given for more than one coil.
    #[display("GPIO {gpio} is used for more than one coil")]
    DuplicatePin {
        /// GPIO number that appeared twice.
        gpio: u8,
    },

    /// The timer is already claimed by another stepper.
    #[display("timer is already claimed by another stepper")]
    TimerUnavailable,

    /// A coil pin refused the initial de-energize write.
    #[display("coil pin rejected the initial de-energize")]
    PinRejected,
}
