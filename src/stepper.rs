//! A device abstraction for 4-phase unipolar stepper motors such as the 28BYJ-48.
//!
//! [`Stepper`] turns signed half-step requests into a coil waveform. Motion happens in the
//! background: every timer tick calls [`Stepper::tick`], which takes one half-step.
//! Requests accumulate, so the final position is the sum of all requested counts.
//!
//! On the Pico, use `PicoStepper::new` with a `StepperStatic` to get a driver whose ticks come
//! from a spawned task. On the host, or with a custom timer, build one with
//! [`Stepper::from_parts`] and any [`TickTimer`].

use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_time::Duration;
use embedded_hal::digital::{OutputPin, PinState};
use portable_atomic::{AtomicBool, AtomicI32, Ordering};

use crate::{ConfigError, Result};

// ============================================================================
// Submodules
// ============================================================================

pub mod phase;
#[cfg(any(feature = "pico1", feature = "pico2"))]
pub mod ticker;

use self::phase::{Direction, Phase, sequence};
#[cfg(any(feature = "pico1", feature = "pico2"))]
pub use self::ticker::{PicoStepper, StepperStatic, TickerTimer};

// ============================================================================
// Constants
// ============================================================================

/// Timer reference rate: one tick is one microsecond.
pub const TICK_HZ: u32 = 1_000_000;

/// Shortest accepted tick period (500 µs), bounding the step rate.
pub const MIN_PERIOD_TICKS: u32 = 500;

/// Delay between half-steps used by [`Stepper::move_steps`].
pub const DEFAULT_STEP_DELAY: Duration = Duration::from_millis(1);

/// Number of coils, and of pins a [`Stepper`] owns.
pub const COIL_COUNT: usize = 4;

/// Tick period for a delay between half-steps, clamped to [`MIN_PERIOD_TICKS`].
///
/// ```
/// use embassy_time::Duration;
/// use stepper_envoy::stepper::{MIN_PERIOD_TICKS, period_ticks_for};
///
/// assert_eq!(period_ticks_for(Duration::from_millis(2)), 2_000);
/// assert_eq!(period_ticks_for(Duration::from_micros(0)), MIN_PERIOD_TICKS);
/// ```
#[must_use]
pub fn period_ticks_for(delay: Duration) -> u32 {
    u32::try_from(delay.as_micros())
        .unwrap_or(u32::MAX)
        .max(MIN_PERIOD_TICKS)
}

// ============================================================================
// TickTimer - periodic timer capability
// ============================================================================

/// A periodic timer that delivers [`Stepper::tick`] calls.
///
/// The timer only schedules. Whoever owns the timer's delivery calls `tick()` once per
/// period while armed. Both methods must return without calling back into the stepper.
pub trait TickTimer {
    /// Start ticking every `period_ticks` microseconds, replacing any earlier schedule.
    fn arm(&mut self, period_ticks: u32);

    /// Stop ticking. Disarming an idle timer does nothing.
    fn disarm(&mut self);
}

// ============================================================================
// Construction checks
// ============================================================================

/// Check that four coil GPIO numbers, in phase order, name four different pins.
///
/// ```
/// use stepper_envoy::ConfigError;
/// use stepper_envoy::stepper::ensure_distinct_gpios;
///
/// assert_eq!(ensure_distinct_gpios([2, 3, 4, 5]), Ok(()));
/// assert_eq!(
///     ensure_distinct_gpios([2, 3, 2, 5]),
///     Err(ConfigError::DuplicatePin { gpio: 2 })
/// );
/// ```
///
/// # Errors
///
/// Returns [`ConfigError::DuplicatePin`] naming the first GPIO that appears twice.
pub fn ensure_distinct_gpios(gpios: [u8; COIL_COUNT]) -> Result<(), ConfigError> {
    let mut rest = gpios.as_slice();
    while let Some((gpio, later)) = rest.split_first() {
        if later.contains(gpio) {
            return Err(ConfigError::DuplicatePin { gpio: *gpio });
        }
        rest = later;
    }
    Ok(())
}

/// One-shot ownership flag for a timer. The first [`claim`](Self::claim) wins.
#[derive(Debug, Default)]
pub struct TimerClaim(AtomicBool);

impl TimerClaim {
    /// An unclaimed timer.
    #[must_use]
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    /// Take the timer for one stepper.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::TimerUnavailable`] if the timer was already claimed.
    pub fn claim(&self) -> Result<(), ConfigError> {
        if self.0.swap(true, Ordering::SeqCst) {
            return Err(ConfigError::TimerUnavailable);
        }
        Ok(())
    }

    /// Whether a stepper already owns the timer.
    #[must_use]
    pub fn is_claimed(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

// ============================================================================
// Stepper Virtual Device
// ============================================================================

/// A device abstraction for a 4-phase unipolar stepper motor driven in half-steps.
///
/// The driver has two states:
/// - **Idle**: timer disarmed, nothing pending, every coil off.
/// - **Running**: timer armed, a non-zero count pending.
///
/// Every method takes `&self` and is safe to call while ticks are being delivered from
/// interrupt context: the pending count and the arm/disarm decision are updated together
/// inside one critical section.
///
/// Two drivers must never share one timer. Arming one would replace the other's schedule.
///
/// On the Pico, see `PicoStepper::new` for an example.
pub struct Stepper<P, T> {
    pending: AtomicI32,
    coils: Mutex<CriticalSectionRawMutex, RefCell<Coils<P, T>>>,
}

/// State shared between callers and the tick. Only touched inside the critical section.
struct Coils<P, T> {
    pins: [P; COIL_COUNT],
    timer: T,
    phase: Phase,
    period_ticks: u32,
}

impl<P: OutputPin, T: TickTimer> Coils<P, T> {
    fn energize(&mut self) {
        for (pin, on) in self.pins.iter_mut().zip(sequence(self.phase)) {
            // Pin writes are assumed to succeed; there is no recovery from interrupt context.
            let _ = pin.set_state(PinState::from(on));
        }
    }

    /// Enter Idle. The timer goes first so no tick can land mid-write.
    fn idle(&mut self) {
        self.timer.disarm();
        for pin in &mut self.pins {
            let _ = pin.set_low();
        }
    }
}

impl<P: OutputPin, T: TickTimer> Stepper<P, T> {
    /// Create a driver from four coil pins in phase order `[A, B, C, D]` and a timer.
    ///
    /// Starts Idle at phase 0: the timer is disarmed and every coil is switched off.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::PinRejected`] if a pin fails the initial de-energize.
    pub fn from_parts(mut pins: [P; COIL_COUNT], mut timer: T) -> Result<Self> {
        timer.disarm();
        for pin in &mut pins {
            pin.set_low().map_err(|_| ConfigError::PinRejected)?;
        }

        Ok(Self {
            pending: AtomicI32::new(0),
            coils: Mutex::new(RefCell::new(Coils {
                pins,
                timer,
                phase: Phase::ZERO,
                period_ticks: period_ticks_for(DEFAULT_STEP_DELAY),
            })),
        })
    }

    /// Queue `count` half-steps with the default 1 ms delay.
    ///
    /// See [`move_steps_with_delay`](Self::move_steps_with_delay).
    pub fn move_steps(&self, count: i32) {
        self.move_steps_with_delay(count, DEFAULT_STEP_DELAY);
    }

    /// Queue `count` half-steps (negative for reverse) with `delay` between steps.
    ///
    /// `count` is added to whatever is still pending; it does not replace it. If anything
    /// remains pending, the timer is re-armed with the new period, which also governs the
    /// steps queued by earlier calls. Delays under 500 µs are raised to 500 µs.
    ///
    /// If the sum is exactly zero the motor goes Idle right away.
    pub fn move_steps_with_delay(&self, count: i32, delay: Duration) {
        let period_ticks = period_ticks_for(delay);
        self.coils.lock(|cell| {
            let mut coils = cell.borrow_mut();
            let pending = self.pending.load(Ordering::SeqCst).saturating_add(count);
            self.pending.store(pending, Ordering::SeqCst);
            if pending == 0 {
                coils.idle();
            } else {
                coils.period_ticks = period_ticks;
                coils.timer.arm(period_ticks);
            }
        });

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "Stepper move_steps({}) every {}µs -> pending {}",
            count,
            period_ticks,
            self.pending()
        );
    }

    /// Cancel all outstanding motion and go Idle.
    ///
    /// Returns the half-steps that will not be taken (signed). A second call returns 0.
    pub fn stop(&self) -> i32 {
        let untaken = self.coils.lock(|cell| {
            let mut coils = cell.borrow_mut();
            let untaken = self.pending.swap(0, Ordering::SeqCst);
            coils.idle();
            untaken
        });

        #[cfg(feature = "defmt")]
        defmt::debug!("Stepper stop: {} half-steps untaken", untaken);
        untaken
    }

    /// Whether half-steps are still pending.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.pending() != 0
    }

    /// Net half-steps requested but not yet taken.
    #[must_use]
    pub fn pending(&self) -> i32 {
        self.pending.load(Ordering::SeqCst)
    }

    /// Current position in the half-step cycle.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.coils.lock(|cell| cell.borrow().phase)
    }

    /// Period of the most recent request, in microsecond ticks.
    #[must_use]
    pub fn period_ticks(&self) -> u32 {
        self.coils.lock(|cell| cell.borrow().period_ticks)
    }

    /// Timer callback: take one half-step toward the pending target.
    ///
    /// With nothing pending (the tick after the last step, or a spurious one) the driver goes
    /// Idle instead. Must be called from one context at a time; does not allocate.
    pub fn tick(&self) {
        self.coils.lock(|cell| {
            let mut coils = cell.borrow_mut();
            let pending = self.pending.load(Ordering::SeqCst);
            match Direction::of(pending) {
                Some(direction) => {
                    coils.phase = coils.phase.step(direction);
                    coils.energize();
                    // Moving one unit toward zero cannot overflow.
                    self.pending
                        .store(pending.wrapping_sub(direction.unit()), Ordering::SeqCst);
                }
                None => coils.idle(),
            }
        });
    }

    /// Stop the motor and hand back the pins (in phase order) and the timer.
    pub fn release(self) -> ([P; COIL_COUNT], T) {
        self.stop();
        let coils = self.coils.into_inner().into_inner();
        (coils.pins, coils.timer)
    }
}
