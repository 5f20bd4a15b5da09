//! Pico binding for [`Stepper`]: GPIO coil outputs and a ticker task standing in for the
//! periodic timer interrupt.
//!
//! See [`PicoStepper::new`] for construction.

use defmt::{debug, info};
use embassy_executor::Spawner;
use embassy_futures::select::{Either, select};
use embassy_rp::Peri;
use embassy_rp::gpio::{Level, Output, Pin};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Ticker};
use static_cell::StaticCell;

use super::{Stepper, TickTimer, TimerClaim, ensure_distinct_gpios};
use crate::{ConfigError, Error, Result};

/// A [`Stepper`] on Pico GPIO outputs, ticked by its own background task.
pub type PicoStepper = Stepper<Output<'static>, TickerTimer>;

/// Schedule changes sent from the driver to its tick task. The latest one wins.
#[derive(Clone, Copy, Debug, defmt::Format)]
enum TimerCommand {
    Arm { period_ticks: u32 },
    Disarm,
}

type TimerSignal = Signal<CriticalSectionRawMutex, TimerCommand>;

/// Static resources for one [`PicoStepper`]: its timer and the driver's storage.
///
/// Each motor needs its own `StepperStatic`.
pub struct StepperStatic {
    command: TimerSignal,
    claim: TimerClaim,
    stepper_cell: StaticCell<PicoStepper>,
}

impl StepperStatic {
    const fn new() -> Self {
        Self {
            command: Signal::new(),
            claim: TimerClaim::new(),
            stepper_cell: StaticCell::new(),
        }
    }
}

/// [`TickTimer`] backed by the tick task spawned in [`PicoStepper::new`].
///
/// Arming restarts the task's [`Ticker`] with the new period; disarming parks it.
pub struct TickerTimer {
    command: &'static TimerSignal,
}

impl TickerTimer {
    fn claim(stepper_static: &'static StepperStatic) -> Result<Self, ConfigError> {
        stepper_static.claim.claim()?;
        Ok(Self {
            command: &stepper_static.command,
        })
    }
}

impl TickTimer for TickerTimer {
    fn arm(&mut self, period_ticks: u32) {
        self.command.signal(TimerCommand::Arm { period_ticks });
    }

    fn disarm(&mut self) {
        self.command.signal(TimerCommand::Disarm);
    }
}

impl PicoStepper {
    /// Create [`PicoStepper`] resources.
    #[must_use]
    pub const fn new_static() -> StepperStatic {
        StepperStatic::new()
    }

    /// Create a stepper on four GPIOs in phase order (ULN2003 IN1..IN4) and spawn its tick task.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::DuplicatePin`] if two coils name the same GPIO.
    /// - [`ConfigError::TimerUnavailable`] if `stepper_static` already backs a stepper.
    /// - [`Error::TaskSpawn`] if the tick task cannot be spawned.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # #![no_std]
    /// # #![no_main]
    /// use stepper_envoy::stepper::{PicoStepper, StepperStatic};
    /// use embassy_time::{Duration, Timer};
    /// # #[panic_handler]
    /// # fn panic(_info: &core::panic::PanicInfo) -> ! { loop {} }
    ///
    /// async fn example(
    ///     p: embassy_rp::Peripherals,
    ///     spawner: embassy_executor::Spawner,
    /// ) -> stepper_envoy::Result<()> {
    ///     static STEPPER_STATIC: StepperStatic = PicoStepper::new_static();
    ///     let stepper = PicoStepper::new(&STEPPER_STATIC, p.PIN_2, p.PIN_3, p.PIN_4, p.PIN_5, spawner)?;
    ///
    ///     stepper.move_steps(4096); // one output-shaft turn on a 28BYJ-48
    ///     stepper.move_steps(-1024); // queued on top: net +3072
    ///     while stepper.is_running() {
    ///         Timer::after(Duration::from_millis(10)).await;
    ///     }
    ///
    ///     stepper.move_steps_with_delay(512, Duration::from_millis(3));
    ///     Timer::after(Duration::from_millis(500)).await;
    ///     let _untaken = stepper.stop();
    ///     Ok(())
    /// }
    /// ```
    pub fn new<A: Pin, B: Pin, C: Pin, D: Pin>(
        stepper_static: &'static StepperStatic,
        pin_a: Peri<'static, A>,
        pin_b: Peri<'static, B>,
        pin_c: Peri<'static, C>,
        pin_d: Peri<'static, D>,
        spawner: Spawner,
    ) -> Result<&'static Self> {
        let gpios = [pin_a.pin(), pin_b.pin(), pin_c.pin(), pin_d.pin()];
        ensure_distinct_gpios(gpios)?;
        let timer = TickerTimer::claim(stepper_static)?;

        let pins = [
            Output::new(pin_a, Level::Low),
            Output::new(pin_b, Level::Low),
            Output::new(pin_c, Level::Low),
            Output::new(pin_d, Level::Low),
        ];
        let stepper = stepper_static
            .stepper_cell
            .init(Self::from_parts(pins, timer)?);

        let token = stepper_tick_task(stepper, &stepper_static.command);
        spawner.spawn(token).map_err(Error::TaskSpawn)?;

        info!("Stepper on GPIO {} ready", gpios);
        Ok(stepper)
    }
}

#[embassy_executor::task(pool_size = 4)]
async fn stepper_tick_task(stepper: &'static PicoStepper, command: &'static TimerSignal) -> ! {
    info!("stepper_tick_task: task started");
    let mut armed_period = None;
    loop {
        armed_period = match armed_period {
            None => next_period(command.wait().await),
            Some(period_ticks) => tick_until_rescheduled(stepper, command, period_ticks).await,
        };
    }
}

/// Tick every `period_ticks` until a new command arrives; returns the new period, if any.
async fn tick_until_rescheduled(
    stepper: &PicoStepper,
    command: &TimerSignal,
    period_ticks: u32,
) -> Option<u32> {
    debug!("stepper_tick_task: armed every {}µs", period_ticks);
    let mut ticker = Ticker::every(Duration::from_micros(u64::from(period_ticks)));
    loop {
        match select(ticker.next(), command.wait()).await {
            Either::First(()) => stepper.tick(),
            Either::Second(next) => return next_period(next),
        }
    }
}

const fn next_period(timer_command: TimerCommand) -> Option<u32> {
    match timer_command {
        TimerCommand::Arm { period_ticks } => Some(period_ticks),
        TimerCommand::Disarm => None,
    }
}
