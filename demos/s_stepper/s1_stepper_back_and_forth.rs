//! Stepper demo: queued moves back and forth, a slow move, then an early stop.
#![no_std]
#![no_main]
#![cfg(not(feature = "host"))]

use core::{convert::Infallible, panic};
use embassy_executor::Spawner;
use embassy_time::{Duration, Timer};
use stepper_envoy::{
    Result,
    stepper::{PicoStepper, StepperStatic},
};
use {defmt::info, defmt_rtt as _, panic_probe as _};

#[cfg(feature = "pico2")]
#[allow(unsafe_code, reason = "boot ROM image definition must sit in .start_block")]
#[unsafe(link_section = ".start_block")]
#[used]
pub static IMAGE_DEF: embassy_rp::block::ImageDef = embassy_rp::block::ImageDef::secure_exe();

// 28BYJ-48 output shaft: 64 half-steps per rotor turn x 64:1 gearbox.
const HALF_STEPS_PER_TURN: i32 = 4096;

#[embassy_executor::main]
async fn main(spawner: Spawner) -> ! {
    let err = inner_main(spawner).await.unwrap_err();
    panic!("{err}");
}

async fn inner_main(spawner: Spawner) -> Result<Infallible> {
    let p = embassy_rp::init(Default::default());

    // ULN2003 board: IN1..IN4 on GPIO 2..5.
    static STEPPER_STATIC: StepperStatic = PicoStepper::new_static();
    let stepper = PicoStepper::new(&STEPPER_STATIC, p.PIN_2, p.PIN_3, p.PIN_4, p.PIN_5, spawner)?;

    loop {
        info!("Quarter turn forward, queued in four pieces");
        for _ in 0..4 {
            stepper.move_steps(HALF_STEPS_PER_TURN / 16);
        }
        wait_until_idle(stepper).await;

        info!("Half turn back, slowly");
        stepper.move_steps_with_delay(-HALF_STEPS_PER_TURN / 2, Duration::from_millis(2));
        Timer::after_secs(1).await;
        let untaken = stepper.stop();
        info!("Stopped early with {} half-steps untaken", untaken);

        Timer::after_millis(500).await;
    }
}

async fn wait_until_idle(stepper: &PicoStepper) {
    while stepper.is_running() {
        Timer::after_millis(10).await;
    }
}
