//! Detent - servo motion firmware
//!
//! Main firmware binary for RP2040-based motion controllers with open-loop
//! RC servo axes (pen lifts, tool flaps, ...).
//!
//! Startup:
//! 1. Decode the machine config embedded by build.rs
//! 2. Wire the board's PWM outputs and build the axis table
//! 3. Create and initialize the configured motors
//! 4. Spawn the update, e-stop and homing tasks

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Input, Pull};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use detent_core::config::MachineConfig;
use detent_core::motion::Axes;
use detent_core::scheduler::UpdateScheduler;
use detent_drivers::Motors;
use detent_hal_rp2040::{pwm_output, PwmBank, RpPwmPin};

mod board;
mod channels;
mod dwell;
mod tasks;

/// Machine config validated and encoded by build.rs
static MACHINE_CONFIG: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/machine.bin"));

// Shared with every task for the lifetime of the firmware
static AXES: StaticCell<Axes> = StaticCell::new();
static MOTORS: StaticCell<Motors<RpPwmPin>> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Detent firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = match MachineConfig::from_postcard(MACHINE_CONFIG) {
        Ok(config) => config,
        Err(e) => {
            error!("Embedded machine config unusable: {}", e);
            MachineConfig::default()
        }
    };
    info!(
        "Machine '{}': {} motor(s)",
        config.name.as_str(),
        config.motor_count()
    );

    // PWM outputs available to servo drivers
    let mut pwm_bank: PwmBank<{ board::PWM_OUTPUTS }> = PwmBank::new();
    let _ = pwm_bank.add(pwm_output!(p, 29));
    let _ = pwm_bank.add(pwm_output!(p, 24));
    debug!(
        "Servo headers: gpio.{} gpio.{}",
        board::SERVO1_GPIO,
        board::SERVO2_GPIO
    );

    let axes: &'static Axes = AXES.init(Axes::from_config(&config.axes));

    let mut scheduler = UpdateScheduler::new();
    let mut motors = Motors::from_config(&config, |gpio| pwm_bank.take(gpio));
    let ready = motors.init_all(&mut scheduler);
    if ready < motors.len() {
        warn!("{} of {} motors faulted", motors.len() - ready, motors.len());
    }
    info!("{} motor(s) ready", ready);

    // Enabled by the e-stop task once it has seen the input released
    let motors: &'static Motors<RpPwmPin> = MOTORS.init(motors);

    let estop = Input::new(p.PIN_15, Pull::Up);
    let home = Input::new(p.PIN_14, Pull::Up);
    debug!(
        "E-stop gpio.{}, home gpio.{}",
        board::ESTOP_GPIO,
        board::HOME_GPIO
    );

    spawner.spawn(tasks::estop_task(estop, motors)).unwrap();
    spawner.spawn(tasks::update_task(motors, axes, scheduler)).unwrap();
    spawner.spawn(tasks::homing_task(home, motors, axes)).unwrap();

    info!("All tasks spawned, firmware running");
}
