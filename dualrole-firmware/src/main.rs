//! Dual-role USB-C PD accessory board firmware
//!
//! RP2040 firmware binary: brings up the shared I2C bus, the PD controller,
//! the battery charger and the character LCD, then hands them to the
//! coordinator task. Interrupt lines and the joystick are watched by their
//! own tasks, which only raise flags.

#![no_std]
#![no_main]

use defmt::*;
use embassy_embedded_hal::shared_bus::asynch::i2c::I2cDevice;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::i2c::{self, Async, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_time::Delay;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use dualrole_core::config::{BoardStraps, CoordinatorConfig, MonitorConfig, Timing};
use dualrole_core::coordinator::{Board, Coordinator};
use dualrole_drivers::board::GpioStraps;
use dualrole_drivers::charger::{Bd99954, Bd99954Config};
use dualrole_drivers::display::{Hd44780, Hd44780Pins};
use dualrole_drivers::pd::{Bm92a, Bm92aConfig, FixedPdo};

mod channels;
mod tasks;

/// Board constants generated from board.toml
mod board_config {
    include!(concat!(env!("OUT_DIR"), "/board_config.rs"));
}

bind_interrupts!(struct Irqs {
    I2C0_IRQ => i2c::InterruptHandler<I2C0>;
});

pub type I2cBus = Mutex<CriticalSectionRawMutex, I2c<'static, I2C0, Async>>;
pub type I2cDev = I2cDevice<'static, CriticalSectionRawMutex, I2c<'static, I2C0, Async>>;
pub type Pd = Bm92a<I2cDev>;
pub type Charger = Bd99954<I2cDev>;
pub type Lcd = Hd44780<Output<'static>, Delay>;
pub type BoardCoordinator = Coordinator<'static, Pd, Charger, Lcd, Delay>;

// Shared bus must live forever for the device handles
static I2C_BUS: StaticCell<I2cBus> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Dual-role firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Shared command bus (GP5 = SCL, GP4 = SDA)
    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = board_config::I2C_FREQUENCY_HZ;
    let i2c = I2c::new_async(p.I2C0, p.PIN_5, p.PIN_4, Irqs, i2c_config);
    let bus = I2C_BUS.init(Mutex::new(i2c));
    info!("I2C bus initialized at {} Hz", board_config::I2C_FREQUENCY_HZ);

    let pd = Bm92a::new(I2cDevice::new(bus), pd_config());
    let charger = Bd99954::new(I2cDevice::new(bus), charger_config());

    // Character LCD (RS = GP13, EN = GP14, backlight = GP15, D0..D7 = GP16..GP23)
    let pins = Hd44780Pins {
        rs: Output::new(p.PIN_13, Level::Low),
        en: Output::new(p.PIN_14, Level::Low),
        data: [
            Output::new(p.PIN_16, Level::Low),
            Output::new(p.PIN_17, Level::Low),
            Output::new(p.PIN_18, Level::Low),
            Output::new(p.PIN_19, Level::Low),
            Output::new(p.PIN_20, Level::Low),
            Output::new(p.PIN_21, Level::Low),
            Output::new(p.PIN_22, Level::Low),
            Output::new(p.PIN_23, Level::Low),
        ],
        backlight: Output::new(p.PIN_15, Level::Low),
    };
    let mut lcd = Hd44780::new(pins, Delay);
    if lcd.init().await.is_err() {
        warn!("LCD init failed, continuing without a display");
    }

    // Configuration straps (GP11 = charge enable, GP12 = source role)
    let straps = read_straps(
        Input::new(p.PIN_11, Pull::Up),
        Input::new(p.PIN_12, Pull::Up),
    );
    info!(
        "Straps: charging={}, initial role={}",
        straps.charge_enabled,
        straps.initial_role.label()
    );

    let board = Board {
        pd,
        charger,
        display: lcd,
        delay: Delay,
    };
    let coordinator = Coordinator::new(board, coordinator_config(), &channels::SIGNALS);

    // Interrupt lines (open drain, active low)
    let pd_alert = Input::new(p.PIN_6, Pull::Up);
    let charger_int = Input::new(p.PIN_7, Pull::Up);

    // Joystick (switches to ground)
    let right = Input::new(p.PIN_8, Pull::Up);
    let left = Input::new(p.PIN_9, Pull::Up);
    let push = Input::new(p.PIN_10, Pull::Up);

    spawner
        .spawn(tasks::irq_task(pd_alert, tasks::IrqLine::PdAlert))
        .unwrap();
    spawner
        .spawn(tasks::irq_task(charger_int, tasks::IrqLine::Charger))
        .unwrap();
    spawner.spawn(tasks::joystick_task(right, left, push)).unwrap();
    spawner
        .spawn(tasks::coordinator_task(coordinator, straps))
        .unwrap();

    info!("All tasks spawned");
}

fn read_straps(charge_enable: Input<'static>, source_role: Input<'static>) -> BoardStraps {
    let mut straps = GpioStraps::new(
        charge_enable,
        source_role,
        board_config::STRAPS_ACTIVE_LOW,
    );
    // RP2040 GPIO reads are infallible
    straps.read().unwrap_or_default()
}

fn pd_config() -> Bm92aConfig {
    let mut config = Bm92aConfig {
        address: board_config::PD_ADDRESS,
        ..Default::default()
    };
    config.source_pdos.clear();
    config.sink_pdos.clear();
    // Table lengths and value ranges are checked by build.rs
    for &(mv, ma) in board_config::SOURCE_PDOS {
        if let Some(pdo) = FixedPdo::new(mv, ma) {
            let _ = config.source_pdos.push(pdo);
        }
    }
    for &(mv, ma) in board_config::SINK_PDOS {
        if let Some(pdo) = FixedPdo::new(mv, ma) {
            let _ = config.sink_pdos.push(pdo);
        }
    }
    config
}

fn charger_config() -> Bd99954Config {
    Bd99954Config {
        address: board_config::CHARGER_ADDRESS,
        input_limit_ma: board_config::INPUT_LIMIT_MA,
        charge_current_ma: board_config::CHARGE_CURRENT_MA,
        charge_voltage_mv: board_config::CHARGE_VOLTAGE_MV,
    }
}

fn coordinator_config() -> CoordinatorConfig {
    CoordinatorConfig {
        timing: Timing {
            backfeed_settle_ms: board_config::BACKFEED_SETTLE_MS,
            backfeed_repaint_ms: board_config::BACKFEED_REPAINT_MS,
            display_sleep_ms: board_config::DISPLAY_SLEEP_MS,
        },
        monitor: MonitorConfig {
            poll_interval_ms: board_config::MONITOR_POLL_INTERVAL_MS,
            stable_samples: board_config::MONITOR_STABLE_SAMPLES,
            tolerance_mv: board_config::MONITOR_TOLERANCE_MV,
            max_polls: board_config::MONITOR_MAX_POLLS,
        },
        default_source_mv: board_config::DEFAULT_SOURCE_MV,
    }
}
