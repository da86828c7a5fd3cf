//! HD44780 character LCD, 8-bit parallel interface
//!
//! R/W is tied low on the board, so the busy flag cannot be read; every
//! instruction is followed by its worst-case execution time instead.
//! The 2x16 panel maps row 0 to DDRAM 0x00 and row 1 to DDRAM 0x40.

use dualrole_core::menu::{MenuContext, Screen, COLUMNS};
use dualrole_core::state::RoleState;
use dualrole_core::traits::{DisplayError, MenuDisplay};
use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;

/// Instruction set
pub mod cmd {
    pub const CLEAR: u8 = 0x01;
    /// Entry mode: increment, no shift
    pub const ENTRY_INCREMENT: u8 = 0x06;
    pub const DISPLAY_OFF: u8 = 0x08;
    /// Display on, cursor and blink off
    pub const DISPLAY_ON: u8 = 0x0C;
    /// Function set: 8-bit bus, two lines, 5x8 font
    pub const FUNCTION_8BIT_2LINE: u8 = 0x38;
    pub const SET_DDRAM: u8 = 0x80;
}

/// DDRAM address of each row
const ROW_ADDRESS: [u8; 2] = [0x00, 0x40];

const POWER_ON_MS: u32 = 50;
const FUNCTION_SET_US: u32 = 4_100;
const CLEAR_US: u32 = 1_640;
const INSTRUCTION_US: u32 = 40;
const ENABLE_PULSE_NS: u32 = 450;

/// Pins wired to the panel
pub struct Hd44780Pins<P> {
    /// Register select (low = instruction, high = data)
    pub rs: P,
    /// Enable strobe, latched on the falling edge
    pub en: P,
    /// D0..D7
    pub data: [P; 8],
    /// Backlight switch, active high
    pub backlight: P,
}

/// HD44780 menu display
pub struct Hd44780<P, D> {
    pins: Hd44780Pins<P>,
    delay: D,
}

impl<P: OutputPin, D: DelayNs> Hd44780<P, D> {
    pub fn new(pins: Hd44780Pins<P>, delay: D) -> Self {
        Self { pins, delay }
    }

    /// Power-on initialization
    ///
    /// Leaves the display cleared, on and backlit.
    pub async fn init(&mut self) -> Result<(), DisplayError> {
        self.delay.delay_ms(POWER_ON_MS).await;
        for _ in 0..3 {
            self.command(cmd::FUNCTION_8BIT_2LINE).await?;
            self.delay.delay_us(FUNCTION_SET_US).await;
        }
        self.command(cmd::DISPLAY_OFF).await?;
        self.clear().await?;
        self.command(cmd::ENTRY_INCREMENT).await?;
        self.wake().await
    }

    pub async fn clear(&mut self) -> Result<(), DisplayError> {
        self.command(cmd::CLEAR).await?;
        self.delay.delay_us(CLEAR_US).await;
        Ok(())
    }

    /// Write one row, padded with spaces to the full width
    pub async fn write_row(&mut self, row: usize, text: &str) -> Result<(), DisplayError> {
        let address = *ROW_ADDRESS.get(row).ok_or(DisplayError::NotReady)?;
        self.command(cmd::SET_DDRAM | address).await?;

        let bytes = text.bytes().chain(core::iter::repeat(b' ')).take(COLUMNS);
        for byte in bytes {
            // Only the ASCII range maps to the same glyphs in ROM A00
            let byte = if byte.is_ascii() { byte } else { b'?' };
            self.write(true, byte).await?;
        }
        Ok(())
    }

    async fn command(&mut self, byte: u8) -> Result<(), DisplayError> {
        self.write(false, byte).await
    }

    async fn write(&mut self, data: bool, byte: u8) -> Result<(), DisplayError> {
        let pins = &mut self.pins;
        set(&mut pins.rs, data)?;
        for (bit, pin) in pins.data.iter_mut().enumerate() {
            set(pin, byte & (1 << bit) != 0)?;
        }

        set(&mut pins.en, true)?;
        self.delay.delay_ns(ENABLE_PULSE_NS).await;
        set(&mut self.pins.en, false)?;
        self.delay.delay_us(INSTRUCTION_US).await;
        Ok(())
    }
}

fn set<P: OutputPin>(pin: &mut P, high: bool) -> Result<(), DisplayError> {
    let result = if high { pin.set_high() } else { pin.set_low() };
    result.map_err(|_| DisplayError::Bus)
}

impl<P: OutputPin, D: DelayNs> MenuDisplay for Hd44780<P, D> {
    async fn wake(&mut self) -> Result<(), DisplayError> {
        self.command(cmd::DISPLAY_ON).await?;
        self.pins.backlight.set_high().map_err(|_| DisplayError::Bus)
    }

    /// DDRAM is kept, so a wake shows the last screen again
    async fn sleep(&mut self) -> Result<(), DisplayError> {
        self.command(cmd::DISPLAY_OFF).await?;
        self.pins.backlight.set_low().map_err(|_| DisplayError::Bus)
    }

    async fn repaint(&mut self, role: RoleState, menu: &MenuContext) -> Result<(), DisplayError> {
        let screen = Screen::compose(role, menu);
        for (row, line) in screen.lines().enumerate() {
            self.write_row(row, line).await?;
        }
        Ok(())
    }
}
