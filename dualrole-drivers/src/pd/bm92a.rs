//! BM92A-class USB-C PD controller (I2C)
//!
//! The controller runs the PD policy engine itself; the host only loads
//! power data objects, sets the role configuration and issues commands.
//!
//! # Bus protocol
//!
//! SMBus-style transfers at the 7-bit address 0x18:
//! - Word registers: command code, then a little-endian 16-bit word
//! - PDO tables: block write (command code, byte count, little-endian PDOs)
//! - Commands: a word written to [`reg::COMMAND`]; the controller clears
//!   [`STATUS2_CMD_BUSY`] once the command has been accepted
//!
//! Writing the sink request command disconnects a 5 V source feeding the
//! port, so it must never be issued before the port status has been probed.

use dualrole_core::traits::{BusError, PdController};
use embedded_hal_async::i2c::I2c;
use heapless::Vec;

use super::pdo::FixedPdo;
use crate::bus;

/// Default 7-bit bus address
pub const DEFAULT_ADDRESS: u8 = 0x18;

/// Maximum PDOs per table
pub const MAX_PDOS: usize = 7;

/// BM92A register addresses
pub mod reg {
    /// Alert (event) word
    pub const ALERT: u8 = 0x02;
    /// Port status
    pub const STATUS1: u8 = 0x03;
    /// Command status
    pub const STATUS2: u8 = 0x04;
    /// Command register
    pub const COMMAND: u8 = 0x05;
    /// Source capability table
    pub const SRC_PDO: u8 = 0x08;
    /// Alert enable mask
    pub const ALERT_ENABLE: u8 = 0x19;
    /// Sink capability table
    pub const SNK_PDO: u8 = 0x20;
    /// System configuration 1 (power role)
    pub const SYS_CONFIG1: u8 = 0x26;
    /// System configuration 2 (VBUS switches)
    pub const SYS_CONFIG2: u8 = 0x27;
    /// PDO of the active contract
    pub const CURRENT_PDO: u8 = 0x28;
    /// Source VBUS setpoint
    pub const VBUS_SETPOINT: u8 = 0x2F;
}

/// Controller commands written to [`reg::COMMAND`]
pub mod cmd {
    /// Request power as sink
    pub const SINK_REQUEST: u16 = 0x0909;
    /// Send source capabilities and negotiate
    pub const SOURCE_OFFER: u16 = 0x0A0A;
}

/// Power role source bit of [`reg::SYS_CONFIG1`]
pub const SYS_CONFIG1_SOURCE: u16 = 0x0001;
/// Automatic negotiation bit of [`reg::SYS_CONFIG1`]
pub const SYS_CONFIG1_AUTO_NGT: u16 = 0x0008;
/// Dual-role port bit of [`reg::SYS_CONFIG1`]
pub const SYS_CONFIG1_DUAL_ROLE: u16 = 0x0100;
/// VBUS source switch enable of [`reg::SYS_CONFIG2`]
pub const SYS_CONFIG2_VBUS_SRC_EN: u16 = 0x0004;
/// Command in progress bit of [`reg::STATUS2`]
pub const STATUS2_CMD_BUSY: u16 = 0x0001;
/// Alerts routed to the alert pin: plug insert, contract, command done
pub const ALERT_MASK: u16 = 0x2000 | 0x0200 | 0x0008;
/// VBUS setpoint resolution (mV)
pub const VBUS_STEP_MV: u16 = 32;

/// BM92A driver configuration
#[derive(Debug, Clone)]
pub struct Bm92aConfig {
    /// 7-bit bus address
    pub address: u8,
    /// Offers advertised as source
    pub source_pdos: Vec<FixedPdo, MAX_PDOS>,
    /// Capabilities requested as sink
    pub sink_pdos: Vec<FixedPdo, MAX_PDOS>,
    /// Status reads while waiting for a command to be accepted
    pub command_polls: u8,
}

impl Default for Bm92aConfig {
    fn default() -> Self {
        let mut source_pdos = Vec::new();
        let mut sink_pdos = Vec::new();
        for (mv, ma) in [(5000, 3000), (9000, 3000), (15000, 3000), (20000, 2250)] {
            if let Some(pdo) = FixedPdo::new(mv, ma) {
                let _ = source_pdos.push(pdo);
            }
        }
        for (mv, ma) in [(5000, 3000), (9000, 3000), (15000, 3000), (20000, 3000)] {
            if let Some(pdo) = FixedPdo::new(mv, ma) {
                let _ = sink_pdos.push(pdo);
            }
        }
        Self {
            address: DEFAULT_ADDRESS,
            source_pdos,
            sink_pdos,
            command_polls: 10,
        }
    }
}

/// BM92A PD controller driver
pub struct Bm92a<I2C> {
    i2c: I2C,
    config: Bm92aConfig,
}

impl<I2C: I2c> Bm92a<I2C> {
    pub fn new(i2c: I2C, config: Bm92aConfig) -> Self {
        Self { i2c, config }
    }

    async fn read(&mut self, reg: u8) -> Result<u16, BusError> {
        bus::read_word(&mut self.i2c, self.config.address, reg).await
    }

    async fn write(&mut self, reg: u8, value: u16) -> Result<(), BusError> {
        bus::write_word(&mut self.i2c, self.config.address, reg, value).await
    }

    async fn modify(&mut self, reg: u8, clear: u16, set: u16) -> Result<(), BusError> {
        bus::modify_word(&mut self.i2c, self.config.address, reg, clear, set).await
    }

    async fn write_pdos(&mut self, reg: u8, pdos: &[FixedPdo]) -> Result<(), BusError> {
        let mut payload: Vec<u8, { MAX_PDOS * 4 }> = Vec::new();
        for pdo in pdos {
            payload
                .extend_from_slice(&u32::from(*pdo).to_le_bytes())
                .map_err(|_| BusError::Other)?;
        }
        bus::write_block(&mut self.i2c, self.config.address, reg, &payload).await
    }

    /// Issue a command and wait until the controller accepts it
    pub async fn command(&mut self, command: u16) -> Result<(), BusError> {
        self.write(reg::COMMAND, command).await?;
        for _ in 0..self.config.command_polls.max(1) {
            if self.read(reg::STATUS2).await? & STATUS2_CMD_BUSY == 0 {
                return Ok(());
            }
        }
        Err(BusError::Timeout)
    }
}

impl<I2C: I2c> PdController for Bm92a<I2C> {
    async fn alert_status(&mut self) -> Result<u16, BusError> {
        self.read(reg::ALERT).await
    }

    async fn port_status(&mut self) -> Result<u16, BusError> {
        self.read(reg::STATUS1).await
    }

    async fn load_source_offers(&mut self) -> Result<(), BusError> {
        let pdos = self.config.source_pdos.clone();
        self.write_pdos(reg::SRC_PDO, &pdos).await
    }

    async fn load_sink_offers(&mut self) -> Result<(), BusError> {
        let pdos = self.config.sink_pdos.clone();
        self.write_pdos(reg::SNK_PDO, &pdos).await
    }

    async fn apply_sink_config(&mut self) -> Result<(), BusError> {
        self.modify(
            reg::SYS_CONFIG1,
            SYS_CONFIG1_SOURCE,
            SYS_CONFIG1_AUTO_NGT | SYS_CONFIG1_DUAL_ROLE,
        )
        .await?;
        self.write(reg::ALERT_ENABLE, ALERT_MASK).await
    }

    async fn apply_source_config(&mut self) -> Result<(), BusError> {
        self.modify(
            reg::SYS_CONFIG1,
            0,
            SYS_CONFIG1_SOURCE | SYS_CONFIG1_AUTO_NGT | SYS_CONFIG1_DUAL_ROLE,
        )
        .await?;
        self.write(reg::ALERT_ENABLE, ALERT_MASK).await
    }

    async fn negotiate_sink_request(&mut self) -> Result<(), BusError> {
        self.command(cmd::SINK_REQUEST).await
    }

    async fn negotiate_source_offer(&mut self) -> Result<u16, BusError> {
        self.command(cmd::SOURCE_OFFER).await?;
        let raw = bus::read_long(&mut self.i2c, self.config.address, reg::CURRENT_PDO).await?;
        Ok(FixedPdo::from(raw).millivolts())
    }

    async fn disable_reverse_drive(&mut self) -> Result<(), BusError> {
        self.modify(reg::SYS_CONFIG2, SYS_CONFIG2_VBUS_SRC_EN, 0)
            .await
    }

    async fn revert_to_default_voltage(&mut self, millivolts: u16) -> Result<(), BusError> {
        self.write(reg::VBUS_SETPOINT, millivolts / VBUS_STEP_MV)
            .await?;
        self.modify(reg::SYS_CONFIG2, 0, SYS_CONFIG2_VBUS_SRC_EN)
            .await
    }
}
