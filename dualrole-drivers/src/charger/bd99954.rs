//! BD99954-class buck-boost battery charger (I2C)
//!
//! Two input rails (VBUS from the USB-C port, VCC from the auxiliary
//! input) feed one battery path. The charger latches rail events in
//! interrupt status registers and raises its interrupt line until they are
//! written back.
//!
//! Extended registers (0x40 and up) are only reachable after the register
//! map is switched with [`reg::MAP_SET`], which the startup sequence does
//! first.

use dualrole_core::traits::{BusError, ChargerController, InputRail, RailReading};
use embedded_hal_async::i2c::I2c;

use crate::bus;

/// Default 7-bit bus address
pub const DEFAULT_ADDRESS: u8 = 0x09;

/// BD99954 register addresses
pub mod reg {
    /// Input current limit, VBUS
    pub const IBUS_LIM_SET: u8 = 0x07;
    /// Input current limit, VCC
    pub const ICC_LIM_SET: u8 = 0x08;
    /// Charger operation control
    pub const CHGOP_SET2: u8 = 0x0B;
    /// Fast charge current
    pub const ICHG_SET: u8 = 0x14;
    /// Fast charge termination voltage
    pub const VFASTCHG_REG_SET1: u8 = 0x1A;
    /// Register map select
    pub const MAP_SET: u8 = 0x3F;
    /// Averaged measurements
    pub const IBUS_AVE_VAL: u8 = 0x5B;
    pub const VBUS_AVE_VAL: u8 = 0x5D;
    pub const ICC_AVE_VAL: u8 = 0x5F;
    pub const VCC_AVE_VAL: u8 = 0x61;
    /// Rail interrupt status (VBUS/VCC events)
    pub const INT1_STATUS: u8 = 0x70;
    /// VBUS input select
    pub const VBUS_SELECT: u8 = 0x71;
    /// VCC input select
    pub const VCC_SELECT: u8 = 0x72;
    /// Remaining interrupt status registers
    pub const INT2_STATUS: u8 = 0x73;
    pub const INT3_STATUS: u8 = 0x74;
    pub const INT4_STATUS: u8 = 0x75;
    pub const INT5_STATUS: u8 = 0x76;
}

/// Interrupt status registers cleared by [`ChargerController::clear_interrupts`]
const INT_STATUS: [u8; 5] = [
    reg::INT1_STATUS,
    reg::INT2_STATUS,
    reg::INT3_STATUS,
    reg::INT4_STATUS,
    reg::INT5_STATUS,
];

/// Extended register map enable
pub const MAP_EXTENDED: u16 = 0x0001;
/// Charge enable bit of [`reg::CHGOP_SET2`]
pub const CHGOP_CHG_EN: u16 = 0x0080;
/// Value written to an input select register to route that rail
pub const RAIL_SELECT: u16 = 0x000F;
/// Value written to an interrupt status register to clear it
pub const INT_CLEAR: u16 = 0x00FF;

const INPUT_LIMIT_STEP_MA: u16 = 32;
const CHARGE_CURRENT_STEP_MA: u16 = 64;
const CHARGE_VOLTAGE_STEP_MV: u16 = 16;

/// BD99954 driver configuration
#[derive(Debug, Clone)]
pub struct Bd99954Config {
    /// 7-bit bus address
    pub address: u8,
    /// Input current limit for either rail (mA, 32 mA steps)
    pub input_limit_ma: u16,
    /// Fast charge current (mA, 64 mA steps)
    pub charge_current_ma: u16,
    /// Charge termination voltage (mV, 16 mV steps)
    pub charge_voltage_mv: u16,
}

impl Default for Bd99954Config {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            input_limit_ma: 3000,
            charge_current_ma: 1024,
            // 2S Li-ion
            charge_voltage_mv: 8400,
        }
    }
}

impl Bd99954Config {
    /// Round a value down to the register step
    fn step(value: u16, step: u16) -> u16 {
        value - value % step
    }

    /// Bring-up register writes, in order
    pub fn startup_writes(&self) -> [(u8, u16); 5] {
        [
            (reg::MAP_SET, MAP_EXTENDED),
            (
                reg::IBUS_LIM_SET,
                Self::step(self.input_limit_ma, INPUT_LIMIT_STEP_MA),
            ),
            (
                reg::ICC_LIM_SET,
                Self::step(self.input_limit_ma, INPUT_LIMIT_STEP_MA),
            ),
            (
                reg::ICHG_SET,
                Self::step(self.charge_current_ma, CHARGE_CURRENT_STEP_MA),
            ),
            (
                reg::VFASTCHG_REG_SET1,
                Self::step(self.charge_voltage_mv, CHARGE_VOLTAGE_STEP_MV),
            ),
        ]
    }
}

/// BD99954 charger driver
pub struct Bd99954<I2C> {
    i2c: I2C,
    config: Bd99954Config,
}

impl<I2C: I2c> Bd99954<I2C> {
    pub fn new(i2c: I2C, config: Bd99954Config) -> Self {
        Self { i2c, config }
    }

    async fn read(&mut self, reg: u8) -> Result<u16, BusError> {
        bus::read_word(&mut self.i2c, self.config.address, reg).await
    }

    async fn write(&mut self, reg: u8, value: u16) -> Result<(), BusError> {
        bus::write_word(&mut self.i2c, self.config.address, reg, value).await
    }
}

impl<I2C: I2c> ChargerController for Bd99954<I2C> {
    async fn run_startup_sequence(&mut self) -> Result<(), BusError> {
        for (reg, value) in self.config.startup_writes() {
            self.write(reg, value).await?;
        }
        Ok(())
    }

    async fn set_charging_enabled(&mut self, enabled: bool) -> Result<(), BusError> {
        let (clear, set) = if enabled {
            (0, CHGOP_CHG_EN)
        } else {
            (CHGOP_CHG_EN, 0)
        };
        bus::modify_word(&mut self.i2c, self.config.address, reg::CHGOP_SET2, clear, set).await
    }

    async fn rail_status(&mut self) -> Result<u16, BusError> {
        self.read(reg::INT1_STATUS).await
    }

    async fn acknowledge_interrupt(&mut self, mask: u16) -> Result<(), BusError> {
        self.write(reg::INT1_STATUS, mask).await
    }

    async fn clear_interrupts(&mut self) -> Result<(), BusError> {
        for reg in INT_STATUS {
            self.write(reg, INT_CLEAR).await?;
        }
        Ok(())
    }

    async fn select_active_rail(&mut self, rail: InputRail) -> Result<(), BusError> {
        let reg = match rail {
            InputRail::Vbus => reg::VBUS_SELECT,
            InputRail::Vcc => reg::VCC_SELECT,
        };
        self.write(reg, RAIL_SELECT).await
    }

    async fn measure(&mut self, rail: InputRail) -> Result<RailReading, BusError> {
        let (voltage, current) = match rail {
            InputRail::Vbus => (reg::VBUS_AVE_VAL, reg::IBUS_AVE_VAL),
            InputRail::Vcc => (reg::VCC_AVE_VAL, reg::ICC_AVE_VAL),
        };
        Ok(RailReading {
            millivolts: self.read(voltage).await?,
            milliamps: self.read(current).await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockI2c;
    use embassy_futures::block_on;

    const ADDR: u8 = DEFAULT_ADDRESS;

    fn driver() -> Bd99954<MockI2c> {
        Bd99954::new(MockI2c::new(), Bd99954Config::default())
    }

    #[test]
    fn test_startup_switches_map_first() {
        let mut charger = driver();
        block_on(charger.run_startup_sequence()).unwrap();

        let writes = charger.i2c.writes();
        assert_eq!(writes.len(), 5);
        assert_eq!(writes[0].1[0], reg::MAP_SET);
        assert_eq!(charger.i2c.word(ADDR, reg::VFASTCHG_REG_SET1), 8400);
        assert_eq!(charger.i2c.word(ADDR, reg::IBUS_LIM_SET), 2976);
        assert_eq!(charger.i2c.word(ADDR, reg::ICHG_SET), 1024);
    }

    #[test]
    fn test_charging_enable_toggles_bit() {
        let mut charger = driver();
        charger.i2c.set_word(ADDR, reg::CHGOP_SET2, 0x0101);

        block_on(charger.set_charging_enabled(true)).unwrap();
        assert_eq!(charger.i2c.word(ADDR, reg::CHGOP_SET2), 0x0181);

        block_on(charger.set_charging_enabled(false)).unwrap();
        assert_eq!(charger.i2c.word(ADDR, reg::CHGOP_SET2), 0x0101);
    }

    #[test]
    fn test_rail_status_and_acknowledge() {
        let mut charger = driver();
        charger.i2c.set_word(ADDR, reg::INT1_STATUS, 0x0004);

        assert_eq!(block_on(charger.rail_status()), Ok(0x0004));
        block_on(charger.acknowledge_interrupt(0x00FF)).unwrap();
        assert_eq!(
            charger.i2c.written_words(ADDR, reg::INT1_STATUS),
            std::vec![0x00FF]
        );
    }

    #[test]
    fn test_clear_interrupts_writes_every_status() {
        let mut charger = driver();
        block_on(charger.clear_interrupts()).unwrap();

        for reg in INT_STATUS {
            assert_eq!(charger.i2c.written_words(ADDR, reg), std::vec![INT_CLEAR]);
        }
    }

    #[test]
    fn test_rail_selection_registers() {
        let mut charger = driver();
        block_on(charger.select_active_rail(InputRail::Vbus)).unwrap();
        block_on(charger.select_active_rail(InputRail::Vcc)).unwrap();

        assert_eq!(charger.i2c.written_words(ADDR, 0x71), std::vec![0x000F]);
        assert_eq!(charger.i2c.written_words(ADDR, 0x72), std::vec![0x000F]);
    }

    #[test]
    fn test_measure_reads_rail_pair() {
        let mut charger = driver();
        charger.i2c.set_word(ADDR, reg::VCC_AVE_VAL, 12000);
        charger.i2c.set_word(ADDR, reg::ICC_AVE_VAL, 850);

        let reading = block_on(charger.measure(InputRail::Vcc)).unwrap();
        assert_eq!(
            reading,
            RailReading {
                millivolts: 12000,
                milliamps: 850,
            }
        );
        assert_eq!(
            charger.i2c.reads(),
            &[(ADDR, reg::VCC_AVE_VAL), (ADDR, reg::ICC_AVE_VAL)]
        );
    }
}
