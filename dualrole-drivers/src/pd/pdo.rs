//! USB PD fixed-supply power data objects

#[cfg(feature = "defmt")]
use defmt::Format;
use proc_bitfield::bitfield;

/// Voltage unit of a fixed-supply PDO (mV)
pub const VOLTAGE_UNIT_MV: u16 = 50;
/// Current unit of a fixed-supply PDO (mA)
pub const CURRENT_UNIT_MA: u16 = 10;

/// Largest value of a 10-bit PDO field
const FIELD_MAX: u16 = 0x3FF;

/// Highest encodable voltage (mV)
pub const MAX_MILLIVOLTS: u16 = FIELD_MAX * VOLTAGE_UNIT_MV;
/// Highest encodable current (mA)
pub const MAX_MILLIAMPS: u16 = FIELD_MAX * CURRENT_UNIT_MA;

bitfield! {
    /// Fixed-supply power data object
    #[derive(Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "defmt", derive(Format))]
    pub struct FixedPdo(pub u32): Debug, FromRaw, IntoRaw {
        /// Supply type, 00 for fixed
        pub kind: u8 @ 30..=31,
        /// Voltage in 50mV units
        pub raw_voltage: u16 @ 10..=19,
        /// Maximum current in 10mA units
        pub raw_max_current: u16 @ 0..=9,
    }
}

impl FixedPdo {
    /// Build a fixed-supply PDO
    ///
    /// Values are rounded down to the field units. Returns `None` when either
    /// value does not fit its 10-bit field.
    pub fn new(millivolts: u16, milliamps: u16) -> Option<Self> {
        if millivolts > MAX_MILLIVOLTS || milliamps > MAX_MILLIAMPS {
            return None;
        }
        Some(
            FixedPdo(0)
                .with_raw_voltage(millivolts / VOLTAGE_UNIT_MV)
                .with_raw_max_current(milliamps / CURRENT_UNIT_MA),
        )
    }

    pub fn millivolts(&self) -> u16 {
        self.raw_voltage() * VOLTAGE_UNIT_MV
    }

    pub fn milliamps(&self) -> u16 {
        self.raw_max_current() * CURRENT_UNIT_MA
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pdo(millivolts: u16, milliamps: u16) -> FixedPdo {
        FixedPdo::new(millivolts, milliamps).unwrap()
    }

    #[test]
    fn test_encode_5v_3a() {
        // 100 x 50 mV, 300 x 10 mA
        assert_eq!(u32::from(pdo(5000, 3000)), (100 << 10) | 300);
        assert_eq!(pdo(5000, 3000).kind(), 0);
    }

    #[test]
    fn test_decode_20v() {
        let decoded = FixedPdo::from((400 << 10) | 225);
        assert_eq!(decoded.millivolts(), 20000);
        assert_eq!(decoded.milliamps(), 2250);
    }

    #[test]
    fn test_decode_keeps_type_bits_apart() {
        let decoded = FixedPdo::from((0b11 << 30) | (180 << 10) | 300);
        assert_eq!(decoded.kind(), 0b11);
        assert_eq!(decoded.millivolts(), 9000);
        assert_eq!(decoded.milliamps(), 3000);
    }

    #[test]
    fn test_sub_unit_values_round_down() {
        assert_eq!(u32::from(pdo(5024, 1505)), (100 << 10) | 150);
    }

    #[test]
    fn test_field_limits() {
        let max = pdo(MAX_MILLIVOLTS, MAX_MILLIAMPS);
        assert_eq!(max.millivolts(), 51150);
        assert_eq!(max.milliamps(), 10230);
    }

    #[test]
    fn test_out_of_range_rejected() {
        // Would alias to 8800 mV if the field were silently masked
        assert_eq!(FixedPdo::new(60000, 0), None);
        assert_eq!(FixedPdo::new(5000, 10240), None);
    }
}
