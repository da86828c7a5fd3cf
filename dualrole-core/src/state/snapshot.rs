//! Register snapshot captured at the start of a dispatch cycle
//!
//! A snapshot is only valid within the cycle that captured it; the
//! coordinator never carries one over to the next cycle.

/// Partner/battery attachment field of the PD port status word
pub const PARTNER_ATTACH_MASK: u16 = 0x0300;
/// Shift of the partner attachment field
pub const PARTNER_ATTACH_SHIFT: u16 = 8;
/// Plug-insert event bit of the PD alert word
pub const PLUG_INSERT_BIT: u16 = 0x2000;
/// Sink/VCC rail activity bit of the charger rail status word
pub const SINK_RAIL_ACTIVE_BIT: u16 = 0x0004;
/// Mask that acknowledges every charger rail interrupt
pub const INTERRUPT_CLEAR_ALL: u16 = 0x00FF;

/// Check the partner attachment field of a PD port status word
pub fn partner_attached(port_status: u16) -> bool {
    (port_status & PARTNER_ATTACH_MASK) >> PARTNER_ATTACH_SHIFT != 0
}

/// Status words read at the start of a dispatch cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RailSnapshot {
    /// PD controller alert word
    pub alert: u16,
    /// PD controller port status word
    pub port_status: u16,
    /// Charger rail status word
    pub rail_status: u16,
}

impl RailSnapshot {
    /// A port partner (or battery pack) is attached
    pub fn partner_attached(&self) -> bool {
        partner_attached(self.port_status)
    }

    /// The charger sees activity on the sink/VCC rail
    pub fn sink_rail_active(&self) -> bool {
        self.rail_status & SINK_RAIL_ACTIVE_BIT != 0
    }

    /// The PD controller latched a plug-insert event
    pub fn plug_inserted(&self) -> bool {
        self.alert & PLUG_INSERT_BIT != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partner_attach_field() {
        assert!(partner_attached(0x0300));
        assert!(partner_attached(0x0100));
        assert!(partner_attached(0x0200));
        assert!(!partner_attached(0x0000));
        assert!(!partner_attached(0xFCFF));
    }

    #[test]
    fn test_snapshot_bits() {
        let snapshot = RailSnapshot {
            alert: 0x2000,
            port_status: 0x0000,
            rail_status: 0x0004,
        };
        assert!(snapshot.plug_inserted());
        assert!(snapshot.sink_rail_active());
        assert!(!snapshot.partner_attached());

        let quiet = RailSnapshot {
            alert: 0xDFFF,
            port_status: 0xFCFF,
            rail_status: 0xFFFB,
        };
        assert!(!quiet.plug_inserted());
        assert!(!quiet.sink_rail_active());
        assert!(!quiet.partner_attached());
    }
}
