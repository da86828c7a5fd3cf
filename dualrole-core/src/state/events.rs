//! Alert events and their classification

use heapless::Vec;

use super::role::RoleState;
use super::snapshot::RailSnapshot;

/// Events produced by classifying a register snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlertEvent {
    /// A port partner or battery pack is attached (sink role)
    PartnerAttachChanged,
    /// The sink/VCC rail is active
    AuxRailActive,
    /// A plug was inserted while sourcing
    PlugInserted,
    /// Nothing relevant changed
    NoOp,
}

impl AlertEvent {
    /// Check if handling this event may change the role
    pub fn is_role_transition(&self, role: RoleState) -> bool {
        matches!((role, self), (RoleState::Source, AlertEvent::AuxRailActive))
    }
}

/// Ordered events to handle in one dispatch cycle
///
/// Sink role can yield two events in one cycle; every other case yields
/// exactly one.
pub type Classification = Vec<AlertEvent, 2>;

/// Classify a snapshot against the current role
///
/// In sink role the partner-attach and aux-rail paths are independent and
/// both run, partner first. In source role sink-rail activity takes
/// precedence over a plug insert, and the two never run together.
pub fn classify(role: RoleState, snapshot: &RailSnapshot) -> Classification {
    let mut events = Classification::new();

    match role {
        RoleState::Sink => {
            if snapshot.partner_attached() {
                let _ = events.push(AlertEvent::PartnerAttachChanged);
            }
            if snapshot.sink_rail_active() {
                let _ = events.push(AlertEvent::AuxRailActive);
            }
        }
        RoleState::Source => {
            if snapshot.sink_rail_active() {
                let _ = events.push(AlertEvent::AuxRailActive);
            } else if snapshot.plug_inserted() {
                let _ = events.push(AlertEvent::PlugInserted);
            }
        }
    }

    if events.is_empty() {
        let _ = events.push(AlertEvent::NoOp);
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn snapshot(alert: u16, port_status: u16, rail_status: u16) -> RailSnapshot {
        RailSnapshot {
            alert,
            port_status,
            rail_status,
        }
    }

    #[test]
    fn test_sink_partner_only() {
        let events = classify(RoleState::Sink, &snapshot(0, 0x0300, 0));
        assert_eq!(events.as_slice(), &[AlertEvent::PartnerAttachChanged]);
    }

    #[test]
    fn test_sink_both_paths_partner_first() {
        let events = classify(RoleState::Sink, &snapshot(0, 0x0100, 0x0004));
        assert_eq!(
            events.as_slice(),
            &[AlertEvent::PartnerAttachChanged, AlertEvent::AuxRailActive]
        );
    }

    #[test]
    fn test_sink_ignores_plug_insert() {
        let events = classify(RoleState::Sink, &snapshot(0x2000, 0, 0));
        assert_eq!(events.as_slice(), &[AlertEvent::NoOp]);
    }

    #[test]
    fn test_source_rail_precedence() {
        let events = classify(RoleState::Source, &snapshot(0x2000, 0x0300, 0x0004));
        assert_eq!(events.as_slice(), &[AlertEvent::AuxRailActive]);
        assert!(events[0].is_role_transition(RoleState::Source));
    }

    #[test]
    fn test_source_plug_insert() {
        let events = classify(RoleState::Source, &snapshot(0x2000, 0, 0));
        assert_eq!(events.as_slice(), &[AlertEvent::PlugInserted]);
        assert!(!events[0].is_role_transition(RoleState::Source));
    }

    #[test]
    fn test_source_fallthrough() {
        let events = classify(RoleState::Source, &snapshot(0xDFFF, 0x0300, 0xFFFB));
        assert_eq!(events.as_slice(), &[AlertEvent::NoOp]);
    }

    proptest! {
        #[test]
        fn sink_paths_follow_their_bits(alert: u16, port: u16, rail: u16) {
            let snap = snapshot(alert, port, rail);
            let events = classify(RoleState::Sink, &snap);

            prop_assert_eq!(
                events.contains(&AlertEvent::PartnerAttachChanged),
                port & 0x0300 != 0
            );
            prop_assert_eq!(events.contains(&AlertEvent::AuxRailActive), rail & 0x0004 != 0);
            prop_assert!(!events.contains(&AlertEvent::PlugInserted));
            if events.len() == 2 {
                prop_assert_eq!(events[0], AlertEvent::PartnerAttachChanged);
            }
        }

        #[test]
        fn source_yields_single_event(alert: u16, port: u16, rail: u16) {
            let events = classify(RoleState::Source, &snapshot(alert, port, rail));
            prop_assert_eq!(events.len(), 1);

            let expected = if rail & 0x0004 != 0 {
                AlertEvent::AuxRailActive
            } else if alert & 0x2000 != 0 {
                AlertEvent::PlugInserted
            } else {
                AlertEvent::NoOp
            };
            prop_assert_eq!(events[0], expected);
        }
    }
}
