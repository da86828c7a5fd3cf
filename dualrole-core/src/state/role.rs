//! Power role of the board

/// Power role currently owned by the board
///
/// Exactly one role is active; entering one role disables the outputs of the
/// other first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RoleState {
    /// The board draws power from the port or the VCC input
    #[default]
    Sink,
    /// The board supplies power to the port
    Source,
}

impl RoleState {
    /// The opposite role
    pub fn other(self) -> Self {
        match self {
            RoleState::Sink => RoleState::Source,
            RoleState::Source => RoleState::Sink,
        }
    }

    /// Short display label
    pub fn label(self) -> &'static str {
        match self {
            RoleState::Sink => "Sink",
            RoleState::Source => "Source",
        }
    }
}

impl From<bool> for RoleState {
    /// Map a role strap level (`true` = source) to a role
    fn from(source: bool) -> Self {
        if source {
            RoleState::Source
        } else {
            RoleState::Sink
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_other() {
        assert_eq!(RoleState::Sink.other(), RoleState::Source);
        assert_eq!(RoleState::Source.other(), RoleState::Sink);
    }

    #[test]
    fn test_from_strap() {
        assert_eq!(RoleState::from(false), RoleState::Sink);
        assert_eq!(RoleState::from(true), RoleState::Source);
        assert_eq!(RoleState::default(), RoleState::Sink);
    }
}
