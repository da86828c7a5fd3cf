//! Menu navigation state and telemetry

use crate::state::RoleState;
use crate::traits::{InputRail, RailReading};

/// Menu pages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuPage {
    /// Current role and battery presence
    #[default]
    Status,
    /// Last monitored rail reading
    Rails,
    /// Role switch
    Mode,
    /// Shortcut shown after entering sink role
    SinkFastSet,
    /// Shortcut shown after entering source role
    SourceFastSet,
}

impl MenuPage {
    /// Pages reachable by scrolling, in order
    pub const CYCLE: [MenuPage; 3] = [MenuPage::Status, MenuPage::Rails, MenuPage::Mode];

    /// Check if this is a fast-set shortcut page
    pub fn is_fast_set(&self) -> bool {
        matches!(self, MenuPage::SinkFastSet | MenuPage::SourceFastSet)
    }

    fn cycle_index(&self) -> Option<usize> {
        Self::CYCLE.iter().position(|page| page == self)
    }
}

/// Fast-set shortcut selected by a role transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FastSet {
    Sink,
    Source,
}

impl FastSet {
    /// Shortcut page for this fast-set
    pub fn page(self) -> MenuPage {
        match self {
            FastSet::Sink => MenuPage::SinkFastSet,
            FastSet::Source => MenuPage::SourceFastSet,
        }
    }
}

impl From<RoleState> for FastSet {
    fn from(role: RoleState) -> Self {
        match role {
            RoleState::Sink => FastSet::Sink,
            RoleState::Source => FastSet::Source,
        }
    }
}

/// Joystick scroll direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScrollDirection {
    Forward,
    Backward,
}

/// Action requested by a menu select
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuAction {
    /// Switch to the given role
    SwitchRole(RoleState),
    /// Renegotiate the contract in the current role
    Renegotiate,
}

/// Values shown by the menu pages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Telemetry {
    /// Final reading of the last rail monitoring run
    pub last_reading: Option<(InputRail, RailReading)>,
    /// Last negotiated source voltage
    pub source_mv: Option<u16>,
    /// Battery pack or partner detected at startup
    pub battery_present: bool,
}

/// Displayed menu page, fast-set shortcut and telemetry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MenuContext {
    page: MenuPage,
    pub telemetry: Telemetry,
}

impl MenuContext {
    /// Create a menu showing the status page
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently displayed page
    pub fn page(&self) -> MenuPage {
        self.page
    }

    /// Active fast-set shortcut, if a shortcut page is displayed
    pub fn fast_set(&self) -> Option<FastSet> {
        match self.page {
            MenuPage::SinkFastSet => Some(FastSet::Sink),
            MenuPage::SourceFastSet => Some(FastSet::Source),
            _ => None,
        }
    }

    /// Jump to a fast-set shortcut page
    pub fn jump_to_fast_set(&mut self, fast_set: FastSet) {
        self.page = fast_set.page();
    }

    /// Scroll one page, wrapping around the page cycle
    ///
    /// Scrolling away from a shortcut page clears the shortcut and lands on
    /// the first page (forward) or the last page (backward).
    pub fn scroll(&mut self, direction: ScrollDirection) {
        let len = MenuPage::CYCLE.len();
        let next = match (self.page.cycle_index(), direction) {
            (Some(i), ScrollDirection::Forward) => (i + 1) % len,
            (Some(i), ScrollDirection::Backward) => (i + len - 1) % len,
            (None, ScrollDirection::Forward) => 0,
            (None, ScrollDirection::Backward) => len - 1,
        };
        self.page = MenuPage::CYCLE[next];
    }

    /// Select the current page
    pub fn select(&self, role: RoleState) -> Option<MenuAction> {
        match self.page {
            MenuPage::Mode => Some(MenuAction::SwitchRole(role.other())),
            MenuPage::SinkFastSet | MenuPage::SourceFastSet => Some(MenuAction::Renegotiate),
            MenuPage::Status | MenuPage::Rails => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_wraps() {
        let mut menu = MenuContext::new();
        assert_eq!(menu.page(), MenuPage::Status);

        menu.scroll(ScrollDirection::Forward);
        assert_eq!(menu.page(), MenuPage::Rails);
        menu.scroll(ScrollDirection::Forward);
        assert_eq!(menu.page(), MenuPage::Mode);
        menu.scroll(ScrollDirection::Forward);
        assert_eq!(menu.page(), MenuPage::Status);

        menu.scroll(ScrollDirection::Backward);
        assert_eq!(menu.page(), MenuPage::Mode);
    }

    #[test]
    fn test_scroll_leaves_fast_set() {
        let mut menu = MenuContext::new();
        menu.jump_to_fast_set(FastSet::Sink);
        assert_eq!(menu.fast_set(), Some(FastSet::Sink));

        menu.scroll(ScrollDirection::Forward);
        assert_eq!(menu.page(), MenuPage::Status);
        assert_eq!(menu.fast_set(), None);

        menu.jump_to_fast_set(FastSet::Source);
        menu.scroll(ScrollDirection::Backward);
        assert_eq!(menu.page(), MenuPage::Mode);
    }

    #[test]
    fn test_select_actions() {
        let mut menu = MenuContext::new();
        assert_eq!(menu.select(RoleState::Sink), None);

        menu.scroll(ScrollDirection::Backward);
        assert_eq!(
            menu.select(RoleState::Sink),
            Some(MenuAction::SwitchRole(RoleState::Source))
        );
        assert_eq!(
            menu.select(RoleState::Source),
            Some(MenuAction::SwitchRole(RoleState::Sink))
        );

        menu.jump_to_fast_set(FastSet::from(RoleState::Source));
        assert_eq!(menu.page(), MenuPage::SourceFastSet);
        assert_eq!(menu.select(RoleState::Source), Some(MenuAction::Renegotiate));
    }
}
