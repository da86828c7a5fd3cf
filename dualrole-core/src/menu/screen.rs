//! Text layout of the character display

use core::fmt::{self, Write};

use heapless::String;

use super::context::{MenuContext, MenuPage};
use crate::state::RoleState;

/// Display rows
pub const ROWS: usize = 2;
/// Display columns
pub const COLUMNS: usize = 16;

/// Row buffer that silently drops text past the last column
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Row(String<COLUMNS>);

impl Write for Row {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if self.0.push(c).is_err() {
                break;
            }
        }
        Ok(())
    }
}

/// Composed contents of both display rows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Screen {
    rows: [Row; ROWS],
}

impl Screen {
    /// Lay out the page the menu is showing
    pub fn compose(role: RoleState, menu: &MenuContext) -> Self {
        let mut screen = Self::default();
        let telemetry = &menu.telemetry;
        let [top, bottom] = &mut screen.rows;

        // Row writes never fail, overflow is truncated
        let _ = match menu.page() {
            MenuPage::Status => {
                let _ = write!(top, "Role: {}", role.label());
                let battery = if telemetry.battery_present { "yes" } else { "no" };
                write!(bottom, "Battery: {}", battery)
            }
            MenuPage::Rails => match telemetry.last_reading {
                Some((rail, reading)) => {
                    let _ = write!(top, "{} {}mV", rail.label(), reading.millivolts);
                    write!(bottom, "{}mA", reading.milliamps)
                }
                None => {
                    let _ = top.write_str("Rails");
                    bottom.write_str("No reading")
                }
            },
            MenuPage::Mode => {
                let _ = write!(top, "Mode: {}", role.label());
                write!(bottom, "> {}", role.other().label())
            }
            MenuPage::SinkFastSet => {
                let _ = top.write_str("Sink fast-set");
                match telemetry.last_reading {
                    Some((rail, reading)) => {
                        write!(bottom, "{} {}mV", rail.label(), reading.millivolts)
                    }
                    None => bottom.write_str("> Request"),
                }
            }
            MenuPage::SourceFastSet => {
                let _ = top.write_str("Source fast-set");
                match telemetry.source_mv {
                    Some(mv) => write!(bottom, "Out {}mV", mv),
                    None => bottom.write_str("> Offer"),
                }
            }
        };

        screen
    }

    /// Text of one row, `None` past the last row
    pub fn line(&self, row: usize) -> Option<&str> {
        self.rows.get(row).map(|r| r.0.as_str())
    }

    /// Iterate over the rows, top first
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|r| r.0.as_str())
    }
}
