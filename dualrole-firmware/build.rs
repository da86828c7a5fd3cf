//! Build script for dualrole-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates board.toml at compile time and generates the board
//!   constants module included by main.rs

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Maximum PDOs per table accepted by the PD controller
const MAX_PDOS: usize = 7;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct BoardToml {
    bus: Bus,
    straps: Straps,
    source_pdo: Vec<Pdo>,
    sink_pdo: Vec<Pdo>,
    charger: Charger,
    timing: Timing,
    monitor: Monitor,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Bus {
    frequency_hz: u32,
    pd_address: u8,
    charger_address: u8,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Straps {
    active_low: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Pdo {
    millivolts: u16,
    milliamps: u16,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Charger {
    input_limit_ma: u16,
    charge_current_ma: u16,
    charge_voltage_mv: u16,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Timing {
    backfeed_settle_ms: u32,
    backfeed_repaint_ms: u32,
    display_sleep_ms: u32,
    default_source_mv: u16,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Monitor {
    poll_interval_ms: u32,
    stable_samples: u8,
    tolerance_mv: u16,
    max_polls: u8,
}

fn main() {
    setup_linker();
    let board = load_board();
    validate_board(&board);
    generate_board_config(&board);
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Read and parse board.toml
fn load_board() -> BoardToml {
    println!("cargo:rerun-if-changed=board.toml");

    let config_path = Path::new("board.toml");
    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: board.toml not found!                                    ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a board.toml description file in the      ║\n\
            ║  dualrole-firmware directory.                                    ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read board.toml                                ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    match toml::from_str(&content) {
        Ok(board) => board,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid board.toml                                       ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                boxed_lines(&e.to_string())
            );
        }
    }
}

/// Width of the text column inside the error boxes
const BOX_WIDTH: usize = 64;

/// Shorten `line` to `width` characters, marking the cut with "..."
///
/// toml errors quote the offending source line, which may hold any UTF-8.
fn clip(line: &str, width: usize) -> String {
    if line.chars().count() <= width {
        return line.to_string();
    }
    let cut = line
        .char_indices()
        .nth(width - 3)
        .map_or(line.len(), |(index, _)| index);
    format!("{}...", &line[..cut])
}

/// Box every line of a toml error message
fn boxed_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| format!("║  {:<width$} ║", clip(line, BOX_WIDTH), width = BOX_WIDTH))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Check value ranges the type system cannot express
fn validate_board(board: &BoardToml) {
    let mut errors = Vec::new();

    if !(10_000..=1_000_000).contains(&board.bus.frequency_hz) {
        errors.push("[bus] frequency_hz must be 10000-1000000".to_string());
    }
    for (name, address) in [
        ("pd_address", board.bus.pd_address),
        ("charger_address", board.bus.charger_address),
    ] {
        if !(0x08..=0x77).contains(&address) {
            errors.push(format!("[bus] {} must be a 7-bit address (0x08-0x77)", name));
        }
    }
    if board.bus.pd_address == board.bus.charger_address {
        errors.push("[bus] pd_address and charger_address must differ".to_string());
    }

    for (table, pdos) in [("source_pdo", &board.source_pdo), ("sink_pdo", &board.sink_pdo)] {
        if pdos.is_empty() || pdos.len() > MAX_PDOS {
            errors.push(format!("[[{}]] needs 1-{} entries", table, MAX_PDOS));
        }
        for (i, pdo) in pdos.iter().enumerate() {
            if !(5_000..=20_000).contains(&pdo.millivolts) || pdo.millivolts % 50 != 0 {
                errors.push(format!(
                    "[[{}]] #{} millivolts must be 5000-20000 in 50 mV steps",
                    table, i
                ));
            }
            if pdo.milliamps > 5_000 || pdo.milliamps % 10 != 0 {
                errors.push(format!(
                    "[[{}]] #{} milliamps must be 0-5000 in 10 mA steps",
                    table, i
                ));
            }
        }
        if let Some(first) = pdos.first() {
            if first.millivolts != 5_000 {
                errors.push(format!("[[{}]] first entry must be 5000 mV", table));
            }
        }
    }

    if board.charger.input_limit_ma == 0 || board.charger.charge_current_ma == 0 {
        errors.push("[charger] current limits must be non-zero".to_string());
    }

    if board.timing.display_sleep_ms != 0 && board.timing.display_sleep_ms < 1_000 {
        errors.push("[timing] display_sleep_ms must be 0 (never) or at least 1000".to_string());
    }

    if !(5_000..=20_000).contains(&board.timing.default_source_mv) {
        errors.push("[timing] default_source_mv must be 5000-20000".to_string());
    }

    if board.monitor.stable_samples == 0 {
        errors.push("[monitor] stable_samples must be at least 1".to_string());
    }
    if board.monitor.max_polls < board.monitor.stable_samples {
        errors.push("[monitor] max_polls must be >= stable_samples".to_string());
    }

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid board configuration                              ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=board.toml validated successfully");
}

fn pdo_table(pdos: &[Pdo]) -> String {
    pdos.iter()
        .map(|p| format!("({}, {})", p.millivolts, p.milliamps))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Write board_config.rs into OUT_DIR
fn generate_board_config(board: &BoardToml) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let mut f = File::create(out_dir.join("board_config.rs")).unwrap();

    let generated = format!(
        "// Generated from board.toml by build.rs\n\
        pub const I2C_FREQUENCY_HZ: u32 = {};\n\
        pub const PD_ADDRESS: u8 = {:#04x};\n\
        pub const CHARGER_ADDRESS: u8 = {:#04x};\n\
        pub const STRAPS_ACTIVE_LOW: bool = {};\n\
        pub const SOURCE_PDOS: &[(u16, u16)] = &[{}];\n\
        pub const SINK_PDOS: &[(u16, u16)] = &[{}];\n\
        pub const INPUT_LIMIT_MA: u16 = {};\n\
        pub const CHARGE_CURRENT_MA: u16 = {};\n\
        pub const CHARGE_VOLTAGE_MV: u16 = {};\n\
        pub const BACKFEED_SETTLE_MS: u32 = {};\n\
        pub const BACKFEED_REPAINT_MS: u32 = {};\n\
        pub const DISPLAY_SLEEP_MS: u32 = {};\n\
        pub const DEFAULT_SOURCE_MV: u16 = {};\n\
        pub const MONITOR_POLL_INTERVAL_MS: u32 = {};\n\
        pub const MONITOR_STABLE_SAMPLES: u8 = {};\n\
        pub const MONITOR_TOLERANCE_MV: u16 = {};\n\
        pub const MONITOR_MAX_POLLS: u8 = {};\n",
        board.bus.frequency_hz,
        board.bus.pd_address,
        board.bus.charger_address,
        board.straps.active_low,
        pdo_table(&board.source_pdo),
        pdo_table(&board.sink_pdo),
        board.charger.input_limit_ma,
        board.charger.charge_current_ma,
        board.charger.charge_voltage_mv,
        board.timing.backfeed_settle_ms,
        board.timing.backfeed_repaint_ms,
        board.timing.display_sleep_ms,
        board.timing.default_source_mv,
        board.monitor.poll_interval_ms,
        board.monitor.stable_samples,
        board.monitor.tolerance_mv,
        board.monitor.max_polls,
    );

    f.write_all(generated.as_bytes()).unwrap();
}
