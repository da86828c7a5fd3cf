//! Mock collaborators for coordinator tests
//!
//! Every mock records its calls into a shared, ordered [`CallLog`] so tests
//! can assert on sequencing across the PD controller, the charger, the
//! display and the delay provider.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal_async::delay::DelayNs;

use crate::coordinator::Board;
use crate::menu::{MenuContext, MenuPage};
use crate::signal::SharedSignal;
use crate::state::RoleState;
use crate::traits::{
    BusError, ChargerController, DisplayError, InputRail, MenuDisplay, PdController, RailReading,
};

/// One recorded collaborator call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    // PD controller
    AlertStatus,
    PortStatus,
    LoadSourceOffers,
    LoadSinkOffers,
    ApplySinkConfig,
    ApplySourceConfig,
    NegotiateSinkRequest,
    NegotiateSourceOffer,
    DisableReverseDrive,
    RevertVoltage(u16),

    // Charger
    ChargerStartup,
    SetCharging(bool),
    RailStatus,
    Acknowledge(u16),
    ClearInterrupts,
    SelectRail(InputRail),
    Measure(InputRail),

    // Display
    Wake,
    Sleep,
    Repaint(RoleState, MenuPage),

    // Delay
    DelayMs(u32),
}

impl Call {
    /// Check if this call writes to a device
    pub fn is_write(&self) -> bool {
        !matches!(
            self,
            Call::AlertStatus
                | Call::PortStatus
                | Call::RailStatus
                | Call::Measure(_)
                | Call::Wake
                | Call::Sleep
                | Call::Repaint(..)
                | Call::DelayMs(_)
        )
    }
}

/// Shared, ordered call log
#[derive(Debug, Clone, Default)]
pub struct CallLog(Rc<RefCell<Vec<Call>>>);

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, call: Call) {
        self.0.borrow_mut().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.borrow().clone()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.0.borrow().iter().filter(|c| pred(c)).count()
    }

    pub fn contains(&self, call: Call) -> bool {
        self.position(call).is_some()
    }

    /// Index of the first occurrence of `call`
    pub fn position(&self, call: Call) -> Option<usize> {
        self.0.borrow().iter().position(|c| *c == call)
    }

    /// Index of the last occurrence of `call`
    pub fn last_position(&self, call: Call) -> Option<usize> {
        self.0.borrow().iter().rposition(|c| *c == call)
    }

    /// Calls matching `pred`, in order
    pub fn filtered(&self, pred: impl Fn(&Call) -> bool) -> Vec<Call> {
        self.0.borrow().iter().copied().filter(|c| pred(c)).collect()
    }
}

/// Scripted register: queued values first, then a fixed fallback
#[derive(Debug, Default)]
pub struct Register {
    queue: VecDeque<u16>,
    fallback: u16,
}

impl Register {
    pub fn set(&mut self, value: u16) {
        self.queue.clear();
        self.fallback = value;
    }

    pub fn push(&mut self, values: &[u16]) {
        self.queue.extend(values.iter().copied());
    }

    fn next(&mut self) -> u16 {
        self.queue.pop_front().unwrap_or(self.fallback)
    }
}

fn check(log: &CallLog, fail: Option<Call>, call: Call) -> Result<(), BusError> {
    log.record(call);
    if fail == Some(call) {
        Err(BusError::Nack)
    } else {
        Ok(())
    }
}

/// Mock PD controller
#[derive(Debug)]
pub struct MockPd {
    log: CallLog,
    pub alert: Register,
    pub port: Register,
    pub source_mv: u16,
    fail: Option<Call>,
    raise_on: Option<(Call, &'static SharedSignal)>,
}

impl MockPd {
    pub fn new() -> (Self, CallLog) {
        let log = CallLog::new();
        (Self::with_log(&log), log)
    }

    pub fn with_log(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            alert: Register::default(),
            port: Register::default(),
            source_mv: 9000,
            fail: None,
            raise_on: None,
        }
    }

    pub fn fail_on(&mut self, call: Call) {
        self.fail = Some(call);
    }

    /// Raise `signal` the next time `call` is made, as an interrupt would
    pub fn raise_on(&mut self, call: Call, signal: &'static SharedSignal) {
        self.raise_on = Some((call, signal));
    }

    fn check(&mut self, call: Call) -> Result<(), BusError> {
        if let Some((trigger, signal)) = self.raise_on {
            if trigger == call {
                signal.set();
                self.raise_on = None;
            }
        }
        check(&self.log, self.fail, call)
    }
}

impl PdController for MockPd {
    async fn alert_status(&mut self) -> Result<u16, BusError> {
        self.check(Call::AlertStatus)?;
        Ok(self.alert.next())
    }

    async fn port_status(&mut self) -> Result<u16, BusError> {
        self.check(Call::PortStatus)?;
        Ok(self.port.next())
    }

    async fn load_source_offers(&mut self) -> Result<(), BusError> {
        self.check(Call::LoadSourceOffers)
    }

    async fn load_sink_offers(&mut self) -> Result<(), BusError> {
        self.check(Call::LoadSinkOffers)
    }

    async fn apply_sink_config(&mut self) -> Result<(), BusError> {
        self.check(Call::ApplySinkConfig)
    }

    async fn apply_source_config(&mut self) -> Result<(), BusError> {
        self.check(Call::ApplySourceConfig)
    }

    async fn negotiate_sink_request(&mut self) -> Result<(), BusError> {
        self.check(Call::NegotiateSinkRequest)
    }

    async fn negotiate_source_offer(&mut self) -> Result<u16, BusError> {
        self.check(Call::NegotiateSourceOffer)?;
        Ok(self.source_mv)
    }

    async fn disable_reverse_drive(&mut self) -> Result<(), BusError> {
        self.check(Call::DisableReverseDrive)
    }

    async fn revert_to_default_voltage(&mut self, millivolts: u16) -> Result<(), BusError> {
        self.check(Call::RevertVoltage(millivolts))
    }
}

/// Reading with a fixed current
pub fn reading(millivolts: u16) -> RailReading {
    RailReading {
        millivolts,
        milliamps: 500,
    }
}

/// Mock charger
#[derive(Debug)]
pub struct MockCharger {
    log: CallLog,
    pub rail: Register,
    readings: VecDeque<RailReading>,
    pub fallback_reading: RailReading,
    fail: Option<Call>,
}

impl MockCharger {
    pub fn new() -> (Self, CallLog) {
        let log = CallLog::new();
        (Self::with_log(&log), log)
    }

    pub fn with_log(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            rail: Register::default(),
            readings: VecDeque::new(),
            fallback_reading: reading(5000),
            fail: None,
        }
    }

    pub fn push_readings(&mut self, readings: &[RailReading]) {
        self.readings.extend(readings.iter().copied());
    }

    pub fn fail_on(&mut self, call: Call) {
        self.fail = Some(call);
    }
}

impl ChargerController for MockCharger {
    async fn run_startup_sequence(&mut self) -> Result<(), BusError> {
        check(&self.log, self.fail, Call::ChargerStartup)
    }

    async fn set_charging_enabled(&mut self, enabled: bool) -> Result<(), BusError> {
        check(&self.log, self.fail, Call::SetCharging(enabled))
    }

    async fn rail_status(&mut self) -> Result<u16, BusError> {
        check(&self.log, self.fail, Call::RailStatus)?;
        Ok(self.rail.next())
    }

    async fn acknowledge_interrupt(&mut self, mask: u16) -> Result<(), BusError> {
        check(&self.log, self.fail, Call::Acknowledge(mask))
    }

    async fn clear_interrupts(&mut self) -> Result<(), BusError> {
        check(&self.log, self.fail, Call::ClearInterrupts)
    }

    async fn select_active_rail(&mut self, rail: InputRail) -> Result<(), BusError> {
        check(&self.log, self.fail, Call::SelectRail(rail))
    }

    async fn measure(&mut self, rail: InputRail) -> Result<RailReading, BusError> {
        check(&self.log, self.fail, Call::Measure(rail))?;
        Ok(self.readings.pop_front().unwrap_or(self.fallback_reading))
    }
}

/// Mock menu display
#[derive(Debug)]
pub struct MockDisplay {
    log: CallLog,
    pub fail: bool,
}

impl MockDisplay {
    pub fn with_log(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            fail: false,
        }
    }

    fn result(&self) -> Result<(), DisplayError> {
        if self.fail {
            Err(DisplayError::NotReady)
        } else {
            Ok(())
        }
    }
}

impl MenuDisplay for MockDisplay {
    async fn wake(&mut self) -> Result<(), DisplayError> {
        self.log.record(Call::Wake);
        self.result()
    }

    async fn sleep(&mut self) -> Result<(), DisplayError> {
        self.log.record(Call::Sleep);
        self.result()
    }

    async fn repaint(&mut self, role: RoleState, menu: &MenuContext) -> Result<(), DisplayError> {
        self.log.record(Call::Repaint(role, menu.page()));
        self.result()
    }
}

/// Delay provider that records instead of waiting
#[derive(Debug)]
pub struct MockDelay {
    log: CallLog,
}

impl MockDelay {
    pub fn new(log: &CallLog) -> Self {
        Self { log: log.clone() }
    }
}

impl DelayNs for MockDelay {
    async fn delay_ns(&mut self, _ns: u32) {}

    async fn delay_ms(&mut self, ms: u32) {
        self.log.record(Call::DelayMs(ms));
    }
}

pub type MockBoard = Board<MockPd, MockCharger, MockDisplay, MockDelay>;

/// Board made of mocks sharing one call log
pub fn mock_board() -> (MockBoard, CallLog) {
    let log = CallLog::new();
    let board = Board {
        pd: MockPd::with_log(&log),
        charger: MockCharger::with_log(&log),
        display: MockDisplay::with_log(&log),
        delay: MockDelay::new(&log),
    };
    (board, log)
}
