//! Mock bus and pins for driver tests

use std::collections::{BTreeMap, VecDeque};
use std::vec::Vec;

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType as PinErrorType, InputPin};
use embedded_hal_async::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};

/// Register-file I2C bus
///
/// Each `(address, register)` holds raw bytes. A write of more than the
/// command byte stores the remaining bytes; a write-then-read returns them
/// zero-padded. Queued values are returned once each before the stored
/// value.
#[derive(Debug, Default)]
pub struct MockI2c {
    registers: BTreeMap<(u8, u8), Vec<u8>>,
    queued: BTreeMap<(u8, u8), VecDeque<Vec<u8>>>,
    writes: Vec<(u8, Vec<u8>)>,
    reads: Vec<(u8, u8)>,
    pub nack: bool,
}

impl MockI2c {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_word(&mut self, address: u8, reg: u8, value: u16) {
        self.registers
            .insert((address, reg), value.to_le_bytes().to_vec());
    }

    pub fn set_long(&mut self, address: u8, reg: u8, value: u32) {
        self.registers
            .insert((address, reg), value.to_le_bytes().to_vec());
    }

    pub fn push_words(&mut self, address: u8, reg: u8, values: &[u16]) {
        let queue = self.queued.entry((address, reg)).or_default();
        queue.extend(values.iter().map(|v| v.to_le_bytes().to_vec()));
    }

    /// Current value of a word register
    pub fn word(&self, address: u8, reg: u8) -> u16 {
        let bytes = self.registers.get(&(address, reg));
        let lo = bytes.and_then(|b| b.first()).copied().unwrap_or(0);
        let hi = bytes.and_then(|b| b.get(1)).copied().unwrap_or(0);
        u16::from_le_bytes([lo, hi])
    }

    /// All writes in order, command byte first
    pub fn writes(&self) -> &[(u8, Vec<u8>)] {
        &self.writes
    }

    /// Word values written to one register, in order
    pub fn written_words(&self, address: u8, reg: u8) -> Vec<u16> {
        self.writes
            .iter()
            .filter(|(a, bytes)| *a == address && bytes.len() == 3 && bytes[0] == reg)
            .map(|(_, bytes)| u16::from_le_bytes([bytes[1], bytes[2]]))
            .collect()
    }

    /// Registers read, in order
    pub fn reads(&self) -> &[(u8, u8)] {
        &self.reads
    }

}

impl ErrorType for MockI2c {
    type Error = ErrorKind;
}

impl I2c for MockI2c {
    async fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if self.nack {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }

        let mut pointer = None;
        for op in operations.iter_mut() {
            match op {
                Operation::Write(bytes) => {
                    let reg = *bytes.first().ok_or(ErrorKind::Other)?;
                    pointer = Some(reg);
                    if bytes.len() > 1 {
                        self.writes.push((address, bytes.to_vec()));
                        self.registers.insert((address, reg), bytes[1..].to_vec());
                    }
                }
                Operation::Read(buf) => {
                    let reg = pointer.ok_or(ErrorKind::Other)?;
                    self.reads.push((address, reg));
                    let value = self
                        .queued
                        .get_mut(&(address, reg))
                        .and_then(|q| q.pop_front())
                        .or_else(|| self.registers.get(&(address, reg)).cloned())
                        .unwrap_or_default();
                    for (i, byte) in buf.iter_mut().enumerate() {
                        *byte = value.get(i).copied().unwrap_or(0);
                    }
                }
            }
        }
        Ok(())
    }
}

/// Input pin with a fixed level
#[derive(Debug, Default)]
pub struct MockPin {
    pub high: bool,
}

impl MockPin {
    pub fn input(high: bool) -> Self {
        Self { high }
    }
}

impl PinErrorType for MockPin {
    type Error = Infallible;
}

impl InputPin for MockPin {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(self.high)
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(!self.high)
    }
}

/// Delay provider that returns immediately
#[derive(Debug, Default)]
pub struct NoDelay;

impl embedded_hal_async::delay::DelayNs for NoDelay {
    async fn delay_ns(&mut self, _ns: u32) {}
}
