//! Word-sized register access shared by the I2C drivers
//!
//! Both devices use SMBus-style word transfers: an 8-bit command code
//! followed by a little-endian 16-bit data word.

use dualrole_core::traits::BusError;
use embedded_hal_async::i2c::{Error as _, I2c};

fn bus_error<E: embedded_hal_async::i2c::Error>(e: E) -> BusError {
    e.kind().into()
}

/// Read one 16-bit register
pub(crate) async fn read_word<I: I2c>(i2c: &mut I, address: u8, reg: u8) -> Result<u16, BusError> {
    let mut buf = [0u8; 2];
    i2c.write_read(address, &[reg], &mut buf)
        .await
        .map_err(bus_error)?;
    Ok(u16::from_le_bytes(buf))
}

/// Write one 16-bit register
pub(crate) async fn write_word<I: I2c>(
    i2c: &mut I,
    address: u8,
    reg: u8,
    value: u16,
) -> Result<(), BusError> {
    let [lo, hi] = value.to_le_bytes();
    i2c.write(address, &[reg, lo, hi]).await.map_err(bus_error)
}

/// Read-modify-write a 16-bit register
pub(crate) async fn modify_word<I: I2c>(
    i2c: &mut I,
    address: u8,
    reg: u8,
    clear: u16,
    set: u16,
) -> Result<(), BusError> {
    let value = read_word(i2c, address, reg).await?;
    write_word(i2c, address, reg, (value & !clear) | set).await
}

/// Read a 32-bit register
pub(crate) async fn read_long<I: I2c>(i2c: &mut I, address: u8, reg: u8) -> Result<u32, BusError> {
    let mut buf = [0u8; 4];
    i2c.write_read(address, &[reg], &mut buf)
        .await
        .map_err(bus_error)?;
    Ok(u32::from_le_bytes(buf))
}

/// Write a block: command code, byte count, then the payload
pub(crate) async fn write_block<I: I2c>(
    i2c: &mut I,
    address: u8,
    reg: u8,
    payload: &[u8],
) -> Result<(), BusError> {
    let mut frame: heapless::Vec<u8, 34> = heapless::Vec::new();
    let len = u8::try_from(payload.len()).map_err(|_| BusError::Other)?;
    frame.push(reg).map_err(|_| BusError::Other)?;
    frame.push(len).map_err(|_| BusError::Other)?;
    frame
        .extend_from_slice(payload)
        .map_err(|_| BusError::Other)?;
    i2c.write(address, &frame).await.map_err(bus_error)
}
