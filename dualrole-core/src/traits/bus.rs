//! Command-bus errors

use embedded_hal_async::i2c::ErrorKind;

/// Errors from a word-sized command-bus transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusError {
    /// Device did not acknowledge its address or a data byte
    Nack,
    /// Bus-level fault (arbitration loss, misplaced start/stop)
    Bus,
    /// Device did not complete a command in time
    Timeout,
    /// Any other transfer failure
    Other,
}

impl From<ErrorKind> for BusError {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::NoAcknowledge(_) => BusError::Nack,
            ErrorKind::Bus | ErrorKind::ArbitrationLoss => BusError::Bus,
            _ => BusError::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_async::i2c::NoAcknowledgeSource;

    #[test]
    fn test_error_kind_mapping() {
        assert_eq!(
            BusError::from(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address)),
            BusError::Nack
        );
        assert_eq!(BusError::from(ErrorKind::ArbitrationLoss), BusError::Bus);
        assert_eq!(BusError::from(ErrorKind::Overrun), BusError::Other);
    }
}
