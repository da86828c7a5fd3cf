//! Rail monitoring
//!
//! Polls the charger's measurement of one input rail until consecutive
//! readings agree. Monitoring is always bounded by
//! [`MonitorConfig::max_polls`]; a rail that never settles still yields its
//! last reading, flagged as unsettled.

use embedded_hal_async::delay::DelayNs;

use crate::config::MonitorConfig;
use crate::traits::{BusError, ChargerController, InputRail, RailReading};

/// Result of one monitoring run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MonitorOutcome {
    /// Rail that was monitored
    pub rail: InputRail,
    /// Final reading
    pub reading: RailReading,
    /// `stable_samples` consecutive readings agreed within tolerance
    pub settled: bool,
    /// Number of measurements taken
    pub polls: u8,
}

/// Poll `rail` until it is stable or the poll budget is spent
pub async fn monitor_until_stable<C, T>(
    charger: &mut C,
    delay: &mut T,
    rail: InputRail,
    config: &MonitorConfig,
) -> Result<MonitorOutcome, BusError>
where
    C: ChargerController,
    T: DelayNs,
{
    let max_polls = config.max_polls.max(1);
    let mut reading = charger.measure(rail).await?;
    let mut polls = 1u8;
    let mut stable = 1u8;

    while stable < config.stable_samples && polls < max_polls {
        delay.delay_ms(config.poll_interval_ms).await;
        let next = charger.measure(rail).await?;
        polls += 1;

        if next.millivolts.abs_diff(reading.millivolts) <= config.tolerance_mv {
            stable += 1;
        } else {
            stable = 1;
        }
        reading = next;
    }

    let settled = stable >= config.stable_samples;
    trace!("Rail {:?}: {} mV after {} polls", rail, reading.millivolts, polls);

    Ok(MonitorOutcome {
        rail,
        reading,
        settled,
        polls,
    })
}

/// Monitor the sink-attach rail (VBUS while sinking)
pub async fn monitor_sink_rail<C: ChargerController, T: DelayNs>(
    charger: &mut C,
    delay: &mut T,
    config: &MonitorConfig,
) -> Result<MonitorOutcome, BusError> {
    monitor_until_stable(charger, delay, InputRail::Vbus, config).await
}

/// Monitor VBUS while sourcing
pub async fn monitor_source_rail<C: ChargerController, T: DelayNs>(
    charger: &mut C,
    delay: &mut T,
    config: &MonitorConfig,
) -> Result<MonitorOutcome, BusError> {
    monitor_until_stable(charger, delay, InputRail::Vbus, config).await
}

/// Monitor the auxiliary VCC rail
pub async fn monitor_auxiliary_rail<C: ChargerController, T: DelayNs>(
    charger: &mut C,
    delay: &mut T,
    config: &MonitorConfig,
) -> Result<MonitorOutcome, BusError> {
    monitor_until_stable(charger, delay, InputRail::Vcc, config).await
}
