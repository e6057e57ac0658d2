//! # Session Configuration
//!
//! Configuration for the playback session coordinator.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How often periodic progress ticks are delivered to the delegate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimeEventFrequency {
    EverySecond,
    EveryHalfSecond,
    EveryQuarterSecond,
    Custom(Duration),
}

impl TimeEventFrequency {
    /// The tick interval this frequency stands for.
    pub fn interval(&self) -> Duration {
        match self {
            TimeEventFrequency::EverySecond => Duration::from_secs(1),
            TimeEventFrequency::EveryHalfSecond => Duration::from_millis(500),
            TimeEventFrequency::EveryQuarterSecond => Duration::from_millis(250),
            TimeEventFrequency::Custom(interval) => *interval,
        }
    }
}

impl Default for TimeEventFrequency {
    fn default() -> Self {
        TimeEventFrequency::EverySecond
    }
}

/// Playback session configuration.
///
/// Engine-level values (volume, mute, rate, auto-wait) are applied to every
/// engine instance the coordinator creates, including replacements built
/// after an item failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// How much media the engine should keep buffered ahead of the
    /// playhead. Zero lets the engine choose. Applied per attached item.
    ///
    /// Default: 0 (engine-chosen).
    #[serde(default)]
    pub preferred_buffer_duration: Duration,

    /// Periodic progress tick frequency.
    ///
    /// Default: every second.
    #[serde(default)]
    pub time_event_frequency: TimeEventFrequency,

    /// Whether the engine may delay rate changes to minimize stalling.
    ///
    /// Default: true.
    #[serde(default = "default_auto_wait")]
    pub auto_wait_to_minimize_stalling: bool,

    /// Initial volume, `0.0..=1.0`.
    ///
    /// Default: 1.0.
    #[serde(default = "default_volume")]
    pub volume: f32,

    /// Initial mute state.
    ///
    /// Default: false.
    #[serde(default)]
    pub muted: bool,

    /// Initial playback rate.
    ///
    /// Default: 1.0.
    #[serde(default = "default_rate")]
    pub rate: f32,
}

impl SessionConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.volume) {
            return Err(format!(
                "volume must be between 0.0 and 1.0, got {}",
                self.volume
            ));
        }
        if self.rate <= 0.0 {
            return Err(format!("rate must be positive, got {}", self.rate));
        }
        if self.time_event_frequency.interval().is_zero() {
            return Err("time event interval must be non-zero".to_string());
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            preferred_buffer_duration: Duration::ZERO,
            time_event_frequency: TimeEventFrequency::default(),
            auto_wait_to_minimize_stalling: default_auto_wait(),
            volume: default_volume(),
            muted: false,
            rate: default_rate(),
        }
    }
}

fn default_auto_wait() -> bool {
    true
}

fn default_volume() -> f32 {
    1.0
}

fn default_rate() -> f32 {
    1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(SessionConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_volume() {
        let config = SessionConfig {
            volume: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_tick_interval() {
        let config = SessionConfig {
            time_event_frequency: TimeEventFrequency::Custom(Duration::ZERO),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn frequency_intervals() {
        assert_eq!(
            TimeEventFrequency::EverySecond.interval(),
            Duration::from_secs(1)
        );
        assert_eq!(
            TimeEventFrequency::EveryQuarterSecond.interval(),
            Duration::from_millis(250)
        );
        assert_eq!(
            TimeEventFrequency::Custom(Duration::from_millis(100)).interval(),
            Duration::from_millis(100)
        );
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: SessionConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.volume, 1.0);
        assert!(config.auto_wait_to_minimize_stalling);
        assert_eq!(config.time_event_frequency, TimeEventFrequency::EverySecond);
    }
}
