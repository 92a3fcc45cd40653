//! Air-quality categories and threshold classification
//!
//! The sensor value grows with the concentration of reducing gases, so the
//! categories are ordered from the cleanest reading (`Excellent`) to the
//! dirtiest (`Poor`). Classification walks the thresholds from `poor`
//! downward and stops at the first one the value strictly exceeds.
//!
//! ```rust
//! use odorsense_core::{AirQuality, Thresholds};
//!
//! let thresholds = Thresholds::default();
//! assert_eq!(thresholds.classify(520), AirQuality::Poor);
//! assert_eq!(thresholds.classify(500), AirQuality::Inferior);
//! assert_eq!(thresholds.classify(260), AirQuality::Excellent);
//! assert_eq!(thresholds.classify(250), AirQuality::Unknown);
//! ```

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::constants::quality::{
    DEFAULT_THRESHOLD_EXCELLENT, DEFAULT_THRESHOLD_FAIR, DEFAULT_THRESHOLD_GOOD,
    DEFAULT_THRESHOLD_INFERIOR, DEFAULT_THRESHOLD_POOR,
};
use crate::constants::sensors::ADC_MAX_VALUE;
use crate::errors::{ConfigError, ConfigResult};

/// Air-quality category as published on the accessory characteristic
///
/// Discriminants are the characteristic's wire values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[repr(u8)]
pub enum AirQuality {
    /// No usable reading yet, or the element reads below every threshold
    #[default]
    Unknown = 0,
    /// Above the `excellent` threshold
    Excellent = 1,
    /// Above the `good` threshold
    Good = 2,
    /// Above the `fair` threshold
    Fair = 3,
    /// Above the `inferior` threshold
    Inferior = 4,
    /// Above the `poor` threshold
    Poor = 5,
}

impl AirQuality {
    /// All categories in wire order
    pub const ALL: [AirQuality; 6] = [
        AirQuality::Unknown,
        AirQuality::Excellent,
        AirQuality::Good,
        AirQuality::Fair,
        AirQuality::Inferior,
        AirQuality::Poor,
    ];

    /// Characteristic wire value
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Lower-case label
    pub const fn label(self) -> &'static str {
        match self {
            AirQuality::Unknown => "unknown",
            AirQuality::Excellent => "excellent",
            AirQuality::Good => "good",
            AirQuality::Fair => "fair",
            AirQuality::Inferior => "inferior",
            AirQuality::Poor => "poor",
        }
    }
}

impl TryFrom<u8> for AirQuality {
    type Error = ConfigError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(value as usize)
            .copied()
            .ok_or(ConfigError::InvalidValue { reason: "air quality out of range" })
    }
}

impl From<AirQuality> for u8 {
    fn from(quality: AirQuality) -> Self {
        quality.as_u8()
    }
}

impl fmt::Display for AirQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for AirQuality {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{}", self.label())
    }
}

/// Cut points between categories, in sensor-value units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Thresholds {
    /// Readings above this are `Poor`
    #[cfg_attr(feature = "serde", serde(default = "default_poor"))]
    pub poor: u16,
    /// Readings above this are at least `Inferior`
    #[cfg_attr(feature = "serde", serde(default = "default_inferior"))]
    pub inferior: u16,
    /// Readings above this are at least `Fair`
    #[cfg_attr(feature = "serde", serde(default = "default_fair"))]
    pub fair: u16,
    /// Readings above this are at least `Good`
    #[cfg_attr(feature = "serde", serde(default = "default_good"))]
    pub good: u16,
    /// Readings at or below this are `Unknown`
    #[cfg_attr(feature = "serde", serde(default = "default_excellent"))]
    pub excellent: u16,
}

#[cfg(feature = "serde")]
fn default_poor() -> u16 {
    DEFAULT_THRESHOLD_POOR
}

#[cfg(feature = "serde")]
fn default_inferior() -> u16 {
    DEFAULT_THRESHOLD_INFERIOR
}

#[cfg(feature = "serde")]
fn default_fair() -> u16 {
    DEFAULT_THRESHOLD_FAIR
}

#[cfg(feature = "serde")]
fn default_good() -> u16 {
    DEFAULT_THRESHOLD_GOOD
}

#[cfg(feature = "serde")]
fn default_excellent() -> u16 {
    DEFAULT_THRESHOLD_EXCELLENT
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            poor: DEFAULT_THRESHOLD_POOR,
            inferior: DEFAULT_THRESHOLD_INFERIOR,
            fair: DEFAULT_THRESHOLD_FAIR,
            good: DEFAULT_THRESHOLD_GOOD,
            excellent: DEFAULT_THRESHOLD_EXCELLENT,
        }
    }
}

impl Thresholds {
    /// Create thresholds, checking that they are strictly descending
    pub fn new(poor: u16, inferior: u16, fair: u16, good: u16, excellent: u16) -> ConfigResult<Self> {
        let thresholds = Self { poor, inferior, fair, good, excellent };
        thresholds.validate()?;
        Ok(thresholds)
    }

    /// Check ordering and range
    pub fn validate(&self) -> ConfigResult<()> {
        if self.poor > ADC_MAX_VALUE {
            return Err(ConfigError::InvalidThresholds {
                reason: "poor threshold exceeds the 10-bit sensor range",
            });
        }

        let ordered = self.poor > self.inferior
            && self.inferior > self.fair
            && self.fair > self.good
            && self.good > self.excellent;

        if !ordered {
            return Err(ConfigError::InvalidThresholds {
                reason: "thresholds must strictly descend from poor to excellent",
            });
        }

        Ok(())
    }

    /// Map a sensor value to its category
    pub fn classify(&self, value: u16) -> AirQuality {
        if value > self.poor {
            AirQuality::Poor
        } else if value > self.inferior {
            AirQuality::Inferior
        } else if value > self.fair {
            AirQuality::Fair
        } else if value > self.good {
            AirQuality::Good
        } else if value > self.excellent {
            AirQuality::Excellent
        } else {
            AirQuality::Unknown
        }
    }
}
