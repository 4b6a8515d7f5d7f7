//! Recorder configuration types
//!
//! The encoding choices that differed between earlier logger variants (clock
//! lane shape, hex label casing) are explicit options here.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Configuration for a waveform recorder
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecorderConfig {
    /// How the clock lane is encoded
    #[serde(default)]
    pub clock_policy: ClockPolicy,

    /// Casing of data value labels
    #[serde(default)]
    pub hex_case: HexCase,

    /// Reject snapshots that lack a declared control or data signal
    /// instead of reading the signal as 0
    #[serde(default)]
    pub strict: bool,
}

/// Clock lane encoding
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockPolicy {
    /// `P` on every cycle
    #[default]
    Pulse,
    /// `P` on even cycles, `.` on odd cycles
    Alternating,
}

impl ClockPolicy {
    /// Clock token for the given zero-based cycle
    pub fn token(self, cycle: usize) -> char {
        match self {
            ClockPolicy::Pulse => 'P',
            ClockPolicy::Alternating if cycle % 2 == 0 => 'P',
            ClockPolicy::Alternating => '.',
        }
    }
}

impl fmt::Display for ClockPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClockPolicy::Pulse => write!(f, "pulse"),
            ClockPolicy::Alternating => write!(f, "alternating"),
        }
    }
}

/// Casing of `0x`-prefixed data labels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HexCase {
    /// `0xdead`
    #[default]
    Lower,
    /// `0XDEAD`, the whole label upper-cased
    Upper,
}

impl HexCase {
    /// Format a value as a data label
    pub fn format(self, value: u64) -> String {
        match self {
            HexCase::Lower => format!("{:#x}", value),
            HexCase::Upper => format!("0X{:X}", value),
        }
    }
}

impl fmt::Display for HexCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HexCase::Lower => write!(f, "lower"),
            HexCase::Upper => write!(f, "upper"),
        }
    }
}

impl RecorderConfig {
    /// Create a configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the clock policy
    pub fn with_clock_policy(mut self, policy: ClockPolicy) -> Self {
        self.clock_policy = policy;
        self
    }

    /// Builder method: set the hex label casing
    pub fn with_hex_case(mut self, case: HexCase) -> Self {
        self.hex_case = case;
        self
    }

    /// Builder method: enable or disable strict snapshot checking
    pub fn with_strict(mut self, enabled: bool) -> Self {
        self.strict = enabled;
        self
    }
}
